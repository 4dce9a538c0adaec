use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::cache::UpstreamCaches;
use crate::client::{Endpoints, RiotClient};
use crate::config::{CacheConfig, Config, RiotConfig};

pub const API_KEY: &str = "RGAPI-test";

/// Mock upstream serving both the regional API (under `/{region}`) and the
/// CDN (under `/cdn`).
pub struct TestUpstream {
    pub server: MockServer,
    pub config: Config,
    caches: UpstreamCaches,
}

impl TestUpstream {
    pub async fn start() -> Self {
        Self::start_with_cache(CacheConfig::default()).await
    }

    pub async fn start_with_cache(cache: CacheConfig) -> Self {
        let server = MockServer::start().await;
        let config = Config {
            riot: RiotConfig {
                api_key: Some(API_KEY.into()),
                api_base_url: format!("{}/{{region}}", server.uri()),
                cdn_base_url: format!("{}/cdn", server.uri()),
                connect_timeout_secs: 2,
                request_timeout_secs: 5,
            },
            cache,
            ..Config::default()
        };
        let caches = UpstreamCaches::new(&config.cache);

        TestUpstream {
            server,
            config,
            caches,
        }
    }

    /// A fresh client sharing this upstream's caches.
    pub fn client(&self) -> RiotClient {
        RiotClient::new(
            &self.config.riot,
            Arc::new(Endpoints::from_config(&self.config.riot)),
            self.caches.clone(),
        )
        .unwrap()
    }
}

/// Recorder that logs every counter lookup as `name{label=value,...}`.
///
/// Install it on the test thread with `metrics::set_default_local_recorder`.
#[derive(Default)]
pub struct CounterLog(Mutex<Vec<String>>);

impl CounterLog {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl Recorder for CounterLog {
    fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
        let labels: Vec<String> = key
            .labels()
            .map(|label| format!("{}={}", label.key(), label.value()))
            .collect();
        self.0
            .lock()
            .unwrap()
            .push(format!("{}{{{}}}", key.name(), labels.join(",")));
        Counter::noop()
    }

    fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

pub fn account_json(puuid: &str) -> Value {
    json!({
        "puuid": puuid,
        "gameName": "Faker",
        "tagLine": "KR1"
    })
}

/// A two player match. `puuid` played Ahri with boots, greaves and a trinket.
pub fn match_json(match_id: &str, puuid: &str, kills: u32) -> Value {
    json!({
        "metadata": {
            "matchId": match_id,
            "participants": [puuid, "other-player"]
        },
        "info": {
            "gameDuration": 1854,
            "gameMode": "CLASSIC",
            "gameStartTimestamp": 1_700_000_000_000_i64,
            "queueId": 420,
            "participants": [
                {
                    "puuid": "other-player",
                    "championName": "Zed",
                    "championId": 238,
                    "item0": 3142, "item1": 0, "item2": 0, "item3": 0,
                    "item4": 0, "item5": 0, "item6": 3364,
                    "kills": 3,
                    "deaths": 7,
                    "assists": 1,
                    "totalMinionsKilled": 150,
                    "win": false
                },
                {
                    "puuid": puuid,
                    "championName": "Ahri",
                    "championId": 103,
                    "item0": 1001, "item1": 0, "item2": 3006, "item3": 0,
                    "item4": 0, "item5": 0, "item6": 3340,
                    "kills": kills,
                    "deaths": 2,
                    "assists": 9,
                    "totalMinionsKilled": 201,
                    "win": true,
                    "goldEarned": 12000
                }
            ]
        }
    })
}

pub fn catalog_json() -> Value {
    json!([
        {
            "id": 1001,
            "name": "Boots",
            "iconPath": "/lol-game-data/assets/ASSETS/Items/Icons2D/1001_Boots.png"
        },
        {
            "id": 3006,
            "name": "Berserker's Greaves",
            "iconPath": "/lol-game-data/assets/ASSETS/Items/Icons2D/3006_Greaves.png"
        },
        {
            "id": 3340,
            "name": "Stealth Ward",
            "iconPath": "/lol-game-data/assets/ASSETS/Items/Icons2D/3340_Warding_Totem.png"
        }
    ])
}

pub async fn mount_account(server: &MockServer, nickname: &str, tag: &str, puuid: &str) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/europe/riot/account/v1/accounts/by-riot-id/{nickname}/{tag}"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json(puuid)))
        .mount(server)
        .await;
}

pub async fn mount_match_ids(server: &MockServer, region: &str, puuid: &str, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/{region}/lol/match/v5/matches/by-puuid/{puuid}/ids"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(ids))
        .mount(server)
        .await;
}

pub async fn mount_match(server: &MockServer, region: &str, match_id: &str, puuid: &str, kills: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/{region}/lol/match/v5/matches/{match_id}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(match_json(match_id, puuid, kills)),
        )
        .mount(server)
        .await;
}

pub async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cdn/v1/items.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_json()))
        .mount(server)
        .await;
}
