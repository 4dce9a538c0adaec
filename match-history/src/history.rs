use shared::histogram;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::UpstreamCaches;
use crate::client::{Endpoints, RiotClient};
use crate::config::{Config, RiotConfig};
use crate::errors::HistoryError;
use crate::fanout::join_ordered;
use crate::metrics_defs::HISTORY_REQUEST_DURATION;
use crate::region::{PlatformRegion, RoutingRegion};
use crate::summary::summarize;
use crate::types::{HistoryEntry, MatchRecord};

/// The account endpoint is global and only answers on this routing value,
/// whatever the player's platform.
pub const ACCOUNT_ROUTING: RoutingRegion = RoutingRegion::Europe;

/// Aggregates a player's recent games.
///
/// The service is long lived and cheap to clone. It owns the process-wide
/// upstream caches; every call to `get_history` builds its own `RiotClient`
/// on top of them and drops it when done.
#[derive(Clone)]
pub struct HistoryService {
    riot: Arc<RiotConfig>,
    endpoints: Arc<Endpoints>,
    caches: UpstreamCaches,
}

impl HistoryService {
    pub fn new(config: &Config) -> Self {
        HistoryService {
            riot: Arc::new(config.riot.clone()),
            endpoints: Arc::new(Endpoints::from_config(&config.riot)),
            caches: UpstreamCaches::new(&config.cache),
        }
    }

    pub fn caches(&self) -> &UpstreamCaches {
        &self.caches
    }

    /// Most recent games first, one entry per match id returned upstream.
    pub async fn get_history(
        &self,
        platform: PlatformRegion,
        nickname: &str,
        tag: &str,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        let start = Instant::now();
        let result = self.aggregate(platform, nickname, tag).await;
        histogram!(HISTORY_REQUEST_DURATION).record(start.elapsed().as_secs_f64());

        match &result {
            Ok(entries) => tracing::info!(
                region = %platform,
                nickname,
                tag,
                games = entries.len(),
                "Aggregated match history"
            ),
            Err(e @ HistoryError::Internal(_)) => tracing::error!(
                region = %platform,
                nickname,
                tag,
                error = %e,
                "Match history aggregation failed"
            ),
            Err(e) => tracing::warn!(
                region = %platform,
                nickname,
                tag,
                error = %e,
                "Match history aggregation failed"
            ),
        }

        result
    }

    async fn aggregate(
        &self,
        platform: PlatformRegion,
        nickname: &str,
        tag: &str,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        let routing = platform.routing();
        let client = RiotClient::new(&self.riot, self.endpoints.clone(), self.caches.clone())?;

        let account = client
            .fetch_account(ACCOUNT_ROUTING, nickname, tag)
            .await?;
        let match_ids = client.fetch_match_ids(routing, &account.puuid).await?;
        tracing::debug!(region = %routing, matches = match_ids.len(), "Fetched match ids");

        let records = client.fetch_matches(routing, &match_ids).await?;

        summarize_all(&client, records, &account.puuid).await
    }
}

async fn summarize_all(
    client: &RiotClient,
    records: Vec<Arc<MatchRecord>>,
    puuid: &str,
) -> Result<Vec<HistoryEntry>, HistoryError> {
    let summaries = records.into_iter().map(|record| {
        let client = client.clone();
        let puuid = puuid.to_string();
        async move { summarize(&client, &record, &puuid).await.into_entry() }
    });

    Ok(join_ordered(summaries).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{self, TestUpstream};
    use http::StatusCode;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, ResponseTemplate};

    fn service(upstream: &TestUpstream) -> HistoryService {
        HistoryService::new(&upstream.config)
    }

    #[tokio::test]
    async fn test_end_to_end_korea() {
        let upstream = TestUpstream::start().await;
        testutils::mount_account(&upstream.server, "Faker", "KR1", "faker-puuid").await;
        testutils::mount_match_ids(
            &upstream.server,
            "asia",
            "faker-puuid",
            &["KR_3", "KR_2", "KR_1"],
        )
        .await;
        for (match_id, kills) in [("KR_3", 3), ("KR_2", 2), ("KR_1", 1)] {
            testutils::mount_match(&upstream.server, "asia", match_id, "faker-puuid", kills).await;
        }
        testutils::mount_catalog(&upstream.server).await;

        // Nothing but the account lookup may reach the europe cluster.
        Mock::given(path_regex("^/europe/lol/.*"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&upstream.server)
            .await;

        let entries = service(&upstream)
            .get_history(PlatformRegion::Kr, "Faker", "KR1")
            .await
            .unwrap();

        let kills: Vec<u32> = entries.iter().map(|e| e.kills).collect();
        assert_eq!(kills, vec![3, 2, 1]);
        for entry in &entries {
            assert_eq!(entry.champion_name, "Ahri");
            assert_eq!(entry.items.len(), 7);
            assert!(entry.items[0].is_some());
            assert!(entry.items[1].is_none());
        }
    }

    #[tokio::test]
    async fn test_account_lookup_always_uses_europe() {
        for platform in [PlatformRegion::Na, PlatformRegion::Kr, PlatformRegion::Vn] {
            let upstream = TestUpstream::start().await;
            let routing = platform.routing().as_str();

            Mock::given(method("GET"))
                .and(path("/europe/riot/account/v1/accounts/by-riot-id/Faker/KR1"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(testutils::account_json("p1")),
                )
                .expect(1)
                .mount(&upstream.server)
                .await;
            testutils::mount_match_ids(&upstream.server, routing, "p1", &[]).await;

            let entries = service(&upstream)
                .get_history(platform, "Faker", "KR1")
                .await
                .unwrap();
            assert!(entries.is_empty());
        }
    }

    #[tokio::test]
    async fn test_account_not_found_propagates_status() {
        let upstream = TestUpstream::start().await;

        Mock::given(method("GET"))
            .and(path("/europe/riot/account/v1/accounts/by-riot-id/Nobody/000"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&upstream.server)
            .await;

        let err = service(&upstream)
            .get_history(PlatformRegion::Euw, "Nobody", "000")
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(matches!(err, HistoryError::UpstreamStatus { .. }));
    }

    #[tokio::test]
    async fn test_one_failed_match_fails_the_history() {
        let upstream = TestUpstream::start().await;
        testutils::mount_account(&upstream.server, "Faker", "KR1", "p1").await;
        testutils::mount_match_ids(&upstream.server, "asia", "p1", &["KR_3", "KR_2", "KR_1"])
            .await;
        testutils::mount_match(&upstream.server, "asia", "KR_3", "p1", 3).await;
        testutils::mount_match(&upstream.server, "asia", "KR_1", "p1", 1).await;
        testutils::mount_catalog(&upstream.server).await;

        Mock::given(method("GET"))
            .and(path("/asia/lol/match/v5/matches/KR_2"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&upstream.server)
            .await;

        let err = service(&upstream)
            .get_history(PlatformRegion::Kr, "Faker", "KR1")
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_foreign_match_yields_default_entry() {
        let upstream = TestUpstream::start().await;
        testutils::mount_account(&upstream.server, "Faker", "KR1", "p1").await;
        testutils::mount_match_ids(&upstream.server, "asia", "p1", &["KR_2", "KR_1"]).await;
        testutils::mount_match(&upstream.server, "asia", "KR_2", "p1", 2).await;
        // KR_1 does not include the player.
        testutils::mount_match(&upstream.server, "asia", "KR_1", "stranger", 1).await;
        testutils::mount_catalog(&upstream.server).await;

        let entries = service(&upstream)
            .get_history(PlatformRegion::Kr, "Faker", "KR1")
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kills, 2);
        assert_eq!(entries[1], HistoryEntry::default());
    }

    #[tokio::test]
    async fn test_catalog_failure_keeps_match_stats() {
        let upstream = TestUpstream::start().await;
        testutils::mount_account(&upstream.server, "Faker", "KR1", "p1").await;
        testutils::mount_match_ids(&upstream.server, "asia", "p1", &["KR_2", "KR_1"]).await;
        testutils::mount_match(&upstream.server, "asia", "KR_2", "p1", 2).await;
        testutils::mount_match(&upstream.server, "asia", "KR_1", "p1", 1).await;

        Mock::given(method("GET"))
            .and(path("/cdn/v1/items.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&upstream.server)
            .await;

        let entries = service(&upstream)
            .get_history(PlatformRegion::Kr, "Faker", "KR1")
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        for (entry, kills) in entries.iter().zip([2, 1]) {
            assert!(entry.items.iter().all(Option::is_none));
            assert_eq!(entry.kills, kills);
            assert_eq!(entry.deaths, 2);
            assert_eq!(entry.assists, 9);
            assert_eq!(entry.creep_score, 201);
            assert_eq!(entry.champion_name, "Ahri");
            assert!(entry.win);
        }
    }

    #[tokio::test]
    async fn test_caches_shared_across_requests() {
        let upstream = TestUpstream::start().await;

        Mock::given(method("GET"))
            .and(path("/europe/riot/account/v1/accounts/by-riot-id/Faker/KR1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(testutils::account_json("p1")))
            .expect(1)
            .mount(&upstream.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/asia/lol/match/v5/matches/by-puuid/p1/ids"))
            .respond_with(ResponseTemplate::new(200).set_body_json(["KR_1"]))
            .expect(1)
            .mount(&upstream.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/asia/lol/match/v5/matches/KR_1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(testutils::match_json("KR_1", "p1", 4)),
            )
            .expect(1)
            .mount(&upstream.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cdn/v1/items.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(testutils::catalog_json()))
            .expect(1)
            .mount(&upstream.server)
            .await;

        let service = service(&upstream);
        let first = service
            .get_history(PlatformRegion::Jp, "Faker", "KR1")
            .await
            .unwrap();
        let second = service
            .clone()
            .get_history(PlatformRegion::Jp, "Faker", "KR1")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(
            service
                .caches()
                .matches
                .contains(&["asia", "KR_1"])
                .await
        );
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        let mut config = Config::default();
        config.riot.api_base_url = "http://127.0.0.1:9/{region}".into();
        config.riot.connect_timeout_secs = 1;
        config.riot.request_timeout_secs = 1;

        let err = HistoryService::new(&config)
            .get_history(PlatformRegion::Euw, "Faker", "KR1")
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
