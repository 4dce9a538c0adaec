use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use shared::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

use crate::cache::{CallKind, UpstreamCaches};
use crate::config::{REGION_PLACEHOLDER, RiotConfig};
use crate::errors::UpstreamError;
use crate::fanout::try_join_ordered;
use crate::metrics_defs::{UPSTREAM_REQUEST_DURATION, UPSTREAM_REQUEST_ERROR};
use crate::region::RoutingRegion;
use crate::types::{Account, ItemCatalog, MatchId, MatchRecord};

/// Number of match ids requested per history.
pub const MATCH_PAGE_SIZE: u32 = 10;

const API_KEY_HEADER: &str = "x-riot-token";

/// Base URLs of the regional API and the game data CDN.
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoints {
    api_base_url: String,
    cdn_base_url: String,
}

impl Endpoints {
    pub fn new(api_base_url: &str, cdn_base_url: &str) -> Self {
        Endpoints {
            api_base_url: api_base_url.to_string(),
            cdn_base_url: cdn_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &RiotConfig) -> Self {
        Endpoints::new(&config.api_base_url, &config.cdn_base_url)
    }

    /// CDN base without a trailing slash.
    pub fn cdn_base(&self) -> &str {
        &self.cdn_base_url
    }

    fn regional(&self, region: RoutingRegion, segments: &[&str]) -> Result<Url, UpstreamError> {
        let base = self
            .api_base_url
            .replace(REGION_PLACEHOLDER, region.as_str());
        let mut url =
            Url::parse(&base).map_err(|e| UpstreamError::InvalidUrl(format!("{base}: {e}")))?;

        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn item_catalog(&self) -> Result<Url, UpstreamError> {
        let raw = format!("{}/v1/items.json", self.cdn_base_url);
        Url::parse(&raw).map_err(|e| UpstreamError::InvalidUrl(format!("{raw}: {e}")))
    }
}

/// Client for the upstream API.
///
/// A client owns its own connection pool and is meant to live for one
/// aggregation; the caches it is given outlive it and are shared with every
/// other client built from the same `UpstreamCaches`.
#[derive(Clone)]
pub struct RiotClient {
    http: reqwest::Client,
    endpoints: Arc<Endpoints>,
    caches: UpstreamCaches,
}

impl RiotClient {
    pub fn new(
        config: &RiotConfig,
        endpoints: Arc<Endpoints>,
        caches: UpstreamCaches,
    ) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let mut value =
                HeaderValue::from_str(api_key).map_err(|_| UpstreamError::InvalidCredential)?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(RiotClient {
            http,
            endpoints,
            caches,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Resolves a riot id to its account. Cached per (region, nickname, tag).
    pub async fn fetch_account(
        &self,
        region: RoutingRegion,
        nickname: &str,
        tag: &str,
    ) -> Result<Account, UpstreamError> {
        self.caches
            .accounts
            .get_or_fetch(&[region.as_str(), nickname, tag], async {
                let url = self.endpoints.regional(
                    region,
                    &[
                        "riot",
                        "account",
                        "v1",
                        "accounts",
                        "by-riot-id",
                        nickname,
                        tag,
                    ],
                )?;
                self.get_json(CallKind::Account, url).await
            })
            .await
    }

    /// Most recent match ids for a player, most recent first.
    pub async fn fetch_match_ids(
        &self,
        region: RoutingRegion,
        puuid: &str,
    ) -> Result<Vec<MatchId>, UpstreamError> {
        self.caches
            .match_ids
            .get_or_fetch(&[region.as_str(), puuid], async {
                let mut url = self.endpoints.regional(
                    region,
                    &["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"],
                )?;
                url.query_pairs_mut()
                    .append_pair("count", &MATCH_PAGE_SIZE.to_string());
                self.get_json(CallKind::MatchIds, url).await
            })
            .await
    }

    /// A completed match never changes, so it stays cached for the life of the
    /// process.
    pub async fn fetch_match(
        &self,
        region: RoutingRegion,
        match_id: &str,
    ) -> Result<Arc<MatchRecord>, UpstreamError> {
        self.caches
            .matches
            .get_or_fetch(&[region.as_str(), match_id], async {
                let url = self
                    .endpoints
                    .regional(region, &["lol", "match", "v5", "matches", match_id])?;
                self.get_json(CallKind::Match, url).await.map(Arc::new)
            })
            .await
    }

    /// Fetches every match concurrently. Results keep the order of `match_ids`;
    /// the first failure fails the whole batch.
    pub async fn fetch_matches(
        &self,
        region: RoutingRegion,
        match_ids: &[MatchId],
    ) -> Result<Vec<Arc<MatchRecord>>, UpstreamError> {
        let fetches = match_ids.iter().cloned().map(|match_id| {
            let client = self.clone();
            async move { client.fetch_match(region, &match_id).await }
        });

        try_join_ordered(fetches).await
    }

    /// The full item catalog, fetched once and shared.
    pub async fn fetch_item_catalog(&self) -> Result<Arc<ItemCatalog>, UpstreamError> {
        self.caches
            .item_catalog
            .get_or_fetch(&[], async {
                let url = self.endpoints.item_catalog()?;
                self.get_json(CallKind::ItemCatalog, url).await.map(Arc::new)
            })
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        call: CallKind,
        url: Url,
    ) -> Result<T, UpstreamError> {
        let start = Instant::now();
        let result = self.send(url).await;
        histogram!(UPSTREAM_REQUEST_DURATION, "call" => call.as_str())
            .record(start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            counter!(UPSTREAM_REQUEST_ERROR, "call" => call.as_str()).increment(1);
            tracing::warn!(call = call.as_str(), error = %e, "Upstream request failed");
        }

        result
    }

    async fn send<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        tracing::debug!(url = %url, "Requesting upstream");

        let transport_error = |e: reqwest::Error| UpstreamError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport_error)?;

        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
