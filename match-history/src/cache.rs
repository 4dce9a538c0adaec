// Memoization of upstream responses. Each call type gets its own cache with its
// own expiry; keys are the call type plus the call arguments, never the HTTP
// client, so hits are shared by every request in the process.
use moka::future::Cache;
use shared::counter;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;
use crate::metrics_defs::{CACHE_HIT, CACHE_MISS};
use crate::types::{Account, ItemCatalog, MatchId, MatchRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
    Account,
    MatchIds,
    Match,
    ItemCatalog,
}

impl CallKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CallKind::Account => "account",
            CallKind::MatchIds => "match_ids",
            CallKind::Match => "match",
            CallKind::ItemCatalog => "item_catalog",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    call: CallKind,
    args: Vec<String>,
}

impl CacheKey {
    pub fn new(call: CallKind, args: &[&str]) -> Self {
        CacheKey {
            call,
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    After(Duration),
    Never,
}

/// Cache for the results of one upstream call type.
///
/// Only successful results are stored. Concurrent misses on the same key
/// share one in-flight fetch; every waiter receives its result.
#[derive(Clone)]
pub struct CallCache<V> {
    call: CallKind,
    inner: Cache<CacheKey, V>,
}

impl<V> CallCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(call: CallKind, expiry: Expiry, max_capacity: Option<u64>) -> Self {
        let mut builder = Cache::builder();
        if let Expiry::After(ttl) = expiry {
            builder = builder.time_to_live(ttl);
        }
        if let Some(capacity) = max_capacity {
            builder = builder.max_capacity(capacity);
        }

        CallCache {
            call,
            inner: builder.build(),
        }
    }

    pub async fn get_or_fetch<F, E>(&self, args: &[&str], fetch: F) -> Result<V, E>
    where
        F: Future<Output = Result<V, E>>,
        E: Clone + Send + Sync + 'static,
    {
        let result = self
            .inner
            .entry(CacheKey::new(self.call, args))
            .or_try_insert_with(fetch)
            .await
            .map_err(Arc::unwrap_or_clone);

        // A failed fetch is a miss too.
        let metric_def = match &result {
            Ok(entry) if !entry.is_fresh() => CACHE_HIT,
            _ => CACHE_MISS,
        };
        counter!(metric_def, "call" => self.call.as_str()).increment(1);

        Ok(result?.into_value())
    }

    pub async fn contains(&self, args: &[&str]) -> bool {
        self.inner.get(&CacheKey::new(self.call, args)).await.is_some()
    }
}

/// The caches behind every upstream call. Cloning is cheap and clones share
/// their entries.
#[derive(Clone)]
pub struct UpstreamCaches {
    pub accounts: CallCache<Account>,
    pub match_ids: CallCache<Vec<MatchId>>,
    pub matches: CallCache<Arc<MatchRecord>>,
    pub item_catalog: CallCache<Arc<ItemCatalog>>,
}

impl UpstreamCaches {
    pub fn new(config: &CacheConfig) -> Self {
        UpstreamCaches {
            accounts: CallCache::new(CallKind::Account, config.identity_expiry(), None),
            match_ids: CallCache::new(CallKind::MatchIds, config.match_ids_expiry(), None),
            matches: CallCache::new(CallKind::Match, Expiry::Never, config.max_matches),
            item_catalog: CallCache::new(CallKind::ItemCatalog, Expiry::Never, None),
        }
    }
}
