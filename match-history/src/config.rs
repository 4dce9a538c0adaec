use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::cache::Expiry;

pub const REGION_PLACEHOLDER: &str = "{region}";

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("API base URL must contain {{region}}: {0}")]
    MissingRegionPlaceholder(String),

    #[error("Timeout cannot be 0: {0}")]
    ZeroTimeout(&'static str),
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// Upstream API settings.
#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct RiotConfig {
    /// Sent as `X-Riot-Token` on every upstream request.
    pub api_key: Option<String>,
    /// Regional API base. `{region}` is replaced by the routing region.
    pub api_base_url: String,
    /// Community Dragon game data base, used for the item catalog and icons.
    pub cdn_base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for RiotConfig {
    fn default() -> Self {
        RiotConfig {
            api_key: None,
            api_base_url: "https://{region}.api.riotgames.com".into(),
            cdn_base_url:
                "https://raw.communitydragon.org/latest/plugins/rcp-be-lol-game-data/global/default"
                    .into(),
            connect_timeout_secs: 5,
            request_timeout_secs: 10,
        }
    }
}

impl RiotConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.api_base_url.contains(REGION_PLACEHOLDER) {
            return Err(ValidationError::MissingRegionPlaceholder(
                self.api_base_url.clone(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ValidationError::ZeroTimeout("connect_timeout_secs"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::ZeroTimeout("request_timeout_secs"));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Cache lifetimes per upstream call. Match records and the item catalog never
/// expire.
#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub identity_ttl_secs: u64,
    pub match_ids_ttl_secs: u64,
    /// Optional bound on the number of cached match records.
    pub max_matches: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            identity_ttl_secs: 600,
            match_ids_ttl_secs: 60,
            max_matches: None,
        }
    }
}

impl CacheConfig {
    pub fn identity_expiry(&self) -> Expiry {
        Expiry::After(Duration::from_secs(self.identity_ttl_secs))
    }

    pub fn match_ids_expiry(&self) -> Expiry {
        Expiry::After(Duration::from_secs(self.match_ids_ttl_secs))
    }
}

#[derive(Clone, Deserialize, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    #[serde(default)]
    pub riot: RiotConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.riot.validate()?;
        Ok(())
    }
}
