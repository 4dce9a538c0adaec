//! Platform and routing regions.
//!
//! A platform region identifies the game shard a player lives on. Account,
//! match id and match detail lookups are served by a small number of
//! continental routing clusters instead, so every platform region maps to
//! exactly one routing region.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformRegion {
    #[serde(rename = "br1")]
    Br,
    #[serde(rename = "eun1")]
    Eune,
    #[serde(rename = "euw1")]
    Euw,
    #[serde(rename = "la1")]
    Lan,
    #[serde(rename = "la2")]
    Las,
    #[serde(rename = "na1")]
    Na,
    #[serde(rename = "oc1")]
    Oce,
    #[serde(rename = "ru1")]
    Ru,
    #[serde(rename = "tr1")]
    Tr,
    #[serde(rename = "jp1")]
    Jp,
    #[serde(rename = "kr")]
    Kr,
    #[serde(rename = "ph2")]
    Ph,
    #[serde(rename = "sg2")]
    Sg,
    #[serde(rename = "tw2")]
    Tw,
    #[serde(rename = "th2")]
    Th,
    #[serde(rename = "vn2")]
    Vn,
}

impl PlatformRegion {
    pub const ALL: [PlatformRegion; 16] = [
        PlatformRegion::Br,
        PlatformRegion::Eune,
        PlatformRegion::Euw,
        PlatformRegion::Lan,
        PlatformRegion::Las,
        PlatformRegion::Na,
        PlatformRegion::Oce,
        PlatformRegion::Ru,
        PlatformRegion::Tr,
        PlatformRegion::Jp,
        PlatformRegion::Kr,
        PlatformRegion::Ph,
        PlatformRegion::Sg,
        PlatformRegion::Tw,
        PlatformRegion::Th,
        PlatformRegion::Vn,
    ];

    /// The upstream's platform code, e.g. `euw1`.
    pub const fn code(&self) -> &'static str {
        match self {
            PlatformRegion::Br => "br1",
            PlatformRegion::Eune => "eun1",
            PlatformRegion::Euw => "euw1",
            PlatformRegion::Lan => "la1",
            PlatformRegion::Las => "la2",
            PlatformRegion::Na => "na1",
            PlatformRegion::Oce => "oc1",
            PlatformRegion::Ru => "ru1",
            PlatformRegion::Tr => "tr1",
            PlatformRegion::Jp => "jp1",
            PlatformRegion::Kr => "kr",
            PlatformRegion::Ph => "ph2",
            PlatformRegion::Sg => "sg2",
            PlatformRegion::Tw => "tw2",
            PlatformRegion::Th => "th2",
            PlatformRegion::Vn => "vn2",
        }
    }

    /// Routing cluster serving this platform. Anything not explicitly
    /// classified falls into the SEA bucket.
    pub const fn routing(&self) -> RoutingRegion {
        match self {
            PlatformRegion::Na | PlatformRegion::Br | PlatformRegion::Lan | PlatformRegion::Las => {
                RoutingRegion::Americas
            }
            PlatformRegion::Kr | PlatformRegion::Jp => RoutingRegion::Asia,
            PlatformRegion::Eune | PlatformRegion::Euw | PlatformRegion::Tr | PlatformRegion::Ru => {
                RoutingRegion::Europe
            }
            _ => RoutingRegion::Sea,
        }
    }
}

impl fmt::Display for PlatformRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("unknown platform region: {0}")]
pub struct UnknownRegion(pub String);

impl FromStr for PlatformRegion {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlatformRegion::ALL
            .into_iter()
            .find(|region| region.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingRegion {
    Americas,
    Asia,
    Europe,
    Sea,
}

impl RoutingRegion {
    /// Hostname label used by the regional API, e.g. `europe`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RoutingRegion::Americas => "americas",
            RoutingRegion::Asia => "asia",
            RoutingRegion::Europe => "europe",
            RoutingRegion::Sea => "sea",
        }
    }
}

impl fmt::Display for RoutingRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
