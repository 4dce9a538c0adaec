use serde::{Deserialize, Serialize};

/// Number of inventory slots reported per participant (six items and a trinket).
pub const ITEM_SLOTS: usize = 7;

pub type Puuid = String;
pub type MatchId = String;

/// Account resolved from a riot id (`nickname#tag`).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub puuid: Puuid,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
}

/// A match record exactly as the upstream returned it.
///
/// Records are kept raw so that a single unusual match degrades its own
/// summary instead of failing the fetch of the whole history.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MatchRecord(serde_json::Value);

impl MatchRecord {
    pub fn new(raw: serde_json::Value) -> Self {
        MatchRecord(raw)
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn match_id(&self) -> Option<&str> {
        self.0
            .pointer("/metadata/matchId")
            .and_then(serde_json::Value::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    #[serde(rename = "iconPath")]
    pub icon_path: String,
}

pub type ItemCatalog = Vec<CatalogItem>;

/// One summarized game from the player's point of view.
///
/// `items` is positional: index `n` is inventory slot `n`, `None` when the
/// slot was empty or the item is unknown to the catalog.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub champion_name: String,
    pub champion_icon: String,
    pub items: [Option<String>; ITEM_SLOTS],
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub creep_score: u32,
    /// Seconds.
    pub game_duration: u64,
    pub win: bool,
    pub game_mode: String,
    /// Milliseconds since the unix epoch.
    pub game_start: i64,
}
