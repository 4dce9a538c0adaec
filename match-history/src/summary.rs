//! Flattens one raw match record into a `HistoryEntry` for a single player.
//!
//! A record that cannot be summarized does not fail the history. It produces a
//! `Summary::Degraded` carrying the reason, which turns into a default entry so
//! the caller keeps one entry per match id.

use serde::Deserialize;
use serde_json::Value;
use shared::counter;

use crate::client::RiotClient;
use crate::fanout::join_ordered;
use crate::items::resolve_icon_url;
use crate::metrics_defs::SUMMARY_DEGRADED;
use crate::types::{HistoryEntry, ITEM_SLOTS, MatchRecord};

#[derive(Deserialize)]
struct MatchDto {
    info: InfoDto,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InfoDto {
    game_duration: u64,
    game_mode: String,
    game_start_timestamp: i64,
    // Decoded one by one; only the target player's record has to be complete.
    participants: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantDto {
    champion_name: String,
    champion_id: i64,
    item0: i64,
    item1: i64,
    item2: i64,
    item3: i64,
    item4: i64,
    item5: i64,
    item6: i64,
    kills: u32,
    deaths: u32,
    assists: u32,
    total_minions_killed: u32,
    win: bool,
}

impl ParticipantDto {
    fn item_ids(&self) -> [i64; ITEM_SLOTS] {
        [
            self.item0, self.item1, self.item2, self.item3, self.item4, self.item5, self.item6,
        ]
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SummaryFault {
    #[error("player {puuid} is not a participant")]
    ParticipantMissing { puuid: String },

    #[error("malformed match record: {0}")]
    Malformed(String),

    #[error("item lookup failed: {0}")]
    ItemLookup(String),
}

#[derive(Debug, PartialEq)]
pub enum Summary {
    Complete(HistoryEntry),
    Degraded(SummaryFault),
}

impl Summary {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Summary::Degraded(_))
    }

    /// The summarized entry, or the all-default entry for a degraded summary.
    pub fn into_entry(self) -> HistoryEntry {
        match self {
            Summary::Complete(entry) => entry,
            Summary::Degraded(_) => HistoryEntry::default(),
        }
    }
}

pub fn champion_icon_url(cdn_base: &str, champion_id: i64) -> String {
    format!(
        "{}/v1/champion-icons/{champion_id}.png",
        cdn_base.trim_end_matches('/')
    )
}

/// Summarizes `record` from the point of view of `puuid`. All seven item icons
/// are resolved concurrently.
pub async fn summarize(client: &RiotClient, record: &MatchRecord, puuid: &str) -> Summary {
    match try_summarize(client, record, puuid).await {
        Ok(entry) => Summary::Complete(entry),
        Err(fault) => {
            counter!(SUMMARY_DEGRADED).increment(1);
            tracing::warn!(
                match_id = record.match_id().unwrap_or("unknown"),
                error = %fault,
                "Using default entry for match"
            );
            Summary::Degraded(fault)
        }
    }
}

async fn try_summarize(
    client: &RiotClient,
    record: &MatchRecord,
    puuid: &str,
) -> Result<HistoryEntry, SummaryFault> {
    let MatchDto { info } =
        MatchDto::deserialize(record.raw()).map_err(|e| SummaryFault::Malformed(e.to_string()))?;

    let participant = info
        .participants
        .iter()
        .find(|participant| participant.get("puuid").and_then(Value::as_str) == Some(puuid))
        .ok_or_else(|| SummaryFault::ParticipantMissing {
            puuid: puuid.to_string(),
        })?;
    let participant = ParticipantDto::deserialize(participant)
        .map_err(|e| SummaryFault::Malformed(e.to_string()))?;

    let lookups = participant.item_ids().map(|item_id| {
        let client = client.clone();
        async move { resolve_icon_url(&client, item_id).await }
    });
    let items = join_ordered(lookups)
        .await
        .map_err(|e| SummaryFault::ItemLookup(e.to_string()))?;
    let items: [Option<String>; ITEM_SLOTS] = items.try_into().map_err(|items: Vec<_>| {
        SummaryFault::ItemLookup(format!(
            "expected {ITEM_SLOTS} item slots, got {}",
            items.len()
        ))
    })?;

    Ok(HistoryEntry {
        champion_icon: champion_icon_url(client.endpoints().cdn_base(), participant.champion_id),
        champion_name: participant.champion_name,
        items,
        kills: participant.kills,
        deaths: participant.deaths,
        assists: participant.assists,
        creep_score: participant.total_minions_killed,
        game_duration: info.game_duration,
        win: participant.win,
        game_mode: info.game_mode,
        game_start: info.game_start_timestamp,
    })
}
