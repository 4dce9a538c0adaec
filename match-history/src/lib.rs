//! Recent match history for a player, aggregated from the upstream game API.
//!
//! The pipeline for one request:
//!
//! 1. map the platform region to its routing region,
//! 2. resolve the riot id to an account (always on the europe cluster),
//! 3. fetch the most recent match ids,
//! 4. fetch every match concurrently; any failure fails the request,
//! 5. summarize every match concurrently, resolving item icons from the
//!    shared item catalog; a match that cannot be summarized yields a
//!    default entry instead.
//!
//! Every upstream call goes through its own cache (see [`cache`]).

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
mod fanout;
pub mod history;
pub mod items;
pub mod metrics_defs;
pub mod region;
pub mod summary;
pub mod types;

#[cfg(test)]
mod testutils;

pub use errors::{HistoryError, UpstreamError};
pub use history::HistoryService;
pub use region::{PlatformRegion, RoutingRegion};
pub use types::HistoryEntry;
