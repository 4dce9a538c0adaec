//! Item icon lookup against the shared item catalog.

use crate::client::RiotClient;
use crate::types::CatalogItem;

/// Prefix of `iconPath` in the catalog; it maps onto the CDN base.
pub const ASSET_PREFIX: &str = "/lol-game-data/assets/";

/// Public URL for a catalog `iconPath`. The CDN serves lowercase paths only.
pub fn icon_url(cdn_base: &str, icon_path: &str) -> String {
    icon_path
        .replace(ASSET_PREFIX, &format!("{}/", cdn_base.trim_end_matches('/')))
        .to_lowercase()
}

pub fn find_icon_url(catalog: &[CatalogItem], cdn_base: &str, item_id: i64) -> Option<String> {
    catalog
        .iter()
        .find(|item| item.id == item_id)
        .map(|item| icon_url(cdn_base, &item.icon_path))
}

/// Icon URL for an item, or `None` when the slot is empty (id 0), the id is
/// unknown, or the catalog cannot be fetched.
pub async fn resolve_icon_url(client: &RiotClient, item_id: i64) -> Option<String> {
    match client.fetch_item_catalog().await {
        Ok(catalog) => find_icon_url(&catalog, client.endpoints().cdn_base(), item_id),
        Err(e) => {
            tracing::warn!(item_id, error = %e, "Item catalog unavailable");
            None
        }
    }
}
