//! Discovery of the dynamically-named asset-list reference.
//!
//! The retailer's price-list page embeds a reference to a JSON asset list
//! whose filename carries a rotating numeric id (`assetList_<digits>.json`).
//! The id is all downstream fetching needs.

use regex::Regex;

use crate::client::PriceListClient;
use crate::error::ScrapeError;

/// Fetches the page and extracts the asset-list id.
///
/// # Errors
///
/// [`ScrapeError::PatternNotFound`] when the page contains no asset-list
/// marker — absence is fatal because every later step depends on the id.
/// Fetch failures propagate from [`PriceListClient::fetch_text`].
pub async fn find_asset_list_id(
    client: &PriceListClient,
    page_url: &str,
) -> Result<String, ScrapeError> {
    let body = client.fetch_text(page_url).await?;
    extract_asset_list_id(&body).ok_or_else(|| ScrapeError::PatternNotFound {
        url: page_url.to_owned(),
    })
}

/// Scans a page body for `assetList_<digits>.json` (optionally quoted) and
/// returns the digit run.
#[must_use]
pub fn extract_asset_list_id(body: &str) -> Option<String> {
    let re = Regex::new(r#"["']?assetList_(\d+)\.json["']?"#).expect("valid asset-list regex");
    re.captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}
