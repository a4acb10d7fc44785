//! Manifest fetching and price-file name parsing.
//!
//! The asset list is a JSON array of `{label, path}` pairs, one per
//! available per-store, per-day CSV. All store metadata lives in the label:
//! `<size>_<address…>_<city>_<store id>_<DDMMYYYY>_<HHMM>.csv`, with
//! underscores doubling as both separator and space. A small replacement
//! table keeps known multi-word city names together before tokenizing.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::client::PriceListClient;
use crate::error::ScrapeError;

/// One available price file, parsed from its manifest label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Store size class, e.g. `"Hiper"` or `"Super"`.
    pub store_size: String,
    pub address: String,
    pub city: String,
    pub store_id: u16,
    pub date: NaiveDate,
    /// Publication time token, e.g. `"1200"`. Kept verbatim.
    pub time: String,
    pub download_url: String,
}

#[derive(Debug, Deserialize)]
struct ManifestItem {
    label: String,
    path: String,
}

/// Multi-word city names whose separating underscore must survive
/// tokenization.
const CITY_REPLACEMENTS: &[(&str, &str)] = &[
    ("Dugo_Selo", "Dugo Selo"),
    ("Slavonski_Brod", "Slavonski Brod"),
    ("Velika_Gorica", "Velika Gorica"),
    ("Nova_Gradiska", "Nova Gradiska"),
    ("Zagreb_Blato", "Zagreb Blato"),
];

/// Builds the manifest URL for an asset-list id.
#[must_use]
pub fn manifest_url(origin: &str, asset_list_id: &str) -> String {
    format!("{origin}/akcije-novosti/popis-mpc.assetSearch.id=assetList_{asset_list_id}.json")
}

/// Downloads the manifest and parses every label.
///
/// Entries are returned in manifest order and are not deduplicated; callers
/// select exactly one via [`select_entry`].
///
/// # Errors
///
/// [`ScrapeError::MalformedFilename`] if any label violates the grammar —
/// a broken label is never skipped, since store/date selection depends on
/// all of them. Fetch and JSON errors propagate from
/// [`PriceListClient::fetch_json`].
pub async fn fetch_manifest(
    client: &PriceListClient,
    origin: &str,
    asset_list_id: &str,
) -> Result<Vec<ManifestEntry>, ScrapeError> {
    let url = manifest_url(origin, asset_list_id);
    let items: Vec<ManifestItem> = client.fetch_json(&url, "price-file manifest").await?;
    tracing::info!(files = items.len(), "fetched price-file manifest");

    items
        .into_iter()
        .map(|item| {
            let entry = parse_label(&item.label)?;
            Ok(ManifestEntry {
                download_url: format!("{origin}{}", item.path),
                ..entry
            })
        })
        .collect()
}

/// Picks the single manifest entry for a store and date.
///
/// # Errors
///
/// [`ScrapeError::NoFileForStoreDate`] when the manifest has no matching
/// entry.
pub fn select_entry(
    entries: &[ManifestEntry],
    store_id: u16,
    date: NaiveDate,
) -> Result<&ManifestEntry, ScrapeError> {
    entries
        .iter()
        .find(|e| e.store_id == store_id && e.date == date)
        .ok_or(ScrapeError::NoFileForStoreDate { store_id, date })
}

/// Parses one manifest label into a [`ManifestEntry`] with an empty
/// `download_url` (the caller resolves it against the manifest origin).
///
/// # Errors
///
/// [`ScrapeError::MalformedFilename`] when the token structure, date, or
/// store id do not match the grammar.
pub fn parse_label(label: &str) -> Result<ManifestEntry, ScrapeError> {
    let tokens = tokenize_label(label);

    let malformed = || ScrapeError::MalformedFilename {
        label: label.to_owned(),
        tokens: tokens.clone(),
    };

    // [size, address…, city, store id, date, time] — the address may be
    // empty, so five tokens is the minimum.
    if tokens.len() < 5 {
        return Err(malformed());
    }

    let store_size = tokens[0].clone();
    let tail = &tokens[tokens.len() - 4..];
    let address = tokens[1..tokens.len() - 4].join(" ");
    let city = tail[0].clone();
    let store_id = tail[1].parse::<u16>().map_err(|_| malformed())?;
    let date = NaiveDate::parse_from_str(&tail[2], "%d%m%Y").map_err(|_| malformed())?;
    let time = tail[3].clone();

    Ok(ManifestEntry {
        store_size,
        address,
        city,
        store_id,
        date,
        time,
        download_url: String::new(),
    })
}

/// Normalizes a label into its metadata tokens: strips the `.csv` suffix,
/// protects multi-word city names, and splits on runs of underscores.
#[must_use]
pub fn tokenize_label(label: &str) -> Vec<String> {
    let mut name = label.strip_suffix(".csv").unwrap_or(label).trim().to_owned();
    for (from, to) in CITY_REPLACEMENTS {
        name = name.replace(from, to);
    }
    name.split('_')
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}
