use std::path::PathBuf;

/// Resolved application configuration.
///
/// Every field has an environment-variable override with a `PRICEWATCH_`
/// prefix; see [`crate::config`] for the parsing rules and defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Retailer page that embeds the dynamically-named asset-list reference.
    pub page_url: String,
    /// Path to the curated watch-list rule file.
    pub watchlist_path: PathBuf,
    /// Where the rendered HTML report is written.
    pub output_path: PathBuf,
    /// Store whose daily price file is selected from the manifest.
    pub store_id: u16,
    pub log_level: String,
    pub http_timeout_secs: u64,
    pub http_connect_timeout_secs: u64,
    pub user_agent: String,
}
