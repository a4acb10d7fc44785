use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("asset-list marker not found in page {url}")]
    PatternNotFound { url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest label \"{label}\" does not match the filename grammar (tokens: {tokens:?})")]
    MalformedFilename { label: String, tokens: Vec<String> },

    #[error("no price file in manifest for store {store_id} on {date}")]
    NoFileForStoreDate { store_id: u16, date: NaiveDate },

    #[error("price file at {url} decodes under neither UTF-8 nor WINDOWS-1250")]
    Encoding { url: String },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
