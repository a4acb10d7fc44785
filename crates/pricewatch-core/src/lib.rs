pub mod app_config;
pub mod config;
pub mod rows;
pub mod stores;
pub mod watchlist;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use rows::PriceRow;
pub use stores::{store_by_id, StoreRecord};
pub use watchlist::{load_watchlist, Watchlist};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read watch-list file {path}: {source}")]
    WatchlistIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse watch-list file: {0}")]
    WatchlistParse(#[from] serde_yaml::Error),

    #[error("watch-list validation failed: {0}")]
    Validation(String),
}
