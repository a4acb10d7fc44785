pub mod html;

use thiserror::Error;

pub use html::{render_report, write_report};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
