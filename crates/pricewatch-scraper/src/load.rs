//! Price-file download and decoding.
//!
//! Files are tab-separated text published in UTF-8, except for a share of
//! older stores that still export WINDOWS-1250. Decoding tries strict UTF-8
//! first and falls back to WINDOWS-1250 exactly once; no other retry exists.
//! Every cell stays a string here — in particular the
//! `Najniža MPC u 30dana` column mixes currency and sentinel text and must
//! never be auto-typed.

use encoding_rs::WINDOWS_1250;

use crate::client::PriceListClient;
use crate::error::ScrapeError;

/// A decoded but otherwise untouched price table.
#[derive(Debug, Clone, Default)]
pub struct RawPriceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawPriceTable {
    /// Index of a header, if present.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Downloads and parses one store's price file.
///
/// # Errors
///
/// [`ScrapeError::Encoding`] when the payload decodes under neither UTF-8
/// nor WINDOWS-1250; [`ScrapeError::Csv`] when the decoded text is not
/// readable as tab-separated records; fetch errors propagate from
/// [`PriceListClient::fetch_bytes`].
pub async fn fetch_price_table(
    client: &PriceListClient,
    url: &str,
) -> Result<RawPriceTable, ScrapeError> {
    let bytes = client.fetch_bytes(url).await?;
    let text = decode_price_file(&bytes).ok_or_else(|| ScrapeError::Encoding {
        url: url.to_owned(),
    })?;
    parse_tsv(&text)
}

/// Decodes price-file bytes: strict UTF-8, then one WINDOWS-1250 attempt.
///
/// Returns `None` when both fail.
#[must_use]
pub fn decode_price_file(bytes: &[u8]) -> Option<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        tracing::debug!(encoding = "utf-8", "decoded price file");
        return Some(text.to_owned());
    }

    let (decoded, _, had_errors) = WINDOWS_1250.decode(bytes);
    if had_errors {
        return None;
    }
    tracing::debug!(encoding = "windows-1250", "decoded price file");
    Some(decoded.into_owned())
}

/// Parses tab-separated text into headers and string rows.
///
/// Records are read flexibly: short rows keep their own length and column
/// lookups treat the missing tail as absent values.
///
/// # Errors
///
/// [`ScrapeError::Csv`] when the reader cannot interpret the input.
pub fn parse_tsv(text: &str) -> Result<RawPriceTable, ScrapeError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(RawPriceTable { headers, rows })
}
