//! The normalized price-row schema shared by the scraper and the report.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the tidied price table.
///
/// Produced once per run by the scraper's tidy transform and then only read.
/// Numeric fields that failed row-local parsing are `None`; the row itself is
/// always retained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceRow {
    /// Product display name, upper-cased by the tidy transform.
    pub product_name: String,
    pub product_id: Option<String>,
    pub brand: String,
    /// Promotion flag: 1 when the source marked the row `"A"`, else 0.
    pub is_akcija: u8,
    /// Unit-of-measure label, e.g. `"1 KOM"`.
    pub jed_mj: Option<String>,
    /// Unit-quantity multiplier.
    pub kol_jed_mj: Option<i64>,
    /// Net quantity in the unit of `unit` (usually KG or L).
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub barcode: Option<String>,
    pub category: Option<String>,
    /// Retail price in EUR.
    pub price: Option<f64>,
    pub unit_price: Option<f64>,
    pub special_price: Option<f64>,
    /// Lowest retail price over the trailing 30 days.
    pub best_price_30: Option<f64>,
    /// Date the anchor (reference) price was set.
    pub anchor_date: Option<NaiveDate>,
    /// Anchor (reference) price in EUR.
    pub anchor_price: Option<f64>,
    /// `(price - anchor_price) / anchor_price`; `None` when the anchor price
    /// is missing or zero.
    pub price_anchor_diff: Option<f64>,
    /// Source columns with no internal mapping, preserved verbatim.
    pub extra: BTreeMap<String, String>,
}

impl PriceRow {
    /// Returns `true` when the row is currently on promotion.
    #[must_use]
    pub fn on_promotion(&self) -> bool {
        self.is_akcija == 1
    }
}
