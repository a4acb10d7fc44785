//! Per-field cleaning of the normalized price table.
//!
//! Every step here is row-local: a value that cannot be interpreted is
//! logged and nulled, never an error for the whole run. The composite
//! `anchor_price_date` column (`"<date text>=<price text>"`) is split,
//! parsed, and dropped; everything the rename tables do not cover is
//! preserved verbatim in [`PriceRow::extra`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use pricewatch_core::PriceRow;

use crate::load::RawPriceTable;

/// Columns consumed into typed [`PriceRow`] fields. `anchor_price_date` is
/// consumed too (split into `anchor_date`/`anchor_price`) and therefore not
/// carried into `extra`.
const CONSUMED_COLUMNS: &[&str] = &[
    "product_name",
    "product_id",
    "brand",
    "is_akcija",
    "jed_mj",
    "kol_jed_mj",
    "quantity",
    "unit",
    "barcode",
    "category",
    "price",
    "unit_price",
    "special_price",
    "best_price_30",
    "anchor_price_date",
];

/// Day-first formats observed in anchor dates. The source data mixes
/// orderings, so several candidates are tried in sequence. `%y` comes before
/// `%Y` — it only consumes two digits, so four-digit years fall through,
/// while the reverse order would read `"01.12.23"` as year 23.
const ANCHOR_DATE_FORMATS: &[&str] = &[
    "%d.%m.%y",
    "%d.%m.%Y",
    "%d.%m.%Y.",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y-%m-%d",
];

/// Transforms a header-normalized table into typed rows.
#[must_use]
pub fn tidy(table: &RawPriceTable) -> Vec<PriceRow> {
    let idx_product_name = table.column("product_name");
    let idx_product_id = table.column("product_id");
    let idx_brand = table.column("brand");
    let idx_is_akcija = table.column("is_akcija");
    let idx_jed_mj = table.column("jed_mj");
    let idx_kol_jed_mj = table.column("kol_jed_mj");
    let idx_quantity = table.column("quantity");
    let idx_unit = table.column("unit");
    let idx_barcode = table.column("barcode");
    let idx_category = table.column("category");
    let idx_price = table.column("price");
    let idx_unit_price = table.column("unit_price");
    let idx_special_price = table.column("special_price");
    let idx_best_price_30 = table.column("best_price_30");
    let idx_anchor = table.column("anchor_price_date");

    let extra_columns: Vec<(usize, &str)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !CONSUMED_COLUMNS.contains(&h.as_str()))
        .map(|(i, h)| (i, h.as_str()))
        .collect();

    table
        .rows
        .iter()
        .map(|row| {
            let (anchor_date_text, anchor_price_text) = split_anchor(cell(row, idx_anchor));
            let anchor_date = anchor_date_text.as_deref().and_then(parse_anchor_date);
            let anchor_price = anchor_price_text.as_deref().and_then(parse_anchor_price);
            let price = cell(row, idx_price).and_then(parse_number);

            let mut extra = BTreeMap::new();
            for (i, header) in &extra_columns {
                if let Some(value) = row.get(*i) {
                    extra.insert((*header).to_owned(), value.clone());
                }
            }

            PriceRow {
                product_name: cell(row, idx_product_name).unwrap_or("").trim().to_uppercase(),
                product_id: text_cell(row, idx_product_id),
                brand: cell(row, idx_brand).unwrap_or("").trim().to_owned(),
                is_akcija: parse_akcija_flag(cell(row, idx_is_akcija)),
                jed_mj: text_cell(row, idx_jed_mj),
                kol_jed_mj: cell(row, idx_kol_jed_mj).and_then(parse_integer),
                quantity: cell(row, idx_quantity).and_then(parse_number),
                unit: text_cell(row, idx_unit),
                barcode: text_cell(row, idx_barcode),
                category: text_cell(row, idx_category),
                price,
                unit_price: cell(row, idx_unit_price).and_then(parse_number),
                special_price: cell(row, idx_special_price).and_then(parse_number),
                best_price_30: cell(row, idx_best_price_30).and_then(sanitize_best_price),
                anchor_date,
                anchor_price,
                price_anchor_diff: price_anchor_diff(price, anchor_price),
                extra,
            }
        })
        .collect()
}

fn cell(row: &[String], idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| row.get(i)).map(String::as_str)
}

fn text_cell(row: &[String], idx: Option<usize>) -> Option<String> {
    cell(row, idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Splits the composite `"<date>=<price>"` field into trimmed halves.
///
/// A missing value, or a value with zero or more than one `=`, is malformed:
/// a warning is logged and both halves are `None`. The row itself is kept.
pub fn split_anchor(raw: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(raw) = raw else {
        tracing::warn!("missing anchor price/date value");
        return (None, None);
    };
    if raw.matches('=').count() != 1 {
        tracing::warn!(value = %raw, "no or multiple '=' in anchor price/date value");
        return (None, None);
    }
    let (date, price) = raw.split_once('=').unwrap_or((raw, ""));
    (
        Some(date.trim().to_owned()),
        Some(price.trim().to_owned()),
    )
}

/// Parses the date half of the anchor composite: drops a leading `MPC`
/// marker, trims, and tries the day-first format list.
#[must_use]
pub fn parse_anchor_date(text: &str) -> Option<NaiveDate> {
    let cleaned = text.strip_prefix("MPC").unwrap_or(text).trim();
    if cleaned.is_empty() {
        return None;
    }
    for format in ANCHOR_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, format) {
            return Some(date);
        }
    }
    tracing::warn!(value = %text, "unparseable anchor date");
    None
}

/// Parses the price half of the anchor composite: strips one currency
/// suffix (longest first, so `"€ur"` never leaves a dangling fragment),
/// then normalizes the decimal separator.
#[must_use]
pub fn parse_anchor_price(text: &str) -> Option<f64> {
    let stripped = strip_currency_suffix(text.trim());
    let normalized = replace_with_dot_if_number(stripped)?;
    match normalized.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(value = %text, "unparseable anchor price");
            None
        }
    }
}

/// Removes a trailing currency marker. `"€ur"` is tried before `"€"` so the
/// longer form is consumed whole.
#[must_use]
pub fn strip_currency_suffix(text: &str) -> &str {
    for suffix in ["€ur", "€"] {
        if let Some(stripped) = text.strip_suffix(suffix) {
            return stripped.trim_end();
        }
    }
    text
}

/// Replaces a comma decimal separator with a dot.
///
/// An empty string maps to `None`; anything else passes through with commas
/// replaced (values that already use a dot are returned unchanged).
#[must_use]
pub fn replace_with_dot_if_number(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    Some(text.replace(',', "."))
}

/// Locale-flexible numeric parse: trims, accepts a comma decimal separator.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let normalized = replace_with_dot_if_number(text.trim())?;
    normalized.parse::<f64>().ok()
}

/// Integer parse for the unit-quantity multiplier, tolerating a fractionless
/// decimal rendering (`"4"` and `"4.0"` both parse to 4).
#[must_use]
pub fn parse_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    match parse_number(trimmed) {
        Some(value) if value.fract() == 0.0 => Some(value as i64),
        Some(_) => {
            tracing::warn!(value = %text, "non-integral unit-quantity multiplier");
            None
        }
        None => None,
    }
}

/// Strips every character that is not a digit, dot, comma, or minus sign,
/// then parses what remains. The source column mixes currency and sentinel
/// text, so anything unparseable is simply absent.
#[must_use]
pub fn sanitize_best_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    parse_number(&cleaned)
}

/// Coerces the promotion flag: `"A"` is 1, blank/missing is 0. Anything
/// else is unexpected; it is logged and treated as not-on-promotion.
#[must_use]
pub fn parse_akcija_flag(raw: Option<&str>) -> u8 {
    match raw.map(str::trim) {
        Some("A") => 1,
        Some("") | None => 0,
        Some(other) => {
            tracing::warn!(value = %other, "unexpected promotion flag");
            0
        }
    }
}

/// Relative distance of the current price from the anchor price.
///
/// `None` whenever either operand is missing or the anchor price is zero —
/// a zero anchor must not produce an infinite ratio.
#[must_use]
pub fn price_anchor_diff(price: Option<f64>, anchor_price: Option<f64>) -> Option<f64> {
    match (price, anchor_price) {
        (Some(p), Some(a)) if a != 0.0 => Some((p - a) / a),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // split_anchor
    // -----------------------------------------------------------------------

    #[test]
    fn split_anchor_single_equals() {
        let (date, price) = split_anchor(Some("MPC 01.12.2023=12,50 €"));
        assert_eq!(date.as_deref(), Some("MPC 01.12.2023"));
        assert_eq!(price.as_deref(), Some("12,50 €"));
    }

    #[test]
    fn split_anchor_no_equals() {
        assert_eq!(split_anchor(Some("nema sidra")), (None, None));
    }

    #[test]
    fn split_anchor_multiple_equals() {
        assert_eq!(split_anchor(Some("a=b=c")), (None, None));
    }

    #[test]
    fn split_anchor_missing() {
        assert_eq!(split_anchor(None), (None, None));
    }

    // -----------------------------------------------------------------------
    // parse_anchor_date
    // -----------------------------------------------------------------------

    #[test]
    fn anchor_date_with_mpc_marker() {
        assert_eq!(
            parse_anchor_date("MPC 01.12.2023"),
            NaiveDate::from_ymd_opt(2023, 12, 1)
        );
    }

    #[test]
    fn anchor_date_without_marker() {
        assert_eq!(
            parse_anchor_date("15.06.2024"),
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
    }

    #[test]
    fn anchor_date_trailing_dot_form() {
        assert_eq!(
            parse_anchor_date("15.06.2024."),
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
    }

    #[test]
    fn anchor_date_is_day_first() {
        // 03.04 must read as 3 April, not 4 March.
        assert_eq!(
            parse_anchor_date("03.04.2024"),
            NaiveDate::from_ymd_opt(2024, 4, 3)
        );
    }

    #[test]
    fn anchor_date_two_digit_year() {
        assert_eq!(
            parse_anchor_date("01.12.23"),
            NaiveDate::from_ymd_opt(2023, 12, 1)
        );
    }

    #[test]
    fn anchor_date_iso_fallback() {
        assert_eq!(
            parse_anchor_date("2024-06-15"),
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
    }

    #[test]
    fn anchor_date_garbage_is_none() {
        assert!(parse_anchor_date("uskoro").is_none());
    }

    // -----------------------------------------------------------------------
    // currency suffix / anchor price
    // -----------------------------------------------------------------------

    #[test]
    fn strips_eur_sign() {
        assert_eq!(strip_currency_suffix("12,50 €"), "12,50");
    }

    #[test]
    fn strips_long_eur_marker_whole() {
        // The longer suffix must win; stripping "€" first would leave "10 €u".
        assert_eq!(strip_currency_suffix("10 €ur"), "10");
    }

    #[test]
    fn strip_without_suffix_is_identity() {
        assert_eq!(strip_currency_suffix("10,00"), "10,00");
    }

    #[test]
    fn anchor_price_comma_decimal() {
        assert_eq!(parse_anchor_price("12,50 €"), Some(12.50));
    }

    #[test]
    fn anchor_price_eur_marker() {
        assert_eq!(parse_anchor_price("10 €ur"), Some(10.0));
    }

    #[test]
    fn anchor_price_empty_after_strip_is_none() {
        assert_eq!(parse_anchor_price("€"), None);
        assert_eq!(parse_anchor_price(""), None);
    }

    #[test]
    fn anchor_price_garbage_is_none() {
        assert_eq!(parse_anchor_price("po dogovoru"), None);
    }

    // -----------------------------------------------------------------------
    // replace_with_dot_if_number / parse_number / parse_integer
    // -----------------------------------------------------------------------

    #[test]
    fn comma_becomes_dot() {
        assert_eq!(replace_with_dot_if_number("12,50").as_deref(), Some("12.50"));
    }

    #[test]
    fn dotted_value_unchanged() {
        assert_eq!(replace_with_dot_if_number("12.50").as_deref(), Some("12.50"));
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(replace_with_dot_if_number(""), None);
    }

    #[test]
    fn parse_number_accepts_both_separators() {
        assert_eq!(parse_number("1,5"), Some(1.5));
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number(" 2 "), Some(2.0));
        assert_eq!(parse_number("x"), None);
    }

    #[test]
    fn parse_integer_accepts_fractionless_decimal() {
        assert_eq!(parse_integer("4"), Some(4));
        assert_eq!(parse_integer("4.0"), Some(4));
        assert_eq!(parse_integer("0,5"), None);
        assert_eq!(parse_integer("x"), None);
    }

    // -----------------------------------------------------------------------
    // sanitize_best_price
    // -----------------------------------------------------------------------

    #[test]
    fn best_price_strips_currency_noise() {
        assert_eq!(sanitize_best_price("*12,99 €"), Some(12.99));
    }

    #[test]
    fn best_price_sentinel_text_is_none() {
        assert_eq!(sanitize_best_price("nije primjenjivo"), None);
    }

    #[test]
    fn best_price_negative_survives() {
        assert_eq!(sanitize_best_price("-1,00 €"), Some(-1.0));
    }

    // -----------------------------------------------------------------------
    // promotion flag & diff
    // -----------------------------------------------------------------------

    #[test]
    fn akcija_flag_mapping() {
        assert_eq!(parse_akcija_flag(Some("A")), 1);
        assert_eq!(parse_akcija_flag(Some("")), 0);
        assert_eq!(parse_akcija_flag(None), 0);
        assert_eq!(parse_akcija_flag(Some("B")), 0);
    }

    #[test]
    fn diff_regular_case() {
        let diff = price_anchor_diff(Some(9.0), Some(10.0)).unwrap();
        assert!((diff - (-0.1)).abs() < 1e-12, "unexpected diff: {diff}");
    }

    #[test]
    fn diff_none_when_anchor_missing() {
        assert_eq!(price_anchor_diff(Some(9.0), None), None);
        assert_eq!(price_anchor_diff(None, Some(10.0)), None);
    }

    #[test]
    fn diff_none_when_anchor_zero() {
        assert_eq!(price_anchor_diff(Some(9.0), Some(0.0)), None);
    }

    // -----------------------------------------------------------------------
    // tidy end-to-end
    // -----------------------------------------------------------------------

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawPriceTable {
        RawPriceTable {
            headers: headers.iter().map(|h| (*h).to_owned()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| (*c).to_owned()).collect())
                .collect(),
        }
    }

    #[test]
    fn tidy_parses_a_full_row() {
        let t = table(
            &[
                "product_name",
                "brand",
                "is_akcija",
                "quantity",
                "kol_jed_mj",
                "price",
                "unit_price",
                "best_price_30",
                "anchor_price_date",
            ],
            &[&[
                "Humus pikantni",
                "K-Bio",
                "A",
                "0,2",
                "1",
                "2,49",
                "12,45",
                "*2,99 €",
                "MPC 01.12.2023=12,50 €",
            ]],
        );
        let rows = tidy(&t);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.product_name, "HUMUS PIKANTNI");
        assert_eq!(row.brand, "K-Bio");
        assert_eq!(row.is_akcija, 1);
        assert_eq!(row.quantity, Some(0.2));
        assert_eq!(row.kol_jed_mj, Some(1));
        assert_eq!(row.price, Some(2.49));
        assert_eq!(row.unit_price, Some(12.45));
        assert_eq!(row.best_price_30, Some(2.99));
        assert_eq!(row.anchor_date, NaiveDate::from_ymd_opt(2023, 12, 1));
        assert_eq!(row.anchor_price, Some(12.50));
        let diff = row.price_anchor_diff.unwrap();
        assert!((diff - (2.49 - 12.50) / 12.50).abs() < 1e-12);
    }

    #[test]
    fn tidy_malformed_anchor_keeps_row() {
        let t = table(
            &["product_name", "price", "anchor_price_date"],
            &[&["Tofu", "1,99", "bez sidra"]],
        );
        let rows = tidy(&t);
        assert_eq!(rows[0].product_name, "TOFU");
        assert_eq!(rows[0].price, Some(1.99));
        assert_eq!(rows[0].anchor_date, None);
        assert_eq!(rows[0].anchor_price, None);
        assert_eq!(rows[0].price_anchor_diff, None);
    }

    #[test]
    fn tidy_preserves_unmapped_columns() {
        let t = table(
            &["product_name", "neka nova kolona"],
            &[&["Tofu", "vrijednost"]],
        );
        let rows = tidy(&t);
        assert_eq!(
            rows[0].extra.get("neka nova kolona").map(String::as_str),
            Some("vrijednost")
        );
    }

    #[test]
    fn tidy_drops_anchor_composite_from_extra() {
        let t = table(
            &["product_name", "anchor_price_date"],
            &[&["Tofu", "MPC 01.12.2023=12,50 €"]],
        );
        let rows = tidy(&t);
        assert!(rows[0].extra.is_empty());
    }

    #[test]
    fn tidy_short_row_yields_missing_fields() {
        let t = table(&["product_name", "price"], &[&["Tofu"]]);
        let rows = tidy(&t);
        assert_eq!(rows[0].price, None);
    }
}
