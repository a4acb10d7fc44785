//! Header normalization from the retailer's column names to the internal
//! schema.
//!
//! Pure renaming: two fixed tables (price fields, identity/attribute fields)
//! applied to [`RawPriceTable`] headers. Cell values are untouched and
//! headers without a mapping pass through unchanged — they are carried into
//! [`pricewatch_core::PriceRow::extra`] by the tidy transform.

use crate::load::RawPriceTable;

/// Price-related source columns.
pub const PRICE_FIELD_RENAMES: &[(&str, &str)] = &[
    ("maloprod.cijena(EUR)", "price"),
    ("cijena jed.mj.(EUR)", "unit_price"),
    ("MPC poseb.oblik prod", "special_price"),
    ("Najniža MPC u 30dana", "best_price_30"),
    ("Sidrena cijena", "anchor_price_date"),
];

/// Identity and attribute source columns.
pub const IDENTITY_FIELD_RENAMES: &[(&str, &str)] = &[
    ("naziv proizvoda", "product_name"),
    ("šifra proizvoda", "product_id"),
    ("marka proizvoda", "brand"),
    ("akc.cijena, A=akcija", "is_akcija"),
    ("jed.mj. (1 KOM/L/KG)", "jed_mj"),
    ("kol.jed.mj.", "kol_jed_mj"),
    ("neto količina(KG)", "quantity"),
    ("jedinica mjere", "unit"),
    ("barkod", "barcode"),
    ("WG", "category"),
];

/// Renames every mapped header in place.
pub fn normalize_headers(table: &mut RawPriceTable) {
    for header in &mut table.headers {
        if let Some(renamed) = rename_header(header) {
            *header = renamed.to_owned();
        }
    }
}

/// Looks a source header up in the merged rename tables.
#[must_use]
pub fn rename_header(header: &str) -> Option<&'static str> {
    PRICE_FIELD_RENAMES
        .iter()
        .chain(IDENTITY_FIELD_RENAMES)
        .find(|(from, _)| *from == header)
        .map(|(_, to)| *to)
}
