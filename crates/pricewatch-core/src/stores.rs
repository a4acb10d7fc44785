//! Registry of known physical stores.

/// A physical store that publishes a daily price file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreRecord {
    /// Store id as it appears in manifest filenames.
    pub id: u16,
    pub address: &'static str,
    pub city: &'static str,
}

/// Stores this tool has been pointed at so far. Purely informational — any
/// id present in the manifest can be selected via configuration.
pub const KNOWN_STORES: &[StoreRecord] = &[StoreRecord {
    id: 2030,
    address: "Andrije Hebranga 2",
    city: "Zadar",
}];

/// Looks up a known store by id.
#[must_use]
pub fn store_by_id(id: u16) -> Option<&'static StoreRecord> {
    KNOWN_STORES.iter().find(|s| s.id == id)
}
