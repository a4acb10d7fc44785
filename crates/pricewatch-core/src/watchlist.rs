//! Data-driven watch-list rules.
//!
//! The curated product selection lives in a YAML file (see
//! `config/watchlist.yaml`) instead of hard-coded predicates, so individual
//! rules can be added, removed, and unit-tested in isolation. Three rule
//! groups are combined with OR: the favorites list, the wheat-beer patterns,
//! and the cheese patterns.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rows::PriceRow;
use crate::ConfigError;

/// Text field of a [`PriceRow`] a condition can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    ProductName,
    Brand,
}

impl TextField {
    fn get<'a>(self, row: &'a PriceRow) -> &'a str {
        match self {
            TextField::ProductName => &row.product_name,
            TextField::Brand => &row.brand,
        }
    }
}

/// A single condition of a favorite rule.
///
/// Text conditions are case-sensitive: `product_name` is already upper-cased
/// by the tidy transform and brand names are matched verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Field contains the substring.
    Contains { field: TextField, value: String },
    /// Field contains at least one of the substrings.
    ContainsAny { field: TextField, values: Vec<String> },
    /// Field starts with the prefix.
    StartsWith { field: TextField, value: String },
    /// Net quantity is strictly greater than the threshold.
    QuantityOver(f64),
    /// Net quantity is greater than or equal to the threshold.
    QuantityAtLeast(f64),
}

impl Condition {
    /// Evaluates the condition against one row. Quantity conditions fail when
    /// the row has no parsed quantity.
    #[must_use]
    pub fn matches(&self, row: &PriceRow) -> bool {
        match self {
            Condition::Contains { field, value } => field.get(row).contains(value.as_str()),
            Condition::ContainsAny { field, values } => {
                let haystack = field.get(row);
                values.iter().any(|v| haystack.contains(v.as_str()))
            }
            Condition::StartsWith { field, value } => field.get(row).starts_with(value.as_str()),
            Condition::QuantityOver(threshold) => row.quantity.is_some_and(|q| q > *threshold),
            Condition::QuantityAtLeast(threshold) => row.quantity.is_some_and(|q| q >= *threshold),
        }
    }
}

/// One named favorite: all of its conditions must hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRule {
    pub name: String,
    pub when: Vec<Condition>,
}

impl FavoriteRule {
    #[must_use]
    pub fn matches(&self, row: &PriceRow) -> bool {
        self.when.iter().all(|c| c.matches(row))
    }
}

/// Case-insensitive substring group with an optional quantity floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRule {
    pub patterns: Vec<String>,
    #[serde(default)]
    pub min_quantity: Option<f64>,
}

impl PatternRule {
    #[must_use]
    pub fn matches(&self, row: &PriceRow) -> bool {
        let name = row.product_name.to_lowercase();
        let name_matches = self.patterns.iter().any(|p| name.contains(&p.to_lowercase()));
        let quantity_ok = self
            .min_quantity
            .map_or(true, |m| row.quantity.is_some_and(|q| q >= m));
        name_matches && quantity_ok
    }
}

/// The full curated watch-list.
#[derive(Debug, Clone, Deserialize)]
pub struct Watchlist {
    pub favorites: Vec<FavoriteRule>,
    pub wheat_beer: PatternRule,
    pub cheese: PatternRule,
}

impl Watchlist {
    /// Returns `true` when any of the three rule groups selects the row.
    #[must_use]
    pub fn selects(&self, row: &PriceRow) -> bool {
        self.favorites.iter().any(|rule| rule.matches(row))
            || self.wheat_beer.matches(row)
            || self.cheese.matches(row)
    }
}

/// Load and validate the watch-list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_watchlist(path: &Path) -> Result<Watchlist, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::WatchlistIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let watchlist: Watchlist = serde_yaml::from_str(&content)?;
    validate_watchlist(&watchlist)?;
    Ok(watchlist)
}

fn validate_watchlist(watchlist: &Watchlist) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for rule in &watchlist.favorites {
        if rule.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "favorite rule name must be non-empty".to_string(),
            ));
        }
        if rule.when.is_empty() {
            return Err(ConfigError::Validation(format!(
                "favorite rule '{}' has no conditions",
                rule.name
            )));
        }
        if !seen_names.insert(rule.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate favorite rule name: '{}'",
                rule.name
            )));
        }
    }

    validate_pattern_rule("wheat_beer", &watchlist.wheat_beer)?;
    validate_pattern_rule("cheese", &watchlist.cheese)?;
    Ok(())
}

fn validate_pattern_rule(label: &str, rule: &PatternRule) -> Result<(), ConfigError> {
    if rule.patterns.is_empty() {
        return Err(ConfigError::Validation(format!(
            "pattern group '{label}' has no patterns"
        )));
    }
    if rule.patterns.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "pattern group '{label}' contains an empty pattern"
        )));
    }
    if let Some(m) = rule.min_quantity {
        if m < 0.0 {
            return Err(ConfigError::Validation(format!(
                "pattern group '{label}' has a negative min_quantity"
            )));
        }
    }
    Ok(())
}
