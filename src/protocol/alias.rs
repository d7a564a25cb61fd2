//! Alias tables: human-friendly extent and datatype names to canonical API codes.
//!
//! Lookups normalize the input first (lowercase, okina and apostrophes
//! removed, spaces and hyphens folded to `_`), so "Big Island", "big-island"
//! and "BIG_ISLAND" all hit the same entry.

use super::locations;

/// Canonical extent codes accepted by the raster and time-series endpoints.
pub const EXTENTS: &[&str] = &["bi", "oa", "ka", "mn", "statewide"];

/// Canonical datatype codes.
pub const DATATYPES: &[&str] = &["rainfall", "temp_mean", "temp_min", "temp_max", "rh", "spi"];

const EXTENT_ALIASES: &[(&str, &str)] = &[
    ("big_island", "bi"),
    ("hawaii_island", "bi"),
    ("island_of_hawaii", "bi"),
    ("hawaii_county", "bi"),
    ("hilo", "bi"),
    ("kona", "bi"),
    ("oahu", "oa"),
    ("honolulu", "oa"),
    ("honolulu_county", "oa"),
    ("city_and_county_of_honolulu", "oa"),
    ("kauai", "ka"),
    ("kauai_county", "ka"),
    ("niihau", "ka"),
    ("maui", "mn"),
    ("maui_county", "mn"),
    ("molokai", "mn"),
    ("lanai", "mn"),
    ("kahoolawe", "mn"),
    ("maui_nui", "mn"),
    ("hawaii", "statewide"),
    ("hawaii_state", "statewide"),
    ("state", "statewide"),
    ("state_of_hawaii", "statewide"),
    ("all_islands", "statewide"),
    ("all", "statewide"),
];

const DATATYPE_ALIASES: &[(&str, &str)] = &[
    ("rain", "rainfall"),
    ("precipitation", "rainfall"),
    ("precip", "rainfall"),
    ("temperature", "temp_mean"),
    ("temp", "temp_mean"),
    ("mean_temperature", "temp_mean"),
    ("average_temperature", "temp_mean"),
    ("avg_temperature", "temp_mean"),
    ("minimum_temperature", "temp_min"),
    ("min_temperature", "temp_min"),
    ("min_temp", "temp_min"),
    ("low_temperature", "temp_min"),
    ("maximum_temperature", "temp_max"),
    ("max_temperature", "temp_max"),
    ("max_temp", "temp_max"),
    ("high_temperature", "temp_max"),
    ("humidity", "rh"),
    ("relative_humidity", "rh"),
    ("drought", "spi"),
    ("drought_index", "spi"),
    ("standardized_precipitation_index", "spi"),
];

/// Which alias table a field resolves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasTable {
    Extent,
    Datatype,
    /// Island keys of the composite tools.
    Island,
    /// City keys of the composite tools.
    City,
}

impl AliasTable {
    /// Translate a human-friendly name. Returns `None` when no alias matches;
    /// the caller then checks the raw value against the canonical enum.
    pub fn resolve(&self, raw: &str) -> Option<&'static str> {
        let key = normalize_key(raw);
        let entries = match self {
            Self::Extent => EXTENT_ALIASES,
            Self::Datatype => DATATYPE_ALIASES,
            Self::Island => return locations::find_island(raw).map(|i| i.key),
            Self::City => return locations::find_city(raw).map(|c| c.key),
        };
        entries
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, code)| *code)
    }
}

/// Resolve an extent name ("Big Island", "oahu") to its code.
pub fn resolve_extent(raw: &str) -> Option<&'static str> {
    AliasTable::Extent.resolve(raw)
}

/// Resolve a datatype name ("precipitation", "temperature") to its code.
pub fn resolve_datatype(raw: &str) -> Option<&'static str> {
    AliasTable::Datatype.resolve(raw)
}

pub(crate) fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        match c {
            '\u{02BB}' | '\u{2018}' | '\u{2019}' | '\'' | '`' => {}
            ' ' | '-' | '_' => {
                if !out.ends_with('_') {
                    out.push('_');
                }
            }
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}
