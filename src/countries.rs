//! Country and region code resolution.
//!
//! The download form accepts a fixed vocabulary of country codes. Users may
//! name those codes directly or use one of the regional presets offered by
//! the web interface (`europe`, `dach`, `benelux`, ...). [`expand_countries`]
//! turns a mixed token list into the flat, deduplicated code list that is
//! submitted with the fixed-camera download.
//!
//! The tables below are product data: region membership mirrors the presets
//! of the website and is not derived from geography. `NL` is deliberately
//! absent from `europe` and reachable through `benelux` and `westeurope`.

use crate::errors::{AppError, AppResult};
use std::collections::HashSet;
use std::hash::Hash;

/// A country code from the master list, e.g. `"NL"`, `"USA"` or `"D"`.
pub type CountryCode = &'static str;

/// Every country code accepted by the download form, in canonical order.
static ALL_COUNTRIES: &[CountryCode] = &[
    "AFG", "DZ", "AND", "RA", "ARM", "AUS", "A", "AZ", "BRN", "BY", "B", "BZ", "BIH", "BR", "BG",
    "CDN", "RCH", "CO", "HR", "CY", "CZ", "DK", "EC", "ET", "ES2", "EST", "FJI", "FI", "FR", "GF",
    "GE", "D", "GBZ", "GR", "GP", "GT", "GUY", "HN", "HK", "H", "IS", "IND", "IR", "IRQ", "IRL",
    "IL", "I", "J", "JOR", "KZ", "KWT", "KS", "LAO", "LV", "RL", "LI", "LT", "L", "MO", "MAL", "M",
    "MQ", "MS", "MEX", "MD", "MGL", "MA", "NAM", "NL", "NZ", "MK", "NO", "OM", "PK", "PA", "PY",
    "PE", "RP", "PL", "P", "Q", "RO", "RUS", "RWA", "RE", "RSM", "KSA", "SRB", "SGP", "SK", "SLO",
    "ZA", "ROK", "ES", "SE", "CH", "RCT", "T", "TT", "TN", "TR", "UA", "UAE", "GB", "USA", "ROU",
    "UZ", "VN", "Z", "ZW",
];

/// Regional presets, keyed by lowercase region name.
///
/// Kept as an ordered slice so help output lists regions in a stable order.
static REGIONS: &[(&str, &[CountryCode])] = &[
    ("africa", &["AFG", "DZ", "ET", "MA", "NAM", "ZA", "RWA", "TN", "Z", "ZW"]),
    (
        "asia",
        &[
            "ARM", "AZ", "BRN", "HK", "IND", "IR", "IRQ", "IL", "J", "JOR", "KZ", "KWT", "KS",
            "LAO", "MAL", "MO", "MGL", "OM", "PK", "RP", "SGP", "ROK", "RCT", "T", "UAE", "UZ",
            "VN",
        ],
    ),
    (
        "europe",
        &[
            "AND", "A", "BY", "B", "BIH", "BG", "HR", "CY", "CZ", "DK", "EST", "FI", "FR", "GE",
            "D", "GBZ", "GR", "H", "IS", "IRL", "I", "LV", "RL", "LI", "LT", "L", "M", "MK", "NO",
            "PL", "P", "RO", "RUS", "RSM", "SRB", "SK", "SLO", "ES", "SE", "CH", "TR", "UA", "GB",
        ],
    ),
    ("northamerica", &["CDN", "USA", "MEX", "GT", "HN", "BZ", "PA", "TT"]),
    ("southamerica", &["RA", "BR", "RCH", "CO", "EC", "GUY", "PY", "PE", "ROU"]),
    ("oceania", &["AUS", "FJI", "NZ"]),
    ("dach", &["D", "A", "CH"]),
    ("benelux", &["B", "NL", "L"]),
    (
        "westeurope",
        &["B", "NL", "L", "FR", "D", "A", "CH", "I", "ES", "P", "GB", "IRL"],
    ),
    (
        "easteurope",
        &["PL", "CZ", "SK", "H", "RO", "BG", "HR", "SLO", "EST", "LV", "LT", "BY", "UA", "RUS"],
    ),
    ("scandinavia", &["SE", "NO", "DK", "FI", "IS"]),
];

/// Returns the complete master list of country codes in canonical order.
pub fn all_countries() -> &'static [CountryCode] {
    ALL_COUNTRIES
}

/// Returns the names of all regional presets.
pub fn region_names() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|(name, _)| *name)
}

/// Looks up a region by name, ignoring case.
pub fn region(name: &str) -> Option<&'static [CountryCode]> {
    let lower = name.to_lowercase();
    REGIONS
        .iter()
        .find(|(region, _)| *region == lower)
        .map(|(_, codes)| *codes)
}

/// Looks up a country code, ignoring case, and returns its canonical spelling.
pub fn country(code: &str) -> Option<CountryCode> {
    let upper = code.to_uppercase();
    ALL_COUNTRIES.iter().copied().find(|c| *c == upper)
}

/// Expands region names and country codes into a flat list of country codes.
///
/// Tokens are resolved in order: region names first, then country codes, both
/// case-insensitively. Regions contribute their members in stored order. The
/// result keeps the first occurrence of every code.
///
/// Tokens are matched exactly as given; surrounding whitespace is not removed.
///
/// # Errors
///
/// Returns [`AppError::UnresolvableToken`] naming the first token that is
/// neither a region nor a country code. No partial result is produced.
///
/// # Example
///
/// ```
/// use scdb_downloader::countries::expand_countries;
///
/// let codes = expand_countries(&["dach", "FR", "d"]).unwrap();
/// assert_eq!(codes, vec!["D", "A", "CH", "FR"]);
/// ```
pub fn expand_countries<S: AsRef<str>>(tokens: &[S]) -> AppResult<Vec<CountryCode>> {
    let mut result = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = token.as_ref();
        if let Some(codes) = region(token) {
            result.extend_from_slice(codes);
        } else if let Some(code) = country(token) {
            result.push(code);
        } else {
            return Err(AppError::UnresolvableToken(token.to_string()));
        }
    }
    Ok(dedup(&result))
}

/// Removes repeated values, keeping the first occurrence of each.
pub fn dedup<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect()
}
