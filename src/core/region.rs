use crate::models::Region;

const NORTH_AMERICA_COUNTRIES: &[&str] = &["united states", "usa", "canada", "mexico"];

const EUROPE_COUNTRIES: &[&str] = &[
    "united kingdom",
    "uk",
    "germany",
    "france",
    "spain",
    "italy",
    "netherlands",
    "sweden",
    "norway",
    "denmark",
    "finland",
    "switzerland",
    "austria",
    "belgium",
    "ireland",
];

/// Classify a free-text location string into a market region
///
/// Matching is case-insensitive substring search so values like
/// "Toronto, Canada" resolve without any address parsing. North America
/// is checked before Europe, which keeps "usa" winning over "uk"-style
/// fragments. Empty input maps to Unknown.
pub fn classify_location(location: &str) -> Region {
    if location.is_empty() {
        return Region::Unknown;
    }

    let location_lower = location.to_lowercase();

    if NORTH_AMERICA_COUNTRIES
        .iter()
        .any(|country| location_lower.contains(country))
    {
        return Region::NorthAmerica;
    }

    if EUROPE_COUNTRIES
        .iter()
        .any(|country| location_lower.contains(country))
    {
        return Region::Europe;
    }

    Region::Other
}
