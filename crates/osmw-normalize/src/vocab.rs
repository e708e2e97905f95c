//! Fixed vocabularies observed in the input corpus.
//!
//! These tables are corpus-specific: they cover the conventions actually
//! seen in the extract, not the full breadth of OSM tagging.

/// Top-level keys that describe a primary map feature.
pub const PRIMARY_MAP_FEATURES: &[&str] = &[
    "aerialway",
    "aeroway",
    "amenity",
    "barrier",
    "boundary",
    "building",
    "craft",
    "emergency",
    "geological",
    "highway",
    "cycleway",
    "busway",
    "sidewalk",
    "historic",
    "landuse",
    "leisure",
    "man_made",
    "military",
    "natural",
    "office",
    "place",
    "power",
    "line",
    "public_transport",
    "railway",
    "route",
    "shop",
    "sport",
    "tourism",
    "waterway",
];

/// Street-suffix tokens that are already canonical.
pub const EXPECTED_STREET_TYPES: &[&str] = &[
    "STREET", "AVENUE", "BOULEVARD", "DRIVE", "COURT", "PLACE", "SQUARE", "LANE", "ROAD", "TRAIL",
    "PARKWAY", "COMMONS",
];

/// Numeric band of plausible postal codes for the extract's region.
pub const POSTAL_CODE_RANGE: (i64, i64) = (10_000, 14_999);

pub fn is_primary_map_feature(key: &str) -> bool {
    PRIMARY_MAP_FEATURES.contains(&key)
}

/// Canonical replacement for an abbreviated or misspelled street suffix.
pub fn fix_street_suffix(token: &str) -> Option<&'static str> {
    let fixed = match token {
        "RD" | "RD." => "ROAD",
        "STREEET" | "STEET" | "ST.," | "ST." | "ST," | "ST" | "STREER" => "STREET",
        "STE" | "STE." | "STE," => "SUITE",
        "PL" => "PLACE",
        "BLVD" | "BLV." | "BLV," => "BOULEVARD",
        "AVENUE," | "AVENEU" | "AVE." | "AVE," | "AVE" => "AVENUE",
        _ => return None,
    };
    Some(fixed)
}

/// Canonical replacement for an abbreviated cardinal direction.
pub fn fix_cardinal_name(token: &str) -> Option<&'static str> {
    let fixed = match token {
        "W." | "W" => "WEST",
        "S" => "SOUTH",
        "N" => "NORTH",
        "E." | "E" => "EAST",
        _ => return None,
    };
    Some(fixed)
}

/// Full weekday name for a two-letter day code.
pub fn weekday_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "mo" => "monday",
        "tu" => "tuesday",
        "we" => "wednesday",
        "th" => "thursday",
        "fr" => "friday",
        "sa" => "saturday",
        "su" => "sunday",
        _ => return None,
    };
    Some(name)
}

/// Expansion of an abbreviated weekday-range token into day codes, in the
/// fixed order the output accumulates them.
pub fn weekday_range(token: &str) -> Option<&'static [&'static str]> {
    let days: &[&str] = match token {
        "mo-su" | "su-su" | "mo-mo" => &["mo", "tu", "we", "th", "fr", "sa", "su"],
        "mo-sa" => &["mo", "tu", "we", "th", "fr", "sa"],
        "mo-fr" => &["mo", "tu", "we", "th", "fr"],
        "mo-th" => &["mo", "tu", "we", "th"],
        "mo-we" => &["mo", "tu", "we"],
        "mo-tu" => &["mo"],
        "tu-su" => &["tu", "we", "th", "fr", "sa", "su"],
        "tu-sa" => &["tu", "we", "th", "fr", "sa"],
        "tu-fr" => &["tu", "we", "th", "fr"],
        "tu-th" => &["tu", "we", "th"],
        "tu-we" => &["tu", "we"],
        "we-su" => &["we", "th", "fr", "sa", "su"],
        "we-sa" => &["we", "th", "fr", "sa"],
        "we-fr" => &["we", "th", "fr"],
        "we-th" => &["we", "th"],
        "th-su" => &["th", "fr", "sa", "su"],
        "th-sa" => &["th", "fr", "sa"],
        "th-fr" => &["th", "fr"],
        "fr-su" => &["fr", "sa", "su"],
        "fr-sa" => &["fr", "sa"],
        _ => return None,
    };
    Some(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_feature_membership() {
        assert!(is_primary_map_feature("highway"));
        assert!(is_primary_map_feature("waterway"));
        assert!(!is_primary_map_feature("addr"));
    }

    #[test]
    fn street_suffix_variants_map_to_canonical() {
        assert_eq!(fix_street_suffix("ST"), Some("STREET"));
        assert_eq!(fix_street_suffix("ST.,"), Some("STREET"));
        assert_eq!(fix_street_suffix("AVE,"), Some("AVENUE"));
        assert_eq!(fix_street_suffix("STREET"), None);
    }

    #[test]
    fn weekday_range_covers_wraparound_rows() {
        // Ranges that wrap or start and end on the same day expand to the
        // full week, as observed in the corpus.
        let full = weekday_range("mo-su").unwrap();
        assert_eq!(full.len(), 7);
        assert_eq!(weekday_range("su-su"), Some(full));
        assert_eq!(weekday_range("mo-mo"), Some(full));
        // The corpus maps mo-tu to monday alone.
        assert_eq!(weekday_range("mo-tu"), Some(&["mo"][..]));
        assert_eq!(weekday_range("sa-su"), None);
    }
}
