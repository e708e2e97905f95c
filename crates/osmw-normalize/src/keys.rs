//! Tag-key well-formedness and namespace routing.

use std::sync::LazyLock;

use regex::Regex;

/// Characters that disqualify a key outright.
pub const RESERVED_CHARS: &[char] = &[
    '=', '+', '/', '&', '<', '>', ';', '\'', '"', '?', '%', '#', '$', '@', ',', '.', ' ', '\t',
    '\r', '\n',
];

static LOWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]|_)*$").expect("lower pattern"));
static LOWER_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]|_)*:([a-z]|_)*$").expect("lower colon pattern"));
static LOWER_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]|_)*\.([a-z]|_)*$").expect("lower dot pattern"));

/// A namespace route: keys carrying the prefix land in the bucket.
#[derive(Debug, Clone, Copy)]
pub struct NamespaceRoute {
    pub bucket: &'static str,
    pub prefix: &'static str,
}

/// Prefix-stripped namespace buckets, tried in order for every tag.
pub const NAMESPACE_ROUTES: &[NamespaceRoute] = &[
    NamespaceRoute {
        bucket: "addr",
        prefix: "addr:",
    },
    NamespaceRoute {
        bucket: "building",
        prefix: "building:",
    },
    NamespaceRoute {
        bucket: "cityracks",
        prefix: "cityracks.",
    },
    NamespaceRoute {
        bucket: "crossing",
        prefix: "crossing:",
    },
    NamespaceRoute {
        bucket: "gnis",
        prefix: "gnis:",
    },
    NamespaceRoute {
        bucket: "tiger",
        prefix: "tiger:",
    },
];

/// Name-family routes into the `names` bucket. These use the bare key as
/// prefix with no separator, so `name:en` and `old_name:en` both match.
pub const NAME_ROUTES: &[NamespaceRoute] = &[
    NamespaceRoute {
        bucket: "names",
        prefix: "name",
    },
    NamespaceRoute {
        bucket: "names",
        prefix: "old_name",
    },
];

/// Whether a raw key is worth normalizing at all.
///
/// A key is well-formed iff it contains no reserved character and matches
/// one of the three sanctioned shapes: lowercase-and-underscore, two such
/// segments joined by a colon, or two joined by a literal dot. Rejected
/// keys are silently dropped, never copied into any bucket.
///
/// The dot shape is unreachable in practice because `.` is itself reserved;
/// both checks are applied literally, matching the observed behavior of the
/// source corpus tooling.
pub fn is_well_formed(key: &str) -> bool {
    !key.contains(RESERVED_CHARS)
        && (LOWER.is_match(key) || LOWER_COLON.is_match(key) || LOWER_DOT.is_match(key))
}

/// Derive the bucket-local field name for a key under a namespace prefix.
///
/// The prefix is stripped; if stripping would leave nothing (the key *is*
/// the prefix), the whole key is kept. Remaining `-`, `.`, `:` characters
/// become `_` so the result is identifier-like.
pub fn local_key(key: &str, prefix: &str) -> String {
    let stripped = key.strip_prefix(prefix).unwrap_or(key);
    let base = if stripped.is_empty() { key } else { stripped };
    base.trim().replace(['-', '.', ':'], "_")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn plain_lowercase_keys_are_well_formed() {
        assert!(is_well_formed("highway"));
        assert!(is_well_formed("man_made"));
        assert!(is_well_formed(""));
    }

    #[test]
    fn colon_namespaced_keys_are_well_formed() {
        assert!(is_well_formed("addr:street"));
        assert!(is_well_formed("tiger:county"));
        // only a single colon is sanctioned
        assert!(!is_well_formed("tiger:name:base"));
    }

    #[test]
    fn reserved_characters_reject_the_key() {
        assert!(!is_well_formed("addr street"));
        assert!(!is_well_formed("phone#"));
        assert!(!is_well_formed("cityracks.street"));
        assert!(!is_well_formed("a=b"));
    }

    #[test]
    fn uppercase_keys_are_rejected() {
        assert!(!is_well_formed("Phone"));
        assert!(!is_well_formed("FIXME"));
    }

    #[test]
    fn local_key_strips_prefix_and_cleans_punctuation() {
        assert_eq!(local_key("addr:street", "addr:"), "street");
        assert_eq!(local_key("tiger:name_base", "tiger:"), "name_base");
        assert_eq!(local_key("name:en", "name"), "_en");
        assert_eq!(local_key("old_name:en", "old_name"), "_en");
    }

    #[test]
    fn local_key_keeps_whole_key_when_stripping_empties_it() {
        assert_eq!(local_key("old_name", "old_name"), "old_name");
        assert_eq!(local_key("opening_hours", ""), "opening_hours");
    }

    proptest! {
        // Any key containing a reserved character is rejected, regardless
        // of casing or structure around it.
        #[test]
        fn reserved_char_always_rejects(
            prefix in "[a-z_]{0,8}",
            reserved in proptest::sample::select(RESERVED_CHARS),
            suffix in "[a-z_]{0,8}",
        ) {
            let key = format!("{prefix}{reserved}{suffix}");
            prop_assert!(!is_well_formed(&key));
        }
    }
}
