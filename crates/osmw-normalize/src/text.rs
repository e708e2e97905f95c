//! Field normalizers for free-text names, street names, and postal codes.
//!
//! All of these are best-effort: unrecognized input falls through unchanged,
//! never errors.

use crate::vocab;

/// Normalize a free-text name: upper-case and substitute separator
/// punctuation with single spaces.
///
/// Known limitation: the double-space substitution is a single replacement
/// pass, so three-or-more consecutive spaces are not fully collapsed.
pub fn normalize_name(name: &str) -> String {
    name.to_uppercase()
        .replace('"', " ")
        .replace('\'', " ")
        .replace('|', " ")
        .replace('\\', " ")
        .replace('/', " ")
        .replace('-', " ")
        .replace("  ", " ")
}

/// Normalize a street name token by token.
///
/// Tokens already in the canonical suffix vocabulary pass through. Other
/// tokens get the suffix-abbreviation substitution (never on the first
/// token) and the cardinal-direction substitution (any position, and it
/// wins over a suffix substitution). Idempotent: normalizing a normalized
/// name is a no-op.
pub fn normalize_street_name(street: &str) -> String {
    let upper = street.to_uppercase();
    let mut normalized: Vec<&str> = Vec::new();
    for (index, token) in upper.split_whitespace().enumerate() {
        let mut fixed = token;
        if !vocab::EXPECTED_STREET_TYPES.contains(&token) {
            if index > 0 {
                if let Some(suffix) = vocab::fix_street_suffix(token) {
                    fixed = suffix;
                }
            }
            if let Some(cardinal) = vocab::fix_cardinal_name(token) {
                fixed = cardinal;
            }
        }
        normalized.push(fixed);
    }
    normalized.join(" ")
}

/// Normalize a postal code by inspecting the first whitespace-separated
/// token.
///
/// The token replaces the whole value when it is purely numeric or has the
/// length of a zip+4 form (10 or 11 characters); anything else returns the
/// original string unchanged. Range checking is the audit pass's job, not
/// normalization's.
pub fn normalize_zip_code(zipcode: &str) -> String {
    if let Some(first) = zipcode.split_whitespace().next() {
        let numeric = !first.is_empty() && first.chars().all(|ch| ch.is_ascii_digit());
        if numeric || first.len() == 10 || first.len() == 11 {
            return first.to_string();
        }
    }
    zipcode.to_string()
}
