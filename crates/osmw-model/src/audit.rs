//! Audit-side model: the immutable result of the first pass over the
//! extract, threaded into record building as read-only context.

use std::collections::{BTreeMap, BTreeSet};

/// Frequency of one element name, its attributes, and its direct children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStats {
    /// Times the element name was observed.
    pub count: u64,
    /// Per-attribute occurrence counts.
    pub attributes: BTreeMap<String, u64>,
    /// Stats of direct child elements, one level deep.
    pub children: BTreeMap<String, TagStats>,
}

/// Everything the audit pass learned about the extract.
///
/// The report is a pure function of the input stream: auditing the same
/// stream twice yields an equal report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Element-name frequency with attribute and child breakdowns.
    pub tag_stats: BTreeMap<String, TagStats>,
    /// Raw `k` attribute frequency across all `<tag>` children.
    pub key_counts: BTreeMap<String, u64>,
    /// Keys observed with yes/no-like values or conditional semantics.
    pub restriction_keys: BTreeSet<String>,
    /// Postal codes outside the expected band, collected for manual review.
    pub suspect_postal_codes: BTreeSet<String>,
    /// Upper-cased street-name token frequency from `addr:street` values.
    pub street_tokens: BTreeMap<String, u64>,
}

impl AuditReport {
    /// Whether the first pass flagged `key` as restriction-like.
    pub fn is_restriction_key(&self, key: &str) -> bool {
        self.restriction_keys.contains(key)
    }
}
