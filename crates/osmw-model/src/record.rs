//! Output-side model: the normalized JSON document built from one element.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::Created;

/// One namespace bucket: local key to normalized value.
pub type Bucket = BTreeMap<String, TagValue>;

/// Normalized value of a single tag.
///
/// Most tags carry plain text. Restriction-rule tags whose value parses as
/// a conditional carry the compiled rule map instead. A conditional with
/// exactly one irreducible clause degenerates to its bare action string,
/// which lands here as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Rules(BTreeMap<String, ClauseRules>),
}

/// Compiled conditions of one clause, keyed by the clause's action token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClauseRules {
    /// Identity fallback: the clause had no day/time condition.
    Text(String),
    /// Canonical weekday name (or raw fallback text) to time windows.
    Windows(BTreeMap<String, Vec<String>>),
}

/// The normalized product of one node or way element.
///
/// `pos` is present iff both coordinates parsed as floating point;
/// `node_refs` iff the element referenced at least one node; `name` iff a
/// plain `name` tag was present. Namespace buckets are flattened into the
/// document and present only when at least one tag routed into them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub visible: Option<String>,
    pub created: Created,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_refs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub buckets: BTreeMap<String, Bucket>,
}

impl OutputRecord {
    pub fn new(kind: &str) -> Self {
        Self {
            id: None,
            kind: kind.to_string(),
            visible: None,
            created: Created::default(),
            pos: None,
            node_refs: None,
            name: None,
            buckets: BTreeMap::new(),
        }
    }

    /// Insert a normalized value into a namespace bucket, creating the
    /// bucket on first use.
    pub fn insert_into_bucket(&mut self, bucket: &str, local_key: String, value: TagValue) {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(local_key, value);
    }
}
