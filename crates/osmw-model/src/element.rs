//! Source-side model: elements and raw tags as read from the OSM extract.

use serde::{Deserialize, Serialize};

/// One `k`/`v` attribute pair from a `<tag>` child element.
///
/// Keys may be plain (`name`), colon-namespaced (`addr:street`), or dotted
/// (`cityracks.street`). Values are free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    pub key: String,
    pub value: String,
}

impl RawTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Kind of a top-level OSM element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl ElementKind {
    /// Map an XML element name to a kind; other element names are ignored
    /// by the reader.
    pub fn from_tag_name(name: &str) -> Option<Self> {
        match name {
            "node" => Some(Self::Node),
            "way" => Some(Self::Way),
            "relation" => Some(Self::Relation),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

/// The `created` sub-record: authorship attributes copied verbatim.
///
/// All fields serialize as `null` when the source attribute is absent,
/// matching the shape of the original document collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub version: Option<String>,
    pub changeset: Option<String>,
    pub timestamp: Option<String>,
    pub user: Option<String>,
    pub uid: Option<String>,
}

/// One top-level element from the extract, with its children folded in.
///
/// Coordinates are kept as raw attribute text; parsing them is the record
/// builder's job so that unparsable positions drop out instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub id: Option<String>,
    pub visible: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub created: Created,
    /// Ordered `ref` attributes of `<nd>` children (ways only in practice).
    pub node_refs: Vec<String>,
    pub tags: Vec<RawTag>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            id: None,
            visible: None,
            lat: None,
            lon: None,
            created: Created::default(),
            node_refs: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// First tag value for `key`, if any.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_tag_names() {
        assert_eq!(ElementKind::from_tag_name("node"), Some(ElementKind::Node));
        assert_eq!(ElementKind::from_tag_name("way"), Some(ElementKind::Way));
        assert_eq!(
            ElementKind::from_tag_name("relation"),
            Some(ElementKind::Relation)
        );
        assert_eq!(ElementKind::from_tag_name("bounds"), None);
        assert_eq!(ElementKind::Way.as_str(), "way");
    }

    #[test]
    fn tag_lookup_returns_first_match() {
        let mut element = Element::new(ElementKind::Node);
        element.tags.push(RawTag::new("amenity", "pub"));
        element.tags.push(RawTag::new("amenity", "bar"));
        assert_eq!(element.tag("amenity"), Some("pub"));
        assert_eq!(element.tag("name"), None);
    }
}
