//! The audit accumulators.

use tracing::debug;

use osmw_model::{AuditReport, Element, TagStats};
use osmw_normalize::vocab;

/// Accumulates the five audit tallies over a stream of elements.
///
/// Observing the same stream twice in the same order yields equal reports;
/// there is no hidden state beyond the tallies themselves.
#[derive(Debug, Default)]
pub struct Auditor {
    report: AuditReport,
}

impl Auditor {
    /// Fold one element into every accumulator.
    pub fn observe(&mut self, element: &Element) {
        self.observe_structure(element);
        for tag in &element.tags {
            let key = tag.key.as_str();
            let value = tag.value.as_str();

            *self
                .report
                .key_counts
                .entry(key.to_string())
                .or_default() += 1;

            if is_restriction_like(key, value) {
                self.report.restriction_keys.insert(key.to_string());
            }

            if key == "addr:zip" || key == "addr:postcode" {
                self.observe_postal_code(value);
            }

            if key == "addr:street" {
                self.observe_street_name(value);
            }
        }
    }

    /// Consume the auditor, yielding the finished report.
    pub fn finish(self) -> AuditReport {
        debug!(
            keys = self.report.key_counts.len(),
            restriction_keys = self.report.restriction_keys.len(),
            suspect_postal_codes = self.report.suspect_postal_codes.len(),
            "audit pass complete"
        );
        self.report
    }

    /// Element-name, attribute, and child frequency.
    fn observe_structure(&mut self, element: &Element) {
        let stats = self
            .report
            .tag_stats
            .entry(element.kind.as_str().to_string())
            .or_default();
        stats.count += 1;
        for name in present_attributes(element) {
            *stats.attributes.entry(name.to_string()).or_default() += 1;
        }

        if !element.tags.is_empty() {
            let child = stats.children.entry("tag".to_string()).or_default();
            let n = element.tags.len() as u64;
            child.count += n;
            *child.attributes.entry("k".to_string()).or_default() += n;
            *child.attributes.entry("v".to_string()).or_default() += n;
        }
        if !element.node_refs.is_empty() {
            let child = stats.children.entry("nd".to_string()).or_default();
            let n = element.node_refs.len() as u64;
            child.count += n;
            *child.attributes.entry("ref".to_string()).or_default() += n;
        }
    }

    /// A postal code is suspect unless it is exactly five characters,
    /// numeric, and inside the expected band.
    fn observe_postal_code(&mut self, value: &str) {
        let in_range = value.len() == 5
            && value
                .parse::<i64>()
                .is_ok_and(|code| (vocab::POSTAL_CODE_RANGE.0..=vocab::POSTAL_CODE_RANGE.1).contains(&code));
        if !in_range {
            self.report.suspect_postal_codes.insert(value.to_string());
        }
    }

    /// Split on single spaces deliberately, so runs of whitespace surface
    /// as empty tokens in the tally instead of being hidden.
    fn observe_street_name(&mut self, value: &str) {
        for token in value.to_uppercase().split(' ') {
            *self
                .report
                .street_tokens
                .entry(token.to_string())
                .or_default() += 1;
        }
    }
}

/// Membership rule for the restriction-like key set.
fn is_restriction_like(key: &str, value: &str) -> bool {
    value == "yes"
        || value == "no"
        || value.starts_with("yes ")
        || value.starts_with("no ")
        || key.contains("conditional")
        || key == "opening_hours"
}

fn present_attributes(element: &Element) -> impl Iterator<Item = &'static str> {
    [
        ("id", element.id.is_some()),
        ("visible", element.visible.is_some()),
        ("lat", element.lat.is_some()),
        ("lon", element.lon.is_some()),
        ("version", element.created.version.is_some()),
        ("changeset", element.created.changeset.is_some()),
        ("timestamp", element.created.timestamp.is_some()),
        ("user", element.created.user.is_some()),
        ("uid", element.created.uid.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, present)| present.then_some(name))
}

#[cfg(test)]
mod tests {
    use osmw_model::{ElementKind, RawTag};

    use super::*;

    fn node(tags: Vec<RawTag>) -> Element {
        let mut element = Element::new(ElementKind::Node);
        element.id = Some("1".to_string());
        element.lat = Some("40.7".to_string());
        element.lon = Some("-73.9".to_string());
        element.tags = tags;
        element
    }

    fn audit(elements: &[Element]) -> AuditReport {
        let mut auditor = Auditor::default();
        for element in elements {
            auditor.observe(element);
        }
        auditor.finish()
    }

    #[test]
    fn tallies_element_and_attribute_frequency() {
        let report = audit(&[node(vec![]), node(vec![RawTag::new("amenity", "pub")])]);
        let stats = &report.tag_stats["node"];
        assert_eq!(stats.count, 2);
        assert_eq!(stats.attributes["id"], 2);
        assert_eq!(stats.attributes["lat"], 2);
        assert!(!stats.attributes.contains_key("visible"));
        let tag_child = &stats.children["tag"];
        assert_eq!(tag_child.count, 1);
        assert_eq!(tag_child.attributes["k"], 1);
    }

    #[test]
    fn tallies_node_ref_children() {
        let mut way = Element::new(ElementKind::Way);
        way.node_refs = vec!["1".to_string(), "2".to_string()];
        let report = audit(&[way]);
        let nd = &report.tag_stats["way"].children["nd"];
        assert_eq!(nd.count, 2);
        assert_eq!(nd.attributes["ref"], 2);
    }

    #[test]
    fn counts_every_tag_key() {
        let report = audit(&[
            node(vec![RawTag::new("amenity", "pub"), RawTag::new("name", "A")]),
            node(vec![RawTag::new("amenity", "cafe")]),
        ]);
        assert_eq!(report.key_counts["amenity"], 2);
        assert_eq!(report.key_counts["name"], 1);
    }

    #[test]
    fn restriction_membership_rules() {
        let report = audit(&[node(vec![
            RawTag::new("oneway", "yes"),
            RawTag::new("motor_vehicle", "no @ (Mo-Fr)"),
            RawTag::new("hgv:conditional", "none"),
            RawTag::new("opening_hours", "Mo-Fr 08:00-16:00"),
            RawTag::new("amenity", "pub"),
        ])]);
        assert!(report.is_restriction_key("oneway"));
        assert!(report.is_restriction_key("motor_vehicle"));
        assert!(report.is_restriction_key("hgv:conditional"));
        assert!(report.is_restriction_key("opening_hours"));
        assert!(!report.is_restriction_key("amenity"));
    }

    #[test]
    fn flags_postal_codes_outside_the_expected_band() {
        let report = audit(&[node(vec![
            RawTag::new("addr:postcode", "10001"),
            RawTag::new("addr:postcode", "90210"),
            RawTag::new("addr:zip", "1000"),
            RawTag::new("addr:zip", "ABCDE"),
        ])]);
        assert!(!report.suspect_postal_codes.contains("10001"));
        assert!(report.suspect_postal_codes.contains("90210"));
        assert!(report.suspect_postal_codes.contains("1000"));
        assert!(report.suspect_postal_codes.contains("ABCDE"));
    }

    #[test]
    fn street_tokens_keep_empty_fragments() {
        let report = audit(&[node(vec![RawTag::new("addr:street", "Main  st")])]);
        assert_eq!(report.street_tokens["MAIN"], 1);
        assert_eq!(report.street_tokens["ST"], 1);
        assert_eq!(report.street_tokens[""], 1);
    }

    #[test]
    fn auditing_the_same_stream_twice_is_deterministic() {
        let elements = vec![
            node(vec![RawTag::new("addr:street", "W 42nd St")]),
            node(vec![RawTag::new("oneway", "yes")]),
        ];
        assert_eq!(audit(&elements), audit(&elements));
    }
}
