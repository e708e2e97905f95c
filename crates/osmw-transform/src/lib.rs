//! Builds one [`OutputRecord`] per node or way element.
//!
//! The builder is a pipeline of pure stages over the accumulating record:
//! basic fields, position, node references, then tag folding. Tag folding
//! consults the first-pass [`AuditReport`] to decide which keys carry
//! restriction semantics; the report is read-only context here.

use tracing::trace;

use osmw_model::{AuditReport, Element, ElementKind, OutputRecord, TagValue};
use osmw_normalize::{
    ConditionalStyle, FULL_WEEK_RANGE, compile_conditional, keys, normalize_name,
    normalize_street_name, normalize_zip_code, vocab,
};

/// Build the output record for an element.
///
/// Returns `None` for relations (and any future element kinds that carry no
/// document shape); callers filter these out rather than inserting empty
/// records.
pub fn build_record(element: &Element, audit: &AuditReport) -> Option<OutputRecord> {
    match element.kind {
        ElementKind::Node | ElementKind::Way => {}
        ElementKind::Relation => return None,
    }
    let record = basic_fields(element);
    let record = with_position(element, record);
    let record = with_node_refs(element, record);
    Some(fold_tags(element, audit, record))
}

fn basic_fields(element: &Element) -> OutputRecord {
    let mut record = OutputRecord::new(element.kind.as_str());
    record.id = element.id.clone();
    record.visible = element.visible.clone();
    record.created = element.created.clone();
    record
}

/// Position is present iff both coordinates parse as floating point.
fn with_position(element: &Element, mut record: OutputRecord) -> OutputRecord {
    if let (Some(lat), Some(lon)) = (element.lat.as_deref(), element.lon.as_deref())
        && let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>())
    {
        record.pos = Some([lat, lon]);
    }
    record
}

fn with_node_refs(element: &Element, mut record: OutputRecord) -> OutputRecord {
    if !element.node_refs.is_empty() {
        record.node_refs = Some(element.node_refs.clone());
    }
    record
}

/// Fold every well-formed tag into its namespace buckets.
///
/// A single key may route into several buckets: a primary-feature key that
/// the audit also flagged as restriction-like lands in both.
fn fold_tags(element: &Element, audit: &AuditReport, mut record: OutputRecord) -> OutputRecord {
    for tag in &element.tags {
        let key = tag.key.as_str();
        // Literal apostrophes would break downstream quoting; substitute
        // before any other processing.
        let value = tag.value.replace('\'', "`");

        if !keys::is_well_formed(key) {
            trace!(key, "dropping malformed tag key");
            continue;
        }

        if vocab::is_primary_map_feature(key) {
            record.insert_into_bucket(
                "primary_map_feature",
                keys::local_key(key, ""),
                TagValue::Text(value.clone()),
            );
        }

        if audit.is_restriction_key(key) {
            record.insert_into_bucket(
                "restrictions_rules",
                keys::local_key(key, ""),
                restriction_value(key, &value),
            );
        }

        for route in keys::NAMESPACE_ROUTES {
            if !key.starts_with(route.prefix) {
                continue;
            }
            let normalized = match (route.bucket, key) {
                ("addr", "addr:street") => normalize_street_name(&value),
                ("addr", "addr:zip" | "addr:postcode") => normalize_zip_code(&value),
                _ => value.clone(),
            };
            record.insert_into_bucket(
                route.bucket,
                keys::local_key(key, route.prefix),
                TagValue::Text(normalized),
            );
        }

        if key == "name" {
            record.name = Some(normalize_name(&value));
        } else {
            for route in keys::NAME_ROUTES {
                if key.starts_with(route.prefix) {
                    record.insert_into_bucket(
                        route.bucket,
                        keys::local_key(key, route.prefix),
                        TagValue::Text(value.clone()),
                    );
                }
            }
        }
    }
    record
}

/// Normalize the value of a restriction-like key.
///
/// Plain `yes`/`no` pass through; the `24/7` shorthand becomes the
/// full-week range token; everything else goes through the conditional
/// compiler, with `opening_hours` using its own clause-splitting style.
fn restriction_value(key: &str, value: &str) -> TagValue {
    let value = if value.trim() == "24/7" {
        FULL_WEEK_RANGE
    } else {
        value
    };
    if value == "yes" || value == "no" {
        return TagValue::Text(value.to_string());
    }
    let style = if key == "opening_hours" {
        ConditionalStyle::OpeningHours
    } else {
        ConditionalStyle::Restriction
    };
    compile_conditional(value, style)
}
