//! Streaming reader for OSM XML extracts.
//!
//! [`OsmReader`] walks the document in order and yields one [`Element`] per
//! top-level `node`/`way`/`relation`, with `tag` and `nd` children folded
//! in. Other element names (`bounds`, `member`, ...) are ignored. The
//! two-pass pipeline simply opens the file twice.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use osmw_model::{Element, ElementKind, RawTag};

/// Iterator over the top-level elements of an OSM XML document.
pub struct OsmReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// The element currently being assembled from Start..End events.
    current: Option<Element>,
}

impl OsmReader<BufReader<File>> {
    /// Open an extract on disk for streaming traversal.
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("open osm file: {}", path.display()))?;
        debug!(path = %path.display(), "opened osm extract");
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> OsmReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            buf: Vec::new(),
            current: None,
        }
    }

    fn next_element(&mut self) -> Result<Option<Element>> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Eof => return Ok(None),
                Event::Start(event) => {
                    let name = event.name().as_ref().to_vec();
                    if let Some(kind) = kind_of(&name) {
                        self.current = Some(element_from_attributes(kind, &event)?);
                    } else {
                        Self::attach_child(&mut self.current, &name, &event)?;
                    }
                }
                Event::Empty(event) => {
                    let name = event.name().as_ref().to_vec();
                    if let Some(kind) = kind_of(&name) {
                        // Self-closing top-level element: complete as-is.
                        return Ok(Some(element_from_attributes(kind, &event)?));
                    }
                    Self::attach_child(&mut self.current, &name, &event)?;
                }
                Event::End(event) => {
                    if kind_of(event.name().as_ref()).is_some()
                        && let Some(element) = self.current.take()
                    {
                        return Ok(Some(element));
                    }
                }
                _ => {}
            }
        }
    }

    /// Fold a `tag` or `nd` child into the element being assembled.
    ///
    /// Takes the `current` field directly rather than `&mut self`: `event`
    /// borrows from the read buffer, so the two must stay disjoint.
    fn attach_child(
        current: &mut Option<Element>,
        name: &[u8],
        event: &BytesStart<'_>,
    ) -> Result<()> {
        let Some(element) = current.as_mut() else {
            return Ok(());
        };
        match name {
            b"tag" => {
                let key = attribute_value(event, b"k")?;
                let value = attribute_value(event, b"v")?;
                if let (Some(key), Some(value)) = (key, value) {
                    element.tags.push(RawTag::new(key, value));
                }
            }
            b"nd" => {
                if let Some(reference) = attribute_value(event, b"ref")? {
                    element.node_refs.push(reference);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for OsmReader<R> {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_element().transpose()
    }
}

fn kind_of(name: &[u8]) -> Option<ElementKind> {
    std::str::from_utf8(name)
        .ok()
        .and_then(ElementKind::from_tag_name)
}

fn element_from_attributes(kind: ElementKind, event: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(kind);
    for attribute in event.attributes() {
        let attribute = attribute.context("malformed attribute")?;
        let value = attribute
            .unescape_value()
            .context("unescape attribute value")?
            .into_owned();
        match attribute.key.as_ref() {
            b"id" => element.id = Some(value),
            b"visible" => element.visible = Some(value),
            b"lat" => element.lat = Some(value),
            b"lon" => element.lon = Some(value),
            b"version" => element.created.version = Some(value),
            b"changeset" => element.created.changeset = Some(value),
            b"timestamp" => element.created.timestamp = Some(value),
            b"user" => element.created.user = Some(value),
            b"uid" => element.created.uid = Some(value),
            _ => {}
        }
    }
    Ok(element)
}

fn attribute_value(event: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attribute in event.attributes() {
        let attribute = attribute.context("malformed attribute")?;
        if attribute.key.as_ref() == key {
            let value = attribute
                .unescape_value()
                .context("unescape attribute value")?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="test">
  <bounds minlat="40.0" minlon="-74.0" maxlat="41.0" maxlon="-73.0"/>
  <node id="1" lat="40.7" lon="-73.9" visible="true" version="2"
        changeset="9" timestamp="2012-01-01T00:00:00Z" user="mapper" uid="7">
    <tag k="amenity" v="pub"/>
    <tag k="name" v="The Angel's Share"/>
  </node>
  <node id="2" lat="40.8" lon="-73.8"/>
  <way id="10" visible="true">
    <nd ref="1"/>
    <nd ref="2"/>
    <tag k="highway" v="residential"/>
  </way>
  <relation id="20">
    <tag k="type" v="route"/>
  </relation>
</osm>
"#;

    fn read_all(xml: &str) -> Vec<Element> {
        OsmReader::from_reader(xml.as_bytes())
            .collect::<Result<Vec<_>>>()
            .expect("parse sample")
    }

    #[test]
    fn reads_elements_in_document_order() {
        let elements = read_all(SAMPLE);
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0].kind, ElementKind::Node);
        assert_eq!(elements[1].kind, ElementKind::Node);
        assert_eq!(elements[2].kind, ElementKind::Way);
        assert_eq!(elements[3].kind, ElementKind::Relation);
    }

    #[test]
    fn node_attributes_and_tags_are_captured() {
        let elements = read_all(SAMPLE);
        let node = &elements[0];
        assert_eq!(node.id.as_deref(), Some("1"));
        assert_eq!(node.visible.as_deref(), Some("true"));
        assert_eq!(node.lat.as_deref(), Some("40.7"));
        assert_eq!(node.lon.as_deref(), Some("-73.9"));
        assert_eq!(node.created.user.as_deref(), Some("mapper"));
        assert_eq!(node.created.uid.as_deref(), Some("7"));
        assert_eq!(node.tag("amenity"), Some("pub"));
        assert_eq!(node.tag("name"), Some("The Angel's Share"));
    }

    #[test]
    fn self_closing_node_is_complete() {
        let elements = read_all(SAMPLE);
        let node = &elements[1];
        assert_eq!(node.id.as_deref(), Some("2"));
        assert!(node.tags.is_empty());
        assert!(node.created.version.is_none());
    }

    #[test]
    fn way_collects_node_refs_in_order() {
        let elements = read_all(SAMPLE);
        let way = &elements[2];
        assert_eq!(way.node_refs, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(way.tag("highway"), Some("residential"));
    }

    #[test]
    fn stray_children_outside_any_element_are_ignored() {
        let xml = r#"<osm>
  <tag k="orphan" v="1"/>
  <nd ref="99"/>
  <node id="1" lat="40.7" lon="-73.9">
    <tag k="amenity" v="cafe"/>
  </node>
</osm>"#;
        let elements = read_all(xml);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].tags.len(), 1);
        assert_eq!(elements[0].tag("amenity"), Some("cafe"));
        assert!(elements[0].node_refs.is_empty());
    }

    #[test]
    fn opens_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sample.osm");
        std::fs::write(&path, SAMPLE).expect("write sample");
        let elements = OsmReader::open(&path)
            .expect("open")
            .collect::<Result<Vec<_>>>()
            .expect("parse");
        assert_eq!(elements.len(), 4);
    }

    #[test]
    fn truncated_document_surfaces_an_error() {
        let xml = r#"<osm><node id="1"><tag k="a" v="b"/></osm>"#;
        let result: Result<Vec<_>> = OsmReader::from_reader(xml.as_bytes()).collect();
        assert!(result.is_err());
    }
}
