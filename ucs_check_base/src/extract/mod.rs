//! # Attribute extraction
//!
//! Single forward pass over a response document. Every start tag (or
//! self-closing tag) whose local name equals the target yields one
//! [`ElementTuple`] holding the selected attribute values in selector order.
//! Broken markup ends the pass; tuples completed before that point are kept.

use crate::api::errors::ArgumentError;
use crate::config::constants::{MAX_ATTRIBUTES, TUPLE_SEPARATOR};
use crate::logging::codes;
use crate::{log_debug, log_success, log_warning};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

/// Ordered attribute names; order is significant and duplicates are allowed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSelector {
    names: Vec<String>,
}

impl AttributeSelector {
    /// Parse a whitespace separated attribute list (1 to 10 names)
    pub fn parse(list: &str) -> Result<Self, ArgumentError> {
        let names: Vec<String> = list.split_whitespace().map(str::to_string).collect();
        if names.is_empty() {
            return Err(ArgumentError::NoAttributes);
        }
        if names.len() > MAX_ATTRIBUTES {
            return Err(ArgumentError::TooManyAttributes {
                max: MAX_ATTRIBUTES,
                requested: names.len(),
            });
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Comma joined names for the summary line
    pub fn description(&self) -> String {
        self.names.join(",")
    }
}

/// Values of one matching element, aligned with the selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTuple {
    pub values: Vec<String>,
}

impl ElementTuple {
    /// Comma joined values with trailing separators removed
    pub fn serialized(&self) -> String {
        self.values
            .join(",")
            .trim_end_matches(TUPLE_SEPARATOR)
            .to_string()
    }
}

/// Lazy, non-restartable scan of one document
pub struct TupleScanner<'a> {
    reader: Reader<&'a [u8]>,
    target: &'a str,
    selector: &'a AttributeSelector,
    element_count: usize,
    truncated: bool,
    finished: bool,
}

impl<'a> TupleScanner<'a> {
    pub fn new(document: &'a str, target: &'a str, selector: &'a AttributeSelector) -> Self {
        let mut reader = Reader::from_str(document);
        reader.trim_text(true);
        Self {
            reader,
            target,
            selector,
            element_count: 0,
            truncated: false,
            finished: false,
        }
    }

    /// Matching start tags seen so far
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Whether the scan stopped on malformed markup
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    fn stop(&mut self, reason: &str) {
        self.finished = true;
        self.truncated = true;
        log_warning!(code = codes::extraction::DOCUMENT_TRUNCATED,
            "Response markup ended early, keeping elements read so far",
            "reason" => reason,
            "position" => self.reader.buffer_position()
        );
    }

    fn tuple_for(&self, element: &BytesStart) -> Result<ElementTuple, String> {
        let mut values = Vec::with_capacity(self.selector.len());
        for name in self.selector.names() {
            let mut value = String::new();
            for attribute in element.attributes() {
                let attribute = attribute.map_err(|e| e.to_string())?;
                if attribute.key.local_name().as_ref() == name.as_bytes() {
                    value = attribute
                        .unescape_value()
                        .map_err(|e| e.to_string())?
                        .into_owned();
                    break;
                }
            }
            values.push(value);
        }
        Ok(ElementTuple { values })
    }
}

impl Iterator for TupleScanner<'_> {
    type Item = ElementTuple;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    self.stop(&e.to_string());
                    return None;
                }
            };

            let element = match event {
                Event::Eof => {
                    self.finished = true;
                    return None;
                }
                Event::Start(element) | Event::Empty(element) => element,
                _ => continue,
            };

            if element.local_name().as_ref() != self.target.as_bytes() {
                continue;
            }

            self.element_count += 1;
            match self.tuple_for(&element) {
                Ok(tuple) => return Some(tuple),
                Err(reason) => {
                    self.stop(&reason);
                    return None;
                }
            }
        }
        None
    }
}

/// Result of scanning one response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub tuples: Vec<ElementTuple>,
    pub element_count: usize,
    pub truncated: bool,
}

/// Collect every tuple for `target` from `document`
pub fn extract(document: &str, target: &str, selector: &AttributeSelector) -> Extraction {
    let mut scanner = TupleScanner::new(document, target, selector);
    let tuples: Vec<ElementTuple> = scanner.by_ref().collect();

    for tuple in &tuples {
        log_debug!("Element", "values" => tuple.serialized());
    }
    log_success!(codes::success::EXTRACTION_COMPLETE, "Extraction complete",
        "element" => target,
        "elements" => scanner.element_count(),
        "tuples" => tuples.len()
    );

    Extraction {
        element_count: scanner.element_count(),
        truncated: scanner.truncated(),
        tuples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const DISKS: &str = r#"<configResolveClass cookie="c" response="yes" classId="storageLocalDisk">
<outConfigs>
<storageLocalDisk id="1" name="" pdStatus="Online" health="Good" dn="sys/rack-unit-1/board/storage-SAS-SLOT-HBA/pd-1"></storageLocalDisk>
<storageLocalDisk id="2" name="" pdStatus="Online" health="Good" dn="sys/rack-unit-1/board/storage-SAS-SLOT-HBA/pd-2"/>
</outConfigs>
</configResolveClass>"#;

    fn selector(list: &str) -> AttributeSelector {
        AttributeSelector::parse(list).unwrap()
    }

    #[test]
    fn test_selector_limits() {
        assert_matches!(AttributeSelector::parse("   "), Err(ArgumentError::NoAttributes));
        assert_matches!(
            AttributeSelector::parse("a b c d e f g h i j k"),
            Err(ArgumentError::TooManyAttributes {
                max: 10,
                requested: 11
            })
        );
        assert_eq!(AttributeSelector::parse("a b c d e f g h i j").unwrap().len(), 10);
        assert_eq!(selector("id  pdStatus\thealth").description(), "id,pdStatus,health");
    }

    #[test]
    fn test_start_and_self_closing_tags_both_match() {
        let extraction = extract(DISKS, "storageLocalDisk", &selector("id pdStatus health"));
        assert_eq!(extraction.element_count, 2);
        assert!(!extraction.truncated);
        let lines: Vec<String> = extraction.tuples.iter().map(|t| t.serialized()).collect();
        assert_eq!(lines, vec!["1,Online,Good", "2,Online,Good"]);
    }

    #[test]
    fn test_missing_attribute_keeps_position() {
        let extraction = extract(DISKS, "storageLocalDisk", &selector("id vendor health"));
        assert_eq!(extraction.tuples[0].values, vec!["1", "", "Good"]);
        assert_eq!(extraction.tuples[0].serialized(), "1,,Good");
    }

    #[test]
    fn test_trailing_empty_values_are_trimmed() {
        let extraction = extract(DISKS, "storageLocalDisk", &selector("id name"));
        assert_eq!(extraction.tuples[0].values, vec!["1", ""]);
        assert_eq!(extraction.tuples[0].serialized(), "1");
    }

    #[test]
    fn test_duplicate_selector_entries_are_each_filled() {
        let extraction = extract(DISKS, "storageLocalDisk", &selector("id id"));
        assert_eq!(extraction.tuples[1].serialized(), "2,2");
    }

    #[test]
    fn test_no_matching_element() {
        let extraction = extract(DISKS, "equipmentPsu", &selector("id"));
        assert!(extraction.tuples.is_empty());
        assert_eq!(extraction.element_count, 0);
    }

    #[test]
    fn test_empty_target_matches_nothing() {
        let extraction = extract(DISKS, "", &selector("id"));
        assert!(extraction.tuples.is_empty());
    }

    #[test]
    fn test_namespaced_element_matches_local_name() {
        let doc = r#"<r xmlns:u="urn:ucs"><u:equipmentPsu u:id="1" operability="operable"/></r>"#;
        let extraction = extract(doc, "equipmentPsu", &selector("id operability"));
        assert_eq!(extraction.tuples[0].serialized(), "1,operable");
    }

    #[test]
    fn test_escaped_values_are_unescaped() {
        let doc = r#"<r><storageVirtualDrive id="0" name="R&amp;D" raidLevel="RAID 10"/></r>"#;
        let extraction = extract(doc, "storageVirtualDrive", &selector("name raidLevel"));
        assert_eq!(extraction.tuples[0].serialized(), "R&D,RAID 10");
    }

    #[test]
    fn test_truncated_document_keeps_completed_tuples() {
        let doc = r#"<r><equipmentFan id="1" operability="operable"/><equipmentFan id="2" operability="operable"/><equipmentFan id="3" oper"#;
        let extraction = extract(doc, "equipmentFan", &selector("id operability"));
        assert_eq!(extraction.tuples.len(), 2);
        assert_eq!(extraction.element_count, 2);
    }

    #[test]
    fn test_mismatched_close_tag_stops_scan() {
        let doc = r#"<r><equipmentFan id="1"></equipmentPsu><equipmentFan id="2"/></r>"#;
        let extraction = extract(doc, "equipmentFan", &selector("id"));
        assert_eq!(extraction.tuples.len(), 1);
        assert!(extraction.truncated);
    }

    #[test]
    fn test_scanner_is_lazy() {
        let s = selector("id");
        let mut scanner = TupleScanner::new(DISKS, "storageLocalDisk", &s);
        assert_eq!(scanner.element_count(), 0);
        assert!(scanner.next().is_some());
        assert_eq!(scanner.element_count(), 1);
        assert!(scanner.next().is_some());
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }
}
