//! Request documents for the XML API

use super::filter::PropertyFilter;
use super::normalize::normalize_self_closing;
use crate::api::errors::DocumentError;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};

/// Element tree of an outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireElement {
    pub name: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<WireElement>,
}

impl WireElement {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attribute(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    pub fn child(mut self, child: WireElement) -> Self {
        self.children.push(child);
        self
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), DocumentError> {
        let mut start = BytesStart::new(self.name);
        for (key, value) in &self.attributes {
            start.push_attribute((*key, value.as_str()));
        }
        writer
            .write_event(Event::Start(start))
            .map_err(DocumentError::new)?;
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name)))
            .map_err(DocumentError::new)?;
        Ok(())
    }

    /// Serialized request body with childless elements self-closed
    pub fn to_wire(&self) -> Result<String, DocumentError> {
        let mut writer = Writer::new(Vec::new());
        self.write_into(&mut writer)?;
        let expanded = String::from_utf8(writer.into_inner()).map_err(DocumentError::new)?;
        normalize_self_closing(&expanded)
    }
}

/// What a single check asks the controller for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryDescriptor {
    /// All instances of a managed-object class, optionally filtered
    Class {
        class_name: String,
        hierarchical: bool,
        filter: Option<PropertyFilter>,
    },
    /// A single object by distinguished name; filters do not apply
    Path { path: String, hierarchical: bool },
}

impl QueryDescriptor {
    /// Class name or path shown in the summary line
    pub fn subject(&self) -> &str {
        match self {
            QueryDescriptor::Class { class_name, .. } => class_name,
            QueryDescriptor::Path { path, .. } => path,
        }
    }

    pub fn filter(&self) -> Option<&PropertyFilter> {
        match self {
            QueryDescriptor::Class { filter, .. } => filter.as_ref(),
            QueryDescriptor::Path { .. } => None,
        }
    }

    /// Request document for this query under the given session cookie
    pub fn to_element(&self, cookie: &str) -> WireElement {
        match self {
            QueryDescriptor::Class {
                class_name,
                hierarchical,
                filter,
            } => build_class_query(cookie, class_name, *hierarchical, filter.as_ref()),
            QueryDescriptor::Path { path, hierarchical } => {
                build_path_query(cookie, path, *hierarchical)
            }
        }
    }

    pub fn to_wire(&self, cookie: &str) -> Result<String, DocumentError> {
        self.to_element(cookie).to_wire()
    }
}

fn hierarchical_flag(hierarchical: bool) -> &'static str {
    if hierarchical {
        "true"
    } else {
        "false"
    }
}

/// `configResolveClass`, with an `inFilter` envelope only when a filter is given
pub fn build_class_query(
    cookie: &str,
    class_name: &str,
    hierarchical: bool,
    filter: Option<&PropertyFilter>,
) -> WireElement {
    let query = WireElement::new("configResolveClass")
        .attribute("cookie", cookie)
        .attribute("inHierarchical", hierarchical_flag(hierarchical))
        .attribute("classId", class_name);

    match filter {
        Some(filter) => query.child(
            WireElement::new("inFilter").child(
                WireElement::new(filter.kind.element_name())
                    .attribute("class", filter.class.as_str())
                    .attribute("property", filter.property.as_str())
                    .attribute("value", filter.value.as_str()),
            ),
        ),
        None => query,
    }
}

/// `configResolveDn` for a single distinguished name
pub fn build_path_query(cookie: &str, path: &str, hierarchical: bool) -> WireElement {
    WireElement::new("configResolveDn")
        .attribute("cookie", cookie)
        .attribute("inHierarchical", hierarchical_flag(hierarchical))
        .attribute("dn", path)
}
