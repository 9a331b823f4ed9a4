//! Property filters for class queries
//!
//! A class query carries at most one filter. "No filter" is `None` at the call
//! site; there is no empty filter value.

use crate::api::errors::ArgumentError;
use crate::logging::codes;
use crate::log_warning;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison applied by a property filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Wildcard,
    AnyBits,
    AllBits,
}

impl FilterKind {
    pub const ALL: [FilterKind; 9] = [
        FilterKind::Equal,
        FilterKind::NotEqual,
        FilterKind::GreaterThan,
        FilterKind::GreaterOrEqual,
        FilterKind::LessThan,
        FilterKind::LessOrEqual,
        FilterKind::Wildcard,
        FilterKind::AnyBits,
        FilterKind::AllBits,
    ];

    /// Keyword used on the command line
    pub fn keyword(&self) -> &'static str {
        match self {
            FilterKind::Equal => "eq",
            FilterKind::NotEqual => "ne",
            FilterKind::GreaterThan => "gt",
            FilterKind::GreaterOrEqual => "ge",
            FilterKind::LessThan => "lt",
            FilterKind::LessOrEqual => "le",
            FilterKind::Wildcard => "wcard",
            FilterKind::AnyBits => "anybit",
            FilterKind::AllBits => "allbits",
        }
    }

    /// Element name inside `inFilter`; identical to the keyword
    pub fn element_name(&self) -> &'static str {
        self.keyword()
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One property comparison: `<kind class=".." property=".." value=".."/>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub kind: FilterKind,
    /// Class the property belongs to; the queried class
    pub class: String,
    pub property: String,
    pub value: String,
}

impl PropertyFilter {
    pub fn new(
        kind: FilterKind,
        class: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            class: class.into(),
            property: property.into(),
            value: value.into(),
        }
    }

    /// Parse `<kind>:<property>:<value>` for the given class.
    ///
    /// The value is everything after the second colon. An unknown kind yields
    /// `Ok(None)` and a warning whatever follows it; the query then runs
    /// without a filter. A known kind needs all three fields.
    pub fn parse(text: &str, class: &str) -> Result<Option<Self>, ArgumentError> {
        let mut fields = text.splitn(3, ':');
        let keyword = fields.next().unwrap_or_default();

        let Some(kind) = FilterKind::from_keyword(keyword) else {
            log_warning!(code = codes::arguments::UNKNOWN_FILTER_KIND,
                "Unknown filter type, querying without filter",
                "type" => keyword,
                "filter" => text
            );
            return Ok(None);
        };

        match (fields.next(), fields.next()) {
            (Some(property), Some(value)) => Ok(Some(Self::new(kind, class, property, value))),
            _ => Err(ArgumentError::MalformedFilter {
                filter: text.to_string(),
            }),
        }
    }
}
