//! Query construction: property filters, request documents, normalization

pub mod builder;
pub mod filter;
pub mod normalize;

pub use builder::{build_class_query, build_path_query, QueryDescriptor, WireElement};
pub use filter::{FilterKind, PropertyFilter};
pub use normalize::normalize_self_closing;
