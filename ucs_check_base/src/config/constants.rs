//! Fixed protocol and plugin constants

/// Plugin version reported by `-V`
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum number of attributes in one selector
pub const MAX_ATTRIBUTES: usize = 10;

/// XML API path on the controller.
/// No trailing slash: `/nuova/` is answered with HTTP 403.
pub const API_PATH: &str = "/nuova";

/// Content type of every request body
pub const CONTENT_TYPE: &str = "text/xml";

/// Label opening every summary line
pub const SUMMARY_LABEL: &str = "Cisco UCS";

/// Separator between values of a serialized element tuple
pub const TUPLE_SEPARATOR: char = ',';

pub mod defaults {
    pub const QUERY_SUBJECT: &str = "storageLocalDisk";
    pub const ATTRIBUTES: &str = "id name";
    pub const EXPECT_PATTERN: &str = "Optimal";
}

/// Environment variables consulted for transport defaults
pub mod env {
    pub const MAX_TLS_VERSION: &str = "UCS_CHECK_MAX_TLS";
    pub const PROXY: &str = "UCS_CHECK_PROXY";
}
