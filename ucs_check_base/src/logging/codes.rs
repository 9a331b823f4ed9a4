//! Event codes and their classification
//!
//! Every coded log event carries one of these constants. The letter prefix
//! selects the category, the registry below carries the description shown in
//! detailed output.

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Code wrapper shared by error, warning and success events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Command line and configuration errors
pub mod arguments {
    use super::Code;

    pub const TOO_MANY_ATTRIBUTES: Code = Code::new("A001");
    pub const NO_ATTRIBUTES: Code = Code::new("A002");
    pub const MALFORMED_FILTER: Code = Code::new("A003");
    pub const FILTER_WITH_PATH_QUERY: Code = Code::new("A004");
    pub const INVALID_PATTERN: Code = Code::new("A005");
    pub const UNKNOWN_FILTER_KIND: Code = Code::new("A006");
    pub const MISSING_ELEMENT_NAME: Code = Code::new("A007");
    pub const INVALID_OPTION_VALUE: Code = Code::new("A008");
}

/// HTTPS transport error codes
pub mod transport {
    use super::Code;

    pub const CLIENT_BUILD_FAILURE: Code = Code::new("N001");
    pub const CONNECTION_REFUSED: Code = Code::new("N002");
    pub const CONNECTION_RESET: Code = Code::new("N003");
    pub const CONNECTION_CLOSED: Code = Code::new("N004");
    pub const HANDSHAKE_FAILURE: Code = Code::new("N005");
    pub const REQUEST_FAILED: Code = Code::new("N006");
}

/// Session protocol error codes
pub mod session {
    use super::Code;

    pub const LOGIN_REJECTED: Code = Code::new("S001");
    pub const LOGIN_RESPONSE_INVALID: Code = Code::new("S002");
    pub const QUERY_FAILED: Code = Code::new("S003");
    pub const LOGOUT_FAILED: Code = Code::new("S004");
}

/// Response extraction codes
pub mod extraction {
    use super::Code;

    pub const DOCUMENT_TRUNCATED: Code = Code::new("X001");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const LOGIN_SUCCEEDED: Code = Code::new("I010");
    pub const QUERY_COMPLETED: Code = Code::new("I011");
    pub const LOGOUT_COMPLETED: Code = Code::new("I012");
    pub const EXTRACTION_COMPLETE: Code = Code::new("I020");
    pub const SCORING_COMPLETE: Code = Code::new("I030");
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Category name derived from the code prefix
pub fn get_category(code: &str) -> &'static str {
    match code.chars().next() {
        Some('E') => "System",
        Some('A') => "Arguments",
        Some('N') => "Transport",
        Some('S') => "Session",
        Some('X') => "Extraction",
        Some('I') => "Success",
        Some('W') => "Warning",
        Some('D') => "Debug",
        _ => "Unknown",
    }
}

/// Human readable description for a code
pub fn get_description(code: &str) -> &'static str {
    match code {
        "ERR002" => "Logging or runtime initialization failed",
        "A001" => "More attributes requested than the check supports",
        "A002" => "No attributes requested",
        "A003" => "Property filter does not have the form <type>:<property>:<value>",
        "A004" => "Property filters only apply to class queries",
        "A005" => "Expect pattern is not a valid regular expression",
        "A006" => "Unknown property filter type, query sent without filter",
        "A007" => "No element name given for a dn query",
        "A008" => "Option value outside the accepted set",
        "N001" => "HTTPS client could not be configured",
        "N002" => "Connection refused by the target system",
        "N003" => "Connection reset by the target system",
        "N004" => "Target system closed the connection without a response",
        "N005" => "TLS handshake with the target system failed",
        "N006" => "HTTPS request failed",
        "S001" => "aaaLogin rejected by the target system",
        "S002" => "aaaLogin response could not be parsed",
        "S003" => "Inventory query failed",
        "S004" => "aaaLogout failed",
        "X001" => "Response document ended early, partial results used",
        _ => "Unknown code",
    }
}

/// Errors in these categories end the check with UNKNOWN
pub fn is_fatal(code: &str) -> bool {
    matches!(get_category(code), "System" | "Arguments" | "Transport")
        || matches!(code, "S001" | "S002" | "S003")
}
