//! # UCS Check - Cisco UCS XML API inventory check
//!
//! Logs in to a UCS Manager or CIMC controller, resolves one class or
//! distinguished name, extracts attributes from every matching element and
//! scores them against an expectation pattern (Nagios plugin semantics).

pub mod logging;

pub mod api;
pub mod config;
pub mod extract;
pub mod query;
pub mod results;
pub mod session;

// Convenience re-exports
pub use api::*;
pub use config::{ProbeConfig, QueryMode, TlsCeiling, TransportConfig};

pub mod prelude {
    pub use crate::api::{
        run, run_with_transport, ArgumentError, AuthError, ProbeError, ProbePlan, ProbeReport,
        QueryError, TransportError,
    };

    pub use crate::config::{ProbeConfig, QueryMode, TlsCeiling, TransportConfig};
    pub use crate::extract::{extract, AttributeSelector, ElementTuple, Extraction};
    pub use crate::query::{FilterKind, PropertyFilter, QueryDescriptor};
    pub use crate::results::{derive_status, score, Scorecard, StatusPrefix, StatusResult};
    pub use crate::session::{HttpsTransport, Session, SessionClient, SessionState, Transport};
}
