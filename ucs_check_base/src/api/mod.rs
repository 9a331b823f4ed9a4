//! # Public API
//!
//! Error taxonomy and the probe runner.

pub mod errors;
pub mod probe;

pub use errors::{
    ArgumentError, AuthError, DocumentError, ParseError, ProbeError, QueryError, TransportError,
};
pub use probe::{run, run_with_transport, ProbePlan, ProbeReport};
