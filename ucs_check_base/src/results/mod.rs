//! # Check Results
//!
//! Scoring of extracted tuples against the expectation pattern and the
//! resulting plugin status.
//!
//! ## Core Types
//! - [`Scorecard`] - matched and total counts plus the lines to display
//! - [`StatusResult`] - final prefix, exit code and counts
//!
//! ## Usage
//! ```rust
//! use regex::Regex;
//! use ucs_check_base::extract::ElementTuple;
//! use ucs_check_base::results::{derive_status, format_summary, score, StatusPrefix};
//!
//! let tuples = vec![ElementTuple { values: vec!["1".into(), "Optimal".into()] }];
//! let card = score(&tuples, &Regex::new("Optimal").unwrap(), false);
//! let status = derive_status(card, false);
//! assert_eq!(status.prefix, StatusPrefix::Ok);
//! assert_eq!(
//!     format_summary(&status, "storageVirtualDrive", "id,driveState"),
//!     "OK - Cisco UCS storageVirtualDrive (id,driveState)\n1,Optimal (1 of 1 ok)"
//! );
//! ```

pub mod aggregate;
pub mod status;

pub use aggregate::{score, MatchOutcome, Scorecard};
pub use status::{derive_status, format_failure, format_summary, StatusPrefix, StatusResult};
