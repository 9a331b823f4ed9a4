//! Plugin status and summary line

use super::aggregate::Scorecard;
use crate::config::constants::SUMMARY_LABEL;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nagios status prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusPrefix {
    Ok,
    Crit,
    Unknown,
}

impl StatusPrefix {
    pub fn exit_code(&self) -> i32 {
        match self {
            StatusPrefix::Ok => 0,
            StatusPrefix::Crit => 2,
            StatusPrefix::Unknown => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusPrefix::Ok => "OK",
            StatusPrefix::Crit => "CRIT",
            StatusPrefix::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for StatusPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of a completed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResult {
    pub prefix: StatusPrefix,
    pub exit_code: i32,
    pub matched_count: usize,
    pub total_count: usize,
    pub rendered_lines: Vec<String>,
}

/// OK when every element matched, or when nothing came back and
/// `allow_zero` is set. Anything else is CRIT.
pub fn derive_status(card: Scorecard, allow_zero: bool) -> StatusResult {
    let Scorecard {
        matched_count,
        total_count,
        rendered_lines,
    } = card;

    let ok = (allow_zero && matched_count == 0 && total_count == 0)
        || (total_count > 0 && matched_count == total_count);
    let prefix = if ok {
        StatusPrefix::Ok
    } else {
        StatusPrefix::Crit
    };

    StatusResult {
        prefix,
        exit_code: prefix.exit_code(),
        matched_count,
        total_count,
        rendered_lines,
    }
}

/// `<PREFIX> - Cisco UCS <subject> (<attributes>)<lines> (<m> of <n> ok)`
pub fn format_summary(result: &StatusResult, subject: &str, attributes: &str) -> String {
    let mut summary = format!(
        "{} - {} {} ({})",
        result.prefix, SUMMARY_LABEL, subject, attributes
    );
    for line in &result.rendered_lines {
        summary.push('\n');
        summary.push_str(line);
    }
    summary.push_str(&format!(
        " ({} of {} ok)",
        result.matched_count, result.total_count
    ));
    summary
}

/// Single line reported when no verdict could be reached
pub fn format_failure(message: &str) -> String {
    format!("{} - {}", StatusPrefix::Unknown, message)
}
