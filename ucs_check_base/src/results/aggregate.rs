//! Pattern matching over extracted tuples

use crate::extract::ElementTuple;
use crate::logging::codes;
use crate::{log_debug, log_success};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Match count of the expectation pattern on one serialized tuple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub serialized: String,
    pub match_count: usize,
}

impl MatchOutcome {
    pub fn evaluate(tuple: &ElementTuple, pattern: &Regex) -> Self {
        let serialized = tuple.serialized();
        let match_count = pattern.find_iter(&serialized).count();
        Self {
            serialized,
            match_count,
        }
    }

    pub fn is_faulty(&self) -> bool {
        self.match_count == 0
    }
}

/// Counts and display lines for one response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    /// Sum of the per tuple match counts
    pub matched_count: usize,
    pub total_count: usize,
    /// Tuples to list in the summary, in document order
    pub rendered_lines: Vec<String>,
}

/// Score every tuple against `pattern`.
///
/// A tuple matching more than once adds every match to `matched_count`, so
/// a loose pattern can make `matched_count` exceed `total_count`.
pub fn score(tuples: &[ElementTuple], pattern: &Regex, faults_only: bool) -> Scorecard {
    let mut card = Scorecard {
        total_count: tuples.len(),
        ..Scorecard::default()
    };

    for tuple in tuples {
        let outcome = MatchOutcome::evaluate(tuple, pattern);
        card.matched_count += outcome.match_count;
        log_debug!("Scored tuple",
            "tuple" => &outcome.serialized,
            "matches" => outcome.match_count,
            "matched_total" => card.matched_count
        );
        if !faults_only || outcome.is_faulty() {
            card.rendered_lines.push(outcome.serialized);
        }
    }

    log_success!(codes::success::SCORING_COMPLETE, "Scoring complete",
        "pattern" => pattern.as_str(),
        "matched" => card.matched_count,
        "total" => card.total_count
    );
    card
}
