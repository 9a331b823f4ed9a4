//! # Probe runner
//!
//! Validates the configuration, then runs login, query, logout, extraction
//! and scoring in that order. Any failure becomes an UNKNOWN report.

use super::errors::{ArgumentError, AuthError, ProbeError};
use crate::config::runtime::{ProbeConfig, QueryMode};
use crate::extract::{extract, AttributeSelector};
use crate::logging::codes;
use crate::query::{PropertyFilter, QueryDescriptor};
use crate::results::{
    derive_status, format_failure, format_summary, score, StatusPrefix, StatusResult,
};
use crate::session::{SessionClient, Transport};
use crate::{log_debug, log_error, log_info, log_warning};
use regex::Regex;
use serde::Serialize;

/// Validated form of a [`ProbeConfig`]
#[derive(Debug, Clone)]
pub struct ProbePlan {
    pub descriptor: QueryDescriptor,
    /// Element name whose attributes are extracted
    pub target: String,
    pub selector: AttributeSelector,
    pub pattern: Regex,
    pub zero_instances_ok: bool,
    pub faults_only: bool,
}

impl ProbePlan {
    /// Check every option that can be checked without the network
    pub fn from_config(config: &ProbeConfig) -> Result<Self, ArgumentError> {
        let selector = AttributeSelector::parse(&config.attributes)?;
        log_debug!("Attributes", "names" => selector.description());

        let pattern = Regex::new(&config.expect).map_err(|e| ArgumentError::InvalidPattern {
            pattern: config.expect.clone(),
            reason: e.to_string(),
        })?;

        let (descriptor, target) = match config.mode {
            QueryMode::Class => {
                let filter = match &config.filter {
                    Some(filter) => PropertyFilter::parse(filter, &config.subject)?,
                    None => None,
                };
                let descriptor = QueryDescriptor::Class {
                    class_name: config.subject.clone(),
                    hierarchical: config.hierarchical,
                    filter,
                };
                (descriptor, config.subject.clone())
            }
            QueryMode::Dn => {
                if config.filter.is_some() {
                    return Err(ArgumentError::FilterRequiresClassQuery);
                }
                let target = config.element.clone().unwrap_or_default();
                if target.is_empty() {
                    log_warning!(code = codes::arguments::MISSING_ELEMENT_NAME,
                        "No element name for dn query, no element will match",
                        "dn" => &config.subject
                    );
                }
                let descriptor = QueryDescriptor::Path {
                    path: config.subject.clone(),
                    hierarchical: config.hierarchical,
                };
                (descriptor, target)
            }
        };

        log_info!("Query type",
            "mode" => config.mode,
            "subject" => &config.subject,
            "hierarchical" => config.hierarchical,
            "expect" => &config.expect
        );

        Ok(Self {
            descriptor,
            target,
            selector,
            pattern,
            zero_instances_ok: config.zero_instances_ok,
            faults_only: config.faults_only,
        })
    }

    /// Summary header text after the label
    pub fn subject(&self) -> &str {
        self.descriptor.subject()
    }
}

/// Outcome of one check, ready to print
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub status: StatusPrefix,
    pub exit_code: i32,
    /// Full plugin output, possibly several lines
    pub summary: String,
    /// Present when the check reached a verdict
    pub result: Option<StatusResult>,
}

impl ProbeReport {
    fn verdict(result: StatusResult, plan: &ProbePlan) -> Self {
        Self {
            status: result.prefix,
            exit_code: result.exit_code,
            summary: format_summary(&result, plan.subject(), &plan.selector.description()),
            result: Some(result),
        }
    }

    fn failure(error: &ProbeError) -> Self {
        log_error!(error.code(), "Check failed", "error" => error);
        Self {
            status: StatusPrefix::Unknown,
            exit_code: error.exit_code(),
            summary: format_failure(&error.user_message()),
            result: None,
        }
    }
}

/// Run a check against the configured controller over HTTPS
pub fn run(config: &ProbeConfig) -> ProbeReport {
    let outcome = ProbePlan::from_config(config)
        .map_err(ProbeError::from)
        .and_then(|plan| {
            let mut client = SessionClient::connect(config)?;
            execute(&plan, &mut client, config).map(|result| (plan, result))
        });
    report(outcome)
}

/// Run a check over a caller supplied transport
pub fn run_with_transport<T: Transport>(config: &ProbeConfig, transport: T) -> ProbeReport {
    let outcome = ProbePlan::from_config(config)
        .map_err(ProbeError::from)
        .and_then(|plan| {
            let mut client = SessionClient::new(transport);
            execute(&plan, &mut client, config).map(|result| (plan, result))
        });
    report(outcome)
}

fn report(outcome: Result<(ProbePlan, StatusResult), ProbeError>) -> ProbeReport {
    match outcome {
        Ok((plan, result)) => {
            if let Ok(json) = serde_json::to_string(&result) {
                log_debug!("Status", "result" => json);
            }
            ProbeReport::verdict(result, &plan)
        }
        Err(error) => ProbeReport::failure(&error),
    }
}

fn execute<T: Transport>(
    plan: &ProbePlan,
    client: &mut SessionClient<T>,
    config: &ProbeConfig,
) -> Result<StatusResult, ProbeError> {
    let mut session = client
        .login(&config.username, &config.password)
        .map_err(|e| {
            if let AuthError::Transport(transport) = &e {
                if transport.suggests_tls_change() {
                    log_info!("Controller may require a different TLS version",
                        "max_tls" => config.transport.max_tls
                    );
                }
            }
            e
        })?;

    let body = session.query(&plan.descriptor);
    session.close();
    let body = body?;

    let extraction = extract(&body, &plan.target, &plan.selector);
    let card = score(&extraction.tuples, &plan.pattern, plan.faults_only);
    Ok(derive_status(card, plan.zero_instances_ok))
}
