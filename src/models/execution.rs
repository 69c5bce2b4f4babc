//! Execution request and outcome models

use serde::{Deserialize, Serialize};

use crate::execution::registry::Language;
use crate::execution::status::{map_status, CoarseStatus, ExecutionStatus, Verdict};

/// Resource limits forwarded to the execution service.
///
/// Every field is optional; the service applies its own default for any
/// limit left unset. Times are seconds, sizes are kilobytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub cpu_time_limit: Option<f64>,
    pub cpu_extra_time: Option<f64>,
    pub wall_time_limit: Option<f64>,
    pub memory_limit: Option<u64>,
    pub stack_limit: Option<u64>,
    pub max_processes_and_or_threads: Option<u32>,
    pub max_file_size: Option<u64>,
}

impl ResourceLimits {
    /// Fill unset limits from `defaults`
    pub fn or(self, defaults: &ResourceLimits) -> ResourceLimits {
        ResourceLimits {
            cpu_time_limit: self.cpu_time_limit.or(defaults.cpu_time_limit),
            cpu_extra_time: self.cpu_extra_time.or(defaults.cpu_extra_time),
            wall_time_limit: self.wall_time_limit.or(defaults.wall_time_limit),
            memory_limit: self.memory_limit.or(defaults.memory_limit),
            stack_limit: self.stack_limit.or(defaults.stack_limit),
            max_processes_and_or_threads: self
                .max_processes_and_or_threads
                .or(defaults.max_processes_and_or_threads),
            max_file_size: self.max_file_size.or(defaults.max_file_size),
        }
    }
}

/// One execution to run, built fresh per call
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRequest {
    pub source_code: String,
    pub language: Language,
    pub stdin: Option<String>,
    pub expected_output: Option<String>,
    pub limits: ResourceLimits,
}

impl ExecutionRequest {
    /// Create a request with no input, no expectation and service-default limits
    pub fn new(source_code: impl Into<String>, language: Language) -> Self {
        Self {
            source_code: source_code.into(),
            language,
            stdin: None,
            expected_output: None,
            limits: ResourceLimits::default(),
        }
    }

    pub fn with_stdin(mut self, stdin: Option<String>) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn with_expected_output(mut self, expected_output: Option<String>) -> Self {
        self.expected_output = expected_output;
        self
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Opaque handle for one in-flight execution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingToken(String);

impl TrackingToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackingToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal or error state of one run.
///
/// Text fields are `None` when the service sent nothing, which is distinct
/// from `Some("")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Token of the execution, absent when dispatch itself failed
    pub token: Option<TrackingToken>,

    pub status: ExecutionStatus,

    /// Raw backend status id, absent for locally produced outcomes
    pub status_id: Option<i32>,

    pub description: String,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,

    /// Backend message (e.g. the signal that killed the program)
    pub message: Option<String>,

    /// Local failure that prevented a backend verdict
    pub error: Option<String>,

    /// Wall time in seconds
    pub time_secs: Option<f64>,

    /// Peak memory in KB
    pub memory_kb: Option<u64>,
}

impl ExecutionOutcome {
    /// Outcome standing in for a run that never produced a backend verdict
    pub fn failed(token: Option<TrackingToken>, error: impl Into<String>) -> Self {
        Self {
            token,
            status: ExecutionStatus::InternalError,
            status_id: None,
            description: "Internal Error".to_string(),
            stdout: None,
            stderr: None,
            compile_output: None,
            message: None,
            error: Some(error.into()),
            time_secs: None,
            memory_kb: None,
        }
    }

    /// Coarse status for persistence
    pub fn coarse_status(&self) -> CoarseStatus {
        match self.status_id {
            Some(id) => map_status(id),
            None => CoarseStatus::Error,
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.coarse_status().into()
    }

    pub fn is_accepted(&self) -> bool {
        self.verdict() == Verdict::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_fill_from_defaults() {
        let defaults = ResourceLimits {
            cpu_time_limit: Some(2.0),
            memory_limit: Some(128_000),
            ..ResourceLimits::default()
        };
        let limits = ResourceLimits {
            cpu_time_limit: Some(5.0),
            ..ResourceLimits::default()
        }
        .or(&defaults);

        assert_eq!(limits.cpu_time_limit, Some(5.0));
        assert_eq!(limits.memory_limit, Some(128_000));
        assert_eq!(limits.stack_limit, None);
    }

    #[test]
    fn test_failed_outcome_is_error() {
        let outcome = ExecutionOutcome::failed(None, "connection refused");
        assert_eq!(outcome.status, ExecutionStatus::InternalError);
        assert_eq!(outcome.coarse_status(), CoarseStatus::Error);
        assert_eq!(outcome.verdict(), Verdict::Failure);
        assert_eq!(outcome.error.as_deref(), Some("connection refused"));
        assert!(outcome.stdout.is_none());
    }

    #[test]
    fn test_request_builder() {
        let request = ExecutionRequest::new("print(1)", Language::Python)
            .with_stdin(Some("1".to_string()))
            .with_expected_output(Some("1".to_string()));
        assert_eq!(request.stdin.as_deref(), Some("1"));
        assert_eq!(request.expected_output.as_deref(), Some("1"));
        assert_eq!(request.limits, ResourceLimits::default());
    }
}
