//! Backend status classification
//!
//! The execution service reports a fine-grained numeric status. This module
//! turns it into the classification the evaluators reason about and into the
//! coarse status handed to persistence. Both mappings are total.

use serde::{Deserialize, Serialize};

use crate::constants::{coarse_statuses, status_ids};

/// Classified status of one execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Queued,
    Processing,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    CompileError,
    RuntimeError,
    InternalError,
    Unknown,
}

impl ExecutionStatus {
    /// Classify a backend status id
    pub fn from_id(id: i32) -> Self {
        match id {
            status_ids::IN_QUEUE => Self::Queued,
            status_ids::PROCESSING => Self::Processing,
            status_ids::ACCEPTED => Self::Accepted,
            status_ids::WRONG_ANSWER => Self::WrongAnswer,
            status_ids::TIME_LIMIT_EXCEEDED => Self::TimeLimitExceeded,
            status_ids::COMPILATION_ERROR => Self::CompileError,
            status_ids::RUNTIME_ERROR_SIGSEGV..=status_ids::RUNTIME_ERROR_OTHER => {
                Self::RuntimeError
            }
            status_ids::INTERNAL_ERROR | status_ids::EXEC_FORMAT_ERROR => Self::InternalError,
            _ => Self::Unknown,
        }
    }

    /// Short code used in logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Queued => "IQ",
            Self::Processing => "PR",
            Self::Accepted => "AC",
            Self::WrongAnswer => "WA",
            Self::TimeLimitExceeded => "TLE",
            Self::CompileError => "CE",
            Self::RuntimeError => "RE",
            Self::InternalError => "IE",
            Self::Unknown => "UNK",
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Whether a backend status id ends the polling loop.
///
/// Ranks below Accepted are still queued or running; every other id,
/// including ids the service may add later, is final.
pub fn is_terminal(id: i32) -> bool {
    id >= status_ids::FIRST_TERMINAL
}

/// Coarse classification stored by the persistence collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoarseStatus {
    Pending,
    Success,
    Failure,
    Error,
}

impl CoarseStatus {
    /// Database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => coarse_statuses::PENDING,
            Self::Success => coarse_statuses::SUCCESS,
            Self::Failure => coarse_statuses::FAILURE,
            Self::Error => coarse_statuses::ERROR,
        }
    }
}

impl std::fmt::Display for CoarseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a backend status id to its coarse status.
///
/// Unrecognized ids fall into `Error`.
pub fn map_status(id: i32) -> CoarseStatus {
    match id {
        status_ids::IN_QUEUE | status_ids::PROCESSING => CoarseStatus::Pending,
        status_ids::ACCEPTED => CoarseStatus::Success,
        status_ids::WRONG_ANSWER => CoarseStatus::Failure,
        _ => CoarseStatus::Error,
    }
}

/// Pass/fail view of a finished execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Success,
    Failure,
}

impl From<CoarseStatus> for Verdict {
    fn from(status: CoarseStatus) -> Self {
        match status {
            CoarseStatus::Success => Verdict::Success,
            _ => Verdict::Failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status_is_total() {
        assert_eq!(map_status(1), CoarseStatus::Pending);
        assert_eq!(map_status(2), CoarseStatus::Pending);
        assert_eq!(map_status(3), CoarseStatus::Success);
        assert_eq!(map_status(4), CoarseStatus::Failure);
        for id in 5..=14 {
            assert_eq!(map_status(id), CoarseStatus::Error, "id {id}");
        }
        for id in [0, -1, 15, 999, i32::MAX] {
            assert_eq!(map_status(id), CoarseStatus::Error, "id {id}");
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(ExecutionStatus::from_id(1), ExecutionStatus::Queued);
        assert_eq!(ExecutionStatus::from_id(2), ExecutionStatus::Processing);
        assert_eq!(ExecutionStatus::from_id(3), ExecutionStatus::Accepted);
        assert_eq!(ExecutionStatus::from_id(4), ExecutionStatus::WrongAnswer);
        assert_eq!(ExecutionStatus::from_id(5), ExecutionStatus::TimeLimitExceeded);
        assert_eq!(ExecutionStatus::from_id(6), ExecutionStatus::CompileError);
        for id in 7..=12 {
            assert_eq!(ExecutionStatus::from_id(id), ExecutionStatus::RuntimeError);
        }
        assert_eq!(ExecutionStatus::from_id(13), ExecutionStatus::InternalError);
        assert_eq!(ExecutionStatus::from_id(14), ExecutionStatus::InternalError);
        assert_eq!(ExecutionStatus::from_id(999), ExecutionStatus::Unknown);
    }

    #[test]
    fn test_terminal_rank() {
        assert!(!is_terminal(1));
        assert!(!is_terminal(2));
        for id in 3..=14 {
            assert!(is_terminal(id));
        }
        assert!(is_terminal(999));
    }

    #[test]
    fn test_verdict_from_coarse() {
        assert_eq!(Verdict::from(CoarseStatus::Success), Verdict::Success);
        assert_eq!(Verdict::from(CoarseStatus::Failure), Verdict::Failure);
        assert_eq!(Verdict::from(CoarseStatus::Error), Verdict::Failure);
        assert_eq!(CoarseStatus::Error.to_string(), "error");
    }
}
