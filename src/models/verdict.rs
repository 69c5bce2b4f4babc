//! Suite verdict models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::suite_statuses;

use super::TestCaseResult;

/// Overall status of a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteStatus {
    Accepted,
    PartiallyFailed,
    Error,
}

impl SuiteStatus {
    /// Three-way rule: everything passed, some passed, nothing passed.
    ///
    /// An empty suite has no passing evidence and is an error.
    pub fn from_counts(passed: usize, total: usize) -> Self {
        if passed == 0 {
            SuiteStatus::Error
        } else if passed == total {
            SuiteStatus::Accepted
        } else {
            SuiteStatus::PartiallyFailed
        }
    }

    /// Database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SuiteStatus::Accepted => suite_statuses::ACCEPTED,
            SuiteStatus::PartiallyFailed => suite_statuses::PARTIALLY_FAILED,
            SuiteStatus::Error => suite_statuses::ERROR,
        }
    }
}

impl std::fmt::Display for SuiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate over an ordered batch of test cases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteVerdict {
    pub status: SuiteStatus,
    pub passed: usize,
    pub total: usize,

    /// Results in input order
    pub cases: Vec<TestCaseResult>,

    pub completed_at: DateTime<Utc>,
}

impl SuiteVerdict {
    /// Aggregate results that are already in input order
    pub fn from_results(cases: Vec<TestCaseResult>) -> Self {
        let total = cases.len();
        let passed = cases.iter().filter(|c| c.passed).count();

        Self {
            status: SuiteStatus::from_counts(passed, total),
            passed,
            total,
            cases,
            completed_at: Utc::now(),
        }
    }

    /// Percentage of passing cases (0-100)
    pub fn score(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }
}
