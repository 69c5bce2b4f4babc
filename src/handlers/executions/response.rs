//! Execution response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    execution::{CoarseStatus, ExecutionStatus, Verdict},
    models::{ExecutionOutcome, SuiteStatus, SuiteVerdict, TestCaseResult},
};

/// Outcome of one execution
#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub token: Option<String>,
    pub status: ExecutionStatus,
    pub status_id: Option<i32>,
    pub description: String,
    pub verdict: Verdict,
    pub persistence_status: CoarseStatus,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub time_secs: Option<f64>,
    pub memory_kb: Option<u64>,
}

impl From<ExecutionOutcome> for OutcomeResponse {
    fn from(outcome: ExecutionOutcome) -> Self {
        Self {
            verdict: outcome.verdict(),
            persistence_status: outcome.coarse_status(),
            token: outcome.token.map(|t| t.to_string()),
            status: outcome.status,
            status_id: outcome.status_id,
            description: outcome.description,
            stdout: outcome.stdout,
            stderr: outcome.stderr,
            compile_output: outcome.compile_output,
            message: outcome.message,
            error: outcome.error,
            time_secs: outcome.time_secs,
            memory_kb: outcome.memory_kb,
        }
    }
}

/// Result for a single test case
#[derive(Debug, Serialize)]
pub struct TestCaseResponse {
    pub index: usize,
    pub input: Option<String>,
    pub expected_output: String,
    pub passed: bool,
    pub outcome: OutcomeResponse,
}

impl From<TestCaseResult> for TestCaseResponse {
    fn from(result: TestCaseResult) -> Self {
        Self {
            index: result.index,
            input: result.test_case.input,
            expected_output: result.test_case.expected_output,
            passed: result.passed,
            outcome: result.outcome.into(),
        }
    }
}

/// Aggregate suite verdict
#[derive(Debug, Serialize)]
pub struct SuiteResponse {
    pub status: SuiteStatus,
    pub passed: usize,
    pub total: usize,
    pub score: f64,
    pub cases: Vec<TestCaseResponse>,
    pub completed_at: DateTime<Utc>,
}

impl From<SuiteVerdict> for SuiteResponse {
    fn from(verdict: SuiteVerdict) -> Self {
        Self {
            score: verdict.score(),
            status: verdict.status,
            passed: verdict.passed,
            total: verdict.total,
            cases: verdict.cases.into_iter().map(Into::into).collect(),
            completed_at: verdict.completed_at,
        }
    }
}
