//! Test case models

use serde::{Deserialize, Serialize};

use super::ExecutionOutcome;

/// Input/expected-output pair supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Option<String>,
    pub expected_output: String,
}

impl TestCase {
    pub fn new(input: Option<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input,
            expected_output: expected_output.into(),
        }
    }
}

/// One evaluated test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResult {
    /// Position of the case in the submitted sequence (0-indexed)
    pub index: usize,
    pub test_case: TestCase,
    pub outcome: ExecutionOutcome,
    pub passed: bool,
}
