//! Execution request DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{ResourceLimits, TestCase},
    services::SubmissionKeys,
};

/// Free-form run ("Run" button)
#[derive(Debug, Deserialize, Validate)]
pub struct RunRequest {
    /// Programming language name
    #[validate(length(min = 1, max = 32))]
    pub language: String,

    /// Source code
    #[validate(length(min = 1, max = 1048576))] // 1MB max
    pub source_code: String,

    pub stdin: Option<String>,

    /// Overrides for the configured default limits
    pub limits: Option<ResourceLimits>,
}

/// Run against one input/expected-output pair
#[derive(Debug, Deserialize, Validate)]
pub struct CheckRequest {
    #[validate(length(min = 1, max = 32))]
    pub language: String,

    #[validate(length(min = 1, max = 1048576))]
    pub source_code: String,

    pub stdin: Option<String>,

    pub expected_output: String,
}

/// One test case in a suite request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseRequest {
    pub input: Option<String>,
    pub expected_output: String,
}

/// Grade a submission against its test cases
#[derive(Debug, Deserialize, Validate)]
pub struct SuiteRequest {
    #[validate(length(min = 1, max = 32))]
    pub language: String,

    #[validate(length(min = 1, max = 1048576))]
    pub source_code: String,

    /// Ordered test cases; results come back in the same order
    #[validate(length(min = 1, max = 100))]
    pub test_cases: Vec<TestCaseRequest>,

    pub student_id: Option<Uuid>,
    pub problem_id: Option<Uuid>,
    pub assessment_id: Option<Uuid>,
}

impl SuiteRequest {
    /// Identifying keys, which must be given all together or not at all
    pub fn keys(&self) -> AppResult<Option<SubmissionKeys>> {
        match (self.student_id, self.problem_id, self.assessment_id) {
            (Some(student_id), Some(problem_id), Some(assessment_id)) => Ok(Some(SubmissionKeys {
                student_id,
                problem_id,
                assessment_id,
            })),
            (None, None, None) => Ok(None),
            _ => Err(AppError::Validation(
                "student_id, problem_id and assessment_id must be given together".to_string(),
            )),
        }
    }

    /// Test cases in domain form, order preserved
    pub fn test_cases(&self) -> Vec<TestCase> {
        self.test_cases
            .iter()
            .map(|tc| TestCase::new(tc.input.clone(), tc.expected_output.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite_request(json: serde_json::Value) -> SuiteRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_keys_all_or_nothing() {
        let id = Uuid::new_v4();
        let anonymous = suite_request(serde_json::json!({
            "language": "C",
            "source_code": "int main(){}",
            "test_cases": [{"input": "1", "expected_output": "1"}]
        }));
        assert!(anonymous.keys().unwrap().is_none());

        let partial = suite_request(serde_json::json!({
            "language": "C",
            "source_code": "int main(){}",
            "test_cases": [{"expected_output": "1"}],
            "student_id": id
        }));
        assert!(partial.keys().is_err());

        let full = suite_request(serde_json::json!({
            "language": "C",
            "source_code": "int main(){}",
            "test_cases": [{"expected_output": "1"}],
            "student_id": id,
            "problem_id": id,
            "assessment_id": id
        }));
        assert_eq!(full.keys().unwrap().unwrap().problem_id, id);
    }

    #[test]
    fn test_validation_limits() {
        let empty = suite_request(serde_json::json!({
            "language": "C",
            "source_code": "int main(){}",
            "test_cases": []
        }));
        assert!(empty.validate().is_err());

        let run: RunRequest = serde_json::from_value(serde_json::json!({
            "language": "",
            "source_code": "x"
        }))
        .unwrap();
        assert!(run.validate().is_err());
    }
}
