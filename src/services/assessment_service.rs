//! Assessment service
//!
//! Grades a submission against its test cases and hands the verdict to
//! the persistence collaborator.

use std::sync::Arc;

use crate::{
    error::AppResult,
    execution::SuiteEvaluator,
    models::{SuiteVerdict, TestCase},
};

use super::verdict_store::{SubmissionKeys, VerdictStore};

/// Assessment service for grading submissions
#[derive(Clone)]
pub struct AssessmentService {
    suites: SuiteEvaluator,
    store: Arc<dyn VerdictStore>,
}

impl AssessmentService {
    pub fn new(suites: SuiteEvaluator, store: Arc<dyn VerdictStore>) -> Self {
        Self { suites, store }
    }

    /// Run the suite; record the verdict when the submission is identified
    pub async fn grade(
        &self,
        source_code: &str,
        language: &str,
        test_cases: Vec<TestCase>,
        keys: Option<SubmissionKeys>,
    ) -> AppResult<SuiteVerdict> {
        let verdict = self
            .suites
            .run_suite(source_code, language, test_cases)
            .await?;

        match keys {
            Some(keys) => self.store.record_suite(&keys, &verdict).await?,
            None => tracing::debug!("Anonymous suite run, verdict not recorded"),
        }

        Ok(verdict)
    }
}
