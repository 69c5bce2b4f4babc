//! Test-suite evaluator
//!
//! Fans a batch of test cases out over the single-run evaluator and fans
//! the results back in by position. How many executions reach the service
//! at once is capped by the evaluator, so suites and single runs share one
//! budget.

use std::sync::Arc;

use futures::future::join_all;
use tokio::time::Instant;

use crate::config::SuiteConfig;
use crate::error::UnsupportedLanguageError;
use crate::models::{SuiteVerdict, TestCase};

use super::evaluator::Evaluator;
use super::registry::resolve_language;

/// Evaluates ordered batches of test cases
#[derive(Clone)]
pub struct SuiteEvaluator {
    evaluator: Arc<Evaluator>,
    config: SuiteConfig,
}

impl SuiteEvaluator {
    pub fn new(evaluator: Arc<Evaluator>, config: SuiteConfig) -> Self {
        Self { evaluator, config }
    }

    /// Single-run evaluator backing this suite evaluator
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Run every test case and aggregate the verdict.
    ///
    /// `cases[i]` of the verdict always belongs to `test_cases[i]`. A case
    /// that fails to execute is recorded as failed; the rest still run.
    pub async fn run_suite(
        &self,
        code: &str,
        language: &str,
        test_cases: Vec<TestCase>,
    ) -> Result<SuiteVerdict, UnsupportedLanguageError> {
        let language = resolve_language(language)?;
        let deadline = self.config.deadline.map(|d| Instant::now() + d);
        let total = test_cases.len();

        tracing::info!(language = %language, total, "Running test suite");

        let runs = test_cases.into_iter().enumerate().map(|(index, test_case)| {
            self.evaluator
                .check_until(code, language, index, test_case, deadline)
        });
        let verdict = SuiteVerdict::from_results(join_all(runs).await);

        tracing::info!(
            language = %language,
            passed = verdict.passed,
            total = verdict.total,
            status = %verdict.status,
            "Test suite finished"
        );

        Ok(verdict)
    }
}
