//! Single-run evaluator
//!
//! dispatch -> poll -> classify for one execution. Dispatch and polling
//! failures never escape: they become an internal-error outcome with the
//! failure message kept in `error`. Only an unknown language is reported to
//! the caller, before any network call.
//!
//! Every execution, single or part of a suite, holds one permit of the
//! evaluator's semaphore from dispatch until polling ends.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::{timeout_at, Instant};

use crate::config::{ComparisonMode, ExecutionServiceConfig, PollingConfig};
use crate::error::UnsupportedLanguageError;
use crate::models::{ExecutionOutcome, ExecutionRequest, TestCase, TestCaseResult};

use super::client::ExecutionBackend;
use super::dispatcher::Dispatcher;
use super::poller::Poller;
use super::registry::{resolve_language, Language};

/// Error recorded when a deadline cuts an execution short
pub const DEADLINE_EXCEEDED: &str = "Suite deadline exceeded";

/// Normalize program output for local comparison: CRLF becomes LF, trailing
/// whitespace on each line and trailing blank lines are ignored.
pub fn normalize_output(output: &str) -> String {
    output
        .replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Runs single executions against the execution service
#[derive(Clone)]
pub struct Evaluator {
    dispatcher: Dispatcher,
    poller: Poller,
    polling: PollingConfig,
    comparison: ComparisonMode,
    permits: Arc<Semaphore>,
}

impl Evaluator {
    pub fn new(
        backend: Arc<dyn ExecutionBackend>,
        service: &ExecutionServiceConfig,
        polling: PollingConfig,
        comparison: ComparisonMode,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(backend.clone(), service.default_limits.clone()),
            poller: Poller::new(backend),
            polling,
            comparison,
            permits: Arc::new(Semaphore::new(service.max_in_flight.max(1))),
        }
    }

    /// Free-form run with optional stdin and no expected output
    pub async fn run_once(
        &self,
        code: &str,
        language: &str,
        input: Option<&str>,
    ) -> Result<ExecutionOutcome, UnsupportedLanguageError> {
        let language = resolve_language(language)?;
        let request = ExecutionRequest::new(code, language).with_stdin(input.map(str::to_owned));
        Ok(self.execute(request).await)
    }

    /// Run against one input and check the output
    pub async fn run_with_check(
        &self,
        code: &str,
        language: &str,
        input: Option<&str>,
        expected_output: &str,
    ) -> Result<TestCaseResult, UnsupportedLanguageError> {
        let language = resolve_language(language)?;
        let test_case = TestCase::new(input.map(str::to_owned), expected_output);
        Ok(self.check(code, language, 0, test_case).await)
    }

    /// Evaluate one test case; `index` is its position in the caller's sequence
    pub async fn check(
        &self,
        code: &str,
        language: Language,
        index: usize,
        test_case: TestCase,
    ) -> TestCaseResult {
        self.check_until(code, language, index, test_case, None).await
    }

    /// [`check`](Self::check), giving up at `deadline` if one is set
    pub async fn check_until(
        &self,
        code: &str,
        language: Language,
        index: usize,
        test_case: TestCase,
        deadline: Option<Instant>,
    ) -> TestCaseResult {
        let forwarded_expectation = match self.comparison {
            ComparisonMode::Backend => Some(test_case.expected_output.clone()),
            ComparisonMode::Local => None,
        };
        let request = ExecutionRequest::new(code, language)
            .with_stdin(test_case.input.clone())
            .with_expected_output(forwarded_expectation);

        let outcome = self.execute_until(request, deadline).await;
        let passed = match self.comparison {
            ComparisonMode::Backend => outcome.is_accepted(),
            ComparisonMode::Local => {
                outcome.is_accepted()
                    && normalize_output(outcome.stdout.as_deref().unwrap_or_default())
                        == normalize_output(&test_case.expected_output)
            }
        };

        tracing::debug!(
            case = index,
            status = %outcome.status,
            passed,
            "Test case evaluated"
        );

        TestCaseResult {
            index,
            test_case,
            outcome,
            passed,
        }
    }

    /// Dispatch and poll one request, folding every failure into the outcome
    pub async fn execute(&self, request: ExecutionRequest) -> ExecutionOutcome {
        self.execute_until(request, None).await
    }

    /// [`execute`](Self::execute) bounded by an optional deadline.
    ///
    /// Waiting for a permit counts against the deadline. A deadline that
    /// passes while polling keeps the token of the abandoned execution.
    pub async fn execute_until(
        &self,
        request: ExecutionRequest,
        deadline: Option<Instant>,
    ) -> ExecutionOutcome {
        let _permit = match within(deadline, self.permits.acquire()).await {
            Some(Ok(permit)) => permit,
            Some(Err(e)) => return ExecutionOutcome::failed(None, e.to_string()),
            None => return ExecutionOutcome::failed(None, DEADLINE_EXCEEDED),
        };

        let token = match within(deadline, self.dispatcher.submit(&request)).await {
            Some(Ok(token)) => token,
            Some(Err(e)) => {
                tracing::warn!(language = %request.language, error = %e, "Dispatch failed");
                return ExecutionOutcome::failed(None, e.to_string());
            }
            None => return ExecutionOutcome::failed(None, DEADLINE_EXCEEDED),
        };

        let polled = within(
            deadline,
            self.poller
                .poll(&token, self.polling.max_attempts, self.polling.interval),
        )
        .await;
        match polled {
            Some(Ok(outcome)) => outcome,
            Some(Err(e)) => {
                tracing::warn!(token = %token, error = %e, "Polling failed");
                ExecutionOutcome::failed(Some(token), e.to_string())
            }
            None => {
                tracing::warn!(token = %token, "Deadline exceeded while polling");
                ExecutionOutcome::failed(Some(token), DEADLINE_EXCEEDED)
            }
        }
    }
}

/// Run `work` to completion, or until `deadline` if one is set
async fn within<F: Future>(deadline: Option<Instant>, work: F) -> Option<F::Output> {
    match deadline {
        Some(at) => timeout_at(at, work).await.ok(),
        None => Some(work.await),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use base64::Engine;
    use futures::future::join_all;

    use super::*;
    use crate::error::ExecutionError;
    use crate::execution::client::{MockExecutionBackend, RawSubmission, SubmissionPayload};
    use crate::execution::status::{CoarseStatus, ExecutionStatus, Verdict};
    use crate::models::TrackingToken;

    fn evaluator(backend: MockExecutionBackend, comparison: ComparisonMode) -> Evaluator {
        Evaluator::new(
            Arc::new(backend),
            &ExecutionServiceConfig::with_base_url("http://unused"),
            PollingConfig {
                max_attempts: 3,
                interval: Duration::from_millis(100),
            },
            comparison,
        )
    }

    fn accepted_with_stdout(text: &str) -> RawSubmission {
        RawSubmission {
            stdout: Some(base64::engine::general_purpose::STANDARD.encode(text)),
            ..RawSubmission::with_status(3)
        }
    }

    #[tokio::test]
    async fn test_unsupported_language_never_reaches_backend() {
        let mut backend = MockExecutionBackend::new();
        backend.expect_create_submission().never();
        backend.expect_fetch_submission().never();
        let evaluator = evaluator(backend, ComparisonMode::Backend);

        let err = evaluator.run_once("x", "Fortran", None).await.unwrap_err();
        assert_eq!(err.0, "Fortran");
        assert!(evaluator
            .run_with_check("x", "Fortran", None, "1")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_run_once_returns_decoded_outcome() {
        let mut backend = MockExecutionBackend::new();
        backend
            .expect_create_submission()
            .withf(|p| p.expected_output.is_none() && p.stdin.as_deref() == Some("5"))
            .returning(|_| Ok(TrackingToken::new("t")));
        backend
            .expect_fetch_submission()
            .returning(|_| Ok(accepted_with_stdout("25\n")));
        let evaluator = evaluator(backend, ComparisonMode::Backend);

        let outcome = evaluator
            .run_once("print(int(input())**2)", "Python", Some(" 5 "))
            .await
            .unwrap();
        assert_eq!(outcome.stdout.as_deref(), Some("25\n"));
        assert_eq!(outcome.verdict(), Verdict::Success);
    }

    #[tokio::test]
    async fn test_dispatch_failure_becomes_error_outcome() {
        let mut backend = MockExecutionBackend::new();
        backend.expect_create_submission().returning(|_| {
            Err(ExecutionError::Dispatch {
                status: None,
                body: "connection refused".to_string(),
            })
        });
        backend.expect_fetch_submission().never();
        let evaluator = evaluator(backend, ComparisonMode::Backend);

        let outcome = evaluator.run_once("x", "Go", None).await.unwrap();
        assert_eq!(outcome.status, ExecutionStatus::InternalError);
        assert_eq!(outcome.coarse_status(), CoarseStatus::Error);
        assert!(outcome.stdout.is_none());
        assert!(outcome.token.is_none());
        assert!(outcome.error.unwrap().contains("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_timeout_becomes_error_outcome() {
        let mut backend = MockExecutionBackend::new();
        backend
            .expect_create_submission()
            .returning(|_| Ok(TrackingToken::new("stuck")));
        backend
            .expect_fetch_submission()
            .times(3)
            .returning(|_| Ok(RawSubmission::with_status(1)));
        let evaluator = evaluator(backend, ComparisonMode::Backend);

        let outcome = evaluator.run_once("x", "Java", None).await.unwrap();
        assert_eq!(outcome.status, ExecutionStatus::InternalError);
        assert_eq!(outcome.token, Some(TrackingToken::new("stuck")));
        assert!(outcome.error.unwrap().contains("stuck"));
    }

    #[tokio::test]
    async fn test_backend_comparison_trusts_service_verdict() {
        let mut backend = MockExecutionBackend::new();
        backend
            .expect_create_submission()
            .withf(|p| p.expected_output.as_deref() == Some("4"))
            .returning(|_| Ok(TrackingToken::new("t")));
        backend
            .expect_fetch_submission()
            .returning(|_| Ok(RawSubmission::with_status(4)));
        let evaluator = evaluator(backend, ComparisonMode::Backend);

        let result = evaluator
            .run_with_check("x", "Ruby", Some("2"), "4")
            .await
            .unwrap();
        assert!(!result.passed);
        assert_eq!(result.index, 0);
        assert_eq!(result.outcome.verdict(), Verdict::Failure);
        assert_eq!(result.test_case.expected_output, "4");
    }

    #[tokio::test]
    async fn test_local_comparison_withholds_expectation() {
        let mut backend = MockExecutionBackend::new();
        backend
            .expect_create_submission()
            .withf(|p| p.expected_output.is_none())
            .times(2)
            .returning(|_| Ok(TrackingToken::new("t")));
        let mut outputs = vec!["4  \r\n\n", "5\n"].into_iter();
        backend
            .expect_fetch_submission()
            .times(2)
            .returning(move |_| Ok(accepted_with_stdout(outputs.next().unwrap_or_default())));
        let evaluator = evaluator(backend, ComparisonMode::Local);

        let matching = evaluator
            .run_with_check("x", "TypeScript", None, "4\n")
            .await
            .unwrap();
        assert!(matching.passed);

        let mismatching = evaluator
            .run_with_check("x", "TypeScript", None, "4\n")
            .await
            .unwrap();
        assert!(!mismatching.passed);
    }

    /// Backend whose executions take `delay` and count how many overlap
    #[derive(Default)]
    struct CountingBackend {
        delay: Duration,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl ExecutionBackend for CountingBackend {
        async fn create_submission(
            &self,
            _payload: &SubmissionPayload,
        ) -> Result<TrackingToken, ExecutionError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            Ok(TrackingToken::new("t"))
        }

        async fn fetch_submission(
            &self,
            _token: &TrackingToken,
        ) -> Result<RawSubmission, ExecutionError> {
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(RawSubmission::with_status(3))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_runs_share_the_in_flight_cap() {
        let backend = Arc::new(CountingBackend {
            delay: Duration::from_millis(50),
            ..CountingBackend::default()
        });
        let service = ExecutionServiceConfig {
            max_in_flight: 2,
            ..ExecutionServiceConfig::with_base_url("http://unused")
        };
        let evaluator = Evaluator::new(
            backend.clone(),
            &service,
            PollingConfig::default(),
            ComparisonMode::Backend,
        );

        let runs = (0..8).map(|_| evaluator.run_once("x", "C", None));
        let outcomes = join_all(runs).await;

        assert!(outcomes
            .into_iter()
            .all(|outcome| outcome.unwrap().is_accepted()));
        assert_eq!(backend.peak_in_flight.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_while_polling_keeps_token() {
        let backend = Arc::new(CountingBackend {
            delay: Duration::from_secs(5),
            ..CountingBackend::default()
        });
        let evaluator = Evaluator::new(
            backend,
            &ExecutionServiceConfig::with_base_url("http://unused"),
            PollingConfig::default(),
            ComparisonMode::Backend,
        );
        let request = ExecutionRequest::new("x", Language::Go);

        let deadline = Instant::now() + Duration::from_secs(1);
        let outcome = evaluator.execute_until(request, Some(deadline)).await;

        assert_eq!(outcome.status, ExecutionStatus::InternalError);
        assert_eq!(outcome.token, Some(TrackingToken::new("t")));
        assert_eq!(outcome.error.as_deref(), Some(DEADLINE_EXCEEDED));
    }

    #[test]
    fn test_normalize_output() {
        assert_eq!(normalize_output("a \r\nb\t\n\n"), "a\nb");
        assert_eq!(normalize_output(""), "");
        assert_eq!(normalize_output("  lead"), "  lead");
    }
}
