//! Submission dispatcher
//!
//! Turns an [`ExecutionRequest`] into exactly one submission call. No
//! retries happen here; a rejected or failed submission surfaces as
//! [`ExecutionError::Dispatch`] with the upstream status and body.

use std::sync::Arc;

use crate::constants::SOURCE_SENTINEL;
use crate::error::ExecutionError;
use crate::models::{ExecutionRequest, ResourceLimits, TrackingToken};

use super::client::{ExecutionBackend, SubmissionPayload};

/// Strip the single leading sentinel some clients prepend to source code.
///
/// Only one sentinel is removed; source that starts with two keeps the second.
pub fn normalize_source(code: &str) -> &str {
    code.strip_prefix(SOURCE_SENTINEL).unwrap_or(code)
}

/// Normalize a stdin payload before dispatch.
///
/// Input whose trimmed form is wrapped in double quotes is a literal string:
/// one layer of quotes is removed, `\"` is unescaped and interior whitespace
/// is kept. Anything else is treated as token data (numbers, array
/// literals) and loses *all* whitespace, including newlines. Multi-line input
/// that relies on line breaks must therefore use the quoted form.
pub fn normalize_stdin(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].replace("\\\"", "\"")
    } else {
        input.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

/// Sends execution requests to the execution service
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn ExecutionBackend>,
    default_limits: ResourceLimits,
}

impl Dispatcher {
    /// Create a dispatcher; `default_limits` fill any limit a request leaves unset
    pub fn new(backend: Arc<dyn ExecutionBackend>, default_limits: ResourceLimits) -> Self {
        Self {
            backend,
            default_limits,
        }
    }

    /// Build the wire payload for a request
    pub fn payload(&self, request: &ExecutionRequest) -> SubmissionPayload {
        SubmissionPayload {
            source_code: normalize_source(&request.source_code).to_string(),
            language_id: request.language.backend_id(),
            stdin: request.stdin.as_deref().map(normalize_stdin),
            expected_output: request.expected_output.clone(),
            limits: request.limits.clone().or(&self.default_limits),
        }
    }

    /// Submit one execution and return the service's token verbatim
    pub async fn submit(&self, request: &ExecutionRequest) -> Result<TrackingToken, ExecutionError> {
        let payload = self.payload(request);
        let token = self.backend.create_submission(&payload).await?;

        tracing::debug!(
            token = %token,
            language = %request.language,
            "Submission dispatched"
        );

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::client::MockExecutionBackend;
    use crate::execution::registry::Language;

    #[test]
    fn test_unquoted_input_loses_all_whitespace() {
        assert_eq!(normalize_stdin("  1 2 3  "), "123");
        assert_eq!(normalize_stdin("[1, 2,\n 3]\n"), "[1,2,3]");
        assert_eq!(normalize_stdin("\t\n"), "");
    }

    #[test]
    fn test_quoted_input_keeps_interior_whitespace() {
        assert_eq!(normalize_stdin("\"a b c\""), "a b c");
        assert_eq!(normalize_stdin("  \"line 1\nline 2 \"\n"), "line 1\nline 2 ");
        assert_eq!(normalize_stdin(r#""say \"hi\"""#), r#"say "hi""#);
        assert_eq!(normalize_stdin("\"\"\"x\"\"\""), "\"\"x\"\"");
    }

    #[test]
    fn test_lone_quote_is_token_data() {
        assert_eq!(normalize_stdin(" \" "), "\"");
    }

    #[test]
    fn test_source_sentinel_stripped_once() {
        assert_eq!(normalize_source("`print(1)"), "print(1)");
        assert_eq!(normalize_source("``x"), "`x");
        assert_eq!(normalize_source("print(1)"), "print(1)");
    }

    #[test]
    fn test_payload_applies_normalization_and_defaults() {
        let backend = Arc::new(MockExecutionBackend::new());
        let dispatcher = Dispatcher::new(
            backend,
            ResourceLimits {
                cpu_time_limit: Some(2.0),
                ..ResourceLimits::default()
            },
        );
        let request = ExecutionRequest::new("`print(input())", Language::Python)
            .with_stdin(Some(" 4 2 ".to_string()))
            .with_expected_output(Some(" 42 ".to_string()))
            .with_limits(ResourceLimits {
                memory_limit: Some(65_536),
                ..ResourceLimits::default()
            });

        let payload = dispatcher.payload(&request);
        assert_eq!(payload.source_code, "print(input())");
        assert_eq!(payload.language_id, 71);
        assert_eq!(payload.stdin.as_deref(), Some("42"));
        // expected output is forwarded untouched
        assert_eq!(payload.expected_output.as_deref(), Some(" 42 "));
        assert_eq!(payload.limits.cpu_time_limit, Some(2.0));
        assert_eq!(payload.limits.memory_limit, Some(65_536));
    }

    #[tokio::test]
    async fn test_submit_makes_one_call_and_returns_token() {
        let mut backend = MockExecutionBackend::new();
        backend
            .expect_create_submission()
            .times(1)
            .withf(|payload| payload.stdin.is_none() && payload.language_id == 73)
            .returning(|_| Ok(TrackingToken::new("tok-1")));
        let dispatcher = Dispatcher::new(Arc::new(backend), ResourceLimits::default());

        let token = dispatcher
            .submit(&ExecutionRequest::new("fn main() {}", Language::Rust))
            .await
            .unwrap();
        assert_eq!(token.as_str(), "tok-1");
    }

    #[tokio::test]
    async fn test_submit_does_not_retry_rejections() {
        let mut backend = MockExecutionBackend::new();
        backend.expect_create_submission().times(1).returning(|_| {
            Err(ExecutionError::Dispatch {
                status: Some(422),
                body: "{\"language_id\":[\"not found\"]}".to_string(),
            })
        });
        let dispatcher = Dispatcher::new(Arc::new(backend), ResourceLimits::default());

        let err = dispatcher
            .submit(&ExecutionRequest::new("int main(){}", Language::C))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Dispatch { status: Some(422), .. }));
    }
}
