//! Result poller
//!
//! Drives one tracking token from `submitted` to a terminal result or a
//! timeout. Attempts are strictly sequential; the delay between them
//! suspends only this loop.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;

use crate::error::{DecodeError, ExecutionError};
use crate::models::{ExecutionOutcome, TrackingToken};

use super::client::{ExecutionBackend, RawSubmission};
use super::registry::status_description;
use super::status::{is_terminal, ExecutionStatus};

/// Decode one base64 text field.
///
/// Absent and empty fields stay absent. Line breaks inside the payload are
/// ignored; bytes that are not UTF-8 are replaced rather than rejected.
pub fn decode_field(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, DecodeError> {
    let Some(encoded) = value.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| DecodeError {
            field,
            reason: e.to_string(),
        })?;

    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Where one polling loop stands
#[derive(Debug)]
enum PollState {
    Polling { attempt: u32 },
    Terminal(Box<RawSubmission>),
    TimedOut,
}

/// Queries the execution service until a token reaches a terminal status
#[derive(Clone)]
pub struct Poller {
    backend: Arc<dyn ExecutionBackend>,
}

impl Poller {
    pub fn new(backend: Arc<dyn ExecutionBackend>) -> Self {
        Self { backend }
    }

    /// Poll `token` at most `max_attempts` times, `interval` apart.
    ///
    /// A failed query consumes an attempt like a non-terminal one. When the
    /// budget runs out the timeout error carries the last query failure.
    pub async fn poll(
        &self,
        token: &TrackingToken,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        let mut last_error: Option<String> = None;
        let mut state = PollState::Polling { attempt: 1 };

        loop {
            state = match state {
                PollState::Polling { attempt } if attempt > max_attempts => PollState::TimedOut,
                PollState::Polling { attempt } => {
                    if attempt > 1 {
                        tokio::time::sleep(interval).await;
                    }

                    match self.backend.fetch_submission(token).await {
                        Ok(raw) if is_terminal(raw.status.id) => {
                            tracing::debug!(
                                token = %token,
                                attempt,
                                status_id = raw.status.id,
                                "Execution reached terminal status"
                            );
                            PollState::Terminal(Box::new(raw))
                        }
                        Ok(raw) => {
                            tracing::trace!(
                                token = %token,
                                attempt,
                                status_id = raw.status.id,
                                "Execution still pending"
                            );
                            PollState::Polling {
                                attempt: attempt + 1,
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                token = %token,
                                attempt,
                                error = %e,
                                "Result query failed"
                            );
                            last_error = Some(e.to_string());
                            PollState::Polling {
                                attempt: attempt + 1,
                            }
                        }
                    }
                }
                PollState::Terminal(raw) => return Ok(decode_outcome(token, *raw)),
                PollState::TimedOut => {
                    tracing::warn!(
                        token = %token,
                        attempts = max_attempts,
                        "Polling budget exhausted"
                    );
                    return Err(ExecutionError::PollTimeout {
                        token: token.to_string(),
                        attempts: max_attempts,
                        last_error,
                    });
                }
            };
        }
    }
}

/// Build the outcome for a terminal result, decoding its text fields
fn decode_outcome(token: &TrackingToken, raw: RawSubmission) -> ExecutionOutcome {
    let id = raw.status.id;
    let decode = |field: &'static str, value: Option<String>| {
        decode_field(field, value.as_deref()).unwrap_or_else(|e| {
            tracing::warn!(token = %token, error = %e, "Dropping undecodable field");
            None
        })
    };

    ExecutionOutcome {
        token: Some(token.clone()),
        status: ExecutionStatus::from_id(id),
        status_id: Some(id),
        description: raw
            .status
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| status_description(id).to_string()),
        stdout: decode("stdout", raw.stdout),
        stderr: decode("stderr", raw.stderr),
        compile_output: decode("compile_output", raw.compile_output),
        message: decode("message", raw.message),
        error: None,
        time_secs: raw.time,
        memory_kb: raw.memory,
    }
}
