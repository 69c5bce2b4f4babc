//! Execution service client
//!
//! `ExecutionBackend` is the seam between the core and the external
//! sandbox. `HttpBackend` speaks the service's JSON API over HTTP; tests
//! substitute mocks.

use std::str::FromStr;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::ExecutionServiceConfig;
use crate::constants::headers;
use crate::error::ExecutionError;
use crate::models::{ResourceLimits, TrackingToken};

/// Body of a submission request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub source_code: String,
    pub language_id: i32,
    pub stdin: Option<String>,
    pub expected_output: Option<String>,
    #[serde(flatten)]
    pub limits: ResourceLimits,
}

/// Status object embedded in a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStatus {
    pub id: i32,
    #[serde(default)]
    pub description: Option<String>,
}

/// Result document as returned by the service, text fields still base64
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSubmission {
    pub status: RawStatus,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Seconds; sent as a decimal string by most deployments
    #[serde(default, deserialize_with = "lenient_number")]
    pub time: Option<f64>,
    /// Kilobytes
    #[serde(default, deserialize_with = "lenient_number")]
    pub memory: Option<u64>,
}

impl RawSubmission {
    /// Result with the given status and nothing else
    pub fn with_status(id: i32) -> Self {
        Self {
            status: RawStatus {
                id,
                description: None,
            },
            stdout: None,
            stderr: None,
            compile_output: None,
            message: None,
            time: None,
            memory: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Text(String),
}

/// Accept a number, a numeric string or null; unparseable text becomes `None`
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
{
    Ok(match Option::<Lenient<T>>::deserialize(deserializer)? {
        Some(Lenient::Value(value)) => Some(value),
        Some(Lenient::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

#[derive(Debug, Deserialize)]
struct SubmissionCreated {
    token: String,
}

/// Operations the core needs from the execution service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Enqueue one execution and return its tracking token
    async fn create_submission(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<TrackingToken, ExecutionError>;

    /// Fetch the current state of an execution
    async fn fetch_submission(&self, token: &TrackingToken)
        -> Result<RawSubmission, ExecutionError>;
}

/// HTTP implementation of [`ExecutionBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client for the configured service
    pub fn new(config: &ExecutionServiceConfig) -> anyhow::Result<Self> {
        let mut default_headers = HeaderMap::new();
        let credentials = [
            (headers::AUTH_TOKEN, config.auth_token.as_deref()),
            (headers::RAPIDAPI_KEY, config.rapidapi_key.as_deref()),
            (headers::RAPIDAPI_HOST, config.rapidapi_host.as_deref()),
        ];
        for (name, value) in credentials {
            if let Some(value) = value {
                default_headers.insert(HeaderName::from_static(name), HeaderValue::from_str(value)?);
            }
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn result_url(&self, token: &TrackingToken) -> String {
        format!("{}/{}?base64_encoded=true", self.base_url, token)
    }
}

#[async_trait]
impl ExecutionBackend for HttpBackend {
    async fn create_submission(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<TrackingToken, ExecutionError> {
        let response = self
            .client
            .post(&self.base_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ExecutionError::Dispatch {
                status: e.status().map(|s| s.as_u16()),
                body: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ExecutionError::Dispatch {
            status: Some(status.as_u16()),
            body: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(ExecutionError::Dispatch {
                status: Some(status.as_u16()),
                body,
            });
        }

        let created: SubmissionCreated = serde_json::from_str(&body)
            .map_err(|e| ExecutionError::MalformedResponse(format!("{}: {}", e, body)))?;
        if created.token.trim().is_empty() {
            return Err(ExecutionError::MalformedResponse(
                "empty tracking token".to_string(),
            ));
        }

        Ok(TrackingToken::new(created.token))
    }

    async fn fetch_submission(
        &self,
        token: &TrackingToken,
    ) -> Result<RawSubmission, ExecutionError> {
        let response = self
            .client
            .get(self.result_url(token))
            .send()
            .await
            .map_err(|e| ExecutionError::Fetch {
                status: e.status().map(|s| s.as_u16()),
                body: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ExecutionError::Fetch {
            status: Some(status.as_u16()),
            body: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(ExecutionError::Fetch {
                status: Some(status.as_u16()),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ExecutionError::MalformedResponse(format!("{}: {}", e, body)))
    }
}
