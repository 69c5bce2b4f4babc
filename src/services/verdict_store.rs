//! Persistence collaborator boundary
//!
//! Storing verdicts belongs to the portal's database layer. The core only
//! hands finished verdicts over through [`VerdictStore`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppResult, models::SuiteVerdict};

/// Identifies whose attempt at which problem a verdict belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionKeys {
    pub student_id: Uuid,
    pub problem_id: Uuid,
    pub assessment_id: Uuid,
}

/// Accepts finished suite verdicts for storage
#[async_trait]
pub trait VerdictStore: Send + Sync {
    async fn record_suite(&self, keys: &SubmissionKeys, verdict: &SuiteVerdict) -> AppResult<()>;
}

/// Store that only emits the verdict as a structured log event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingVerdictStore;

#[async_trait]
impl VerdictStore for TracingVerdictStore {
    async fn record_suite(&self, keys: &SubmissionKeys, verdict: &SuiteVerdict) -> AppResult<()> {
        tracing::info!(
            student_id = %keys.student_id,
            problem_id = %keys.problem_id,
            assessment_id = %keys.assessment_id,
            status = %verdict.status,
            passed = verdict.passed,
            total = verdict.total,
            score = verdict.score(),
            "Suite verdict recorded"
        );
        Ok(())
    }
}
