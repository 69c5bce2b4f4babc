//! Business logic services

pub mod assessment_service;
pub mod verdict_store;

pub use assessment_service::AssessmentService;
pub use verdict_store::{SubmissionKeys, TracingVerdictStore, VerdictStore};
