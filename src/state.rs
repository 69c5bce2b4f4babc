//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::execution::{Evaluator, SuiteEvaluator};
use crate::services::AssessmentService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Suite evaluator (also owns the single-run evaluator)
    suites: SuiteEvaluator,

    /// Grading + verdict hand-off
    assessments: AssessmentService,
}

impl AppState {
    /// Create a new application state
    pub fn new(suites: SuiteEvaluator, assessments: AssessmentService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                suites,
                assessments,
            }),
        }
    }

    /// Get the single-run evaluator
    pub fn evaluator(&self) -> &Evaluator {
        self.inner.suites.evaluator()
    }

    /// Get the assessment service
    pub fn assessments(&self) -> &AssessmentService {
        &self.inner.assessments
    }
}
