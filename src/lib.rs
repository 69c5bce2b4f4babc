//! Assessor - Remote Code-Execution Orchestration
//!
//! This library grades student submissions for the assessment portal by
//! shipping them to an external sandboxed execution service and turning the
//! results into per-test-case and per-suite verdicts.
//!
//! # Features
//!
//! - Nine supported languages resolved through a fixed registry
//! - Submission dispatch with optional credential headers
//! - Bounded result polling with base64 output decoding
//! - Concurrent test-suite evaluation with ordered results
//! - Verdict hand-off to a pluggable persistence collaborator
//!
//! # Architecture
//!
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Grading and verdict recording
//! - **Execution**: Dispatch, polling, classification and fan-out
//! - **Models**: Domain value types

pub mod config;
pub mod constants;
pub mod error;
pub mod execution;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
