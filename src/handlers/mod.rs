//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod executions;
pub mod health;
pub mod languages;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(languages::routes())
        .nest("/executions", executions::routes())
}
