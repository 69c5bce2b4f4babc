//! Execution handler implementations

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    execution::resolve_language,
    models::ExecutionRequest,
    state::AppState,
};

use super::{
    request::{CheckRequest, RunRequest, SuiteRequest},
    response::{OutcomeResponse, SuiteResponse, TestCaseResponse},
};

/// Run code once with optional stdin and resource limits
pub async fn run_code(
    State(state): State<AppState>,
    Json(payload): Json<RunRequest>,
) -> AppResult<Json<OutcomeResponse>> {
    payload.validate()?;

    let language = resolve_language(&payload.language)?;
    let request = ExecutionRequest::new(payload.source_code, language)
        .with_stdin(payload.stdin)
        .with_limits(payload.limits.unwrap_or_default());

    let outcome = state.evaluator().execute(request).await;

    Ok(Json(outcome.into()))
}

/// Run code against one expected output
pub async fn check_code(
    State(state): State<AppState>,
    Json(payload): Json<CheckRequest>,
) -> AppResult<Json<TestCaseResponse>> {
    payload.validate()?;

    let result = state
        .evaluator()
        .run_with_check(
            &payload.source_code,
            &payload.language,
            payload.stdin.as_deref(),
            &payload.expected_output,
        )
        .await?;

    Ok(Json(result.into()))
}

/// Grade code against an ordered batch of test cases
pub async fn run_suite(
    State(state): State<AppState>,
    Json(payload): Json<SuiteRequest>,
) -> AppResult<Json<SuiteResponse>> {
    payload.validate()?;
    let keys = payload.keys()?;

    let verdict = state
        .assessments()
        .grade(
            &payload.source_code,
            &payload.language,
            payload.test_cases(),
            keys,
        )
        .await?;

    Ok(Json(verdict.into()))
}
