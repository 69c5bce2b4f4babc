//! Language listing handler

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::{execution::Language, state::AppState};

/// One registry entry
#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub name: &'static str,
    pub id: i32,
}

/// List the languages submissions may use
async fn list_languages() -> Json<Vec<LanguageResponse>> {
    Json(
        Language::ALL
            .iter()
            .map(|lang| LanguageResponse {
                name: lang.name(),
                id: lang.backend_id(),
            })
            .collect(),
    )
}

/// Language routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/languages", get(list_languages))
}
