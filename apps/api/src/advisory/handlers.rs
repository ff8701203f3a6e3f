//! Axum route handlers for the Advice API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::errors::{AppError, QUERY_REQUIRED};
use crate::security::injection::detect_injection;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TravelAdviceRequest {
    /// Missing and `null` are both treated as an empty query.
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TravelAdviceResponse {
    pub response: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /get_travel_advice
///
/// Rejects empty and injection-flagged queries, then runs the advisory pipeline.
/// Flagged queries never reach a model.
pub async fn handle_get_travel_advice(
    State(state): State<AppState>,
    payload: Result<Json<TravelAdviceRequest>, JsonRejection>,
) -> Result<Json<TravelAdviceResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let query = request.query.as_deref().unwrap_or("").trim();
    if query.is_empty() {
        return Err(AppError::Validation(QUERY_REQUIRED.to_string()));
    }

    if let Some(found) = detect_injection(query) {
        warn!(
            category = found.category,
            phrase = found.phrase,
            "Rejected query with injection phrase"
        );
        return Err(AppError::InjectionDetected);
    }

    let span = tracing::info_span!("travel_advice", request_id = %Uuid::new_v4());
    let response = async {
        info!(query_chars = query.chars().count(), "Handling travel advice request");
        state.adviser.advise(query).await
    }
    .instrument(span)
    .await?;

    Ok(Json(TravelAdviceResponse { response }))
}
