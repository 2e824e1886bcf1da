use crate::api::AppState;
use crate::domain::submission::StoredSubmission;
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub total: usize,
}

/// Accepts one incident payload.
///
/// # Errors
/// Returns `AppError::Unavailable` when a synthetic outage is injected.
pub async fn submit_incident(State(state): State<AppState>, body: String) -> Result<impl IntoResponse> {
    state.faults.delay().await;
    if state.faults.trips() {
        return Err(AppError::Unavailable("Service temporarily unavailable".into()));
    }

    let reply = state.receiver.receive(&body).await;
    Ok((reply.status(), [(header::CONTENT_TYPE, "application/json")], reply.body))
}

/// Lists every accepted submission, oldest first.
pub async fn list_incidents(State(state): State<AppState>) -> Json<Vec<StoredSubmission>> {
    Json(state.receiver.submissions().await)
}

pub async fn count_incidents(State(state): State<AppState>) -> Json<CountResponse> {
    Json(CountResponse { total: state.receiver.count().await })
}
