use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

/// Run response returned by the trigger on success
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub success: bool,
    pub matches_found: usize,
    pub message: String,
}

/// Trigger one matching run over the pending report sets.
///
/// Takes no input: the run always covers the full cross product of pending
/// lost and found reports as of the call. The engine itself serializes
/// overlapping triggers, and re-triggering after a reported failure is safe
/// because already-recorded pairs are skipped.
///
/// Typically invoked after a new report is submitted, or on a schedule.
pub async fn run_matching(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    // The scan and the store transaction are blocking work; keep them off the
    // async workers.
    let engine = state.engine.clone();
    let summary = tokio::task::spawn_blocking(move || engine.run())
        .await
        .map_err(|e| ServerError::Internal(format!("matching task panicked: {e}")))??;

    Ok(Json(RunResponse {
        success: true,
        matches_found: summary.matches_found,
        message: format!("Found {} potential matches", summary.matches_found),
    }))
}
