//! Management command endpoints

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use calmanage_core::protocol::{ManageRequest, ManageResponse};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/manage-event", post(manage_event))
        .route("/commands", get(list_commands))
}

/// POST /manage-event - Run the command carried by a stored event
async fn manage_event(
    State(state): State<AppState>,
    Json(req): Json<ManageRequest>,
) -> Result<Json<ManageResponse>, AppError> {
    let (_, outcome) = state.dispatcher().handle_ics(&req.ics)?;
    Ok(Json(outcome.into()))
}

/// GET /commands - Recognized command identifiers, in registry order
async fn list_commands(State(state): State<AppState>) -> Json<Vec<String>> {
    let ids = state
        .dispatcher()
        .registry()
        .ids()
        .map(str::to_string)
        .collect();
    Json(ids)
}
