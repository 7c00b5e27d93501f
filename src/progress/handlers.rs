use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::progress::repo_types::Progress;
use crate::progress::services::{self, ShiftDirection};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/progress/current", get(get_current))
        .route("/progress/complete", post(complete_today))
        .route("/progress/shift/:direction", post(shift_day))
        .route("/progress/history", get(get_history))
}

/// GET /progress/current
#[instrument(skip(state))]
async fn get_current(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Progress>> {
    let record = services::current_day(&state.db, user_id).await?;
    Ok(Json(record))
}

/// POST /progress/complete
#[instrument(skip(state))]
async fn complete_today(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Progress>> {
    let record = services::complete_today(&state.db, user_id).await?;
    Ok(Json(record))
}

/// POST /progress/shift/:direction  (forward | backward)
#[instrument(skip(state))]
async fn shift_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(direction): Path<ShiftDirection>,
) -> ApiResult<Json<Progress>> {
    let record = services::shift_day(&state.db, user_id, direction).await?;
    Ok(Json(record))
}

/// GET /progress/history
#[instrument(skip(state))]
async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Progress>>> {
    let records = services::history(&state.db, user_id).await?;
    Ok(Json(records))
}
