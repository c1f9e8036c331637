use axum::extract::{Path, State};
use axum::response::Response;

use crate::db::operations::progress;
use crate::response::{json_ok, AppError};
use crate::services::review;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let wrong = review::wrong_answers(state.pool()).await?;
    Ok(json_ok(wrong))
}

pub async fn resolve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    progress::resolve_wrong_answer(state.pool(), id).await?;
    Ok(json_ok(serde_json::json!({ "resolved": true })))
}
