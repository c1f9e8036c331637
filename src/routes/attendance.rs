use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::db::operations::progress;
use crate::response::{json_ok, AppError};
use crate::state::AppState;

/// Idempotent "I showed up today" marker. The UI calls this once per
/// session before anything that touches attendance counters or the streak.
pub async fn checkin(State(state): State<AppState>) -> Result<Response, AppError> {
    let today = chrono::Local::now().date_naive();
    progress::ensure_attendance(state.pool(), today).await?;
    Ok(json_ok(serde_json::json!({ "date": today })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    #[serde(default)]
    words_learned: i64,
    #[serde(default)]
    quiz_taken: i64,
    #[serde(default)]
    study_minutes: i64,
}

pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateAttendanceRequest>,
) -> Result<Response, AppError> {
    let today = chrono::Local::now().date_naive();
    progress::update_attendance(
        state.pool(),
        today,
        request.words_learned,
        request.quiz_taken,
        request.study_minutes,
    )
    .await?;
    Ok(json_ok(serde_json::json!({ "updated": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    days: Option<i64>,
}

pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, AppError> {
    let days = query.days.unwrap_or(30).clamp(1, 365);
    let records = progress::attendance_history(state.pool(), days).await?;
    Ok(json_ok(records))
}
