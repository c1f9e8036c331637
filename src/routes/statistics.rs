use axum::extract::State;
use axum::response::Response;

use crate::response::{json_ok, AppError};
use crate::services::statistics;
use crate::state::AppState;

pub async fn overview(State(state): State<AppState>) -> Result<Response, AppError> {
    let today = chrono::Local::now().date_naive();
    let stats = statistics::statistics(state.pool(), today).await?;
    Ok(json_ok(stats))
}
