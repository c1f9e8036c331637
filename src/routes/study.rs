use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::db::operations::{learning, ContentKind};
use crate::response::{json_ok, AppError};
use crate::services::assignment;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayQuery {
    limit: Option<usize>,
}

/// Today's study set. Idempotent within a calendar day.
pub async fn today(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Result<Response, AppError> {
    let limit = query.limit.unwrap_or(state.config().daily_word_limit);
    let today = chrono::Local::now().date_naive();

    // StdRng rather than the thread-local rng: the handler future must be
    // Send, and the generator is held across await points.
    let mut rng = StdRng::from_os_rng();
    let words = assignment::todays_words(state.pool(), today, limit, &mut rng).await?;

    Ok(json_ok(words))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkLearnedRequest {
    content_id: i64,
    #[serde(default)]
    content_kind: Option<ContentKind>,
}

pub async fn mark_learned(
    State(state): State<AppState>,
    Json(request): Json<MarkLearnedRequest>,
) -> Result<Response, AppError> {
    let kind = request.content_kind.unwrap_or(ContentKind::Word);

    learning::mark_learned(state.pool(), kind, request.content_id).await?;
    let record = learning::learning_record(state.pool(), kind, request.content_id).await?;

    Ok(json_ok(record))
}
