use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::db::operations::progress;
use crate::response::{json_ok, AppError};
use crate::services::quiz::{self, Question, QuizType};
use crate::services::review;
use crate::state::AppState;

fn default_word_count() -> usize {
    7
}

fn default_grammar_count() -> usize {
    3
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    quiz_type: QuizType,
    #[serde(default = "default_word_count")]
    word_count: usize,
    #[serde(default = "default_grammar_count")]
    grammar_count: usize,
}

/// Builds a quiz. An empty list means the candidate pools are too small to
/// form questions; the client surfaces that as "cannot start quiz".
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuizRequest>,
) -> Result<Response, AppError> {
    let today = chrono::Local::now().date_naive();
    let mut rng = StdRng::from_os_rng();

    let questions = quiz::full_quiz(
        state.pool(),
        request.quiz_type,
        request.word_count,
        request.grammar_count,
        today,
        state.config().quiz_all_fallback,
        &mut rng,
    )
    .await?;

    Ok(json_ok(questions))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    question: Question,
    selected: String,
}

pub async fn answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Response, AppError> {
    let outcome = review::check_answer(state.pool(), &request.question, &request.selected).await?;
    Ok(json_ok(outcome))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResultRequest {
    quiz_type: QuizType,
    score: i64,
    total_questions: i64,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

pub async fn save_result(
    State(state): State<AppState>,
    Json(request): Json<SaveResultRequest>,
) -> Result<Response, AppError> {
    if request.total_questions <= 0 {
        return Err(AppError::validation("totalQuestions must be positive"));
    }
    if request.score < 0 || request.score > request.total_questions {
        return Err(AppError::validation("score out of range"));
    }

    progress::insert_quiz_result(
        state.pool(),
        request.quiz_type.as_str(),
        request.score,
        request.total_questions,
        request.details.as_ref(),
    )
    .await?;

    Ok(json_ok(serde_json::json!({ "saved": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentResultsQuery {
    limit: Option<i64>,
}

pub async fn recent_results(
    State(state): State<AppState>,
    Query(query): Query<RecentResultsQuery>,
) -> Result<Response, AppError> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let results = progress::recent_quiz_results(state.pool(), limit).await?;
    Ok(json_ok(results))
}
