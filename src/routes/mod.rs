mod attendance;
mod grammars;
mod health;
mod quiz;
mod review;
mod statistics;
mod study;
mod words;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::root))
        .route("/api/study/today", get(study::today))
        .route("/api/study/learned", post(study::mark_learned))
        .route("/api/quiz/generate", post(quiz::generate))
        .route("/api/quiz/answer", post(quiz::answer))
        .route("/api/quiz/results", post(quiz::save_result))
        .route("/api/quiz/results/recent", get(quiz::recent_results))
        .route("/api/review/wrong-answers", get(review::list))
        .route(
            "/api/review/wrong-answers/:id/resolve",
            post(review::resolve),
        )
        .route("/api/statistics", get(statistics::overview))
        .route("/api/attendance", get(attendance::history))
        .route("/api/attendance/checkin", post(attendance::checkin))
        .route("/api/attendance/update", post(attendance::update))
        .route("/api/words", get(words::list).post(words::create))
        .route("/api/words/export", get(words::export))
        .route("/api/words/import", post(words::import))
        .route("/api/words/:id", delete(words::remove))
        .route("/api/grammars", get(grammars::list))
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
