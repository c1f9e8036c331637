use axum::extract::State;
use axum::response::Response;

use crate::db::operations::content;
use crate::response::{json_ok, AppError};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let grammars = content::all_grammars(state.pool()).await?;
    Ok(json_ok(grammars))
}
