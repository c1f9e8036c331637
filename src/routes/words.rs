use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::operations::content::{self, NewWord, VocabItem};
use crate::response::{json_ok, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    user_added: Option<bool>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let words = if query.user_added.unwrap_or(false) {
        content::user_added_words(state.pool()).await?
    } else {
        content::all_words(state.pool()).await?
    };
    Ok(json_ok(words))
}

pub async fn create(
    State(state): State<AppState>,
    Json(word): Json<NewWord>,
) -> Result<Response, AppError> {
    if !word.is_valid() {
        return Err(AppError::validation("japanese and korean are required"));
    }

    let id = content::insert_word(state.pool(), &word, true).await?;
    let created = content::words_by_ids(state.pool(), &[id]).await?;

    match created.into_iter().next() {
        Some(item) => Ok(json_ok(item)),
        None => Err(AppError::internal("inserted word not found")),
    }
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if content::delete_user_word(state.pool(), id).await? {
        Ok(json_ok(serde_json::json!({ "deleted": true })))
    } else {
        Err(AppError::not_found("word not found or not user-added"))
    }
}

/// User-added words in the corpus-file format, ready for re-import.
pub async fn export(State(state): State<AppState>) -> Result<Response, AppError> {
    let words = content::user_added_words(state.pool()).await?;
    let entries: Vec<NewWord> = words.iter().map(to_export_entry).collect();
    Ok(json_ok(entries))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Bulk import of user vocabulary. The payload must be a JSON array of
/// objects; entries missing `japanese` or `korean` are skipped without
/// failing the rest.
pub async fn import(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Response, AppError> {
    let Some(entries) = payload.as_array() else {
        return Err(AppError::validation("import payload must be a JSON array"));
    };
    if entries.iter().any(|entry| !entry.is_object()) {
        return Err(AppError::validation("import entries must be JSON objects"));
    }

    let mut tx = state.pool().begin().await?;
    let mut imported = 0usize;
    let mut skipped = 0usize;

    for entry in entries {
        match serde_json::from_value::<NewWord>(entry.clone()) {
            Ok(word) if word.is_valid() => {
                content::insert_word(&mut *tx, &word, true).await?;
                imported += 1;
            }
            _ => skipped += 1,
        }
    }

    tx.commit().await?;

    tracing::info!(imported, skipped, "vocabulary import finished");
    Ok(json_ok(ImportSummary { imported, skipped }))
}

fn to_export_entry(word: &VocabItem) -> NewWord {
    NewWord {
        japanese: word.japanese.clone(),
        reading: word.reading.clone(),
        kanji_form: word.kanji_form.clone(),
        korean: word.korean.clone(),
        level: word.level,
        category: word.category.clone(),
        example_sentence: word.example_sentence.clone(),
        example_translation: word.example_translation.clone(),
        memo_tip: word.memo_tip.clone(),
    }
}
