#![allow(dead_code)]

use sqlx::SqlitePool;
use tempfile::TempDir;

use tango_backend::config::Config;
use tango_backend::db;
use tango_backend::db::operations::content::{JlptLevel, NewGrammar, NewWord};
use tango_backend::state::AppState;

/// Fresh migrated database in a temp directory. Keep the `TempDir` guard
/// alive for the lifetime of the pool.
pub async fn create_test_pool() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");

    let pool = db::init_pool(&db_path).await.expect("failed to init pool");

    (temp_dir, pool)
}

pub async fn create_test_app() -> (TempDir, axum::Router) {
    let (temp_dir, pool) = create_test_pool().await;
    let state = AppState::new(pool, Config::default());
    (temp_dir, tango_backend::create_app(state))
}

pub fn new_word(japanese: &str, korean: &str) -> NewWord {
    NewWord {
        japanese: japanese.to_string(),
        korean: korean.to_string(),
        level: JlptLevel::N5,
        ..NewWord::default()
    }
}

pub fn new_grammar(pattern: &str, meaning: &str) -> NewGrammar {
    NewGrammar {
        pattern: pattern.to_string(),
        meaning: meaning.to_string(),
        level: JlptLevel::N5,
        ..NewGrammar::default()
    }
}
