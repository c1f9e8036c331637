use std::path::Path;

use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::operations::content::{self, NewGrammar, NewWord};

const WORDS_FILE: &str = "words_n5.json";
const GRAMMAR_FILE: &str = "grammar_n5.json";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// First-run corpus load. Each table is only ever filled when empty, so an
/// existing database is never overwritten; each file loads in one
/// transaction. Missing corpus files are logged and skipped.
pub async fn load_initial_corpus(pool: &SqlitePool, corpus_dir: &Path) -> Result<(), SeedError> {
    if content::word_count(pool).await? == 0 {
        let path = corpus_dir.join(WORDS_FILE);
        if path.exists() {
            let (loaded, skipped) = load_words(pool, &path).await?;
            tracing::info!(loaded, skipped, file = %path.display(), "loaded word corpus");
        } else {
            tracing::warn!(file = %path.display(), "word corpus file not found, starting empty");
        }
    } else {
        tracing::debug!("words table already populated, skipping corpus load");
    }

    if content::grammar_count(pool).await? == 0 {
        let path = corpus_dir.join(GRAMMAR_FILE);
        if path.exists() {
            let (loaded, skipped) = load_grammars(pool, &path).await?;
            tracing::info!(loaded, skipped, file = %path.display(), "loaded grammar corpus");
        } else {
            tracing::warn!(file = %path.display(), "grammar corpus file not found, starting empty");
        }
    } else {
        tracing::debug!("grammars table already populated, skipping corpus load");
    }

    Ok(())
}

async fn load_words(pool: &SqlitePool, path: &Path) -> Result<(usize, usize), SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let entries: Vec<NewWord> =
        serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    let mut tx = pool.begin().await?;
    let mut loaded = 0usize;
    let mut skipped = 0usize;
    for entry in &entries {
        if !entry.is_valid() {
            skipped += 1;
            continue;
        }
        content::insert_word(&mut *tx, entry, false).await?;
        loaded += 1;
    }
    tx.commit().await?;

    Ok((loaded, skipped))
}

async fn load_grammars(pool: &SqlitePool, path: &Path) -> Result<(usize, usize), SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let entries: Vec<NewGrammar> =
        serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    let mut tx = pool.begin().await?;
    let mut loaded = 0usize;
    let mut skipped = 0usize;
    for entry in &entries {
        if !entry.is_valid() {
            skipped += 1;
            continue;
        }
        content::insert_grammar(&mut *tx, entry).await?;
        loaded += 1;
    }
    tx.commit().await?;

    Ok((loaded, skipped))
}
