use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, SqlitePool};

use crate::db::operations::now_iso;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JlptLevel {
    N5,
    N4,
    N3,
    N2,
    N1,
}

impl JlptLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N5 => "N5",
            Self::N4 => "N4",
            Self::N3 => "N3",
            Self::N2 => "N2",
            Self::N1 => "N1",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "N1" => Self::N1,
            "N2" => Self::N2,
            "N3" => Self::N3,
            "N4" => Self::N4,
            _ => Self::N5,
        }
    }
}

impl Default for JlptLevel {
    fn default() -> Self {
        Self::N5
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabItem {
    pub id: i64,
    pub japanese: String,
    pub reading: String,
    pub kanji_form: String,
    pub korean: String,
    pub level: JlptLevel,
    pub category: String,
    pub example_sentence: String,
    pub example_translation: String,
    pub memo_tip: String,
    pub is_user_added: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarItem {
    pub id: i64,
    pub pattern: String,
    pub meaning: String,
    pub explanation: String,
    pub level: JlptLevel,
    pub connection_rule: String,
    pub example_sentence: String,
    pub example_translation: String,
    pub created_at: String,
}

/// Insert payload shared by the corpus loader, the user-vocabulary API and
/// JSON import/export. Unknown fields in incoming JSON are ignored; missing
/// optional fields default to the empty string and level N5.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    #[serde(default)]
    pub japanese: String,
    #[serde(default)]
    pub reading: String,
    #[serde(default)]
    pub kanji_form: String,
    #[serde(default)]
    pub korean: String,
    #[serde(default)]
    pub level: JlptLevel,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub example_sentence: String,
    #[serde(default)]
    pub example_translation: String,
    #[serde(default)]
    pub memo_tip: String,
}

impl NewWord {
    /// `japanese` and `korean` are the only required fields.
    pub fn is_valid(&self) -> bool {
        !self.japanese.trim().is_empty() && !self.korean.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrammar {
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub level: JlptLevel,
    #[serde(default)]
    pub connection_rule: String,
    #[serde(default)]
    pub example_sentence: String,
    #[serde(default)]
    pub example_translation: String,
}

impl NewGrammar {
    pub fn is_valid(&self) -> bool {
        !self.pattern.trim().is_empty() && !self.meaning.trim().is_empty()
    }
}

pub async fn all_words(pool: &SqlitePool) -> Result<Vec<VocabItem>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM words ORDER BY is_user_added DESC, id DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(map_word_row).collect())
}

pub async fn user_added_words(pool: &SqlitePool) -> Result<Vec<VocabItem>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM words WHERE is_user_added = 1 ORDER BY id DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(map_word_row).collect())
}

pub async fn words_by_ids(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<VocabItem>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::new("SELECT * FROM words WHERE id IN (");
    let mut sep = qb.separated(", ");
    for id in ids {
        sep.push_bind(id);
    }
    qb.push(") ORDER BY id");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows.iter().map(map_word_row).collect())
}

/// Words with no learning record yet, filtered by origin.
pub async fn unlearned_words(
    pool: &SqlitePool,
    user_added: bool,
) -> Result<Vec<VocabItem>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT w.* FROM words w
        LEFT JOIN learning_history lh
            ON lh.content_type = 'word' AND lh.content_id = w.id
        WHERE lh.id IS NULL AND w.is_user_added = ?
        ORDER BY w.id
        "#,
    )
    .bind(user_added as i64)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(map_word_row).collect())
}

/// Every word that has ever been marked learned.
pub async fn learned_words(pool: &SqlitePool) -> Result<Vec<VocabItem>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT DISTINCT w.* FROM words w
        JOIN learning_history lh
            ON lh.content_type = 'word' AND lh.content_id = w.id
        ORDER BY w.id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(map_word_row).collect())
}

pub async fn word_count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM words")
        .fetch_one(pool)
        .await
}

pub async fn user_added_word_count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM words WHERE is_user_added = 1")
        .fetch_one(pool)
        .await
}

pub async fn insert_word<'e, E>(
    executor: E,
    word: &NewWord,
    is_user_added: bool,
) -> Result<i64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO words (
            japanese, reading, kanji_form, korean, level, category,
            example_sentence, example_translation, memo_tip, is_user_added, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&word.japanese)
    .bind(&word.reading)
    .bind(&word.kanji_form)
    .bind(&word.korean)
    .bind(word.level.as_str())
    .bind(&word.category)
    .bind(&word.example_sentence)
    .bind(&word.example_translation)
    .bind(&word.memo_tip)
    .bind(is_user_added as i64)
    .bind(now_iso())
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Deletes a word only when it was user-added. Corpus rows are immutable.
pub async fn delete_user_word(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM words WHERE id = ? AND is_user_added = 1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn all_grammars(pool: &SqlitePool) -> Result<Vec<GrammarItem>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM grammars ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(map_grammar_row).collect())
}

pub async fn grammar_count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM grammars")
        .fetch_one(pool)
        .await
}

pub async fn insert_grammar<'e, E>(executor: E, grammar: &NewGrammar) -> Result<i64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO grammars (
            pattern, meaning, explanation, level, connection_rule,
            example_sentence, example_translation, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&grammar.pattern)
    .bind(&grammar.meaning)
    .bind(&grammar.explanation)
    .bind(grammar.level.as_str())
    .bind(&grammar.connection_rule)
    .bind(&grammar.example_sentence)
    .bind(&grammar.example_translation)
    .bind(now_iso())
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

fn map_word_row(row: &SqliteRow) -> VocabItem {
    let is_user_added: i64 = row.try_get("is_user_added").unwrap_or(0);
    let level: String = row.try_get("level").unwrap_or_default();
    VocabItem {
        id: row.try_get("id").unwrap_or_default(),
        japanese: row.try_get("japanese").unwrap_or_default(),
        reading: row.try_get("reading").unwrap_or_default(),
        kanji_form: row.try_get("kanji_form").unwrap_or_default(),
        korean: row.try_get("korean").unwrap_or_default(),
        level: JlptLevel::from_str(&level),
        category: row.try_get("category").unwrap_or_default(),
        example_sentence: row.try_get("example_sentence").unwrap_or_default(),
        example_translation: row.try_get("example_translation").unwrap_or_default(),
        memo_tip: row.try_get("memo_tip").unwrap_or_default(),
        is_user_added: is_user_added != 0,
        created_at: row.try_get("created_at").unwrap_or_default(),
    }
}

fn map_grammar_row(row: &SqliteRow) -> GrammarItem {
    let level: String = row.try_get("level").unwrap_or_default();
    GrammarItem {
        id: row.try_get("id").unwrap_or_default(),
        pattern: row.try_get("pattern").unwrap_or_default(),
        meaning: row.try_get("meaning").unwrap_or_default(),
        explanation: row.try_get("explanation").unwrap_or_default(),
        level: JlptLevel::from_str(&level),
        connection_rule: row.try_get("connection_rule").unwrap_or_default(),
        example_sentence: row.try_get("example_sentence").unwrap_or_default(),
        example_translation: row.try_get("example_translation").unwrap_or_default(),
        created_at: row.try_get("created_at").unwrap_or_default(),
    }
}
