use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::operations::{now_iso, ContentKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningRecord {
    pub id: i64,
    pub content_type: String,
    pub content_id: i64,
    pub learned_at: String,
    pub review_count: i64,
    pub next_review: Option<String>,
    pub mastery_level: i64,
}

/// Marks a content item learned. The first mark creates the record, every
/// further mark bumps `review_count` and refreshes `learned_at`.
pub async fn mark_learned(
    pool: &SqlitePool,
    kind: ContentKind,
    content_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO learning_history (content_type, content_id, learned_at, review_count)
        VALUES (?, ?, ?, 1)
        ON CONFLICT (content_type, content_id) DO UPDATE SET
            review_count = review_count + 1,
            learned_at = excluded.learned_at
        "#,
    )
    .bind(kind.as_str())
    .bind(content_id)
    .bind(now_iso())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn learning_record(
    pool: &SqlitePool,
    kind: ContentKind,
    content_id: i64,
) -> Result<Option<LearningRecord>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT * FROM learning_history WHERE content_type = ? AND content_id = ? LIMIT 1",
    )
    .bind(kind.as_str())
    .bind(content_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| map_learning_row(&r)))
}

pub async fn learned_word_count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(DISTINCT content_id) FROM learning_history WHERE content_type = 'word'",
    )
    .fetch_one(pool)
    .await
}

/// Content ids already assigned for the given day, ordered by id.
pub async fn assigned_content_ids(
    pool: &SqlitePool,
    date: NaiveDate,
    kind: ContentKind,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT content_id FROM daily_assignment
        WHERE date = ? AND content_type = ?
        ORDER BY content_id
        "#,
    )
    .bind(date)
    .bind(kind.as_str())
    .fetch_all(pool)
    .await
}

/// Writes the day's assignment as one logical step. BEGIN IMMEDIATE takes
/// the write lock before the existence check, so a raced second caller
/// waits, then sees the winner's rows and inserts nothing. The unique index
/// on (date, content_type, content_id) backstops the whole path.
pub async fn persist_assignment(
    pool: &SqlitePool,
    date: NaiveDate,
    kind: ContentKind,
    content_ids: &[i64],
) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;

    sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

    let outcome = write_assignment_rows(&mut conn, date, kind, content_ids).await;

    match outcome {
        Ok(()) => {
            sqlx::query("COMMIT").execute(&mut *conn).await?;
            Ok(())
        }
        Err(err) => {
            let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
            Err(err)
        }
    }
}

async fn write_assignment_rows(
    conn: &mut sqlx::pool::PoolConnection<sqlx::Sqlite>,
    date: NaiveDate,
    kind: ContentKind,
    content_ids: &[i64],
) -> Result<(), sqlx::Error> {
    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM daily_assignment WHERE date = ? AND content_type = ?",
    )
    .bind(date)
    .bind(kind.as_str())
    .fetch_one(&mut **conn)
    .await?;

    if existing > 0 {
        return Ok(());
    }

    let created_at = now_iso();
    for content_id in content_ids {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO daily_assignment (date, content_type, content_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(date)
        .bind(kind.as_str())
        .bind(content_id)
        .bind(&created_at)
        .execute(&mut **conn)
        .await?;
    }

    Ok(())
}

fn map_learning_row(row: &SqliteRow) -> LearningRecord {
    LearningRecord {
        id: row.try_get("id").unwrap_or_default(),
        content_type: row.try_get("content_type").unwrap_or_default(),
        content_id: row.try_get("content_id").unwrap_or_default(),
        learned_at: row.try_get("learned_at").unwrap_or_default(),
        review_count: row.try_get("review_count").unwrap_or(0),
        next_review: row.try_get("next_review").ok(),
        mastery_level: row.try_get("mastery_level").unwrap_or(0),
    }
}
