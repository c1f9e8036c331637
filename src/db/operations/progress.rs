use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::operations::{now_iso, ContentKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultRow {
    pub id: i64,
    pub quiz_type: String,
    pub score: i64,
    pub total_questions: i64,
    pub details: Option<String>,
    pub completed_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongAnswerEntry {
    pub id: i64,
    pub question_type: String,
    pub content_type: String,
    pub content_id: i64,
    pub wrong_count: i64,
    pub last_wrong_at: String,
    pub resolved: bool,
}

/// Unresolved word miss joined with the live word fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongWord {
    #[serde(flatten)]
    pub entry: WrongAnswerEntry,
    pub japanese: String,
    pub reading: String,
    pub korean: String,
    pub memo_tip: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongGrammar {
    #[serde(flatten)]
    pub entry: WrongAnswerEntry,
    pub pattern: String,
    pub meaning: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDay {
    pub id: i64,
    pub date: NaiveDate,
    pub study_minutes: i64,
    pub words_learned: i64,
    pub quiz_taken: i64,
    pub created_at: String,
}

pub async fn insert_quiz_result(
    pool: &SqlitePool,
    quiz_type: &str,
    score: i64,
    total_questions: i64,
    details: Option<&serde_json::Value>,
) -> Result<(), sqlx::Error> {
    let details_json = details.map(|value| value.to_string());
    sqlx::query(
        r#"
        INSERT INTO quiz_results (quiz_type, score, total_questions, details, completed_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(quiz_type)
    .bind(score)
    .bind(total_questions)
    .bind(details_json)
    .bind(now_iso())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn recent_quiz_results(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<QuizResultRow>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM quiz_results ORDER BY completed_at DESC, id DESC LIMIT ?")
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(map_quiz_result_row).collect())
}

/// (count, average percentage, best percentage) over all quiz results.
pub async fn quiz_score_stats(pool: &SqlitePool) -> Result<(i64, f64, f64), sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) AS quiz_count,
            AVG(score * 100.0 / total_questions) AS avg_score,
            MAX(score * 100.0 / total_questions) AS best_score
        FROM quiz_results
        "#,
    )
    .fetch_one(pool)
    .await?;

    let count: i64 = row.try_get("quiz_count").unwrap_or(0);
    let avg: Option<f64> = row.try_get("avg_score").ok();
    let best: Option<f64> = row.try_get("best_score").ok();
    Ok((count, avg.unwrap_or(0.0), best.unwrap_or(0.0)))
}

/// Records a miss. A repeat miss bumps the counter and re-opens a resolved
/// entry; the key is (question_type, content_type, content_id).
pub async fn record_wrong_answer(
    pool: &SqlitePool,
    question_type: &str,
    kind: ContentKind,
    content_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO wrong_answers (question_type, content_type, content_id, wrong_count, last_wrong_at, resolved)
        VALUES (?, ?, ?, 1, ?, 0)
        ON CONFLICT (question_type, content_type, content_id) DO UPDATE SET
            wrong_count = wrong_count + 1,
            last_wrong_at = excluded.last_wrong_at,
            resolved = 0
        "#,
    )
    .bind(question_type)
    .bind(kind.as_str())
    .bind(content_id)
    .bind(now_iso())
    .execute(pool)
    .await?;
    Ok(())
}

/// Unconditional; resolving an already-resolved entry is a no-op.
pub async fn resolve_wrong_answer(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE wrong_answers SET resolved = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn wrong_answer_entry(
    pool: &SqlitePool,
    question_type: &str,
    kind: ContentKind,
    content_id: i64,
) -> Result<Option<WrongAnswerEntry>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT * FROM wrong_answers
        WHERE question_type = ? AND content_type = ? AND content_id = ?
        LIMIT 1
        "#,
    )
    .bind(question_type)
    .bind(kind.as_str())
    .bind(content_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| map_wrong_answer_row(&r)))
}

/// Unresolved word misses, worst first. The inner join drops entries whose
/// word row was deleted.
pub async fn wrong_words(pool: &SqlitePool) -> Result<Vec<WrongWord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT wa.*, w.japanese, w.reading, w.korean, w.memo_tip
        FROM wrong_answers wa
        JOIN words w ON w.id = wa.content_id
        WHERE wa.content_type = 'word' AND wa.resolved = 0
        ORDER BY wa.wrong_count DESC, wa.last_wrong_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| WrongWord {
            entry: map_wrong_answer_row(row),
            japanese: row.try_get("japanese").unwrap_or_default(),
            reading: row.try_get("reading").unwrap_or_default(),
            korean: row.try_get("korean").unwrap_or_default(),
            memo_tip: row.try_get("memo_tip").unwrap_or_default(),
        })
        .collect())
}

pub async fn wrong_grammars(pool: &SqlitePool) -> Result<Vec<WrongGrammar>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT wa.*, g.pattern, g.meaning, g.explanation
        FROM wrong_answers wa
        JOIN grammars g ON g.id = wa.content_id
        WHERE wa.content_type = 'grammar' AND wa.resolved = 0
        ORDER BY wa.wrong_count DESC, wa.last_wrong_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| WrongGrammar {
            entry: map_wrong_answer_row(row),
            pattern: row.try_get("pattern").unwrap_or_default(),
            meaning: row.try_get("meaning").unwrap_or_default(),
            explanation: row.try_get("explanation").unwrap_or_default(),
        })
        .collect())
}

/// Creates the attendance row for the day if it is not there yet.
pub async fn ensure_attendance(pool: &SqlitePool, date: NaiveDate) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO attendance (date, created_at) VALUES (?, ?)")
        .bind(date)
        .bind(now_iso())
        .execute(pool)
        .await?;
    Ok(())
}

/// Additive counter update. Silently a no-op when the day has no row yet;
/// callers are expected to have run `ensure_attendance` first.
pub async fn update_attendance(
    pool: &SqlitePool,
    date: NaiveDate,
    words_learned: i64,
    quiz_taken: i64,
    study_minutes: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE attendance
        SET words_learned = words_learned + ?,
            quiz_taken = quiz_taken + ?,
            study_minutes = study_minutes + ?
        WHERE date = ?
        "#,
    )
    .bind(words_learned)
    .bind(quiz_taken)
    .bind(study_minutes)
    .bind(date)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn attendance_dates_desc(pool: &SqlitePool) -> Result<Vec<NaiveDate>, sqlx::Error> {
    sqlx::query_scalar("SELECT date FROM attendance ORDER BY date DESC")
        .fetch_all(pool)
        .await
}

pub async fn attendance_history(
    pool: &SqlitePool,
    days: i64,
) -> Result<Vec<AttendanceDay>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM attendance ORDER BY date DESC LIMIT ?")
        .bind(days)
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(map_attendance_row).collect())
}

/// (total study days, total words learned, total quizzes taken).
pub async fn attendance_totals(pool: &SqlitePool) -> Result<(i64, i64, i64), sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) AS total_days,
            COALESCE(SUM(words_learned), 0) AS total_words_learned,
            COALESCE(SUM(quiz_taken), 0) AS total_quizzes_taken
        FROM attendance
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok((
        row.try_get("total_days").unwrap_or(0),
        row.try_get("total_words_learned").unwrap_or(0),
        row.try_get("total_quizzes_taken").unwrap_or(0),
    ))
}

fn map_quiz_result_row(row: &SqliteRow) -> QuizResultRow {
    QuizResultRow {
        id: row.try_get("id").unwrap_or_default(),
        quiz_type: row.try_get("quiz_type").unwrap_or_default(),
        score: row.try_get("score").unwrap_or(0),
        total_questions: row.try_get("total_questions").unwrap_or(0),
        details: row.try_get("details").ok(),
        completed_at: row.try_get("completed_at").unwrap_or_default(),
    }
}

fn map_wrong_answer_row(row: &SqliteRow) -> WrongAnswerEntry {
    let resolved: i64 = row.try_get("resolved").unwrap_or(0);
    WrongAnswerEntry {
        id: row.try_get("id").unwrap_or_default(),
        question_type: row.try_get("question_type").unwrap_or_default(),
        content_type: row.try_get("content_type").unwrap_or_default(),
        content_id: row.try_get("content_id").unwrap_or_default(),
        wrong_count: row.try_get("wrong_count").unwrap_or(0),
        last_wrong_at: row.try_get("last_wrong_at").unwrap_or_default(),
        resolved: resolved != 0,
    }
}

fn map_attendance_row(row: &SqliteRow) -> AttendanceDay {
    AttendanceDay {
        id: row.try_get("id").unwrap_or_default(),
        date: row.try_get("date").unwrap_or_default(),
        study_minutes: row.try_get("study_minutes").unwrap_or(0),
        words_learned: row.try_get("words_learned").unwrap_or(0),
        quiz_taken: row.try_get("quiz_taken").unwrap_or(0),
        created_at: row.try_get("created_at").unwrap_or_default(),
    }
}
