use chrono::{Duration, NaiveDate};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::operations::{content, learning, progress};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub learned_words: i64,
    pub total_words: i64,
    pub user_added_words: i64,
    pub quiz_count: i64,
    pub avg_score: f64,
    pub best_score: f64,
    pub total_study_days: i64,
    pub total_words_learned: i64,
    pub total_quizzes_taken: i64,
    pub streak: i64,
}

pub async fn statistics(pool: &SqlitePool, today: NaiveDate) -> Result<Statistics, sqlx::Error> {
    let learned_words = learning::learned_word_count(pool).await?;
    let total_words = content::word_count(pool).await?;
    let user_added_words = content::user_added_word_count(pool).await?;
    let (quiz_count, avg_score, best_score) = progress::quiz_score_stats(pool).await?;
    let (total_study_days, total_words_learned, total_quizzes_taken) =
        progress::attendance_totals(pool).await?;
    let dates = progress::attendance_dates_desc(pool).await?;

    Ok(Statistics {
        learned_words,
        total_words,
        user_added_words,
        quiz_count,
        avg_score: round1(avg_score),
        best_score: round1(best_score),
        total_study_days,
        total_words_learned,
        total_quizzes_taken,
        streak: streak_from(&dates, today),
    })
}

/// Consecutive attendance days counted backward from `today`. The walk
/// starts at today itself, so a missing row for today means a streak of
/// zero no matter how long yesterday's run was.
pub fn streak_from(dates_desc: &[NaiveDate], today: NaiveDate) -> i64 {
    let mut streak = 0i64;
    for (i, date) in dates_desc.iter().enumerate() {
        let expected = today - Duration::days(i as i64);
        if *date == expected {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn streak_counts_contiguous_days() {
        let dates = vec![d(2024, 6, 3), d(2024, 6, 2), d(2024, 6, 1)];
        assert_eq!(streak_from(&dates, d(2024, 6, 3)), 3);
    }

    #[test]
    fn missing_today_breaks_the_chain() {
        let dates = vec![d(2024, 6, 3), d(2024, 6, 2), d(2024, 6, 1)];
        assert_eq!(streak_from(&dates, d(2024, 6, 4)), 0);
    }

    #[test]
    fn gap_stops_the_walk() {
        let dates = vec![d(2024, 6, 3), d(2024, 6, 1)];
        assert_eq!(streak_from(&dates, d(2024, 6, 3)), 1);
    }

    #[test]
    fn empty_attendance_is_zero() {
        assert_eq!(streak_from(&[], d(2024, 6, 3)), 0);
    }
}
