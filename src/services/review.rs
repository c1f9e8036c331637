use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::operations::progress::{self, WrongGrammar, WrongWord};
use crate::services::quiz::Question;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub is_correct: bool,
}

/// Grades a submitted option. A miss is written to the wrong-answer ledger
/// under the question's type; a correct answer leaves any existing ledger
/// entry untouched (misses are only cleared by an explicit resolve).
pub async fn check_answer(
    pool: &SqlitePool,
    question: &Question,
    selected: &str,
) -> Result<AnswerOutcome, sqlx::Error> {
    let is_correct = selected == question.correct_answer;

    if !is_correct {
        progress::record_wrong_answer(
            pool,
            question.question_kind.as_str(),
            question.content_kind,
            question.content_id,
        )
        .await?;
        tracing::debug!(
            content_id = question.content_id,
            question_kind = question.question_kind.as_str(),
            "recorded wrong answer"
        );
    }

    Ok(AnswerOutcome { is_correct })
}

#[derive(Debug, Clone, Serialize)]
pub struct WrongAnswers {
    pub words: Vec<WrongWord>,
    pub grammars: Vec<WrongGrammar>,
}

/// The review notebook: every unresolved miss joined with its current
/// content, worst and most recently missed first.
pub async fn wrong_answers(pool: &SqlitePool) -> Result<WrongAnswers, sqlx::Error> {
    Ok(WrongAnswers {
        words: progress::wrong_words(pool).await?,
        grammars: progress::wrong_grammars(pool).await?,
    })
}
