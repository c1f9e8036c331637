use std::collections::HashSet;

use chrono::NaiveDate;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::operations::content::{self, GrammarItem, VocabItem};
use crate::db::operations::ContentKind;
use crate::services::assignment;

/// A multiple-choice question needs the correct answer plus three
/// distractors, so any pool below this size produces nothing.
pub const MIN_POOL: usize = 4;

/// The `today` quiz oversamples the daily assignment up to this many words.
pub const TODAY_POOL_SIZE: usize = 10;

const DISTRACTORS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizType {
    Today,
    All,
}

impl QuizType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    JpToKr,
    KrToJp,
    Grammar,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JpToKr => "jp_to_kr",
            Self::KrToJp => "kr_to_jp",
            Self::Grammar => "grammar",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub content_kind: ContentKind,
    pub question_kind: QuestionKind,
    pub prompt: String,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub content_id: i64,
    pub hint: String,
}

/// Builds the combined word + grammar quiz and shuffles it. The result may
/// be shorter than requested, or empty, when the candidate pools are
/// undersized; callers treat that as "cannot start quiz".
pub async fn full_quiz<R>(
    pool: &SqlitePool,
    quiz_type: QuizType,
    word_count: usize,
    grammar_count: usize,
    today: NaiveDate,
    all_fallback: bool,
    rng: &mut R,
) -> Result<Vec<Question>, sqlx::Error>
where
    R: Rng + ?Sized,
{
    let words = match quiz_type {
        QuizType::Today => assignment::todays_words(pool, today, TODAY_POOL_SIZE, rng).await?,
        QuizType::All => all_candidate_words(pool, all_fallback).await?,
    };
    let grammars = content::all_grammars(pool).await?;

    let mut questions = word_questions(&words, word_count, rng);
    questions.extend(grammar_questions(&grammars, grammar_count, rng));
    questions.shuffle(rng);

    Ok(questions)
}

/// Candidate pool for the all-review quiz: the learner's own words first,
/// then everything ever marked learned. When both are empty the configured
/// fallback decides between the full corpus and an empty quiz.
async fn all_candidate_words(
    pool: &SqlitePool,
    all_fallback: bool,
) -> Result<Vec<VocabItem>, sqlx::Error> {
    let mut words = content::user_added_words(pool).await?;
    let mut seen: HashSet<i64> = words.iter().map(|w| w.id).collect();

    for word in content::learned_words(pool).await? {
        if seen.insert(word.id) {
            words.push(word);
        }
    }

    if words.is_empty() && all_fallback {
        return content::all_words(pool).await;
    }

    Ok(words)
}

/// Word questions: `min(count, |pool|)` subjects sampled without
/// replacement, three distractors each, direction chosen at random per
/// subject. Empty when the pool cannot supply distractors.
pub fn word_questions<R>(pool: &[VocabItem], count: usize, rng: &mut R) -> Vec<Question>
where
    R: Rng + ?Sized,
{
    if pool.len() < MIN_POOL {
        return Vec::new();
    }

    let subjects: Vec<&VocabItem> = pool.choose_multiple(rng, count.min(pool.len())).collect();

    subjects
        .into_iter()
        .map(|subject| {
            let jp_to_kr = rng.random_bool(0.5);
            let (kind, prompt, correct) = if jp_to_kr {
                (
                    QuestionKind::JpToKr,
                    format!("「{}」의 뜻은?", subject.japanese),
                    subject.korean.clone(),
                )
            } else {
                (
                    QuestionKind::KrToJp,
                    format!("「{}」을(를) 일본어로?", subject.korean),
                    subject.japanese.clone(),
                )
            };

            let values: Vec<String> = pool
                .iter()
                .filter(|w| w.id != subject.id)
                .map(|w| {
                    if jp_to_kr {
                        w.korean.clone()
                    } else {
                        w.japanese.clone()
                    }
                })
                .collect();

            let mut options = vec![correct.clone()];
            options.extend(pick_distractors(values, &correct, rng));
            options.shuffle(rng);

            Question {
                content_kind: ContentKind::Word,
                question_kind: kind,
                prompt,
                correct_answer: correct,
                options,
                content_id: subject.id,
                hint: subject.memo_tip.clone(),
            }
        })
        .collect()
}

/// Grammar questions always ask pattern → meaning.
pub fn grammar_questions<R>(pool: &[GrammarItem], count: usize, rng: &mut R) -> Vec<Question>
where
    R: Rng + ?Sized,
{
    if pool.len() < MIN_POOL {
        return Vec::new();
    }

    let subjects: Vec<&GrammarItem> = pool.choose_multiple(rng, count.min(pool.len())).collect();

    subjects
        .into_iter()
        .map(|subject| {
            let correct = subject.meaning.clone();
            let values: Vec<String> = pool
                .iter()
                .filter(|g| g.id != subject.id)
                .map(|g| g.meaning.clone())
                .collect();

            let mut options = vec![correct.clone()];
            options.extend(pick_distractors(values, &correct, rng));
            options.shuffle(rng);

            Question {
                content_kind: ContentKind::Grammar,
                question_kind: QuestionKind::Grammar,
                prompt: format!("「{}」의 의미는?", subject.pattern),
                correct_answer: correct,
                options,
                content_id: subject.id,
                hint: subject.explanation.clone(),
            }
        })
        .collect()
}

/// Up to three values distinct from the correct answer and from each other.
/// Returns fewer when the pool cannot supply that many distinct texts.
fn pick_distractors<R>(mut values: Vec<String>, correct: &str, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    values.shuffle(rng);

    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(correct);

    let mut picked = Vec::with_capacity(DISTRACTORS);
    for value in &values {
        if picked.len() == DISTRACTORS {
            break;
        }
        if seen.insert(value.as_str()) {
            picked.push(value.clone());
        }
    }
    picked
}
