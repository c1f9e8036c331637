//! End-to-end engine flows: quiz construction against the store and answer
//! grading feeding the wrong-answer ledger.

use std::collections::HashSet;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use tango_backend::db::operations::content;
use tango_backend::db::operations::{learning, progress, ContentKind};
use tango_backend::services::quiz::{self, QuizType};
use tango_backend::services::{assignment, review};

mod common;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

async fn seed_store(pool: &sqlx::SqlitePool, words: usize, grammars: usize) {
    for i in 0..words {
        let word = common::new_word(&format!("言葉{i}"), &format!("말{i}"));
        content::insert_word(pool, &word, false).await.expect("insert word");
    }
    for i in 0..grammars {
        let grammar = common::new_grammar(&format!("〜型{i}"), &format!("의미{i}"));
        content::insert_grammar(pool, &grammar).await.expect("insert grammar");
    }
}

#[tokio::test]
async fn today_quiz_draws_from_the_daily_assignment() {
    let (_dir, pool) = common::create_test_pool().await;
    seed_store(&pool, 20, 6).await;

    let mut rng = StdRng::seed_from_u64(1);
    let questions = quiz::full_quiz(&pool, QuizType::Today, 7, 3, today(), true, &mut rng)
        .await
        .expect("quiz");

    assert!(!questions.is_empty());
    assert!(questions.len() <= 10);

    let assigned: HashSet<i64> = assignment::todays_words(&pool, today(), 10, &mut rng)
        .await
        .expect("assignment")
        .iter()
        .map(|w| w.id)
        .collect();

    for question in questions.iter().filter(|q| q.content_kind == ContentKind::Word) {
        assert!(
            assigned.contains(&question.content_id),
            "word question outside the daily assignment"
        );
    }
}

#[tokio::test]
async fn quiz_mixes_word_and_grammar_questions() {
    let (_dir, pool) = common::create_test_pool().await;
    seed_store(&pool, 20, 8).await;

    let mut rng = StdRng::seed_from_u64(2);
    let questions = quiz::full_quiz(&pool, QuizType::Today, 7, 3, today(), true, &mut rng)
        .await
        .expect("quiz");

    let words = questions.iter().filter(|q| q.content_kind == ContentKind::Word).count();
    let grammars = questions.iter().filter(|q| q.content_kind == ContentKind::Grammar).count();
    assert_eq!(words, 7);
    assert_eq!(grammars, 3);
}

#[tokio::test]
async fn undersized_grammar_pool_drops_grammar_questions_only() {
    let (_dir, pool) = common::create_test_pool().await;
    seed_store(&pool, 12, 3).await;

    let mut rng = StdRng::seed_from_u64(3);
    let questions = quiz::full_quiz(&pool, QuizType::Today, 5, 3, today(), true, &mut rng)
        .await
        .expect("quiz");

    assert!(questions.iter().all(|q| q.content_kind == ContentKind::Word));
    assert_eq!(questions.len(), 5);
}

#[tokio::test]
async fn all_quiz_without_engagement_honors_the_fallback_switch() {
    let (_dir, pool) = common::create_test_pool().await;
    seed_store(&pool, 10, 0).await;

    // Nothing user-added, nothing learned: fallback off means no quiz.
    let mut rng = StdRng::seed_from_u64(4);
    let questions = quiz::full_quiz(&pool, QuizType::All, 5, 0, today(), false, &mut rng)
        .await
        .expect("quiz");
    assert!(questions.is_empty());

    // Fallback on falls through to the full corpus.
    let questions = quiz::full_quiz(&pool, QuizType::All, 5, 0, today(), true, &mut rng)
        .await
        .expect("quiz");
    assert_eq!(questions.len(), 5);
}

#[tokio::test]
async fn all_quiz_prefers_user_added_words() {
    let (_dir, pool) = common::create_test_pool().await;
    seed_store(&pool, 10, 0).await;

    let mut user_ids = Vec::new();
    for i in 0..4 {
        let word = common::new_word(&format!("自作{i}"), &format!("직접{i}"));
        user_ids.push(content::insert_word(&pool, &word, true).await.expect("insert"));
    }

    // Nothing learned yet: the pool is exactly the user's own words.
    let mut rng = StdRng::seed_from_u64(5);
    let questions = quiz::full_quiz(&pool, QuizType::All, 10, 0, today(), true, &mut rng)
        .await
        .expect("quiz");

    assert_eq!(questions.len(), 4);
    for question in &questions {
        assert!(user_ids.contains(&question.content_id));
    }
}

#[tokio::test]
async fn all_quiz_includes_learned_words_after_user_added() {
    let (_dir, pool) = common::create_test_pool().await;
    seed_store(&pool, 6, 0).await;

    let word = common::new_word("自作", "직접");
    let user_id = content::insert_word(&pool, &word, true).await.expect("insert");
    for id in 1..=3 {
        learning::mark_learned(&pool, ContentKind::Word, id).await.expect("mark");
    }

    let mut rng = StdRng::seed_from_u64(6);
    let questions = quiz::full_quiz(&pool, QuizType::All, 10, 0, today(), false, &mut rng)
        .await
        .expect("quiz");

    // Pool: 1 user word + 3 learned = 4 subjects.
    assert_eq!(questions.len(), 4);
    let ids: HashSet<i64> = questions.iter().map(|q| q.content_id).collect();
    assert!(ids.contains(&user_id));
}

#[tokio::test]
async fn grading_a_correct_answer_leaves_the_ledger_alone() {
    let (_dir, pool) = common::create_test_pool().await;
    seed_store(&pool, 6, 0).await;

    let mut rng = StdRng::seed_from_u64(7);
    let questions = quiz::full_quiz(&pool, QuizType::Today, 1, 0, today(), true, &mut rng)
        .await
        .expect("quiz");
    let question = &questions[0];

    let outcome = review::check_answer(&pool, question, &question.correct_answer)
        .await
        .expect("grade");
    assert!(outcome.is_correct);

    let wrong = review::wrong_answers(&pool).await.expect("listing");
    assert!(wrong.words.is_empty());
    assert!(wrong.grammars.is_empty());
}

#[tokio::test]
async fn grading_a_miss_writes_the_ledger() {
    let (_dir, pool) = common::create_test_pool().await;
    seed_store(&pool, 6, 0).await;

    let mut rng = StdRng::seed_from_u64(8);
    let questions = quiz::full_quiz(&pool, QuizType::Today, 1, 0, today(), true, &mut rng)
        .await
        .expect("quiz");
    let question = &questions[0];

    let wrong_option = question
        .options
        .iter()
        .find(|option| **option != question.correct_answer)
        .expect("a distractor exists");

    let outcome = review::check_answer(&pool, question, wrong_option)
        .await
        .expect("grade");
    assert!(!outcome.is_correct);

    let wrong = review::wrong_answers(&pool).await.expect("listing");
    assert_eq!(wrong.words.len(), 1);
    assert_eq!(wrong.words[0].entry.content_id, question.content_id);
    assert_eq!(wrong.words[0].entry.wrong_count, 1);
    assert_eq!(
        wrong.words[0].entry.question_type,
        question.question_kind.as_str()
    );

    let entry = progress::wrong_answer_entry(
        &pool,
        question.question_kind.as_str(),
        ContentKind::Word,
        question.content_id,
    )
    .await
    .expect("fetch")
    .expect("entry exists");
    assert!(!entry.resolved);
}
