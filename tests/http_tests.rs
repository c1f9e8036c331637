use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

mod common;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse body")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let (_dir, app) = common::create_test_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn unknown_route_is_a_json_404() {
    let (_dir, app) = common::create_test_app().await;

    let response = app.oneshot(get("/nonexistent/path")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn creating_a_word_requires_japanese_and_korean() {
    let (_dir, app) = common::create_test_app().await;

    let response = app
        .oneshot(post_json("/api/words", r#"{"japanese": "勉強"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn created_words_show_up_in_the_user_listing() {
    let (_dir, app) = common::create_test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/words",
            r#"{"japanese": "勉強", "korean": "공부", "category": "명사"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["data"]["japanese"], "勉強");
    assert_eq!(created["data"]["isUserAdded"], true);

    let response = app
        .oneshot(get("/api/words?userAdded=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    let words = listing["data"].as_array().expect("array");
    assert_eq!(words.len(), 1);
    assert_eq!(words[0]["korean"], "공부");
}

#[tokio::test]
async fn delete_refuses_words_that_are_not_user_added() {
    let (_dir, app) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/words/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn import_rejects_a_non_array_payload() {
    let (_dir, app) = common::create_test_app().await;

    let response = app
        .oneshot(post_json("/api/words/import", r#"{"japanese": "勉強"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn import_skips_entries_missing_required_fields() {
    let (_dir, app) = common::create_test_app().await;

    let payload = r#"[
        {"japanese": "勉強", "korean": "공부"},
        {"japanese": "欠落"},
        {"japanese": "宿題", "korean": "숙제", "extra": true}
    ]"#;
    let response = app
        .clone()
        .oneshot(post_json("/api/words/import", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["imported"], 2);
    assert_eq!(body["data"]["skipped"], 1);

    let response = app.oneshot(get("/api/words/export")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn todays_study_set_respects_the_limit() {
    let (_dir, app) = common::create_test_app().await;

    for i in 0..6 {
        let payload = format!(r#"{{"japanese": "単語{i}", "korean": "단어{i}"}}"#);
        let response = app
            .clone()
            .oneshot(post_json("/api/words", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get("/api/study/today?limit=3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    // Re-fetch returns the same set.
    let response = app.oneshot(get("/api/study/today?limit=3")).await.unwrap();
    let again = body_json(response).await;
    assert_eq!(body["data"], again["data"]);
}

#[tokio::test]
async fn quiz_generation_on_an_empty_store_returns_an_empty_list() {
    let (_dir, app) = common::create_test_app().await;

    let response = app
        .oneshot(post_json("/api/quiz/generate", r#"{"quizType": "all"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn saving_a_quiz_result_validates_the_score() {
    let (_dir, app) = common::create_test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/quiz/results",
            r#"{"quizType": "today", "score": 11, "totalQuestions": 10}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/quiz/results",
            r#"{"quizType": "today", "score": 8, "totalQuestions": 10}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/api/quiz/results/recent?limit=5"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["score"], 8);
}

#[tokio::test]
async fn attendance_flow_checkin_update_history() {
    let (_dir, app) = common::create_test_app().await;

    // An update before checkin is silently ignored.
    let response = app
        .clone()
        .oneshot(post_json("/api/attendance/update", r#"{"wordsLearned": 3}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json("/api/attendance/checkin", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/attendance/update",
            r#"{"wordsLearned": 2, "quizTaken": 1, "studyMinutes": 10}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/attendance?days=7")).await.unwrap();
    let body = body_json(response).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["wordsLearned"], 2);
    assert_eq!(rows[0]["quizTaken"], 1);
    assert_eq!(rows[0]["studyMinutes"], 10);
}

#[tokio::test]
async fn statistics_endpoint_exposes_the_summary_fields() {
    let (_dir, app) = common::create_test_app().await;

    let response = app.oneshot(get("/api/statistics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    for field in [
        "learnedWords",
        "totalWords",
        "userAddedWords",
        "quizCount",
        "avgScore",
        "bestScore",
        "totalStudyDays",
        "streak",
    ] {
        assert!(
            body["data"].get(field).is_some(),
            "statistics payload missing {field}"
        );
    }
}

#[tokio::test]
async fn wrong_answer_flow_over_http() {
    let (_dir, app) = common::create_test_app().await;

    let question = r#"{
        "question": {
            "contentKind": "word",
            "questionKind": "jp_to_kr",
            "prompt": "「勉強」의 뜻은?",
            "correctAnswer": "공부",
            "options": ["공부", "숙제", "학교", "시험"],
            "contentId": 1,
            "hint": ""
        },
        "selected": "숙제"
    }"#;

    // Need the word to exist for the joined listing.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/words",
            r#"{"japanese": "勉強", "korean": "공부"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json("/api/quiz/answer", question))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["isCorrect"], false);

    let response = app
        .clone()
        .oneshot(get("/api/review/wrong-answers"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let words = body["data"]["words"].as_array().unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0]["wrongCount"], 1);
    let entry_id = words[0]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/review/wrong-answers/{entry_id}/resolve"),
            "{}",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/review/wrong-answers")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["words"].as_array().unwrap().len(), 0);
}
