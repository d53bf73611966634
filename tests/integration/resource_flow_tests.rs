//! Forums, study groups, exams, marketplace, students and the PDF report

use crate::test_utils::*;
use axum::http::{header, StatusCode};
use campus_backend_lib::{
    models::{ExamResult, ForumThread, MarketplaceItem, StudyGroup},
    storage::{FlatFileStorage, Storage},
    AppState,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_students_directory_hides_hashes() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada Lovelace").await;
    app.register("grace", "pa55word", "Grace Hopper").await;

    let response = app.get("/api/students", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    let students = response.json();
    let students = students.as_array().unwrap();
    assert_eq!(students.len(), 2);
    assert_eq!(students[0]["username"], "ada");
    assert_eq!(students[1]["name"], "Grace Hopper");
    assert_eq!(students[0]["academicInterests"], json!(["algorithms"]));
    for student in students {
        assert!(student.get("passwordHash").is_none());
    }
}

#[tokio::test]
async fn test_forum_thread_lists_with_author() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada Lovelace").await;

    let created = app
        .post_json(
            "/api/forums",
            Some(&cookie),
            json!({ "title": "Notes", "content": "Week 3 notes are up" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.json()["author"]["name"], "Ada Lovelace");

    let listed = app.get("/api/forums", Some(&cookie)).await;
    assert_eq!(listed.status, StatusCode::OK);
    let threads = listed.json();
    assert_eq!(threads.as_array().unwrap().len(), 1);
    assert_eq!(threads[0]["title"], "Notes");
    assert_eq!(threads[0]["content"], "Week 3 notes are up");
    assert_eq!(threads[0]["author"]["name"], "Ada Lovelace");
    assert!(threads[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_forum_threads_keep_insertion_order() {
    let app = setup_test_app();
    let ada = app.signed_in("ada", "Ada").await;
    let grace = app.signed_in("grace", "Grace").await;

    app.post_json("/api/forums", Some(&ada), json!({ "title": "first", "content": "a" })).await;
    app.post_json("/api/forums", Some(&grace), json!({ "title": "second", "content": "b" })).await;

    let threads = app.get("/api/forums", Some(&ada)).await.json();
    assert_eq!(threads[0]["title"], "first");
    assert_eq!(threads[0]["author"]["name"], "Ada");
    assert_eq!(threads[1]["title"], "second");
    assert_eq!(threads[1]["author"]["name"], "Grace");
}

#[tokio::test]
async fn test_study_group_starts_with_creator() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada").await;

    let created = app
        .post_json("/api/studygroups", Some(&cookie), json!({ "name": "Compilers" }))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let groups = app.get("/api/studygroups", Some(&cookie)).await.json();
    let group = &groups[0];
    assert_eq!(group["name"], "Compilers");
    assert_eq!(group["isPrivate"], false);
    let members = group["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["name"], "Ada");
}

#[tokio::test]
async fn test_private_study_group() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada").await;

    app.post_json(
        "/api/studygroups",
        Some(&cookie),
        json!({ "name": "Thesis", "isPrivate": true }),
    )
    .await;

    let groups = app.get("/api/studygroups", Some(&cookie)).await.json();
    assert_eq!(groups[0]["isPrivate"], true);
}

#[tokio::test]
async fn test_exam_questions_hide_answers() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada").await;

    let questions = app.get("/api/exams/questions", Some(&cookie)).await.json();
    let questions = questions.as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["question"], "What is 2+2?");
    assert_eq!(questions[1]["question"], "What is the capital of France?");
    for question in questions {
        assert!(question.get("answer").is_none());
        assert!(!question["options"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_exam_scoring() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada").await;

    let perfect = app
        .post_json("/api/exams/submit", Some(&cookie), json!({ "answers": ["4", "Paris"] }))
        .await;
    assert_eq!(perfect.status, StatusCode::OK);
    let body = perfect.json();
    assert_eq!(body["message"], "Exam submitted successfully");
    assert_eq!(body["score"], 2);
    assert_eq!(body["total"], 2);

    let partial = app
        .post_json("/api/exams/submit", Some(&cookie), json!({ "answers": ["3", "Paris"] }))
        .await;
    assert_eq!(partial.json()["score"], 1);

    let results: Vec<ExamResult> = app.state.storage.list().await.unwrap();
    assert_eq!(results.iter().map(|r| r.score).collect::<Vec<_>>(), vec![2, 1]);
}

#[tokio::test]
async fn test_exam_wrong_answer_count_records_nothing() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada").await;

    for answers in [json!(["4"]), json!(["4", "Paris", "extra"]), json!([])] {
        let response = app
            .post_json("/api/exams/submit", Some(&cookie), json!({ "answers": answers }))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json()["error"]["code"], "VAL_001");
    }

    let results: Vec<ExamResult> = app.state.storage.list().await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_marketplace_listing() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada").await;

    let created = app
        .post_json(
            "/api/marketplace",
            Some(&cookie),
            json!({ "title": "Calculus textbook", "description": "Lightly used", "price": 25.5 }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let items = app.get("/api/marketplace", Some(&cookie)).await.json();
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["title"], "Calculus textbook");
    assert_eq!(items[0]["price"], 25.5);
    assert_eq!(items[0]["seller"]["name"], "Ada");
}

#[tokio::test]
async fn test_marketplace_rejects_bad_price() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada").await;

    let response = app
        .post_json(
            "/api/marketplace",
            Some(&cookie),
            json!({ "title": "Lamp", "description": "Works", "price": "cheap" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pdf_report() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada").await;

    let response = app.get("/api/pdfs", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "application/pdf");
    assert!(response.body.starts_with(b"%PDF-"));
    assert!(std::str::from_utf8(&response.body).unwrap().trim_end().ends_with("%%EOF"));
}

#[tokio::test]
async fn test_data_and_sessions_survive_restart() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada").await;
    app.post_json("/api/forums", Some(&cookie), json!({ "title": "kept", "content": "x" })).await;

    let TestApp { temp_dir, .. } = app;
    let storage = FlatFileStorage::new(temp_dir.path()).unwrap();
    let state = Arc::new(AppState::new(storage, &test_settings(temp_dir.path())).unwrap());
    let restarted = from_state(state, temp_dir);

    // The cookie issued before the restart still opens the gate
    let threads = restarted.get("/api/forums", Some(&cookie)).await;
    assert_eq!(threads.status, StatusCode::OK);
    let threads = threads.json();
    assert_eq!(threads[0]["title"], "kept");
    assert_eq!(threads[0]["author"]["name"], "Ada");
}

#[tokio::test]
async fn test_dangling_references_are_null_or_dropped() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada").await;
    let ada = app.state.storage.find_user_by_username("ada").await.unwrap().unwrap();
    let ghost = Uuid::new_v4();

    let thread = ForumThread::new("orphan".to_string(), "x".to_string(), ghost);
    app.state.storage.insert(&thread).await.unwrap();
    let item = MarketplaceItem::new("lamp".to_string(), "x".to_string(), 3.0, ghost);
    app.state.storage.insert(&item).await.unwrap();
    let mut group = StudyGroup::new("mixed".to_string(), false, ada.id);
    group.members.push(ghost);
    app.state.storage.insert(&group).await.unwrap();

    let threads = app.get("/api/forums", Some(&cookie)).await.json();
    assert!(threads[0]["author"].is_null());

    let items = app.get("/api/marketplace", Some(&cookie)).await.json();
    assert!(items[0]["seller"].is_null());

    let groups = app.get("/api/studygroups", Some(&cookie)).await.json();
    let members = groups[0]["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["name"], "Ada");
}
