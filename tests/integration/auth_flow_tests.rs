//! Registration, login and logout through the full router

use crate::test_utils::*;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use campus_backend_lib::storage::Storage;

#[tokio::test]
async fn test_register_then_login() {
    let app = setup_test_app();

    let registered = app.register("ada", "pa55word", "Ada Lovelace").await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(registered.json()["message"], "User registered successfully");

    let logged_in = app.login("ada", "pa55word").await;
    assert_eq!(logged_in.status, StatusCode::OK);
    let body = logged_in.json();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["username"], "ada");
    assert_eq!(body["user"]["name"], "Ada Lovelace");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password").is_none());

    let cookie = logged_in.session_cookie().unwrap();
    assert!(cookie.starts_with("campus.sid="));
}

#[tokio::test]
async fn test_session_cookie_attributes() {
    let app = setup_test_app();
    app.register("ada", "pa55word", "Ada").await;

    let logged_in = app.login("ada", "pa55word").await;
    let set_cookie = logged_in.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
    assert!(!set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let app = setup_test_app();
    app.register("ada", "pa55word", "Ada").await;

    let stored = app.state.storage.find_user_by_username("ada").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "pa55word");
    assert!(stored.password_hash.starts_with("$scrypt$"));
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let app = setup_test_app();

    assert_eq!(app.register("ada", "first", "Ada").await.status, StatusCode::CREATED);

    let duplicate = app.register("ada", "second", "Impostor").await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.json()["error"]["code"], "USER_001");

    // The original account keeps its password
    assert_eq!(app.login("ada", "first").await.status, StatusCode::OK);
    assert_eq!(app.login("ada", "second").await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_credentials_are_rejected() {
    let app = setup_test_app();

    assert_eq!(app.register("", "pa55word", "Nobody").await.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.register("ada", "", "Ada").await.status, StatusCode::BAD_REQUEST);
    assert!(app.state.storage.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = setup_test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"]["code"], "VAL_001");
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = setup_test_app();
    app.register("ada", "pa55word", "Ada").await;

    let wrong_password = app.login("ada", "guess").await;
    let unknown_user = app.login("grace", "pa55word").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.json(), unknown_user.json());
    assert!(wrong_password.session_cookie().is_none());
}

#[tokio::test]
async fn test_form_encoded_login() {
    let app = setup_test_app();
    app.register("ada", "pa55word", "Ada").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=ada&password=pa55word"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.session_cookie().is_some());
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = setup_test_app();
    let cookie = app.signed_in("ada", "Ada").await;

    assert_eq!(app.get("/api/students", Some(&cookie)).await.status, StatusCode::OK);

    let logged_out = app.get("/api/auth/logout", Some(&cookie)).await;
    assert_eq!(logged_out.status, StatusCode::OK);
    assert_eq!(logged_out.json()["message"], "Logged out successfully");
    let cleared = logged_out.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.starts_with("campus.sid="));
    assert!(cleared.contains("Max-Age=0"));

    assert_eq!(
        app.get("/api/students", Some(&cookie)).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_logout_without_session_succeeds() {
    let app = setup_test_app();

    let response = app.get("/api/auth/logout", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], "Logged out successfully");
}

#[tokio::test]
async fn test_each_login_gets_its_own_session() {
    let app = setup_test_app();
    app.register("ada", "pa55word", "Ada").await;

    let first = app.login("ada", "pa55word").await.session_cookie().unwrap();
    let second = app.login("ada", "pa55word").await.session_cookie().unwrap();
    assert_ne!(first, second);

    app.get("/api/auth/logout", Some(&first)).await;
    assert_eq!(app.get("/api/students", Some(&first)).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.get("/api/students", Some(&second)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_form_registration_with_interests() {
    let app = setup_test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "username=ada&password=pw&name=Ada&academicInterests=math&academicInterests=logic",
        ))
        .unwrap();
    assert_eq!(app.send(request).await.status, StatusCode::CREATED);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=grace&password=pw&name=Grace&academicInterests=math"))
        .unwrap();
    assert_eq!(app.send(request).await.status, StatusCode::CREATED);

    let ada = app.state.storage.find_user_by_username("ada").await.unwrap().unwrap();
    assert_eq!(ada.academic_interests, ["math", "logic"]);
    let grace = app.state.storage.find_user_by_username("grace").await.unwrap().unwrap();
    assert_eq!(grace.academic_interests, ["math"]);
}

#[tokio::test]
async fn test_interests_key_is_accepted() {
    let app = setup_test_app();

    let response = app
        .post_json(
            "/api/auth/register",
            None,
            serde_json::json!({
                "username": "ada",
                "password": "pw",
                "name": "Ada",
                "interests": ["compilers"],
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let ada = app.state.storage.find_user_by_username("ada").await.unwrap().unwrap();
    assert_eq!(ada.academic_interests, ["compilers"]);
}
