use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use perch_api::{AppStateInner, router};
use perch_db::Database;
use perch_db::accounts::AccountStore;
use perch_db::messages::MessageStore;
use perch_service::accounts::AccountService;
use perch_service::messages::MessageService;

fn app() -> Router {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let accounts = AccountStore::new(db.clone());
    let messages = MessageStore::new(db);

    router(Arc::new(AppStateInner {
        accounts: AccountService::new(accounts.clone()),
        messages: MessageService::new(messages, accounts),
    }))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn register(app: &Router, username: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/register",
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn registration_and_login() {
    let app = app();

    let account = register(&app, "bob", "1234").await;
    assert!(account["account_id"].as_i64().unwrap() > 0);
    assert_eq!(account["username"], "bob");

    // Same username again, any password: conflict
    let (status, _) = send(
        &app,
        "POST",
        "/register",
        Some(json!({ "username": "bob", "password": "zzzz" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Short password and blank username: rejected
    let (status, _) = send(
        &app,
        "POST",
        "/register",
        Some(json!({ "username": "ann", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/register",
        Some(json!({ "username": "  ", "password": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Correct credentials return the account
    let (status, body) = send(
        &app,
        "POST",
        "/login",
        Some(json!({ "username": "bob", "password": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let logged_in: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(logged_in["account_id"], account["account_id"]);

    // Wrong password and unknown username both come back 401
    let (status, _) = send(
        &app,
        "POST",
        "/login",
        Some(json!({ "username": "bob", "password": "4321" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/login",
        Some(json!({ "username": "ghost", "password": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn message_lifecycle() {
    let app = app();
    let author = register(&app, "bob", "1234").await;
    let author_id = author["account_id"].as_i64().unwrap();

    // Create
    let (status, body) = send(
        &app,
        "POST",
        "/messages",
        Some(json!({
            "posted_by": author_id,
            "message_text": "hello",
            "time_posted_epoch": 1000,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let message: Value = serde_json::from_slice(&body).unwrap();
    let message_id = message["message_id"].as_i64().unwrap();
    assert!(message_id > 0);
    assert_eq!(message["message_text"], "hello");
    assert_eq!(message["time_posted_epoch"], 1000);

    // Bad creations: blank text, unknown author
    let (status, _) = send(
        &app,
        "POST",
        "/messages",
        Some(json!({ "posted_by": author_id, "message_text": " ", "time_posted_epoch": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/messages",
        Some(json!({ "posted_by": author_id + 99, "message_text": "hi", "time_posted_epoch": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // List and fetch
    let (status, body) = send(&app, "GET", "/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    let all: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", &format!("/messages/{message_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched, message);

    // Missing id: 200 with an empty body, not an error
    let (status, body) = send(&app, "GET", "/messages/9999", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    // Per-account listing
    let (status, body) = send(&app, "GET", &format!("/accounts/{author_id}/messages"), None).await;
    assert_eq!(status, StatusCode::OK);
    let mine: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/accounts/424242/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    let none: Value = serde_json::from_slice(&body).unwrap();
    assert!(none.as_array().unwrap().is_empty());

    // Update
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/messages/{message_id}"),
        Some(json!({ "message_text": "edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(updated["message_text"], "edited");
    assert_eq!(updated["time_posted_epoch"], 1000);

    // Bad updates: blank text, over-long text, unknown id
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/messages/{message_id}"),
        Some(json!({ "message_text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/messages/{message_id}"),
        Some(json!({ "message_text": "x".repeat(255) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PATCH",
        "/messages/9999",
        Some(json!({ "message_text": "fine" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Delete returns the prior snapshot, then becomes a no-op
    let (status, body) = send(&app, "DELETE", &format!("/messages/{message_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let deleted: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(deleted["message_text"], "edited");

    let (status, body) = send(&app, "DELETE", &format!("/messages/{message_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (status, body) = send(&app, "GET", "/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    let all: Value = serde_json::from_slice(&body).unwrap();
    assert!(all.as_array().unwrap().is_empty());
}
