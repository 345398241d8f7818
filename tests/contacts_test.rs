mod common;

use axum::http::StatusCode;
use common::TestApp;
use sea_orm::EntityTrait;
use serde_json::json;

use gruntex_api::entities::ContactSubmission;

#[tokio::test]
async fn invalid_email_is_rejected_with_400() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/quote",
            json!({
                "name": "Jan Kowalski",
                "email": "not-an-email",
                "message": "Prosze o wycene RE25",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn valid_quote_is_persisted_unread() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/quote",
            json!({
                "name": "Jan Kowalski",
                "email": "jan@example.com",
                "phone": "+48 600 100 200",
                "message": "Prosze o wycene minikoparki RE25 z transportem.",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["read"], json!(false));

    let rows = ContactSubmission::find().all(&*app.state.db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "jan@example.com");
    assert!(!rows[0].read);
}

#[tokio::test]
async fn triage_requires_session_and_toggles_read() {
    let app = TestApp::new().await;

    let (_, submission) = app
        .post(
            "/api/v1/quote",
            json!({ "name": "Anna", "email": "anna@example.com", "message": "Oferta?" }),
        )
        .await;
    let id = submission["id"].as_str().unwrap();

    // No session: list and patch are rejected
    let (status, _) = app.get("/api/v1/admin/contacts").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, list) = app.get_authed("/api/v1/admin/contacts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, updated) = app
        .patch_authed(
            &format!("/api/v1/admin/contacts/{id}"),
            json!({ "read": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["read"], json!(true));

    let (status, _) = app
        .delete_authed(&format!("/api/v1/admin/contacts/{id}"))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = app.get_authed("/api/v1/admin/contacts").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn submissions_list_newest_first() {
    let app = TestApp::new().await;

    for (name, msg) in [("First", "a"), ("Second", "b"), ("Third", "c")] {
        app.post(
            "/api/v1/quote",
            json!({ "name": name, "email": "x@example.com", "message": msg }),
        )
        .await;
    }

    let (_, list) = app.get_authed("/api/v1/admin/contacts").await;
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);
}
