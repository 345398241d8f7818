mod common;

use axum::http::StatusCode;
use common::{machine_payload, TestApp};
use serde_json::json;

#[tokio::test]
async fn slug_is_derived_and_collisions_conflict() {
    let app = TestApp::new().await;

    let (status, category) = app
        .post_authed("/api/v1/categories", json!({ "name": "Mini Excavators" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["slug"], "mini-excavators");

    // Different punctuation, same normalized slug
    let (status, body) = app
        .post_authed("/api/v1/categories", json!({ "name": "Mini   excavators!" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("mini-excavators"));
}

#[tokio::test]
async fn create_requires_session_and_name() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post("/api/v1/categories", json!({ "name": "Loaders" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post_authed("/api/v1/categories", json!({ "name": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_category_detaches_machines() {
    let app = TestApp::new().await;

    let (_, category) = app
        .post_authed("/api/v1/categories", json!({ "name": "Loaders" }))
        .await;

    let mut payload = machine_payload("L100");
    payload["category_id"] = category["id"].clone();
    let (_, machine) = app.post_authed("/api/v1/machines", payload).await;
    assert_eq!(machine["category_id"], category["id"]);

    let (status, _) = app
        .delete_authed(&format!(
            "/api/v1/categories/{}",
            category["id"].as_str().unwrap()
        ))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Machine survives with a null category
    let (status, view) = app
        .get(&format!("/api/v1/machines/{}", machine["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(view["category_id"].is_null());
    assert!(view.get("category").is_none());
}

#[tokio::test]
async fn update_rederives_slug_with_collision_check() {
    let app = TestApp::new().await;

    let (_, first) = app
        .post_authed("/api/v1/categories", json!({ "name": "Dumpers" }))
        .await;
    let (_, second) = app
        .post_authed("/api/v1/categories", json!({ "name": "Rollers" }))
        .await;

    // Renaming updates the slug
    let (status, renamed) = app
        .put_authed(
            &format!("/api/v1/categories/{}", second["id"].as_str().unwrap()),
            json!({ "name": "Road Rollers" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["slug"], "road-rollers");

    // Renaming into an existing slug conflicts
    let (status, _) = app
        .put_authed(
            &format!("/api/v1/categories/{}", second["id"].as_str().unwrap()),
            json!({ "name": first["name"].as_str().unwrap() }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
