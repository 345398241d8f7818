mod common;

use axum::http::StatusCode;
use common::{machine_payload, TestApp};
use sea_orm::EntityTrait;
use serde_json::json;

use gruntex_api::entities::MachineAccessory;

async fn create_machine(app: &TestApp, name: &str, visible: bool) -> String {
    let mut payload = machine_payload(name);
    payload["visible"] = json!(visible);
    let (status, body) = app.post_authed("/api/v1/machines", payload).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn replace_is_idempotent_and_skips_self_links() {
    let app = TestApp::new().await;

    let parent = create_machine(&app, "RE25", true).await;
    let acc_a = create_machine(&app, "Bucket 30", true).await;
    let acc_b = create_machine(&app, "Hammer H1", true).await;

    let payload = json!({
        "machine_id": parent,
        // Self-reference and duplicate should both vanish
        "accessory_ids": [acc_a, acc_b, parent, acc_a],
    });

    let (status, links) = app.put_authed("/api/v1/admin/accessories", payload.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(links.as_array().unwrap().len(), 2);

    // Second identical call: still exactly one row per pair
    let (status, links) = app.put_authed("/api/v1/admin/accessories", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(links.as_array().unwrap().len(), 2);

    let all = MachineAccessory::find().all(&*app.state.db).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all
        .iter()
        .all(|l| l.parent_machine_id != l.accessory_machine_id));
}

#[tokio::test]
async fn reads_are_bidirectional_and_public_filters_visibility() {
    let app = TestApp::new().await;

    let parent = create_machine(&app, "RE25", true).await;
    let visible_acc = create_machine(&app, "Bucket 30", true).await;
    let hidden_acc = create_machine(&app, "Prototype Ripper", false).await;

    app.put_authed(
        "/api/v1/admin/accessories",
        json!({ "machine_id": parent, "accessory_ids": [visible_acc, hidden_acc] }),
    )
    .await;

    // Public view from the parent: only the visible accessory
    let (status, body) = app
        .get(&format!("/api/v1/accessories?machine_id={parent}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bucket 30"]);

    // Public view from the accessory side: the parent appears (inverse direction)
    let (_, body) = app
        .get(&format!("/api/v1/accessories?machine_id={visible_acc}"))
        .await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["RE25"]);

    // Admin view sees hidden machines too
    let (status, body) = app
        .get_authed(&format!("/api/v1/admin/accessories?machine_id={parent}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["machines"].as_array().unwrap().len(), 2);
    assert_eq!(body["links"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn single_link_delete_and_unknown_machine() {
    let app = TestApp::new().await;

    let parent = create_machine(&app, "RE25", true).await;
    let acc = create_machine(&app, "Bucket 30", true).await;

    let (_, links) = app
        .put_authed(
            "/api/v1/admin/accessories",
            json!({ "machine_id": parent, "accessory_ids": [acc] }),
        )
        .await;
    let link_id = links[0]["id"].as_str().unwrap();

    let (status, _) = app
        .delete_authed(&format!("/api/v1/admin/accessories/{link_id}"))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .delete_authed(&format!("/api/v1/admin/accessories/{link_id}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Replacing accessories of a nonexistent machine is a 404
    let (status, _) = app
        .put_authed(
            "/api/v1/admin/accessories",
            json!({ "machine_id": uuid::Uuid::new_v4(), "accessory_ids": [acc] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_machine_removes_links_on_both_sides() {
    let app = TestApp::new().await;

    let parent = create_machine(&app, "RE25", true).await;
    let acc = create_machine(&app, "Bucket 30", true).await;

    app.put_authed(
        "/api/v1/admin/accessories",
        json!({ "machine_id": parent, "accessory_ids": [acc] }),
    )
    .await;

    let (status, _) = app.delete_authed(&format!("/api/v1/machines/{acc}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let remaining = MachineAccessory::find().all(&*app.state.db).await.unwrap();
    assert!(remaining.is_empty());
}
