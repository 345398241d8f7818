mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{machine_payload, TestApp};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

use gruntex_api::entities::{machine_image, machine_section, MachineImage, MachineSection};

#[tokio::test]
async fn create_requires_the_six_scalars() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_authed("/api/v1/machines", json!({ "name": "RE25" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().expect("error message");
    assert!(message.contains("power"));
    assert!(message.contains("bucket_capacity"));
}

#[tokio::test]
async fn create_requires_a_session() {
    let app = TestApp::new().await;

    let (status, _) = app.post("/api/v1/machines", machine_payload("RE25")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_returns_the_assembled_aggregate() {
    let app = TestApp::new().await;

    let mut payload = machine_payload("RE25");
    payload["images"] = json!(["/uploads/a.jpg", "/uploads/b.jpg"]);
    payload["sections"] = json!([
        { "title": "Hydraulics", "body": "Dual pump", "image_url": "/uploads/h.jpg" },
        { "title": "Undercarriage", "body": "Steel tracks" }
    ]);
    payload["downloads"] = json!([{ "label": "Spec sheet", "url": "/files/re25.pdf" }]);

    let (status, body) = app.post_authed("/api/v1/machines", payload).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "RE25");
    assert_eq!(body["visible"], json!(true));
    assert_eq!(body["images"].as_array().unwrap().len(), 2);
    assert_eq!(body["sections"].as_array().unwrap().len(), 2);
    assert_eq!(body["downloads"].as_array().unwrap().len(), 1);
    // Section image object appears only when an image_url was given
    assert!(body["sections"][0]["image"]["url"].is_string());
    assert!(body["sections"][1].get("image").is_none());
}

#[tokio::test]
async fn unknown_machine_is_404() {
    let app = TestApp::new().await;
    let (status, body) = app.get(&format!("/api/v1/machines/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn images_most_recent_first_and_sections_by_sort_order() {
    let app = TestApp::new().await;

    let (_, created) = app
        .post_authed("/api/v1/machines", machine_payload("RE25"))
        .await;
    let machine_id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();

    // Deterministic timestamps, inserted out of display order
    let base = Utc::now() - Duration::hours(3);
    for (offset, url) in [(0, "/uploads/old.jpg"), (2, "/uploads/new.jpg"), (1, "/uploads/mid.jpg")]
    {
        machine_image::ActiveModel {
            id: Set(Uuid::new_v4()),
            machine_id: Set(machine_id),
            url: Set(url.to_string()),
            created_at: Set(base + Duration::hours(offset)),
        }
        .insert(&*app.state.db)
        .await
        .unwrap();
    }

    for (order, title) in [(5, "Last"), (1, "First"), (3, "Middle")] {
        machine_section::ActiveModel {
            id: Set(Uuid::new_v4()),
            machine_id: Set(machine_id),
            title: Set(title.to_string()),
            body: Set("body".to_string()),
            sort_order: Set(order),
            image_url: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&*app.state.db)
        .await
        .unwrap();
    }

    let (status, body) = app.get(&format!("/api/v1/machines/{machine_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let image_urls: Vec<&str> = body["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["url"].as_str().unwrap())
        .collect();
    assert_eq!(
        image_urls,
        vec!["/uploads/new.jpg", "/uploads/mid.jpg", "/uploads/old.jpg"]
    );

    let section_titles: Vec<&str> = body["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(section_titles, vec!["First", "Middle", "Last"]);
}

#[tokio::test]
async fn update_without_images_key_keeps_gallery_and_empty_array_clears_it() {
    let app = TestApp::new().await;

    let mut payload = machine_payload("RE25");
    payload["images"] = json!(["/uploads/a.jpg", "/uploads/b.jpg"]);
    let (_, created) = app.post_authed("/api/v1/machines", payload).await;
    let machine_id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/machines/{machine_id}");

    // No `images` key at all: gallery untouched
    let (status, updated) = app.put_authed(&uri, machine_payload("RE25 v2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "RE25 v2");
    assert_eq!(updated["images"].as_array().unwrap().len(), 2);

    // Explicit empty array: every image removed
    let mut clear = machine_payload("RE25 v2");
    clear["images"] = json!([]);
    let (status, cleared) = app.put_authed(&uri, clear).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["images"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_reconciles_images_by_url_diff() {
    let app = TestApp::new().await;

    let mut payload = machine_payload("RE25");
    payload["images"] = json!(["/uploads/keep.jpg", "/uploads/drop.jpg"]);
    let (_, created) = app.post_authed("/api/v1/machines", payload).await;
    let machine_id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();

    let kept_id = created["images"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["url"] == "/uploads/keep.jpg")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let mut update = machine_payload("RE25");
    update["images"] = json!(["/uploads/keep.jpg", "/uploads/added.jpg"]);
    let (status, updated) = app
        .put_authed(&format!("/api/v1/machines/{machine_id}"), update)
        .await;
    assert_eq!(status, StatusCode::OK);

    let images = updated["images"].as_array().unwrap();
    let urls: Vec<&str> = images.iter().map(|i| i["url"].as_str().unwrap()).collect();
    assert_eq!(images.len(), 2);
    assert!(urls.contains(&"/uploads/keep.jpg"));
    assert!(urls.contains(&"/uploads/added.jpg"));

    // The surviving URL kept its row, it was not re-inserted
    assert!(images.iter().any(|i| i["id"] == json!(kept_id)));
}

#[tokio::test]
async fn empty_sections_array_is_a_no_op_unlike_images() {
    let app = TestApp::new().await;

    let mut payload = machine_payload("RE25");
    payload["sections"] = json!([{ "title": "Hydraulics", "body": "Dual pump" }]);
    let (_, created) = app.post_authed("/api/v1/machines", payload).await;
    let uri = format!("/api/v1/machines/{}", created["id"].as_str().unwrap());

    // Empty array: sections survive, unlike the images reconciliation
    let mut update = machine_payload("RE25");
    update["sections"] = json!([]);
    let (_, after_empty) = app.put_authed(&uri, update).await;
    assert_eq!(after_empty["sections"].as_array().unwrap().len(), 1);

    // Non-empty array: wholesale replacement
    let mut replace = machine_payload("RE25");
    replace["sections"] = json!([
        { "title": "New A", "body": "a" },
        { "title": "New B", "body": "b" }
    ]);
    let (_, after_replace) = app.put_authed(&uri, replace).await;
    let titles: Vec<&str> = after_replace["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["New A", "New B"]);
}

#[tokio::test]
async fn only_the_owner_may_update_or_delete() {
    let app = TestApp::new().await;

    let (_, created) = app
        .post_authed("/api/v1/machines", machine_payload("RE25"))
        .await;
    let uri = format!("/api/v1/machines/{}", created["id"].as_str().unwrap());

    let (_, other_token) = app.second_admin().await;

    let (status, _) = app
        .request(
            Method::PUT,
            &uri,
            Some(machine_payload("hijack")),
            Some(&other_token),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::DELETE, &uri, None, Some(&other_token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner can delete
    let (status, _) = app.delete_authed(&uri).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_cascades_to_dependent_rows() {
    let app = TestApp::new().await;

    let mut payload = machine_payload("RE25");
    payload["images"] = json!(["/uploads/a.jpg"]);
    payload["sections"] = json!([{ "title": "T", "body": "B" }]);
    let (_, created) = app.post_authed("/api/v1/machines", payload).await;
    let machine_id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();

    let (status, _) = app
        .delete_authed(&format!("/api/v1/machines/{machine_id}"))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let images = MachineImage::find()
        .filter(machine_image::Column::MachineId.eq(machine_id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(images.is_empty());

    let sections = MachineSection::find()
        .filter(machine_section::Column::MachineId.eq(machine_id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(sections.is_empty());
}

#[tokio::test]
async fn clone_end_to_end() {
    let app = TestApp::new().await;

    let (status, category) = app
        .post_authed("/api/v1/categories", json!({ "name": "Mini Excavators" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["slug"], "mini-excavators");

    let mut payload = machine_payload("RE25");
    payload["category_id"] = category["id"].clone();
    payload["images"] = json!(["/uploads/re25-1.jpg", "/uploads/re25-2.jpg"]);
    payload["sections"] = json!([{ "title": "Hydraulics", "body": "Dual pump" }]);
    let (_, source) = app.post_authed("/api/v1/machines", payload).await;
    let source_id = source["id"].as_str().unwrap();

    let (status, clone) = app
        .post_authed(&format!("/api/v1/machines/{source_id}/clone"), json!({}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(clone["name"], "RE25 (kopia)");
    assert_eq!(clone["visible"], json!(false));
    assert_eq!(clone["featured"], json!(false));
    assert_eq!(clone["admin_id"], json!(app.admin_id.to_string()));
    assert_ne!(clone["id"], source["id"]);

    // Full aggregate of the clone
    let (_, view) = app
        .get(&format!("/api/v1/machines/{}", clone["id"].as_str().unwrap()))
        .await;

    let source_urls: Vec<&str> = source["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["url"].as_str().unwrap())
        .collect();
    let clone_images = view["images"].as_array().unwrap();
    assert_eq!(clone_images.len(), 2);
    for image in clone_images {
        assert!(source_urls.contains(&image["url"].as_str().unwrap()));
        // Row ids are fresh even though URLs are shared
        assert!(!source["images"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s["id"] == image["id"]));
    }

    assert_eq!(
        view["sections"].as_array().unwrap().len(),
        source["sections"].as_array().unwrap().len()
    );
    assert_eq!(view["category_id"], source["category_id"]);
}

#[tokio::test]
async fn clone_repoints_hero_to_the_matching_cloned_image() {
    let app = TestApp::new().await;

    let mut payload = machine_payload("RE25");
    payload["images"] = json!(["/uploads/newer.jpg", "/uploads/older.jpg"]);
    let (_, created) = app.post_authed("/api/v1/machines", payload).await;
    let machine_id = created["id"].as_str().unwrap().to_string();

    // Pick a specific image as hero, regardless of recency
    let hero = created["images"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["url"] == "/uploads/older.jpg")
        .unwrap();
    let mut update = machine_payload("RE25");
    update["hero_image_id"] = hero["id"].clone();
    let (_, updated) = app
        .put_authed(&format!("/api/v1/machines/{machine_id}"), update)
        .await;
    assert_eq!(updated["hero_image_id"], hero["id"]);

    let (_, clone) = app
        .post_authed(&format!("/api/v1/machines/{machine_id}/clone"), json!({}))
        .await;
    let (_, view) = app
        .get(&format!("/api/v1/machines/{}", clone["id"].as_str().unwrap()))
        .await;

    // The clone's hero is its own copy of the same photo, not whichever
    // image happens to be newest
    let clone_hero_id = view["hero_image_id"].as_str().unwrap();
    let clone_hero = view["images"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == json!(clone_hero_id))
        .expect("hero points at one of the clone's images");
    assert_eq!(clone_hero["url"], "/uploads/older.jpg");
    assert_ne!(json!(clone_hero_id), hero["id"]);
}
