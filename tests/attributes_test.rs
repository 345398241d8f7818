mod common;

use axum::http::StatusCode;
use common::{machine_payload, TestApp};
use sea_orm::EntityTrait;
use serde_json::json;

use gruntex_api::entities::FeatureValue;

#[tokio::test]
async fn feature_keys_are_unique_per_category_scope() {
    let app = TestApp::new().await;

    let (_, category) = app
        .post_authed("/api/v1/categories", json!({ "name": "Mini Excavators" }))
        .await;

    let scoped = json!({
        "category_id": category["id"],
        "key": "cab_type",
        "label": "Cab type",
        "kind": "select",
        "options": ["Open", "Closed"],
    });

    let (status, _) = app.post_authed("/api/v1/admin/features", scoped.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same key in the same category conflicts
    let (status, _) = app.post_authed("/api/v1/admin/features", scoped).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Same key in the global scope is fine
    let (status, _) = app
        .post_authed(
            "/api/v1/admin/features",
            json!({ "key": "cab_type", "label": "Cab type" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // And conflicts within the global scope
    let (status, _) = app
        .post_authed(
            "/api/v1/admin/features",
            json!({ "key": "cab_type", "label": "Cab type" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn category_filter_returns_scoped_plus_global() {
    let app = TestApp::new().await;

    let (_, category) = app
        .post_authed("/api/v1/categories", json!({ "name": "Loaders" }))
        .await;
    let (_, other) = app
        .post_authed("/api/v1/categories", json!({ "name": "Dumpers" }))
        .await;

    for (key, cat) in [
        ("scoped_key", Some(&category)),
        ("other_key", Some(&other)),
        ("global_key", None),
    ] {
        let mut payload = json!({ "key": key, "label": key });
        if let Some(cat) = cat {
            payload["category_id"] = cat["id"].clone();
        }
        app.post_authed("/api/v1/admin/features", payload).await;
    }

    let (status, body) = app
        .get(&format!(
            "/api/v1/features?category_id={}",
            category["id"].as_str().unwrap()
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let keys: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["key"].as_str().unwrap())
        .collect();
    assert!(keys.contains(&"scoped_key"));
    assert!(keys.contains(&"global_key"));
    assert!(!keys.contains(&"other_key"));
}

#[tokio::test]
async fn deleting_a_definition_cascades_to_all_bound_values() {
    let app = TestApp::new().await;

    let (_, feature) = app
        .post_authed(
            "/api/v1/admin/features",
            json!({ "key": "warranty", "label": "Warranty" }),
        )
        .await;

    // Bind the feature on two machines
    for name in ["RE25", "RE30"] {
        let (_, machine) = app
            .post_authed("/api/v1/machines", machine_payload(name))
            .await;
        let mut update = machine_payload(name);
        update["features"] = json!([{ "feature_id": feature["id"], "value": "24 months" }]);
        let (status, updated) = app
            .put_authed(
                &format!("/api/v1/machines/{}", machine["id"].as_str().unwrap()),
                update,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["features"].as_array().unwrap().len(), 1);
    }

    assert_eq!(
        FeatureValue::find().all(&*app.state.db).await.unwrap().len(),
        2
    );

    let (status, _) = app
        .delete_authed(&format!(
            "/api/v1/admin/features/{}",
            feature["id"].as_str().unwrap()
        ))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // No orphaned values remain
    assert!(FeatureValue::find()
        .all(&*app.state.db)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn feature_values_upsert_per_machine_feature_pair() {
    let app = TestApp::new().await;

    let (_, feature) = app
        .post_authed(
            "/api/v1/admin/features",
            json!({ "key": "warranty", "label": "Warranty" }),
        )
        .await;
    let (_, machine) = app
        .post_authed("/api/v1/machines", machine_payload("RE25"))
        .await;
    let uri = format!("/api/v1/machines/{}", machine["id"].as_str().unwrap());

    for value in ["12 months", "24 months"] {
        let mut update = machine_payload("RE25");
        update["features"] = json!([{ "feature_id": feature["id"], "value": value }]);
        app.put_authed(&uri, update).await;
    }

    let (_, view) = app.get(&uri).await;
    let features = view["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["value"], "24 months");
    assert_eq!(features[0]["key"], "warranty");
}

#[tokio::test]
async fn parameter_clone_appends_copy_suffix_until_free() {
    let app = TestApp::new().await;

    let (status, parameter) = app
        .post_authed(
            "/api/v1/admin/parameters",
            json!({
                "key": "transport",
                "label": "Transport",
                "affects_price": true,
                "price_modifier": "1500",
                "price_modifier_type": "fixed",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!(
        "/api/v1/admin/parameters/{}/clone",
        parameter["id"].as_str().unwrap()
    );

    let (status, first_clone) = app.post_authed(&uri, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first_clone["key"], "transport_copy");
    assert_eq!(first_clone["affects_price"], json!(true));
    assert_eq!(first_clone["price_modifier_type"], "fixed");

    // Cloning again walks past the taken key
    let (status, second_clone) = app.post_authed(&uri, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second_clone["key"], "transport_copy_copy");
}

#[tokio::test]
async fn price_affecting_parameters_validate_modifier_fields() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_authed(
            "/api/v1/admin/parameters",
            json!({ "key": "transport", "label": "Transport", "affects_price": true }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("price_modifier"));
}
