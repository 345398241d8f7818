mod common;

use axum::http::{Method, StatusCode};
use common::{machine_payload, TestApp};
use serde_json::json;

async fn create_machine(app: &TestApp) -> String {
    let (_, body) = app
        .post_authed("/api/v1/machines", machine_payload("RE25"))
        .await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn replace_inserts_in_array_order_and_skips_nameless_entries() {
    let app = TestApp::new().await;
    let machine_id = create_machine(&app).await;
    let uri = format!("/api/v1/machines/{machine_id}/variants");

    let payload = json!({
        "groups": [
            {
                "name": "Cabin",
                "options": [
                    { "name": "Canopy", "price_modifier": 0, "is_default": true },
                    { "name": "", "price_modifier": 100 },
                    { "name": "Closed cab", "price_modifier": "4500" },
                ],
            },
            { "name": "   ", "options": [{ "name": "Ghost" }] },
            {
                "name": "Tracks",
                "options": [{ "name": "Rubber" }, { "name": "Steel", "price_modifier": "not a number" }],
            },
        ]
    });

    let (status, groups) = app.put_authed(&uri, payload).await;
    assert_eq!(status, StatusCode::OK);

    let groups = groups.as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["name"], "Cabin");
    assert_eq!(groups[1]["name"], "Tracks");

    let cabin_options = groups[0]["options"].as_array().unwrap();
    assert_eq!(cabin_options.len(), 2);
    assert_eq!(cabin_options[0]["name"], "Canopy");
    assert_eq!(cabin_options[0]["is_default"], json!(true));
    assert_eq!(cabin_options[1]["name"], "Closed cab");
    assert_eq!(cabin_options[1]["price_modifier"], "4500");

    // Unparseable modifier coerced to zero
    let steel = &groups[1]["options"][1];
    assert_eq!(steel["price_modifier"], "0");
}

#[tokio::test]
async fn replace_is_wholesale_and_owner_gated() {
    let app = TestApp::new().await;
    let machine_id = create_machine(&app).await;
    let uri = format!("/api/v1/machines/{machine_id}/variants");

    app.put_authed(
        &uri,
        json!({ "groups": [{ "name": "Cabin", "options": [{ "name": "Canopy" }] }] }),
    )
    .await;

    // Second replace fully supersedes the first
    let (_, groups) = app
        .put_authed(
            &uri,
            json!({ "groups": [{ "name": "Engine", "options": [{ "name": "Diesel" }] }] }),
        )
        .await;
    let groups = groups.as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["name"], "Engine");

    // Non-owner gets 403
    let (_, other_token) = app.second_admin().await;
    let (status, _) = app
        .request(
            Method::PUT,
            &uri,
            Some(json!({ "groups": [] })),
            Some(&other_token),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reads stay public
    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn variants_of_unknown_machine_are_404() {
    let app = TestApp::new().await;
    let (status, _) = app
        .get(&format!("/api/v1/machines/{}/variants", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn machine_view_derives_quick_specs_and_price_range() {
    let app = TestApp::new().await;
    let machine_id = create_machine(&app).await;

    // Quick-spec parameter plus a price-affecting percent parameter
    let (_, power) = app
        .post_authed(
            "/api/v1/admin/parameters",
            json!({
                "key": "engine_power",
                "label": "Engine power",
                "is_quick_spec": true,
                "quick_spec_order": 1,
                "quick_spec_label": "Power",
            }),
        )
        .await;
    let (_, margin) = app
        .post_authed(
            "/api/v1/admin/parameters",
            json!({
                "key": "import_margin",
                "label": "Import margin",
                "affects_price": true,
                "price_modifier": "10",
                "price_modifier_type": "percent",
            }),
        )
        .await;

    let mut update = machine_payload("RE25");
    update["parameters"] = json!([
        { "parameter_id": power["id"], "value": "25 KM" },
        { "parameter_id": margin["id"], "value": true },
    ]);
    app.put_authed(&format!("/api/v1/machines/{machine_id}"), update)
        .await;

    app.put_authed(
        &format!("/api/v1/machines/{machine_id}/variants"),
        json!({
            "groups": [{
                "name": "Cabin",
                "options": [
                    { "name": "Canopy", "price_modifier": 0 },
                    { "name": "Closed cab", "price_modifier": 4500 },
                ],
            }]
        }),
    )
    .await;

    let (status, view) = app.get(&format!("/api/v1/machines/{machine_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let quick_specs = view["quick_specs"].as_array().unwrap();
    assert_eq!(quick_specs.len(), 1);
    assert_eq!(quick_specs[0]["label"], "Power");
    assert_eq!(quick_specs[0]["value"], "25 KM");

    // base 65000, +10% parameter, options 0..4500
    let decimal = |v: &serde_json::Value| v.as_str().unwrap().parse::<f64>().unwrap();
    assert_eq!(decimal(&view["price_range"]["base"]), 65000.0);
    assert_eq!(decimal(&view["price_range"]["from"]), 71500.0);
    assert_eq!(decimal(&view["price_range"]["to"]), 76000.0);
}
