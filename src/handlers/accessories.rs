use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::{no_content_response, success_response};
use crate::AppState;

/// Public accessory read: visible machines only.
pub fn accessories_routes() -> Router<AppState> {
    Router::new().route("/", get(list_public_accessories))
}

/// Admin accessory management: unfiltered read, replace-all, single delete.
pub fn admin_accessories_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admin_accessories).put(replace_accessories))
        .route("/:id", delete(delete_accessory_link))
        .with_session()
}

#[derive(Debug, Deserialize)]
pub struct AccessoryQuery {
    pub machine_id: Uuid,
}

/// Bidirectional accessory list, filtered to visible machines
async fn list_public_accessories(
    State(state): State<AppState>,
    Query(query): Query<AccessoryQuery>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let machines = state
        .services
        .accessories
        .linked_machines(query.machine_id, true)
        .await?;
    Ok(success_response(machines))
}

/// Bidirectional accessory list including hidden machines, plus the raw
/// outbound links so the editor can address single rows
async fn list_admin_accessories(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<AccessoryQuery>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let machines = state
        .services
        .accessories
        .linked_machines(query.machine_id, false)
        .await?;
    let links = state
        .services
        .accessories
        .outbound_links(query.machine_id)
        .await?;

    Ok(success_response(json!({
        "machines": machines,
        "links": links,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceAccessoriesRequest {
    pub machine_id: Uuid,
    #[serde(default)]
    pub accessory_ids: Vec<Uuid>,
}

/// Replace the machine's outbound accessory set; idempotent
async fn replace_accessories(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ReplaceAccessoriesRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    state
        .services
        .accessories
        .replace(payload.machine_id, payload.accessory_ids)
        .await?;

    let links = state
        .services
        .accessories
        .outbound_links(payload.machine_id)
        .await?;
    Ok(success_response(links))
}

async fn delete_accessory_link(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    state.services.accessories.delete_link(id).await?;
    Ok(no_content_response())
}
