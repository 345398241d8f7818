use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, no_content_response, success_response};
use crate::services::attributes::FeatureDefinitionInput;
use crate::AppState;

/// Public read of feature definitions.
pub fn features_routes() -> Router<AppState> {
    Router::new().route("/", get(list_features))
}

/// Admin CRUD over feature definitions.
pub fn admin_features_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_feature))
        .route("/:id", put(update_feature).delete(delete_feature))
        .route("/:id/clone", post(clone_feature))
        .with_session()
}

#[derive(Debug, Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

async fn list_features(
    State(state): State<AppState>,
    Query(scope): Query<ScopeQuery>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let features = state
        .services
        .attributes
        .list_features(scope.category_id)
        .await?;
    Ok(success_response(features))
}

async fn create_feature(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<FeatureDefinitionInput>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let feature = state.services.attributes.create_feature(payload).await?;
    Ok(created_response(feature))
}

async fn update_feature(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FeatureDefinitionInput>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let feature = state
        .services
        .attributes
        .update_feature(id, payload)
        .await?;
    Ok(success_response(feature))
}

/// Deleting a definition cascades to all bound machine values.
async fn delete_feature(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    state.services.attributes.delete_feature(id).await?;
    Ok(no_content_response())
}

async fn clone_feature(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let clone = state.services.attributes.clone_feature(id).await?;
    Ok(created_response(clone))
}
