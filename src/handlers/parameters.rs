use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post, put},
    Router,
};
use uuid::Uuid;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, no_content_response, success_response};
use crate::handlers::features::ScopeQuery;
use crate::services::attributes::ParameterDefinitionInput;
use crate::AppState;

/// Public read of parameter definitions.
pub fn parameters_routes() -> Router<AppState> {
    Router::new().route("/", get(list_parameters))
}

/// Admin CRUD over parameter definitions, including the clone shortcut.
pub fn admin_parameters_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_parameter))
        .route("/:id", put(update_parameter).delete(delete_parameter))
        .route("/:id/clone", post(clone_parameter))
        .with_session()
}

async fn list_parameters(
    State(state): State<AppState>,
    Query(scope): Query<ScopeQuery>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let parameters = state
        .services
        .attributes
        .list_parameters(scope.category_id)
        .await?;
    Ok(success_response(parameters))
}

async fn create_parameter(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ParameterDefinitionInput>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let parameter = state.services.attributes.create_parameter(payload).await?;
    Ok(created_response(parameter))
}

async fn update_parameter(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ParameterDefinitionInput>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let parameter = state
        .services
        .attributes
        .update_parameter(id, payload)
        .await?;
    Ok(success_response(parameter))
}

async fn delete_parameter(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    state.services.attributes.delete_parameter(id).await?;
    Ok(no_content_response())
}

/// Duplicate a definition with a `_copy`-suffixed key
async fn clone_parameter(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let clone = state.services.attributes.clone_parameter(id).await?;
    Ok(created_response(clone))
}
