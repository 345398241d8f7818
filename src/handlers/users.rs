use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::{no_content_response, success_response};
use crate::AppState;

/// Admin user management (list, delete). Registration lives under /auth.
pub fn admin_users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", axum::routing::delete(delete_user))
        .with_session()
}

async fn list_users(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let users = state.services.users.list().await?;
    Ok(success_response(users))
}

/// Self-deletion is rejected with 403
async fn delete_user(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    state.services.users.delete(&user, id).await?;
    Ok(no_content_response())
}
