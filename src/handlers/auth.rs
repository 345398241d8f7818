use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, success_response, validate_input};
use crate::services::users::UserSummary;
use crate::AppState;

/// Session endpoints: login is public, registration of further admins and
/// session introspection require an existing session.
pub fn auth_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/register", post(register))
        .route("/me", get(me))
        .with_session();

    Router::new().route("/login", post(login)).merge(protected)
}

/// Exchange credentials for a session token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued"),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let token = state.auth.login(&payload.email, &payload.password).await?;
    Ok(success_response(token))
}

/// Create an additional admin account (admin session required)
async fn register(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let created = state
        .services
        .users
        .register(payload.name, payload.email, payload.password)
        .await?;

    Ok(created_response(UserSummary::from(created)))
}

/// Session introspection
async fn me(user: AuthUser) -> Result<impl axum::response::IntoResponse, ServiceError> {
    Ok(success_response(user))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}
