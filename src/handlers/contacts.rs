use axum::{
    extract::{Json, Path, State},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::{
    created_response, no_content_response, normalize_optional_string, success_response,
    validate_input,
};
use crate::services::contacts::QuoteInput;
use crate::AppState;

/// Public quote form intake.
pub fn quote_routes() -> Router<AppState> {
    Router::new().route("/", post(submit_quote))
}

/// Admin triage of captured leads.
pub fn admin_contacts_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts))
        .route("/:id", patch(set_contact_read).delete(delete_contact))
        .with_session()
}

/// Capture a quote request and notify the configured recipient
#[utoipa::path(
    post,
    path = "/api/v1/quote",
    request_body = QuoteRequest,
    responses(
        (status = 201, description = "Lead captured"),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Quote"
)]
pub(crate) async fn submit_quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let submission = state
        .services
        .contacts
        .submit(QuoteInput {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_string(),
            phone: normalize_optional_string(payload.phone),
            message: payload.message.trim().to_string(),
        })
        .await?;

    Ok(created_response(submission))
}

async fn list_contacts(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let submissions = state.services.contacts.list().await?;
    Ok(success_response(submissions))
}

#[derive(Debug, Deserialize)]
pub struct SetReadRequest {
    pub read: bool,
}

async fn set_contact_read(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetReadRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let submission = state.services.contacts.set_read(id, payload.read).await?;
    Ok(success_response(submission))
}

async fn delete_contact(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    state.services.contacts.delete(id).await?;
    Ok(no_content_response())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Jan Kowalski",
    "email": "jan@example.com",
    "phone": "+48 600 100 200",
    "message": "Prosze o wycene minikoparki RE25 z transportem."
}))]
pub struct QuoteRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(length(min = 1))]
    pub message: String,
}
