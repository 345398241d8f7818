use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::success_response;
use crate::services::settings::SmtpSettings;
use crate::AppState;

/// SMTP settings live in the key/value settings repository; this endpoint
/// reads and upserts the fixed key set.
pub fn admin_settings_routes() -> Router<AppState> {
    Router::new()
        .route("/smtp", get(get_smtp_settings).put(update_smtp_settings))
        .with_session()
}

async fn get_smtp_settings(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let settings = state.services.settings.smtp_settings().await?;
    Ok(success_response(settings))
}

async fn update_smtp_settings(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<SmtpSettings>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let settings = state
        .services
        .settings
        .update_smtp_settings(&payload)
        .await?;
    Ok(success_response(settings))
}
