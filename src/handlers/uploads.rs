use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Router,
};

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::created_response;
use crate::AppState;

/// Multipart image upload through the storage abstraction. Derivative
/// renditions (AVIF/WEBP, blur placeholders) are the storage provider's
/// concern, not the API's.
pub fn admin_uploads_routes(max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(upload_file))
        .layer(DefaultBodyLimit::max(max_bytes))
        .with_session()
}

async fn upload_file(
    _user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.bin").to_string();
        let bytes = field.bytes().await.map_err(map_multipart_error)?;

        if bytes.is_empty() {
            return Err(ServiceError::ValidationError(
                "uploaded file is empty".to_string(),
            ));
        }

        let stored = state.services.storage.store(&filename, &bytes).await?;
        return Ok(created_response(stored));
    }

    Err(ServiceError::ValidationError(
        "multipart field 'file' is required".to_string(),
    ))
}

fn map_multipart_error(err: axum::extract::multipart::MultipartError) -> ServiceError {
    let status = err.status();
    if status == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        ServiceError::PayloadTooLarge("uploaded file exceeds the size limit".to_string())
    } else {
        ServiceError::ValidationError(format!("invalid multipart payload: {err}"))
    }
}
