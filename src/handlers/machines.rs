use axum::{
    extract::{Json, Path, State},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::{
    created_response, no_content_response, normalize_optional_string, success_response,
};
use crate::services::machines::{
    CreateMachineInput, DownloadInput, FeatureValueInput, ParameterValueInput, SectionInput,
    UpdateMachineInput,
};
use crate::services::variants::VariantGroupInput;
use crate::AppState;

/// Routes for the machine aggregate, including variants.
pub fn machines_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_machine))
        .route("/:id", put(update_machine).delete(delete_machine))
        .route("/:id/clone", post(clone_machine))
        .route("/:id/variants", put(replace_variants))
        .with_session();

    Router::new()
        .route("/", get(list_machines))
        .route("/:id", get(get_machine))
        .route("/:id/variants", get(get_variants))
        .merge(protected)
}

/// List all machines, denormalized, newest first
#[utoipa::path(
    get,
    path = "/api/v1/machines",
    responses(
        (status = 200, description = "Machines retrieved")
    ),
    tag = "Machines"
)]
pub(crate) async fn list_machines(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let machines = state.services.catalog.list_machines().await?;
    Ok(success_response(machines))
}

/// Full aggregate for one machine
#[utoipa::path(
    get,
    path = "/api/v1/machines/:id",
    params(("id" = Uuid, Path, description = "Machine ID")),
    responses(
        (status = 200, description = "Machine retrieved"),
        (status = 404, description = "Machine not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Machines"
)]
pub(crate) async fn get_machine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let machine = state.services.catalog.get_machine(id).await?;
    Ok(success_response(machine))
}

/// Create a machine with optional related collections
#[utoipa::path(
    post,
    path = "/api/v1/machines",
    request_body = CreateMachineRequest,
    responses(
        (status = 201, description = "Machine created"),
        (status = 400, description = "Missing required fields", body = crate::errors::ErrorResponse),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Machines"
)]
pub(crate) async fn create_machine(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateMachineRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let input = payload.into_input()?;

    let machine = state.services.machines.create(&user, input).await?;
    let view = state.services.catalog.get_machine(machine.id).await?;

    Ok(created_response(view))
}

/// Overwrite scalar state and apply collection updates
#[utoipa::path(
    put,
    path = "/api/v1/machines/:id",
    params(("id" = Uuid, Path, description = "Machine ID")),
    request_body = UpdateMachineRequest,
    responses(
        (status = 200, description = "Machine updated"),
        (status = 400, description = "Missing required fields", body = crate::errors::ErrorResponse),
        (status = 403, description = "Not the owner", body = crate::errors::ErrorResponse),
        (status = 404, description = "Machine not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Machines"
)]
pub(crate) async fn update_machine(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMachineRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let input = payload.into_input()?;

    state.services.machines.update(&user, id, input).await?;
    let view = state.services.catalog.get_machine(id).await?;

    Ok(success_response(view))
}

/// Delete a machine and its dependent rows
#[utoipa::path(
    delete,
    path = "/api/v1/machines/:id",
    params(("id" = Uuid, Path, description = "Machine ID")),
    responses(
        (status = 204, description = "Machine deleted"),
        (status = 403, description = "Not the owner", body = crate::errors::ErrorResponse),
        (status = 404, description = "Machine not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Machines"
)]
pub(crate) async fn delete_machine(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    state.services.machines.delete(&user, id).await?;
    Ok(no_content_response())
}

/// Deep-copy a machine; returns the new scalar row
#[utoipa::path(
    post,
    path = "/api/v1/machines/:id/clone",
    params(("id" = Uuid, Path, description = "Machine ID")),
    responses(
        (status = 201, description = "Machine cloned"),
        (status = 403, description = "Not the owner", body = crate::errors::ErrorResponse),
        (status = 404, description = "Machine not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Machines"
)]
pub(crate) async fn clone_machine(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let clone = state.services.machines.clone_machine(&user, id).await?;
    Ok(created_response(clone))
}

/// Ordered variant groups with options
async fn get_variants(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    // 404 for unknown machines rather than an empty list
    state.services.catalog.get_machine(id).await?;
    let groups = state.services.catalog.variant_groups(id).await?;
    Ok(success_response(groups))
}

/// Replace the machine's variant groups wholesale
async fn replace_variants(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceVariantsRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    state
        .services
        .variants
        .replace(&user, id, payload.groups)
        .await?;

    let groups = state.services.catalog.variant_groups(id).await?;
    Ok(success_response(groups))
}

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct ReplaceVariantsRequest {
    #[serde(default)]
    pub groups: Vec<VariantGroupInput>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateMachineRequest {
    pub name: Option<String>,
    pub power: Option<String>,
    pub dig_depth: Option<String>,
    pub weight: Option<String>,
    pub bucket_capacity: Option<String>,
    pub price: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hero_description: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub images: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub sections: Vec<SectionInput>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub downloads: Vec<DownloadInput>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub features: Vec<FeatureValueInput>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub parameters: Vec<ParameterValueInput>,
}

impl CreateMachineRequest {
    fn into_input(self) -> Result<CreateMachineInput, ServiceError> {
        let (name, power, dig_depth, weight, bucket_capacity, price) = require_scalars(
            self.name,
            self.power,
            self.dig_depth,
            self.weight,
            self.bucket_capacity,
            self.price,
        )?;

        Ok(CreateMachineInput {
            name,
            power,
            dig_depth,
            weight,
            bucket_capacity,
            price,
            description: normalize_optional_string(self.description),
            hero_description: normalize_optional_string(self.hero_description),
            featured: self.featured.unwrap_or(false),
            visible: self.visible.unwrap_or(true),
            category_id: self.category_id,
            images: self.images,
            sections: self.sections,
            downloads: self.downloads,
            features: self.features,
            parameters: self.parameters,
        })
    }
}

/// Scalars are overwritten as a whole; collection keys are tri-state. A
/// missing `images` key leaves the gallery alone while `images: []`
/// clears it; `sections`/`downloads` only replace when non-empty.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateMachineRequest {
    pub name: Option<String>,
    pub power: Option<String>,
    pub dig_depth: Option<String>,
    pub weight: Option<String>,
    pub bucket_capacity: Option<String>,
    pub price: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hero_description: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub hero_image_id: Option<Uuid>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub sections: Option<Vec<SectionInput>>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub downloads: Option<Vec<DownloadInput>>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub features: Option<Vec<FeatureValueInput>>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub parameters: Option<Vec<ParameterValueInput>>,
}

impl UpdateMachineRequest {
    fn into_input(self) -> Result<UpdateMachineInput, ServiceError> {
        let (name, power, dig_depth, weight, bucket_capacity, price) = require_scalars(
            self.name,
            self.power,
            self.dig_depth,
            self.weight,
            self.bucket_capacity,
            self.price,
        )?;

        Ok(UpdateMachineInput {
            name,
            power,
            dig_depth,
            weight,
            bucket_capacity,
            price,
            description: normalize_optional_string(self.description),
            hero_description: normalize_optional_string(self.hero_description),
            featured: self.featured.unwrap_or(false),
            visible: self.visible.unwrap_or(false),
            category_id: self.category_id,
            hero_image_id: self.hero_image_id,
            images: self.images,
            sections: self.sections,
            downloads: self.downloads,
            features: self.features,
            parameters: self.parameters,
        })
    }
}

/// The six mandatory machine scalars; missing or blank ones are reported
/// together in a single 400.
#[allow(clippy::type_complexity)]
fn require_scalars(
    name: Option<String>,
    power: Option<String>,
    dig_depth: Option<String>,
    weight: Option<String>,
    bucket_capacity: Option<String>,
    price: Option<String>,
) -> Result<(String, String, String, String, String, String), ServiceError> {
    let fields = [
        ("name", &name),
        ("power", &power),
        ("dig_depth", &dig_depth),
        ("weight", &weight),
        ("bucket_capacity", &bucket_capacity),
        ("price", &price),
    ];

    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| {
            value
                .as_deref()
                .map(|v| v.trim().is_empty())
                .unwrap_or(true)
        })
        .map(|(field, _)| *field)
        .collect();

    if !missing.is_empty() {
        return Err(ServiceError::ValidationError(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    Ok((
        name.unwrap().trim().to_string(),
        power.unwrap().trim().to_string(),
        dig_depth.unwrap().trim().to_string(),
        weight.unwrap().trim().to_string(),
        bucket_capacity.unwrap().trim().to_string(),
        price.unwrap().trim().to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn all_six_scalars_are_required() {
        let err = require_scalars(Some("RE25".into()), None, None, None, None, None).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(message) => {
            assert!(message.contains("power"));
            assert!(message.contains("price"));
            assert!(!message.contains("name"));
        });
    }

    #[test]
    fn blank_scalars_count_as_missing() {
        let err = require_scalars(
            Some("  ".into()),
            Some("25 KM".into()),
            Some("2.8 m".into()),
            Some("2.2 t".into()),
            Some("0.06 m³".into()),
            Some("65000".into()),
        )
        .unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(message) => {
            assert!(message.contains("name"));
        });
    }

    #[test]
    fn complete_scalars_pass_trimmed() {
        let (name, power, ..) = require_scalars(
            Some(" RE25 ".into()),
            Some("25 KM".into()),
            Some("2.8 m".into()),
            Some("2.2 t".into()),
            Some("0.06 m³".into()),
            Some("65000".into()),
        )
        .unwrap();
        assert_eq!(name, "RE25");
        assert_eq!(power, "25 KM");
    }
}
