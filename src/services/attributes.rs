use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{
    feature_definition, parameter_definition, FeatureDefinition, FeatureDefinitionModel,
    ParameterDefinition, ParameterDefinitionModel, PriceModifierType,
};
use crate::errors::ServiceError;

/// CRUD over the two attribute schemas (features and parameters). The two
/// are the same shape except parameters additionally carry price effects
/// and quick-spec flags. Keys are unique per category scope, with NULL
/// meaning the global scope.
#[derive(Clone)]
pub struct AttributeService {
    db: Arc<DbPool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureDefinitionInput {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub key: String,
    pub label: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub options: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDefinitionInput {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub key: String,
    pub label: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub options: Option<Value>,
    #[serde(default)]
    pub affects_price: bool,
    #[serde(default)]
    pub price_modifier: Option<Decimal>,
    #[serde(default)]
    pub price_modifier_type: Option<PriceModifierType>,
    #[serde(default)]
    pub is_quick_spec: bool,
    #[serde(default)]
    pub quick_spec_order: Option<i32>,
    #[serde(default)]
    pub quick_spec_label: Option<String>,
}

fn default_kind() -> String {
    "text".to_string()
}

impl AttributeService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    // ---- feature definitions ----

    /// With a category filter, returns that category's definitions plus
    /// the global ones; without, everything.
    #[instrument(skip(self))]
    pub async fn list_features(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<FeatureDefinitionModel>, ServiceError> {
        let mut query = FeatureDefinition::find();
        if let Some(category_id) = category_id {
            query = query.filter(
                feature_definition::Column::CategoryId
                    .eq(category_id)
                    .or(feature_definition::Column::CategoryId.is_null()),
            );
        }

        query
            .order_by_asc(feature_definition::Column::Key)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self, input), fields(key = %input.key))]
    pub async fn create_feature(
        &self,
        input: FeatureDefinitionInput,
    ) -> Result<FeatureDefinitionModel, ServiceError> {
        let key = normalized_key(&input.key)?;
        self.ensure_unique_feature_key(input.category_id, &key, None)
            .await?;

        let now = Utc::now();
        let created = feature_definition::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(input.category_id),
            key: Set(key),
            label: Set(input.label),
            kind: Set(input.kind),
            options: Set(input.options),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        info!(feature_id = %created.id, "created feature definition");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update_feature(
        &self,
        feature_id: Uuid,
        input: FeatureDefinitionInput,
    ) -> Result<FeatureDefinitionModel, ServiceError> {
        let existing = FeatureDefinition::find_by_id(feature_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Feature definition {feature_id} not found"))
            })?;

        let key = normalized_key(&input.key)?;
        if key != existing.key || input.category_id != existing.category_id {
            self.ensure_unique_feature_key(input.category_id, &key, Some(feature_id))
                .await?;
        }

        let mut active: feature_definition::ActiveModel = existing.into();
        active.category_id = Set(input.category_id);
        active.key = Set(key);
        active.label = Set(input.label);
        active.kind = Set(input.kind);
        active.options = Set(input.options);
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    /// Bound product values go with the definition via the FK cascade.
    #[instrument(skip(self))]
    pub async fn delete_feature(&self, feature_id: Uuid) -> Result<(), ServiceError> {
        let result = FeatureDefinition::delete_by_id(feature_id)
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Feature definition {feature_id} not found"
            )));
        }

        info!(%feature_id, "deleted feature definition");
        Ok(())
    }

    /// Duplicate a definition under a `_copy`-suffixed key (repeated until
    /// the key is free in its scope).
    #[instrument(skip(self))]
    pub async fn clone_feature(
        &self,
        feature_id: Uuid,
    ) -> Result<FeatureDefinitionModel, ServiceError> {
        let source = FeatureDefinition::find_by_id(feature_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Feature definition {feature_id} not found"))
            })?;

        let mut key = format!("{}_copy", source.key);
        while self
            .find_feature_by_key(source.category_id, &key)
            .await?
            .is_some()
        {
            key.push_str("_copy");
        }

        let now = Utc::now();
        let created = feature_definition::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(source.category_id),
            key: Set(key),
            label: Set(source.label),
            kind: Set(source.kind),
            options: Set(source.options),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        info!(source = %feature_id, clone = %created.id, "cloned feature definition");
        Ok(created)
    }

    // ---- parameter definitions ----

    #[instrument(skip(self))]
    pub async fn list_parameters(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<ParameterDefinitionModel>, ServiceError> {
        let mut query = ParameterDefinition::find();
        if let Some(category_id) = category_id {
            query = query.filter(
                parameter_definition::Column::CategoryId
                    .eq(category_id)
                    .or(parameter_definition::Column::CategoryId.is_null()),
            );
        }

        query
            .order_by_asc(parameter_definition::Column::Key)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self, input), fields(key = %input.key))]
    pub async fn create_parameter(
        &self,
        input: ParameterDefinitionInput,
    ) -> Result<ParameterDefinitionModel, ServiceError> {
        let key = normalized_key(&input.key)?;
        validate_price_fields(&input)?;
        self.ensure_unique_parameter_key(input.category_id, &key, None)
            .await?;

        let now = Utc::now();
        let created = parameter_definition::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(input.category_id),
            key: Set(key),
            label: Set(input.label),
            kind: Set(input.kind),
            options: Set(input.options),
            affects_price: Set(input.affects_price),
            price_modifier: Set(input.price_modifier),
            price_modifier_type: Set(input.price_modifier_type),
            is_quick_spec: Set(input.is_quick_spec),
            quick_spec_order: Set(input.quick_spec_order),
            quick_spec_label: Set(input.quick_spec_label),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        info!(parameter_id = %created.id, "created parameter definition");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update_parameter(
        &self,
        parameter_id: Uuid,
        input: ParameterDefinitionInput,
    ) -> Result<ParameterDefinitionModel, ServiceError> {
        let existing = ParameterDefinition::find_by_id(parameter_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Parameter definition {parameter_id} not found"))
            })?;

        let key = normalized_key(&input.key)?;
        validate_price_fields(&input)?;
        if key != existing.key || input.category_id != existing.category_id {
            self.ensure_unique_parameter_key(input.category_id, &key, Some(parameter_id))
                .await?;
        }

        let mut active: parameter_definition::ActiveModel = existing.into();
        active.category_id = Set(input.category_id);
        active.key = Set(key);
        active.label = Set(input.label);
        active.kind = Set(input.kind);
        active.options = Set(input.options);
        active.affects_price = Set(input.affects_price);
        active.price_modifier = Set(input.price_modifier);
        active.price_modifier_type = Set(input.price_modifier_type);
        active.is_quick_spec = Set(input.is_quick_spec);
        active.quick_spec_order = Set(input.quick_spec_order);
        active.quick_spec_label = Set(input.quick_spec_label);
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_parameter(&self, parameter_id: Uuid) -> Result<(), ServiceError> {
        let result = ParameterDefinition::delete_by_id(parameter_id)
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Parameter definition {parameter_id} not found"
            )));
        }

        info!(%parameter_id, "deleted parameter definition");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn clone_parameter(
        &self,
        parameter_id: Uuid,
    ) -> Result<ParameterDefinitionModel, ServiceError> {
        let source = ParameterDefinition::find_by_id(parameter_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Parameter definition {parameter_id} not found"))
            })?;

        let mut key = format!("{}_copy", source.key);
        while self
            .find_parameter_by_key(source.category_id, &key)
            .await?
            .is_some()
        {
            key.push_str("_copy");
        }

        let now = Utc::now();
        let created = parameter_definition::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(source.category_id),
            key: Set(key),
            label: Set(source.label),
            kind: Set(source.kind),
            options: Set(source.options),
            affects_price: Set(source.affects_price),
            price_modifier: Set(source.price_modifier),
            price_modifier_type: Set(source.price_modifier_type),
            is_quick_spec: Set(source.is_quick_spec),
            quick_spec_order: Set(source.quick_spec_order),
            quick_spec_label: Set(source.quick_spec_label),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        info!(source = %parameter_id, clone = %created.id, "cloned parameter definition");
        Ok(created)
    }

    // ---- helpers ----

    async fn find_feature_by_key(
        &self,
        category_id: Option<Uuid>,
        key: &str,
    ) -> Result<Option<FeatureDefinitionModel>, ServiceError> {
        let scope = match category_id {
            Some(id) => feature_definition::Column::CategoryId.eq(id),
            None => feature_definition::Column::CategoryId.is_null(),
        };

        FeatureDefinition::find()
            .filter(scope)
            .filter(feature_definition::Column::Key.eq(key))
            .one(&*self.db)
            .await
            .map_err(Into::into)
    }

    async fn ensure_unique_feature_key(
        &self,
        category_id: Option<Uuid>,
        key: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if let Some(existing) = self.find_feature_by_key(category_id, key).await? {
            if Some(existing.id) != exclude_id {
                return Err(ServiceError::Conflict(format!(
                    "feature key '{key}' already exists in this scope"
                )));
            }
        }
        Ok(())
    }

    async fn find_parameter_by_key(
        &self,
        category_id: Option<Uuid>,
        key: &str,
    ) -> Result<Option<ParameterDefinitionModel>, ServiceError> {
        let scope = match category_id {
            Some(id) => parameter_definition::Column::CategoryId.eq(id),
            None => parameter_definition::Column::CategoryId.is_null(),
        };

        ParameterDefinition::find()
            .filter(scope)
            .filter(parameter_definition::Column::Key.eq(key))
            .one(&*self.db)
            .await
            .map_err(Into::into)
    }

    async fn ensure_unique_parameter_key(
        &self,
        category_id: Option<Uuid>,
        key: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if let Some(existing) = self.find_parameter_by_key(category_id, key).await? {
            if Some(existing.id) != exclude_id {
                return Err(ServiceError::Conflict(format!(
                    "parameter key '{key}' already exists in this scope"
                )));
            }
        }
        Ok(())
    }
}

fn normalized_key(key: &str) -> Result<String, ServiceError> {
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(ServiceError::ValidationError(
            "attribute key is required".to_string(),
        ));
    }
    Ok(key)
}

fn validate_price_fields(input: &ParameterDefinitionInput) -> Result<(), ServiceError> {
    if input.affects_price && (input.price_modifier.is_none() || input.price_modifier_type.is_none())
    {
        return Err(ServiceError::ValidationError(
            "price-affecting parameters need price_modifier and price_modifier_type".to_string(),
        ));
    }
    Ok(())
}
