use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{
    category, feature_definition, feature_value, machine, machine_download, machine_image,
    machine_section, parameter_definition, parameter_value, variant_group, variant_option,
    Category, FeatureDefinition, FeatureValue, Machine, MachineDownload, MachineImage,
    MachineModel, MachineSection, ParameterDefinition, ParameterValue, PriceModifierType,
    VariantGroup, VariantOption,
};
use crate::errors::ServiceError;
use crate::services::pricing::{self, ParameterPriceEffect, PriceRange};

/// Read-side assembly of the machine aggregate.
///
/// The list endpoint assembles each machine with sequential sub-queries,
/// matching the write model's row layout rather than batching.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DbPool>,
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct SectionImage {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SectionView {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub sort_order: i32,
    /// Present only when the section carries an image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<SectionImage>,
}

#[derive(Debug, Serialize)]
pub struct FeatureView {
    pub id: Uuid,
    pub feature_id: Uuid,
    pub key: String,
    pub label: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    pub value: Value,
}

#[derive(Debug, Serialize)]
pub struct ParameterView {
    pub id: Uuid,
    pub parameter_id: Uuid,
    pub key: String,
    pub label: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    pub value: Value,
    pub affects_price: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<rust_decimal::Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_modifier_type: Option<PriceModifierType>,
    pub is_quick_spec: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_spec_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_spec_label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuickSpecView {
    pub key: String,
    pub label: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct VariantGroupView {
    pub id: Uuid,
    pub name: String,
    pub sort_order: i32,
    pub options: Vec<variant_option::Model>,
}

/// Fully denormalized machine read view.
#[derive(Debug, Serialize)]
pub struct MachineView {
    #[serde(flatten)]
    pub machine: MachineModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
    pub images: Vec<machine_image::Model>,
    pub sections: Vec<SectionView>,
    pub downloads: Vec<machine_download::Model>,
    pub features: Vec<FeatureView>,
    pub parameters: Vec<ParameterView>,
    pub variant_groups: Vec<VariantGroupView>,
    pub quick_specs: Vec<QuickSpecView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
}

impl CatalogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Assemble the full read view for one machine.
    #[instrument(skip(self))]
    pub async fn get_machine(&self, machine_id: Uuid) -> Result<MachineView, ServiceError> {
        let machine = Machine::find_by_id(machine_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Machine {machine_id} not found")))?;

        self.assemble(machine).await
    }

    /// Assemble the read view for every machine, newest first.
    #[instrument(skip(self))]
    pub async fn list_machines(&self) -> Result<Vec<MachineView>, ServiceError> {
        let machines = Machine::find()
            .order_by_desc(machine::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let mut views = Vec::with_capacity(machines.len());
        for machine in machines {
            views.push(self.assemble(machine).await?);
        }
        Ok(views)
    }

    /// Ordered variant groups with their options for one machine.
    pub async fn variant_groups(
        &self,
        machine_id: Uuid,
    ) -> Result<Vec<VariantGroupView>, ServiceError> {
        let groups = VariantGroup::find()
            .filter(variant_group::Column::MachineId.eq(machine_id))
            .order_by_asc(variant_group::Column::SortOrder)
            .order_by_asc(variant_group::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let mut views = Vec::with_capacity(groups.len());
        for group in groups {
            let options = VariantOption::find()
                .filter(variant_option::Column::GroupId.eq(group.id))
                .order_by_asc(variant_option::Column::SortOrder)
                .order_by_asc(variant_option::Column::CreatedAt)
                .all(&*self.db)
                .await?;

            views.push(VariantGroupView {
                id: group.id,
                name: group.name,
                sort_order: group.sort_order,
                options,
            });
        }

        Ok(views)
    }

    async fn assemble(&self, machine: MachineModel) -> Result<MachineView, ServiceError> {
        let category = match machine.category_id {
            Some(category_id) => Category::find_by_id(category_id)
                .one(&*self.db)
                .await?
                .map(|c: category::Model| CategorySummary {
                    id: c.id,
                    name: c.name,
                    slug: c.slug,
                }),
            None => None,
        };

        let images = MachineImage::find()
            .filter(machine_image::Column::MachineId.eq(machine.id))
            .order_by_desc(machine_image::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let sections = MachineSection::find()
            .filter(machine_section::Column::MachineId.eq(machine.id))
            .order_by_asc(machine_section::Column::SortOrder)
            .order_by_asc(machine_section::Column::CreatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|s: machine_section::Model| SectionView {
                id: s.id,
                title: s.title,
                body: s.body,
                sort_order: s.sort_order,
                image: s.image_url.map(|url| SectionImage { url }),
            })
            .collect();

        let downloads = MachineDownload::find()
            .filter(machine_download::Column::MachineId.eq(machine.id))
            .order_by_asc(machine_download::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let features = self.assemble_features(machine.id).await?;
        let parameters = self.assemble_parameters(machine.id).await?;
        let variant_groups = self.variant_groups(machine.id).await?;

        let quick_specs = quick_specs_from(&parameters);
        let price_range = derive_price_range(&machine.price, &parameters, &variant_groups);

        Ok(MachineView {
            machine,
            category,
            images,
            sections,
            downloads,
            features,
            parameters,
            variant_groups,
            quick_specs,
            price_range,
        })
    }

    async fn assemble_features(&self, machine_id: Uuid) -> Result<Vec<FeatureView>, ServiceError> {
        let rows = FeatureValue::find()
            .filter(feature_value::Column::MachineId.eq(machine_id))
            .find_also_related(FeatureDefinition)
            .order_by_asc(feature_value::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(
                |(value, definition): (
                    feature_value::Model,
                    Option<feature_definition::Model>,
                )| {
                    definition.map(|def| FeatureView {
                        id: value.id,
                        feature_id: def.id,
                        key: def.key,
                        label: def.label,
                        kind: def.kind,
                        options: def.options.map(normalize_options),
                        value: value.value,
                    })
                },
            )
            .collect())
    }

    async fn assemble_parameters(
        &self,
        machine_id: Uuid,
    ) -> Result<Vec<ParameterView>, ServiceError> {
        let rows = ParameterValue::find()
            .filter(parameter_value::Column::MachineId.eq(machine_id))
            .find_also_related(ParameterDefinition)
            .order_by_asc(parameter_value::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(
                |(value, definition): (
                    parameter_value::Model,
                    Option<parameter_definition::Model>,
                )| {
                    definition.map(|def| ParameterView {
                        id: value.id,
                        parameter_id: def.id,
                        key: def.key,
                        label: def.label,
                        kind: def.kind,
                        options: def.options.map(normalize_options),
                        value: value.value,
                        affects_price: def.affects_price,
                        price_modifier: def.price_modifier,
                        price_modifier_type: def.price_modifier_type,
                        is_quick_spec: def.is_quick_spec,
                        quick_spec_order: def.quick_spec_order,
                        quick_spec_label: def.quick_spec_label,
                    })
                },
            )
            .collect())
    }
}

/// Options may have been stored as a JSON-encoded string by older admin
/// tooling; unwrap that layer when it parses.
fn normalize_options(options: Value) -> Value {
    match options {
        Value::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        other => other,
    }
}

fn quick_specs_from(parameters: &[ParameterView]) -> Vec<QuickSpecView> {
    let mut specs: Vec<QuickSpecView> = parameters
        .iter()
        .filter(|p| p.is_quick_spec)
        .map(|p| QuickSpecView {
            key: p.key.clone(),
            label: p
                .quick_spec_label
                .clone()
                .unwrap_or_else(|| p.label.clone()),
            value: p.value.clone(),
            order: p.quick_spec_order,
        })
        .collect();

    specs.sort_by_key(|s| s.order.unwrap_or(i32::MAX));
    specs
}

fn derive_price_range(
    raw_price: &str,
    parameters: &[ParameterView],
    variant_groups: &[VariantGroupView],
) -> Option<PriceRange> {
    let base = pricing::parse_base_price(raw_price)?;

    let effects: Vec<ParameterPriceEffect> = parameters
        .iter()
        .filter(|p| p.affects_price)
        .filter_map(|p| {
            Some(ParameterPriceEffect {
                modifier: p.price_modifier?,
                modifier_type: p.price_modifier_type?,
            })
        })
        .collect();

    let group_modifiers: Vec<Vec<rust_decimal::Decimal>> = variant_groups
        .iter()
        .map(|g| g.options.iter().map(|o| o.price_modifier).collect())
        .collect();

    Some(pricing::price_range(base, &effects, &group_modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_encoded_options_are_unwrapped() {
        let stored = Value::String("[\"Standard\",\"Comfort\"]".to_string());
        assert_eq!(normalize_options(stored), json!(["Standard", "Comfort"]));
    }

    #[test]
    fn non_json_strings_survive_normalization() {
        let stored = Value::String("plain text".to_string());
        assert_eq!(normalize_options(stored), json!("plain text"));
    }

    #[test]
    fn quick_specs_sort_by_order_with_unordered_last() {
        let params = vec![
            parameter_view("weight", Some(2), true),
            parameter_view("power", Some(1), true),
            parameter_view("reach", None, true),
            parameter_view("hidden", Some(0), false),
        ];

        let specs = quick_specs_from(&params);
        let keys: Vec<&str> = specs.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["power", "weight", "reach"]);
    }

    fn parameter_view(key: &str, order: Option<i32>, quick: bool) -> ParameterView {
        ParameterView {
            id: Uuid::new_v4(),
            parameter_id: Uuid::new_v4(),
            key: key.to_string(),
            label: key.to_string(),
            kind: "text".to_string(),
            options: None,
            value: json!("x"),
            affects_price: false,
            price_modifier: None,
            price_modifier_type: None,
            is_quick_spec: quick,
            quick_spec_order: order,
            quick_spec_label: None,
        }
    }
}
