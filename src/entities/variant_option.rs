use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Selectable option inside a variant group. `price_modifier` is additive
/// to the machine's base price; `parameter_overrides` optionally replaces
/// parameter values when the option is selected.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "variant_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub price_modifier: Decimal,
    pub is_default: bool,
    pub image_url: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub parameter_overrides: Option<Json>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::variant_group::Entity",
        from = "Column::GroupId",
        to = "super::variant_group::Column::Id"
    )]
    Group,
}

impl Related<super::variant_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
