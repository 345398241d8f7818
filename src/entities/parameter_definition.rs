use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attribute schema for machine parameters. Same scoping rules as feature
/// definitions, with two extras: a parameter may affect the machine's
/// derived price (fixed amount or percent of base) and may be flagged for
/// the compact quick-spec strip on listing cards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parameter_definitions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub key: String,
    pub label: String,
    pub kind: String,
    #[sea_orm(column_type = "Json", nullable)]
    pub options: Option<Json>,
    pub affects_price: bool,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub price_modifier: Option<Decimal>,
    pub price_modifier_type: Option<PriceModifierType>,
    pub is_quick_spec: bool,
    pub quick_spec_order: Option<i32>,
    pub quick_spec_label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How a price-affecting parameter modifies the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum PriceModifierType {
    #[sea_orm(string_value = "fixed")]
    Fixed,
    #[sea_orm(string_value = "percent")]
    Percent,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::parameter_value::Entity")]
    Values,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::parameter_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Values.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
