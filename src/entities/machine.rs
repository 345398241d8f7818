use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Machine entity, the aggregate root of the catalog. The spec-sheet
/// columns (power, dig depth, weight, bucket capacity, price) are free
/// text as entered by the admin; derived pricing parses `price` on the
/// fly.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "machines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub hero_description: Option<String>,
    pub power: String,
    pub dig_depth: String,
    pub weight: String,
    pub bucket_capacity: String,
    pub price: String,
    pub featured: bool,
    pub visible: bool,
    pub category_id: Option<Uuid>,
    pub hero_image_id: Option<Uuid>,
    pub admin_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AdminId",
        to = "super::user::Column::Id"
    )]
    Admin,
    #[sea_orm(has_many = "super::machine_image::Entity")]
    Images,
    #[sea_orm(has_many = "super::machine_section::Entity")]
    Sections,
    #[sea_orm(has_many = "super::machine_download::Entity")]
    Downloads,
    #[sea_orm(has_many = "super::feature_value::Entity")]
    FeatureValues,
    #[sea_orm(has_many = "super::parameter_value::Entity")]
    ParameterValues,
    #[sea_orm(has_many = "super::variant_group::Entity")]
    VariantGroups,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl Related<super::machine_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::machine_section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sections.def()
    }
}

impl Related<super::machine_download::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Downloads.def()
    }
}

impl Related<super::variant_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VariantGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
