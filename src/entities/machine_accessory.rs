use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cross-sell link between two machines. Stored once per ordered pair and
/// queried in both directions; self-links are rejected at write time.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "machine_accessories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub parent_machine_id: Uuid,
    pub accessory_machine_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::machine::Entity",
        from = "Column::ParentMachineId",
        to = "super::machine::Column::Id"
    )]
    Parent,
    #[sea_orm(
        belongs_to = "super::machine::Entity",
        from = "Column::AccessoryMachineId",
        to = "super::machine::Column::Id"
    )]
    Accessory,
}

impl ActiveModelBehavior for ActiveModel {}
