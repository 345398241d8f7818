use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{
    machine, machine_accessory, Machine, MachineAccessory, MachineModel,
};
use crate::errors::ServiceError;

/// Cross-sell link management. Links are stored once per ordered pair but
/// read bidirectionally, so a machine lists both the accessories it points
/// at and the machines that point at it.
#[derive(Clone)]
pub struct AccessoryService {
    db: Arc<DbPool>,
}

impl AccessoryService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Bidirectional union of linked machines, excluding the machine
    /// itself. The public read additionally filters to visible machines.
    #[instrument(skip(self))]
    pub async fn linked_machines(
        &self,
        machine_id: Uuid,
        visible_only: bool,
    ) -> Result<Vec<MachineModel>, ServiceError> {
        let links = MachineAccessory::find()
            .filter(
                machine_accessory::Column::ParentMachineId
                    .eq(machine_id)
                    .or(machine_accessory::Column::AccessoryMachineId.eq(machine_id)),
            )
            .all(&*self.db)
            .await?;

        let mut other_ids: HashSet<Uuid> = HashSet::new();
        for link in links {
            let other = if link.parent_machine_id == machine_id {
                link.accessory_machine_id
            } else {
                link.parent_machine_id
            };
            if other != machine_id {
                other_ids.insert(other);
            }
        }

        if other_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = Machine::find()
            .filter(machine::Column::Id.is_in(other_ids.into_iter().collect::<Vec<_>>()));
        if visible_only {
            query = query.filter(machine::Column::Visible.eq(true));
        }

        query
            .order_by_asc(machine::Column::Name)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Replace the machine's outbound links with the supplied targets.
    /// Self-references are skipped and duplicate pairs are ignored, which
    /// makes repeated calls with the same set idempotent.
    #[instrument(skip(self, accessory_ids))]
    pub async fn replace(
        &self,
        machine_id: Uuid,
        accessory_ids: Vec<Uuid>,
    ) -> Result<(), ServiceError> {
        Machine::find_by_id(machine_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Machine {machine_id} not found")))?;

        self.db
            .transaction::<_, (), ServiceError>(move |txn| {
                Box::pin(async move {
                    MachineAccessory::delete_many()
                        .filter(machine_accessory::Column::ParentMachineId.eq(machine_id))
                        .exec(txn)
                        .await?;

                    let mut seen = HashSet::new();
                    for accessory_id in accessory_ids {
                        if accessory_id == machine_id || !seen.insert(accessory_id) {
                            continue;
                        }

                        MachineAccessory::insert(machine_accessory::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            parent_machine_id: Set(machine_id),
                            accessory_machine_id: Set(accessory_id),
                            created_at: Set(Utc::now()),
                        })
                        .on_conflict(
                            OnConflict::columns([
                                machine_accessory::Column::ParentMachineId,
                                machine_accessory::Column::AccessoryMachineId,
                            ])
                            .do_nothing()
                            .to_owned(),
                        )
                        .exec_without_returning(txn)
                        .await?;
                    }

                    Ok(())
                })
            })
            .await?;

        info!(%machine_id, "replaced accessory links");
        Ok(())
    }

    /// Remove one link row by its id.
    #[instrument(skip(self))]
    pub async fn delete_link(&self, link_id: Uuid) -> Result<(), ServiceError> {
        let result = MachineAccessory::delete_by_id(link_id)
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Accessory link {link_id} not found"
            )));
        }

        Ok(())
    }

    /// Raw link rows for a machine's outbound direction, used by the admin
    /// editor to show current state with link ids.
    pub async fn outbound_links(
        &self,
        machine_id: Uuid,
    ) -> Result<Vec<machine_accessory::Model>, ServiceError> {
        MachineAccessory::find()
            .filter(machine_accessory::Column::ParentMachineId.eq(machine_id))
            .order_by_asc(machine_accessory::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }
}
