use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use sea_orm::sea_query::OnConflict;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::{authorize_owner, AuthUser};
use crate::db::DbPool;
use crate::entities::{
    feature_value, machine, machine_accessory, machine_download, machine_image, machine_section,
    parameter_value, variant_group, variant_option, FeatureValue, Machine, MachineAccessory,
    MachineDownload, MachineImage, MachineModel, MachineSection, ParameterValue, VariantGroup,
    VariantOption,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::storage::FileStorage;

/// Name suffix the clone workflow appends, matching the storefront locale.
const CLONE_SUFFIX: &str = " (kopia)";

/// Create/update/delete/clone workflows for the machine aggregate.
///
/// Every multi-table workflow runs in a single transaction, so a failing
/// step rolls the whole aggregate back. File cleanup happens after commit
/// and stays best-effort.
#[derive(Clone)]
pub struct MachineService {
    db: Arc<DbPool>,
    storage: Arc<dyn FileStorage>,
    events: EventSender,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionInput {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadInput {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureValueInput {
    pub feature_id: Uuid,
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterValueInput {
    pub parameter_id: Uuid,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct CreateMachineInput {
    pub name: String,
    pub power: String,
    pub dig_depth: String,
    pub weight: String,
    pub bucket_capacity: String,
    pub price: String,
    pub description: Option<String>,
    pub hero_description: Option<String>,
    pub featured: bool,
    pub visible: bool,
    pub category_id: Option<Uuid>,
    pub images: Vec<String>,
    pub sections: Vec<SectionInput>,
    pub downloads: Vec<DownloadInput>,
    pub features: Vec<FeatureValueInput>,
    pub parameters: Vec<ParameterValueInput>,
}

/// Update payload. Scalars are overwritten unconditionally (callers resend
/// full scalar state). Collections differ on purpose: `images` present
/// reconciles by URL diff even when empty, while `sections`/`downloads`
/// only replace when a non-empty array arrives.
#[derive(Debug, Clone)]
pub struct UpdateMachineInput {
    pub name: String,
    pub power: String,
    pub dig_depth: String,
    pub weight: String,
    pub bucket_capacity: String,
    pub price: String,
    pub description: Option<String>,
    pub hero_description: Option<String>,
    pub featured: bool,
    pub visible: bool,
    pub category_id: Option<Uuid>,
    pub hero_image_id: Option<Uuid>,
    pub images: Option<Vec<String>>,
    pub sections: Option<Vec<SectionInput>>,
    pub downloads: Option<Vec<DownloadInput>>,
    pub features: Option<Vec<FeatureValueInput>>,
    pub parameters: Option<Vec<ParameterValueInput>>,
}

impl MachineService {
    pub fn new(db: Arc<DbPool>, storage: Arc<dyn FileStorage>, events: EventSender) -> Self {
        Self {
            db,
            storage,
            events,
        }
    }

    async fn find_owned(
        &self,
        user: &AuthUser,
        machine_id: Uuid,
    ) -> Result<MachineModel, ServiceError> {
        let machine = Machine::find_by_id(machine_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Machine {machine_id} not found")))?;

        authorize_owner(user, machine.admin_id)?;
        Ok(machine)
    }

    /// Create the machine row plus any supplied collections.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        user: &AuthUser,
        input: CreateMachineInput,
    ) -> Result<MachineModel, ServiceError> {
        let admin_id = user.user_id;

        let machine = self
            .db
            .transaction::<_, MachineModel, ServiceError>(move |txn| {
                Box::pin(async move {
                    let machine_id = Uuid::new_v4();
                    let now = Utc::now();

                    let machine = machine::ActiveModel {
                        id: Set(machine_id),
                        name: Set(input.name),
                        description: Set(input.description),
                        hero_description: Set(input.hero_description),
                        power: Set(input.power),
                        dig_depth: Set(input.dig_depth),
                        weight: Set(input.weight),
                        bucket_capacity: Set(input.bucket_capacity),
                        price: Set(input.price),
                        featured: Set(input.featured),
                        visible: Set(input.visible),
                        category_id: Set(input.category_id),
                        hero_image_id: Set(None),
                        admin_id: Set(admin_id),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    for url in input.images {
                        machine_image::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            machine_id: Set(machine_id),
                            url: Set(url),
                            created_at: Set(Utc::now()),
                        }
                        .insert(txn)
                        .await?;
                    }

                    insert_sections(txn, machine_id, &input.sections).await?;
                    insert_downloads(txn, machine_id, &input.downloads).await?;
                    upsert_feature_values(txn, machine_id, &input.features).await?;
                    upsert_parameter_values(txn, machine_id, &input.parameters).await?;

                    Ok(machine)
                })
            })
            .await?;

        self.events
            .send_or_log(Event::MachineCreated(machine.id))
            .await;
        info!(machine_id = %machine.id, "created machine");
        Ok(machine)
    }

    /// Unconditional scalar overwrite plus collection semantics described
    /// on [`UpdateMachineInput`].
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        user: &AuthUser,
        machine_id: Uuid,
        input: UpdateMachineInput,
    ) -> Result<MachineModel, ServiceError> {
        let existing = self.find_owned(user, machine_id).await?;

        let (machine, removed_urls) = self
            .db
            .transaction::<_, (MachineModel, Vec<String>), ServiceError>(move |txn| {
                Box::pin(async move {
                    let mut removed_urls = Vec::new();
                    let mut hero_image_id = input.hero_image_id;

                    if let Some(incoming) = &input.images {
                        let incoming_set: HashSet<&str> =
                            incoming.iter().map(String::as_str).collect();

                        let current = MachineImage::find()
                            .filter(machine_image::Column::MachineId.eq(machine_id))
                            .all(txn)
                            .await?;

                        let current_urls: HashSet<&str> =
                            current.iter().map(|i| i.url.as_str()).collect();

                        for image in &current {
                            if !incoming_set.contains(image.url.as_str()) {
                                MachineImage::delete_by_id(image.id).exec(txn).await?;
                                removed_urls.push(image.url.clone());
                                if hero_image_id == Some(image.id) {
                                    hero_image_id = None;
                                }
                            }
                        }

                        for url in incoming {
                            if !current_urls.contains(url.as_str()) {
                                machine_image::ActiveModel {
                                    id: Set(Uuid::new_v4()),
                                    machine_id: Set(machine_id),
                                    url: Set(url.clone()),
                                    created_at: Set(Utc::now()),
                                }
                                .insert(txn)
                                .await?;
                            }
                        }
                    }

                    // Sections and downloads replace wholesale, and only
                    // when a non-empty array arrives. An empty array is a
                    // no-op here while an empty `images` array clears the
                    // gallery; both behaviors are pinned by tests.
                    if let Some(sections) = &input.sections {
                        if !sections.is_empty() {
                            MachineSection::delete_many()
                                .filter(machine_section::Column::MachineId.eq(machine_id))
                                .exec(txn)
                                .await?;
                            insert_sections(txn, machine_id, sections).await?;
                        }
                    }

                    if let Some(downloads) = &input.downloads {
                        if !downloads.is_empty() {
                            MachineDownload::delete_many()
                                .filter(machine_download::Column::MachineId.eq(machine_id))
                                .exec(txn)
                                .await?;
                            insert_downloads(txn, machine_id, downloads).await?;
                        }
                    }

                    if let Some(features) = &input.features {
                        upsert_feature_values(txn, machine_id, features).await?;
                    }

                    if let Some(parameters) = &input.parameters {
                        upsert_parameter_values(txn, machine_id, parameters).await?;
                    }

                    let mut active: machine::ActiveModel = existing.into();
                    active.name = Set(input.name);
                    active.description = Set(input.description);
                    active.hero_description = Set(input.hero_description);
                    active.power = Set(input.power);
                    active.dig_depth = Set(input.dig_depth);
                    active.weight = Set(input.weight);
                    active.bucket_capacity = Set(input.bucket_capacity);
                    active.price = Set(input.price);
                    active.featured = Set(input.featured);
                    active.visible = Set(input.visible);
                    active.category_id = Set(input.category_id);
                    active.hero_image_id = Set(hero_image_id);
                    active.updated_at = Set(Utc::now());

                    let machine = active.update(txn).await?;
                    Ok((machine, removed_urls))
                })
            })
            .await?;

        for url in removed_urls {
            let _ = self.storage.delete(&url).await;
        }

        self.events
            .send_or_log(Event::MachineUpdated(machine_id))
            .await;
        info!(%machine_id, "updated machine");
        Ok(machine)
    }

    /// Delete the machine; database cascades remove every dependent row
    /// and file cleanup follows best-effort.
    #[instrument(skip(self))]
    pub async fn delete(&self, user: &AuthUser, machine_id: Uuid) -> Result<(), ServiceError> {
        self.find_owned(user, machine_id).await?;

        let images = MachineImage::find()
            .filter(machine_image::Column::MachineId.eq(machine_id))
            .all(&*self.db)
            .await?;

        Machine::delete_by_id(machine_id).exec(&*self.db).await?;

        for image in images {
            if let Err(e) = self.storage.delete(&image.url).await {
                warn!(url = %image.url, "image cleanup failed: {e}");
            }
        }

        self.events
            .send_or_log(Event::MachineDeleted(machine_id))
            .await;
        info!(%machine_id, "deleted machine");
        Ok(())
    }

    /// Deep-copy the machine and all dependent collections. The clone is
    /// created invisible and unfeatured, with the name suffixed; image
    /// URLs are reused, files are not duplicated. Outbound accessory links
    /// are copied, inbound ones are not.
    #[instrument(skip(self))]
    pub async fn clone_machine(
        &self,
        user: &AuthUser,
        machine_id: Uuid,
    ) -> Result<MachineModel, ServiceError> {
        let source = self.find_owned(user, machine_id).await?;

        let clone = self
            .db
            .transaction::<_, MachineModel, ServiceError>(move |txn| {
                Box::pin(async move {
                    let clone_id = Uuid::new_v4();
                    let now = Utc::now();

                    machine::ActiveModel {
                        id: Set(clone_id),
                        name: Set(format!("{}{CLONE_SUFFIX}", source.name)),
                        description: Set(source.description.clone()),
                        hero_description: Set(source.hero_description.clone()),
                        power: Set(source.power.clone()),
                        dig_depth: Set(source.dig_depth.clone()),
                        weight: Set(source.weight.clone()),
                        bucket_capacity: Set(source.bucket_capacity.clone()),
                        price: Set(source.price.clone()),
                        featured: Set(false),
                        visible: Set(false),
                        category_id: Set(source.category_id),
                        hero_image_id: Set(None),
                        admin_id: Set(source.admin_id),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    // Images, URLs reused. Timestamps carry over so the
                    // clone's gallery keeps the source ordering.
                    let images = MachineImage::find()
                        .filter(machine_image::Column::MachineId.eq(source.id))
                        .order_by_desc(machine_image::Column::CreatedAt)
                        .all(txn)
                        .await?;

                    let mut cloned_image_ids: HashMap<Uuid, Uuid> = HashMap::new();
                    for image in &images {
                        let new_id = Uuid::new_v4();
                        machine_image::ActiveModel {
                            id: Set(new_id),
                            machine_id: Set(clone_id),
                            url: Set(image.url.clone()),
                            created_at: Set(image.created_at),
                        }
                        .insert(txn)
                        .await?;
                        cloned_image_ids.insert(image.id, new_id);
                    }

                    // The clone's hero is the copy of the source's hero
                    // image; a dangling source hero id maps to None.
                    let hero_image_id = source
                        .hero_image_id
                        .and_then(|id| cloned_image_ids.get(&id).copied());
                    if let Some(hero_id) = hero_image_id {
                        let mut active: machine::ActiveModel = Machine::find_by_id(clone_id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| {
                                ServiceError::InternalError(
                                    "clone row vanished mid-transaction".to_string(),
                                )
                            })?
                            .into();
                        active.hero_image_id = Set(Some(hero_id));
                        active.update(txn).await?;
                    }

                    let sections = MachineSection::find()
                        .filter(machine_section::Column::MachineId.eq(source.id))
                        .all(txn)
                        .await?;
                    for section in sections {
                        machine_section::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            machine_id: Set(clone_id),
                            title: Set(section.title),
                            body: Set(section.body),
                            sort_order: Set(section.sort_order),
                            image_url: Set(section.image_url),
                            created_at: Set(section.created_at),
                        }
                        .insert(txn)
                        .await?;
                    }

                    let downloads = MachineDownload::find()
                        .filter(machine_download::Column::MachineId.eq(source.id))
                        .all(txn)
                        .await?;
                    for download in downloads {
                        machine_download::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            machine_id: Set(clone_id),
                            label: Set(download.label),
                            url: Set(download.url),
                            created_at: Set(download.created_at),
                        }
                        .insert(txn)
                        .await?;
                    }

                    let feature_values = FeatureValue::find()
                        .filter(feature_value::Column::MachineId.eq(source.id))
                        .all(txn)
                        .await?;
                    for value in feature_values {
                        feature_value::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            machine_id: Set(clone_id),
                            feature_id: Set(value.feature_id),
                            value: Set(value.value),
                            created_at: Set(value.created_at),
                            updated_at: Set(now),
                        }
                        .insert(txn)
                        .await?;
                    }

                    let parameter_values = ParameterValue::find()
                        .filter(parameter_value::Column::MachineId.eq(source.id))
                        .all(txn)
                        .await?;
                    for value in parameter_values {
                        parameter_value::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            machine_id: Set(clone_id),
                            parameter_id: Set(value.parameter_id),
                            value: Set(value.value),
                            created_at: Set(value.created_at),
                            updated_at: Set(now),
                        }
                        .insert(txn)
                        .await?;
                    }

                    let groups = VariantGroup::find()
                        .filter(variant_group::Column::MachineId.eq(source.id))
                        .order_by_asc(variant_group::Column::SortOrder)
                        .all(txn)
                        .await?;
                    for group in groups {
                        let new_group_id = Uuid::new_v4();
                        variant_group::ActiveModel {
                            id: Set(new_group_id),
                            machine_id: Set(clone_id),
                            name: Set(group.name),
                            sort_order: Set(group.sort_order),
                            created_at: Set(group.created_at),
                        }
                        .insert(txn)
                        .await?;

                        let options = VariantOption::find()
                            .filter(variant_option::Column::GroupId.eq(group.id))
                            .order_by_asc(variant_option::Column::SortOrder)
                            .all(txn)
                            .await?;
                        for option in options {
                            variant_option::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                group_id: Set(new_group_id),
                                name: Set(option.name),
                                price_modifier: Set(option.price_modifier),
                                is_default: Set(option.is_default),
                                image_url: Set(option.image_url),
                                parameter_overrides: Set(option.parameter_overrides),
                                sort_order: Set(option.sort_order),
                                created_at: Set(option.created_at),
                            }
                            .insert(txn)
                            .await?;
                        }
                    }

                    // Outbound accessory links only; links where the source
                    // is the accessory of another machine are not copied.
                    let links = MachineAccessory::find()
                        .filter(machine_accessory::Column::ParentMachineId.eq(source.id))
                        .all(txn)
                        .await?;
                    for link in links {
                        machine_accessory::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            parent_machine_id: Set(clone_id),
                            accessory_machine_id: Set(link.accessory_machine_id),
                            created_at: Set(now),
                        }
                        .insert(txn)
                        .await?;
                    }

                    Machine::find_by_id(clone_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::InternalError(
                                "clone row vanished mid-transaction".to_string(),
                            )
                        })
                })
            })
            .await?;

        self.events
            .send_or_log(Event::MachineCloned {
                source_id: machine_id,
                clone_id: clone.id,
            })
            .await;
        info!(source = %machine_id, clone = %clone.id, "cloned machine");
        Ok(clone)
    }
}

async fn insert_sections(
    txn: &sea_orm::DatabaseTransaction,
    machine_id: Uuid,
    sections: &[SectionInput],
) -> Result<(), ServiceError> {
    for (index, section) in sections.iter().enumerate() {
        machine_section::ActiveModel {
            id: Set(Uuid::new_v4()),
            machine_id: Set(machine_id),
            title: Set(section.title.clone()),
            body: Set(section.body.clone()),
            sort_order: Set(section.sort_order.unwrap_or(index as i32)),
            image_url: Set(section.image_url.clone()),
            created_at: Set(Utc::now()),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

async fn insert_downloads(
    txn: &sea_orm::DatabaseTransaction,
    machine_id: Uuid,
    downloads: &[DownloadInput],
) -> Result<(), ServiceError> {
    for download in downloads {
        machine_download::ActiveModel {
            id: Set(Uuid::new_v4()),
            machine_id: Set(machine_id),
            label: Set(download.label.clone()),
            url: Set(download.url.clone()),
            created_at: Set(Utc::now()),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

async fn upsert_feature_values(
    txn: &sea_orm::DatabaseTransaction,
    machine_id: Uuid,
    features: &[FeatureValueInput],
) -> Result<(), ServiceError> {
    for feature in features {
        let now = Utc::now();
        FeatureValue::insert(feature_value::ActiveModel {
            id: Set(Uuid::new_v4()),
            machine_id: Set(machine_id),
            feature_id: Set(feature.feature_id),
            value: Set(feature.value.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::columns([
                feature_value::Column::MachineId,
                feature_value::Column::FeatureId,
            ])
            .update_columns([feature_value::Column::Value, feature_value::Column::UpdatedAt])
            .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;
    }
    Ok(())
}

async fn upsert_parameter_values(
    txn: &sea_orm::DatabaseTransaction,
    machine_id: Uuid,
    parameters: &[ParameterValueInput],
) -> Result<(), ServiceError> {
    for parameter in parameters {
        let now = Utc::now();
        ParameterValue::insert(parameter_value::ActiveModel {
            id: Set(Uuid::new_v4()),
            machine_id: Set(machine_id),
            parameter_id: Set(parameter.parameter_id),
            value: Set(parameter.value.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::columns([
                parameter_value::Column::MachineId,
                parameter_value::Column::ParameterId,
            ])
            .update_columns([
                parameter_value::Column::Value,
                parameter_value::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;
    }
    Ok(())
}
