use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::notifications::Notifier;
use crate::services::{
    accessories::AccessoryService, attributes::AttributeService, catalog::CatalogService,
    categories::CategoryService, contacts::ContactService, machines::MachineService,
    settings::SettingsService, storage::FileStorage, users::UserService, variants::VariantService,
};

pub mod accessories;
pub mod auth;
pub mod categories;
pub mod common;
pub mod contacts;
pub mod features;
pub mod machines;
pub mod parameters;
pub mod settings;
pub mod uploads;
pub mod users;

/// Aggregated services handed to every HTTP handler through AppState.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogService,
    pub machines: MachineService,
    pub categories: CategoryService,
    pub attributes: AttributeService,
    pub variants: VariantService,
    pub accessories: AccessoryService,
    pub contacts: ContactService,
    pub settings: SettingsService,
    pub users: UserService,
    pub storage: Arc<dyn FileStorage>,
}

impl AppServices {
    pub fn new(
        db: Arc<DbPool>,
        events: EventSender,
        storage: Arc<dyn FileStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let settings = SettingsService::new(db.clone());

        Self {
            catalog: CatalogService::new(db.clone()),
            machines: MachineService::new(db.clone(), storage.clone(), events.clone()),
            categories: CategoryService::new(db.clone(), events.clone()),
            attributes: AttributeService::new(db.clone()),
            variants: VariantService::new(db.clone()),
            accessories: AccessoryService::new(db.clone()),
            contacts: ContactService::new(db.clone(), notifier, settings.clone(), events.clone()),
            settings,
            users: UserService::new(db, events),
            storage,
        }
    }
}
