use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{authorize_owner, AuthUser};
use crate::db::DbPool;
use crate::entities::{category, Category, CategoryModel};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Category CRUD. Slugs are derived from names and unique; deleting a
/// category detaches its machines via the FK `SET NULL` rule.
#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DbPool>,
    events: EventSender,
}

impl CategoryService {
    pub fn new(db: Arc<DbPool>, events: EventSender) -> Self {
        Self { db, events }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<CategoryModel>, ServiceError> {
        Category::find()
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, category_id: Uuid) -> Result<CategoryModel, ServiceError> {
        Category::find_by_id(category_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {category_id} not found")))
    }

    #[instrument(skip(self, description))]
    pub async fn create(
        &self,
        user: &AuthUser,
        name: String,
        description: Option<String>,
    ) -> Result<CategoryModel, ServiceError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "category name is required".to_string(),
            ));
        }

        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(ServiceError::ValidationError(
                "category name yields an empty slug".to_string(),
            ));
        }
        self.ensure_unique_slug(&slug, None).await?;

        let now = Utc::now();
        let created = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            slug: Set(slug),
            description: Set(description),
            admin_id: Set(user.user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        self.events
            .send_or_log(Event::CategoryCreated(created.id))
            .await;
        info!(category_id = %created.id, slug = %created.slug, "created category");
        Ok(created)
    }

    /// Update name/description; the slug is re-derived when the name
    /// changes and collision-checked against other categories.
    #[instrument(skip(self, description))]
    pub async fn update(
        &self,
        user: &AuthUser,
        category_id: Uuid,
        name: String,
        description: Option<String>,
    ) -> Result<CategoryModel, ServiceError> {
        let existing = self.get(category_id).await?;
        authorize_owner(user, existing.admin_id)?;

        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "category name is required".to_string(),
            ));
        }

        let slug = slugify(&name);
        if slug != existing.slug {
            self.ensure_unique_slug(&slug, Some(category_id)).await?;
        }

        let mut active: category::ActiveModel = existing.into();
        active.name = Set(name);
        active.slug = Set(slug);
        active.description = Set(description);
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db).await?;
        info!(%category_id, "updated category");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user: &AuthUser, category_id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get(category_id).await?;
        authorize_owner(user, existing.admin_id)?;

        Category::delete_by_id(category_id).exec(&*self.db).await?;

        self.events
            .send_or_log(Event::CategoryDeleted(category_id))
            .await;
        info!(%category_id, "deleted category");
        Ok(())
    }

    async fn ensure_unique_slug(
        &self,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut query = Category::find().filter(category::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(category::Column::Id.ne(id));
        }

        if query.one(&*self.db).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "category slug '{slug}' already exists"
            )));
        }

        Ok(())
    }
}

/// Derive a URL slug: lowercase, ASCII letters/digits and single hyphens,
/// no leading or trailing hyphen. Polish diacritics fold to their ASCII
/// counterparts before the filter.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;

    for c in name.chars().map(fold_diacritic) {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn fold_diacritic(c: char) -> char {
    match c {
        'ą' | 'Ą' => 'a',
        'ć' | 'Ć' => 'c',
        'ę' | 'Ę' => 'e',
        'ł' | 'Ł' => 'l',
        'ń' | 'Ń' => 'n',
        'ó' | 'Ó' => 'o',
        'ś' | 'Ś' => 's',
        'ź' | 'Ź' | 'ż' | 'Ż' => 'z',
        other => other,
    }
}
