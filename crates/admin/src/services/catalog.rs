//! Catalog service: the CRUD façade over the menu item store.
//!
//! Every operation validates first, so a failing record never reaches the
//! repository. Successful mutations publish a [`CatalogEvent`] (after the
//! transaction that also bumps the catalog revision has committed), which
//! invalidates cached listings downstream.

use chrono::Utc;
use thiserror::Error;

use mensa_core::{CanteenLevel, MenuItem, MenuItemDraft, MenuItemId, ValidationError,
    validate_menu_item};
use sqlx::SqlitePool;

use crate::config::DeletePolicy;
use crate::db::RepositoryError;
use crate::db::menu_items::MenuItemRepository;
use crate::events::{CatalogEvent, EventBus};

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The submitted record failed validation; nothing was stored.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No menu item exists with the given id.
    #[error("menu item not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CatalogError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}

/// The menu catalog CRUD façade.
pub struct CatalogService<'a> {
    repo: MenuItemRepository<'a>,
    events: &'a EventBus,
    delete_policy: DeletePolicy,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, events: &'a EventBus, delete_policy: DeletePolicy) -> Self {
        Self {
            repo: MenuItemRepository::new(pool),
            events,
            delete_policy,
        }
    }

    /// List menu items ordered by (level, category, name), optionally
    /// filtered by canteen level.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the listing fails.
    pub async fn list(&self, level: Option<CanteenLevel>) -> Result<Vec<MenuItem>, CatalogError> {
        Ok(self.repo.list(level).await?)
    }

    /// Validate and insert a new menu item, assigning its id and creation
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` before any storage call if the
    /// draft is invalid.
    pub async fn create(&self, draft: &MenuItemDraft) -> Result<MenuItem, CatalogError> {
        let valid = validate_menu_item(draft)?;

        let item = MenuItem {
            id: MenuItemId::generate(),
            name: valid.name,
            price: valid.price,
            category: valid.category,
            canteen_level: valid.canteen_level,
            created_at: Utc::now(),
        };

        self.repo.insert(&item).await?;
        self.events.publish(CatalogEvent::Created { item: item.clone() });
        Ok(item)
    }

    /// Validate and replace all mutable fields of an existing menu item.
    ///
    /// Identifier and creation timestamp are unchanged; concurrent edits are
    /// last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` before any storage call, or
    /// `CatalogError::NotFound` if the id is stale.
    pub async fn update(
        &self,
        id: MenuItemId,
        draft: &MenuItemDraft,
    ) -> Result<MenuItem, CatalogError> {
        let valid = validate_menu_item(draft)?;

        let item = self.repo.update(id, &valid).await?;
        self.events.publish(CatalogEvent::Updated { item: item.clone() });
        Ok(item)
    }

    /// Delete a menu item by id.
    ///
    /// Deleting a missing id follows the configured [`DeletePolicy`]: an
    /// error under `Strict` (the default), a silent no-op under `Idempotent`.
    /// No event is published for a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` under the strict policy if the id
    /// does not exist.
    pub async fn delete(&self, id: MenuItemId) -> Result<(), CatalogError> {
        match self.repo.delete(id).await {
            Ok(()) => {
                self.events.publish(CatalogEvent::Deleted { id });
                Ok(())
            }
            Err(RepositoryError::NotFound) => match self.delete_policy {
                DeletePolicy::Strict => Err(CatalogError::NotFound),
                DeletePolicy::Idempotent => Ok(()),
            },
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;
    use crate::events::Notification;
    use mensa_core::Category;
    use rust_decimal::Decimal;

    fn draft(name: &str, price: Decimal, category: &str, level: &str) -> MenuItemDraft {
        MenuItemDraft {
            name: name.to_owned(),
            price,
            category: category.to_owned(),
            canteen_level: level.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_create_then_list_roundtrip() {
        let pool = memory_pool().await;
        let events = EventBus::new();
        let service = CatalogService::new(&pool, &events, DeletePolicy::Strict);

        let created = service
            .create(&draft("Fried Rice", Decimal::new(85, 1), "Main Course", "Level 1"))
            .await
            .unwrap();

        assert_eq!(created.name, "Fried Rice");
        assert_eq!(created.price.as_decimal(), Decimal::new(85, 1));
        assert_eq!(created.category, Category::MainCourse);
        assert_eq!(created.canteen_level, CanteenLevel::Level1);

        let listed = service.list(None).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_create_sanitizes_hostile_names() {
        let pool = memory_pool().await;
        let events = EventBus::new();
        let service = CatalogService::new(&pool, &events, DeletePolicy::Strict);

        let created = service
            .create(&draft(
                "<script>alert(1)</script>",
                Decimal::TEN,
                "Main Course",
                "Level 1",
            ))
            .await
            .unwrap();

        assert!(!created.name.contains('<'));
        assert!(!created.name.contains('>'));

        let listed = service.list(None).await.unwrap();
        assert!(!listed[0].name.contains('<'));
    }

    #[tokio::test]
    async fn test_invalid_price_fails_before_storage() {
        let pool = memory_pool().await;
        let events = EventBus::new();
        let service = CatalogService::new(&pool, &events, DeletePolicy::Strict);
        let mut sub = events.subscribe();

        let err = service
            .create(&draft("Soup", Decimal::from(-5), "Main Course", "Level 1"))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Validation(ref v) if v.field == "price"));
        assert!(service.list(None).await.unwrap().is_empty());

        // No event for a rejected record.
        service
            .create(&draft("Soup", Decimal::ONE, "Main Course", "Level 1"))
            .await
            .unwrap();
        match sub.next().await.unwrap() {
            Notification::Event(CatalogEvent::Created { item }) => assert_eq!(item.name, "Soup"),
            other => panic!("unexpected notification: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_replaces_previous_values() {
        let pool = memory_pool().await;
        let events = EventBus::new();
        let service = CatalogService::new(&pool, &events, DeletePolicy::Strict);

        let created = service
            .create(&draft("Soup", Decimal::from(3), "Main Course", "Level 1"))
            .await
            .unwrap();

        let updated = service
            .update(
                created.id,
                &draft("Mushroom Soup", Decimal::from(4), "Main Course", "Level 1"),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);

        let listed = service.list(None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Mushroom Soup");
        assert!(listed.iter().all(|i| i.name != "Soup"));
    }

    #[tokio::test]
    async fn test_update_stale_id_is_not_found() {
        let pool = memory_pool().await;
        let events = EventBus::new();
        let service = CatalogService::new(&pool, &events, DeletePolicy::Strict);

        let err = service
            .update(
                MenuItemId::generate(),
                &draft("Ghost", Decimal::ONE, "Snacks", "Level 1"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_then_list_excludes_item() {
        let pool = memory_pool().await;
        let events = EventBus::new();
        let service = CatalogService::new(&pool, &events, DeletePolicy::Strict);

        let created = service
            .create(&draft("Toast", Decimal::from(2), "Snacks", "Level 1"))
            .await
            .unwrap();

        service.delete(created.id).await.unwrap();
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_id_strict_policy() {
        let pool = memory_pool().await;
        let events = EventBus::new();
        let service = CatalogService::new(&pool, &events, DeletePolicy::Strict);

        let err = service.delete(MenuItemId::generate()).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_missing_id_idempotent_policy() {
        let pool = memory_pool().await;
        let events = EventBus::new();
        let service = CatalogService::new(&pool, &events, DeletePolicy::Idempotent);
        let mut sub = events.subscribe();

        service.delete(MenuItemId::generate()).await.unwrap();

        // The no-op publishes nothing; the next real mutation is the first
        // event observed.
        let created = service
            .create(&draft("Toast", Decimal::from(2), "Snacks", "Level 1"))
            .await
            .unwrap();
        match sub.next().await.unwrap() {
            Notification::Event(CatalogEvent::Created { item }) => assert_eq!(item.id, created.id),
            other => panic!("unexpected notification: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mutations_publish_events() {
        let pool = memory_pool().await;
        let events = EventBus::new();
        let service = CatalogService::new(&pool, &events, DeletePolicy::Strict);
        let mut sub = events.subscribe();

        let created = service
            .create(&draft("Tea", Decimal::from(2), "Beverage", "Level 2"))
            .await
            .unwrap();
        service
            .update(created.id, &draft("Iced Tea", Decimal::from(2), "Beverage", "Level 2"))
            .await
            .unwrap();
        service.delete(created.id).await.unwrap();

        let kinds: Vec<&str> = [
            sub.next().await.unwrap(),
            sub.next().await.unwrap(),
            sub.next().await.unwrap(),
        ]
        .into_iter()
        .map(|n| match n {
            Notification::Event(e) => e.kind(),
            Notification::Lagged(_) => "lagged",
        })
        .collect();
        assert_eq!(kinds, ["created", "updated", "deleted"]);
    }
}
