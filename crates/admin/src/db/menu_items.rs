//! Menu item repository for database operations.
//!
//! Every mutation bumps the `catalog_revision` counter in the same
//! transaction, so cross-process observers (the viewer) can detect changes
//! by polling a single row.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};

use mensa_core::{CanteenLevel, MenuItem, MenuItemId, Price, ValidMenuItem};

use super::RepositoryError;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for menu item queries.
#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    price: String,
    category: String,
    canteen_level: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = RepositoryError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        let id = MenuItemId::parse(&row.id)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid menu item id: {e}")))?;
        let price: Price = row
            .price
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid price: {e}")))?;
        let category = row
            .category
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid category: {e}")))?;
        let canteen_level = row
            .canteen_level
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid canteen level: {e}")))?;

        Ok(Self {
            id,
            name: row.name,
            price,
            category,
            canteen_level,
            created_at: row.created_at,
        })
    }
}

/// Bump the catalog revision inside an open mutation transaction.
async fn bump_revision(tx: &mut Transaction<'_, Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE catalog_revision SET revision = revision + 1 WHERE id = 1")
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for menu item database operations.
pub struct MenuItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MenuItemRepository<'a> {
    /// Create a new menu item repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List menu items, optionally filtered by canteen level.
    ///
    /// Items are ordered by (`canteen_level`, category, name) ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(
        &self,
        level: Option<CanteenLevel>,
    ) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r"
            SELECT id, name, price, category, canteen_level, created_at
            FROM menu_item
            WHERE ?1 IS NULL OR canteen_level = ?1
            ORDER BY canteen_level ASC, category ASC, name ASC
            ",
        )
        .bind(level.map(|l| l.as_str()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a menu item by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r"
            SELECT id, name, price, category, canteen_level, created_at
            FROM menu_item
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new menu item and bump the catalog revision.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, item: &MenuItem) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO menu_item (id, name, price, category, canteen_level, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.price.to_string())
        .bind(item.category.as_str())
        .bind(item.canteen_level.as_str())
        .bind(item.created_at)
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Replace all mutable fields of a menu item and bump the catalog
    /// revision. `id` and `created_at` are unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: MenuItemId,
        fields: &ValidMenuItem,
    ) -> Result<MenuItem, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, MenuItemRow>(
            r"
            UPDATE menu_item
            SET name = ?1, price = ?2, category = ?3, canteen_level = ?4
            WHERE id = ?5
            RETURNING id, name, price, category, canteen_level, created_at
            ",
        )
        .bind(&fields.name)
        .bind(fields.price.to_string())
        .bind(fields.category.as_str())
        .bind(fields.canteen_level.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        row.try_into()
    }

    /// Delete a menu item by its ID and bump the catalog revision.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: MenuItemId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM menu_item WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Read the current catalog revision.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revision(&self) -> Result<i64, RepositoryError> {
        let revision: i64 =
            sqlx::query_scalar("SELECT revision FROM catalog_revision WHERE id = 1")
                .fetch_one(self.pool)
                .await?;
        Ok(revision)
    }
}
