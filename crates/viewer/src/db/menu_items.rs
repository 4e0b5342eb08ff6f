//! Read-only menu item queries for the public listing.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use mensa_core::{CanteenLevel, Category, MenuItem, MenuItemId, Price};

use super::RepositoryError;

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

/// Read-only repository for the public menu listing.
pub struct MenuItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MenuItemRepository<'a> {
    /// Create a new repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List menu items, optionally filtered by level and/or category.
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
        category: Option<Category>,
    ) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r"
            SELECT id, name, price, category, canteen_level, created_at
            FROM menu_item
            WHERE (?1 IS NULL OR canteen_level = ?1)
              AND (?2 IS NULL OR category = ?2)
            ORDER BY canteen_level ASC, category ASC, name ASC
            ",
        )
        .bind(level.map(|l| l.as_str()))
        .bind(category.map(|c| c.as_str()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
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
