//! Seed the catalog with sample menu items.
//!
//! # Usage
//!
//! ```bash
//! mensa-cli seed
//! ```
//!
//! Intended for local development: gives the viewer something to show.
//! Seeding is additive and does not check for existing items.

use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use mensa_admin::db::RepositoryError;
use mensa_admin::db::menu_items::MenuItemRepository;
use mensa_core::{MenuItem, MenuItemDraft, MenuItemId, validate_menu_item};

/// Errors that can occur during seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// A seed row failed validation.
    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}

/// Sample menu: (name, price, category, level).
const SAMPLE_ITEMS: &[(&str, &str, &str, &str)] = &[
    ("Fried Rice", "8.5", "Main Course", "Level 1"),
    ("Chicken Laksa", "7.0", "Main Course", "Level 1"),
    ("Iced Lemon Tea", "2.5", "Beverage", "Level 1"),
    ("Apple Pie", "4.0", "Dessert", "Level 1"),
    ("Nasi Lemak", "6.5", "Main Course", "Level 2"),
    ("Kopi O", "1.8", "Beverage", "Level 2"),
    ("Spring Rolls", "3.5", "Snacks", "Level 2"),
    ("Beef Noodles", "9.0", "Main Course", "Level 3"),
    ("Mango Pudding", "3.8", "Dessert", "Level 3"),
    ("Curry Puff", "2.0", "Snacks", "Level 3"),
];

/// Insert the sample menu items.
///
/// # Errors
///
/// Returns `SeedError` if the database URL is missing or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = mensa_admin::db::create_pool(&database_url).await?;
    let repo = MenuItemRepository::new(&pool);

    for (name, price, category, level) in SAMPLE_ITEMS {
        let draft = MenuItemDraft {
            name: (*name).to_owned(),
            price: Decimal::from_str(price).map_err(|e| SeedError::InvalidSeed(e.to_string()))?,
            category: (*category).to_owned(),
            canteen_level: (*level).to_owned(),
        };
        // Seed rows go through the same validation as form input.
        let valid = validate_menu_item(&draft).map_err(|e| SeedError::InvalidSeed(e.to_string()))?;

        let item = MenuItem {
            id: MenuItemId::generate(),
            name: valid.name,
            price: valid.price,
            category: valid.category,
            canteen_level: valid.canteen_level,
            created_at: Utc::now(),
        };
        repo.insert(&item).await?;
        tracing::info!("Seeded: {} ({} / {})", item.name, item.category, item.canteen_level);
    }

    tracing::info!("Seeded {} menu items", SAMPLE_ITEMS.len());
    Ok(())
}
