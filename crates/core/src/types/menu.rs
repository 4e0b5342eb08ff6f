//! Menu item record and its fixed enumerations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::MenuItemId;
use super::price::Price;

/// Menu item category.
///
/// Wire form uses the human-readable labels ("Main Course", "Dessert", ...).
/// Listings are ordered by the label's natural string order, matching the
/// catalog backend's field ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Main Course")]
    MainCourse,
    Dessert,
    Beverage,
    Snacks,
}

impl Category {
    /// All categories, for error messages and iteration.
    pub const ALL: [Self; 4] = [Self::MainCourse, Self::Dessert, Self::Beverage, Self::Snacks];

    /// The wire/display label for this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MainCourse => "Main Course",
            Self::Dessert => "Dessert",
            Self::Beverage => "Beverage",
            Self::Snacks => "Snacks",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Main Course" => Ok(Self::MainCourse),
            "Dessert" => Ok(Self::Dessert),
            "Beverage" => Ok(Self::Beverage),
            "Snacks" => Ok(Self::Snacks),
            _ => Err(format!("invalid category: {s}")),
        }
    }
}

/// Physical canteen floor a menu belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanteenLevel {
    #[serde(rename = "Level 1")]
    Level1,
    #[serde(rename = "Level 2")]
    Level2,
    #[serde(rename = "Level 3")]
    Level3,
}

impl CanteenLevel {
    /// All levels, for error messages and iteration.
    pub const ALL: [Self; 3] = [Self::Level1, Self::Level2, Self::Level3];

    /// The wire/display label for this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Level1 => "Level 1",
            Self::Level2 => "Level 2",
            Self::Level3 => "Level 3",
        }
    }
}

impl std::fmt::Display for CanteenLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CanteenLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Level 1" => Ok(Self::Level1),
            "Level 2" => Ok(Self::Level2),
            "Level 3" => Ok(Self::Level3),
            _ => Err(format!("invalid canteen level: {s}")),
        }
    }
}

/// A menu item as stored in the catalog.
///
/// `id` and `created_at` are server-assigned; all other fields are replaced
/// wholesale on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Price,
    pub category: Category,
    pub canteen_level: CanteenLevel,
    pub created_at: DateTime<Utc>,
}
