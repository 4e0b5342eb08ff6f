//! Form-level validation for menu items and credentials.
//!
//! Validators take raw form input and return either a normalized record or a
//! field-scoped [`ValidationError`]. The first failing field short-circuits;
//! a failing record is never partially applied. Inputs are never mutated.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::sanitize::sanitize_name;
use crate::types::{Category, CanteenLevel, Price};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A validation failure, scoped to the wire name of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Wire name of the field that failed (e.g. `canteenLevel`).
    pub field: &'static str,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ValidationError {
    /// Create a new field-scoped validation error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Raw menu item form input, exactly as submitted.
///
/// Category and level arrive as strings so out-of-enumeration values produce
/// a field-scoped error instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDraft {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub canteen_level: String,
}

/// A validated, sanitized menu item payload, ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMenuItem {
    pub name: String,
    pub price: Price,
    pub category: Category,
    pub canteen_level: CanteenLevel,
}

/// Validate a menu item draft.
///
/// Sanitizes the name, checks the price bounds, and checks category and level
/// membership. Fields are checked in declaration order and the first failure
/// is returned.
///
/// # Errors
///
/// Returns a [`ValidationError`] scoped to the first invalid field.
pub fn validate_menu_item(draft: &MenuItemDraft) -> Result<ValidMenuItem, ValidationError> {
    let name = sanitize_name(&draft.name);
    if name.is_empty() {
        return Err(ValidationError::new(
            "name",
            "name must contain 1-100 characters after sanitization",
        ));
    }

    let price =
        Price::new(draft.price).map_err(|e| ValidationError::new("price", e.to_string()))?;

    let category: Category = draft.category.parse().map_err(|_| {
        ValidationError::new(
            "category",
            format!(
                "category must be one of: {}",
                Category::ALL.map(|c| c.as_str()).join(", ")
            ),
        )
    })?;

    let canteen_level: CanteenLevel = draft.canteen_level.parse().map_err(|_| {
        ValidationError::new(
            "canteenLevel",
            format!(
                "canteen level must be one of: {}",
                CanteenLevel::ALL.map(|l| l.as_str()).join(", ")
            ),
        )
    })?;

    Ok(ValidMenuItem {
        name,
        price,
        category,
        canteen_level,
    })
}

/// Validate password composition.
///
/// Requires at least [`MIN_PASSWORD_LENGTH`] characters with at least one
/// uppercase letter, one lowercase letter, and one digit.
///
/// # Errors
///
/// Returns a [`ValidationError`] scoped to `password`.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new(
            "password",
            format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::new(
            "password",
            "password must contain an uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ValidationError::new(
            "password",
            "password must contain a lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new(
            "password",
            "password must contain a digit",
        ));
    }
    Ok(())
}

/// Validate a new password and its confirmation.
///
/// The confirmation check runs first, so a mismatch is reported regardless of
/// whether the password itself would pass composition checks.
///
/// # Errors
///
/// Returns a [`ValidationError`] scoped to `confirmPassword` on mismatch, or
/// to `password` on a composition failure.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password != confirm {
        return Err(ValidationError::new(
            "confirmPassword",
            "passwords do not match",
        ));
    }
    validate_password(password)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(name: &str, price: Decimal, category: &str, level: &str) -> MenuItemDraft {
        MenuItemDraft {
            name: name.to_owned(),
            price,
            category: category.to_owned(),
            canteen_level: level.to_owned(),
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        let valid = validate_menu_item(&draft(
            "Fried Rice",
            Decimal::new(85, 1),
            "Main Course",
            "Level 1",
        ))
        .unwrap();

        assert_eq!(valid.name, "Fried Rice");
        assert_eq!(valid.price.as_decimal(), Decimal::new(85, 1));
        assert_eq!(valid.category, Category::MainCourse);
        assert_eq!(valid.canteen_level, CanteenLevel::Level1);
    }

    #[test]
    fn test_hostile_name_is_sanitized_not_rejected() {
        let valid = validate_menu_item(&draft(
            "<script>alert(1)</script>",
            Decimal::TEN,
            "Main Course",
            "Level 1",
        ))
        .unwrap();

        assert!(!valid.name.contains('<'));
        assert!(!valid.name.contains('>'));
    }

    #[test]
    fn test_name_empty_after_sanitization_rejected() {
        let err =
            validate_menu_item(&draft("<>", Decimal::TEN, "Dessert", "Level 2")).unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn test_negative_price_rejected_with_price_error() {
        let err = validate_menu_item(&draft(
            "Fried Rice",
            Decimal::from(-5),
            "Main Course",
            "Level 1",
        ))
        .unwrap_err();
        assert_eq!(err.field, "price");
    }

    #[test]
    fn test_price_over_ceiling_rejected() {
        let err = validate_menu_item(&draft(
            "Gold Leaf Sundae",
            Decimal::from(10_001),
            "Dessert",
            "Level 3",
        ))
        .unwrap_err();
        assert_eq!(err.field, "price");
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err =
            validate_menu_item(&draft("Soup", Decimal::TEN, "Starter", "Level 1")).unwrap_err();
        assert_eq!(err.field, "category");
        assert!(err.message.contains("Main Course"));
    }

    #[test]
    fn test_unknown_level_rejected() {
        let err =
            validate_menu_item(&draft("Soup", Decimal::TEN, "Snacks", "Basement")).unwrap_err();
        assert_eq!(err.field, "canteenLevel");
    }

    #[test]
    fn test_first_error_wins() {
        // Both name and price invalid: name is reported.
        let err = validate_menu_item(&draft("", Decimal::ZERO, "Snacks", "Level 1")).unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn test_password_missing_uppercase_rejected() {
        assert!(validate_password("password1").is_err());
    }

    #[test]
    fn test_password_with_mixed_case_and_digit_accepted() {
        assert!(validate_password("Password1").is_ok());
    }

    #[test]
    fn test_password_too_short_rejected() {
        assert!(validate_password("Pas1").is_err());
    }

    #[test]
    fn test_password_missing_digit_rejected() {
        assert!(validate_password("Passwords").is_err());
    }

    #[test]
    fn test_confirmation_mismatch_rejected_even_for_valid_password() {
        let err = validate_new_password("Password1", "Password2").unwrap_err();
        assert_eq!(err.field, "confirmPassword");
    }

    #[test]
    fn test_confirmation_mismatch_rejected_for_invalid_password_too() {
        let err = validate_new_password("weak", "weaker").unwrap_err();
        assert_eq!(err.field, "confirmPassword");
    }

    #[test]
    fn test_matching_valid_password_accepted() {
        assert!(validate_new_password("Password1", "Password1").is_ok());
    }
}
