//! Mensa Core - Shared types library.
//!
//! This crate provides common types used across all Mensa components:
//! - `viewer` - Public menu viewer service
//! - `admin` - Menu and account administration service
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and the
//!   menu enumerations
//! - [`sanitize`] - Free-text sanitization for user-supplied names
//! - [`validate`] - Form-level validation for menu items and credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod sanitize;
pub mod types;
pub mod validate;

pub use sanitize::sanitize_name;
pub use types::*;
pub use validate::{
    MenuItemDraft, ValidMenuItem, ValidationError, validate_menu_item, validate_new_password,
    validate_password,
};
