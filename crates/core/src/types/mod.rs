//! Core types for Mensa.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod menu;
pub mod price;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use menu::{Category, CanteenLevel, MenuItem};
pub use price::{Price, PriceError};
pub use role::Role;
