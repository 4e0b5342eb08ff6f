//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use mensa_core::{AccountId, Email, Role};

/// Session-stored account identity.
///
/// Minimal data stored in the session to identify the signed-in account.
/// The role here is the resolved role (after bootstrap), never absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAccount {
    /// Account's database ID.
    pub id: AccountId,
    /// Account's email address.
    pub email: Email,
    /// Account's resolved role.
    pub role: Role,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current signed-in account.
    pub const CURRENT_ACCOUNT: &str = "current_account";
}
