//! Account domain types.

use chrono::{DateTime, Utc};

use mensa_core::{AccountId, Email, Role};

/// An account (domain type).
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Lowercase-normalized email address.
    pub email: Email,
    /// Stored role. `None` until the first-login bootstrap assigns one.
    pub role: Option<Role>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// The admin that issued this account, if it was not self-registered.
    pub created_by: Option<AccountId>,
}
