//! Domain and session types for the admin service.

pub mod account;
pub mod session;

pub use account::Account;
pub use session::{CurrentAccount, keys as session_keys};
