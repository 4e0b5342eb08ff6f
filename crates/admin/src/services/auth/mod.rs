//! Authentication service.
//!
//! Password authentication with argon2, plus the first-login role bootstrap.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use mensa_core::{AccountId, Email, Role, validate_new_password, validate_password};

use crate::db::RepositoryError;
use crate::db::accounts::AccountRepository;
use crate::models::account::Account;

/// Authentication service.
///
/// Handles registration, sign-in, password changes, and role resolution.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
    /// Email granted the admin role at bootstrap, from configuration.
    bootstrap_admin: Option<&'a Email>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, bootstrap_admin: Option<&'a Email>) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
            bootstrap_admin,
        }
    }

    // =========================================================================
    // Registration & Sign-in
    // =========================================================================

    /// Register a new account with email, password, and confirmation.
    ///
    /// The account is stored without a role and immediately taken through the
    /// bootstrap transition, so self-registration yields the lowest-privilege
    /// role unless the configured bootstrap claim says otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::Validation` if the password or confirmation fails.
    /// Returns `AuthError::AccountAlreadyExists` if the email is registered.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(Account, Role), AuthError> {
        let email = Email::parse(email)?;
        validate_new_password(password, confirm_password)?;

        let password_hash = hash_password(password)?;

        let account = self
            .accounts
            .create(&email, &password_hash, None, None)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AccountAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        self.bootstrap(account).await
    }

    /// Sign in with email and password.
    ///
    /// All failures collapse to `AuthError::InvalidCredentials`; the caller
    /// never learns whether the email or the password was wrong.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(Account, Role), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (account, password_hash) = self
            .accounts
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        self.bootstrap(account).await
    }

    /// Change an account's password, re-authenticating with the current
    /// password first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the current password is
    /// wrong, or `AuthError::Validation` if the new password fails checks.
    pub async fn change_password(
        &self,
        id: AccountId,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        let password_hash = self
            .accounts
            .get_password_hash_by_id(id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(current_password, &password_hash)?;
        validate_new_password(new_password, confirm_password)?;

        let new_hash = hash_password(new_password)?;
        self.accounts.update_password(id, &new_hash).await?;
        Ok(())
    }

    /// Create an account with an explicit role, on behalf of an admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `AuthError::Validation`, or
    /// `AuthError::AccountAlreadyExists` on the corresponding failures.
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        role: Role,
        created_by: AccountId,
    ) -> Result<Account, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        self.accounts
            .create(&email, &password_hash, Some(role), Some(created_by))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AccountAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    // =========================================================================
    // Role Resolution
    // =========================================================================

    /// Resolve an account's effective role.
    ///
    /// Precedence: the stored role wins; the configured bootstrap claim is
    /// consulted only when no role is stored; otherwise the lowest-privilege
    /// role applies.
    #[must_use]
    pub fn resolve_role(&self, account: &Account) -> Role {
        if let Some(role) = account.role {
            return role;
        }
        match self.bootstrap_admin {
            Some(claim) if *claim == account.email => Role::Admin,
            _ => Role::LOWEST,
        }
    }

    /// Take an authenticated account through the bootstrap transition:
    /// resolve its role and, if none was stored, write the resolved role
    /// back.
    async fn bootstrap(&self, account: Account) -> Result<(Account, Role), AuthError> {
        let role = self.resolve_role(&account);
        if account.role.is_none() {
            tracing::info!(account_id = %account.id, %role, "bootstrapping role for first login");
            let account = self.accounts.update_role(account.id, role).await?;
            return Ok((account, role));
        }
        Ok((account, role))
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
