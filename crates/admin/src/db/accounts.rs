//! Account repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use mensa_core::{AccountId, Email, Role};

use super::RepositoryError;
use crate::models::account::Account;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for account queries.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: String,
    email: String,
    role: Option<String>,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let id = AccountId::parse(&row.id)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid account id: {e}")))?;
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row
            .role
            .map(|r| {
                r.parse::<Role>()
                    .map_err(|e| RepositoryError::DataCorruption(format!("invalid role: {e}")))
            })
            .transpose()?;
        let created_by = row
            .created_by
            .map(|c| {
                AccountId::parse(&c).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid creator id: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            id,
            email,
            role,
            created_at: row.created_at,
            created_by,
        })
    }
}

const ACCOUNT_COLUMNS: &str = "id, email, role, created_at, created_by";

// =============================================================================
// Repository
// =============================================================================

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account ORDER BY created_at ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get an account by its email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get an account and its password hash by email, for sign-in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct AuthRow {
            #[sqlx(flatten)]
            account: AccountRow,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, AuthRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS}, password_hash FROM account WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| Ok((r.account.try_into()?, r.password_hash)))
            .transpose()
    }

    /// Get the password hash for an account ID, for re-authentication.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash_by_id(
        &self,
        id: AccountId,
    ) -> Result<Option<String>, RepositoryError> {
        let hash: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM account WHERE id = ?1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(hash)
    }

    /// Create a new account.
    ///
    /// `role` is `None` for self-registered accounts, which are assigned a
    /// role at first-login bootstrap.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        role: Option<Role>,
        created_by: Option<AccountId>,
    ) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r"
            INSERT INTO account (id, email, role, password_hash, created_at, created_by)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {ACCOUNT_COLUMNS}
            "
        ))
        .bind(AccountId::generate())
        .bind(email)
        .bind(role.map(|r| r.to_string()))
        .bind(password_hash)
        .bind(Utc::now())
        .bind(created_by)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Update an account's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_role(
        &self,
        id: AccountId,
        role: Role,
    ) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE account SET role = ?1 WHERE id = ?2 RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(role.to_string())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Update an account's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_password(
        &self,
        id: AccountId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE account SET password_hash = ?1 WHERE id = ?2")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: AccountId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM account WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    #[tokio::test]
    async fn test_create_and_get_by_email() {
        let pool = memory_pool().await;
        let repo = AccountRepository::new(&pool);

        let email = Email::parse("chef@canteen.edu").unwrap();
        let created = repo.create(&email, "hash", None, None).await.unwrap();
        assert_eq!(created.email, email);
        assert_eq!(created.role, None);

        let fetched = repo.get_by_email(&email).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = memory_pool().await;
        let repo = AccountRepository::new(&pool);

        let email = Email::parse("chef@canteen.edu").unwrap();
        repo.create(&email, "hash", None, None).await.unwrap();

        let err = repo.create(&email, "hash2", None, None).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_differing_case_is_conflict() {
        let pool = memory_pool().await;
        let repo = AccountRepository::new(&pool);

        repo.create(&Email::parse("chef@canteen.edu").unwrap(), "hash", None, None)
            .await
            .unwrap();

        // Emails are lowercase-normalized at parse; the column is NOCASE as a
        // second line of defense.
        let err = sqlx::query("INSERT INTO account (id, email, role, password_hash, created_at) VALUES (?1, 'CHEF@canteen.edu', NULL, 'h', ?2)")
            .bind(AccountId::generate())
            .bind(Utc::now())
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(matches!(err, sqlx::Error::Database(ref e) if e.is_unique_violation()));
    }

    #[tokio::test]
    async fn test_update_role() {
        let pool = memory_pool().await;
        let repo = AccountRepository::new(&pool);

        let email = Email::parse("chef@canteen.edu").unwrap();
        let account = repo.create(&email, "hash", None, None).await.unwrap();

        let updated = repo.update_role(account.id, Role::Admin).await.unwrap();
        assert_eq!(updated.role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let pool = memory_pool().await;
        let repo = AccountRepository::new(&pool);

        let err = repo.delete(AccountId::generate()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_get_with_password_hash() {
        let pool = memory_pool().await;
        let repo = AccountRepository::new(&pool);

        let email = Email::parse("chef@canteen.edu").unwrap();
        repo.create(&email, "argon2-hash", Some(Role::Admin), None)
            .await
            .unwrap();

        let (account, hash) = repo.get_with_password_hash(&email).await.unwrap().unwrap();
        assert_eq!(account.role, Some(Role::Admin));
        assert_eq!(hash, "argon2-hash");
    }
}
