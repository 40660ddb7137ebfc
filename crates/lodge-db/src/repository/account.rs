//! # Account Repository
//!
//! Authentication accounts and bearer tokens.
//!
//! ## Registration Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  register(username, hash, profile)                          │
//! │       │                                                     │
//! │       ├── username taken?     → UniqueViolation, no writes │
//! │       ├── national id taken?  → UniqueViolation, no writes │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  BEGIN                                                      │
//! │    INSERT account (is_staff = 0)                            │
//! │    INSERT customer (linked to account)                      │
//! │  COMMIT   ← account and profile appear together or not     │
//! │             at all                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tokens are opaque random strings stored server-side, so logout is
//! a row delete and immediately invalidates the token.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use lodge_core::Customer;

/// An authentication account row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

/// Repository for account and token database operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Registers a customer account: login account plus linked
    /// customer profile, in one transaction.
    ///
    /// Duplicates are pre-checked so the caller gets a named field in
    /// the error rather than a raw constraint message.
    pub async fn register(
        &self,
        username: &str,
        password_hash: &str,
        name: &str,
        phone: &str,
        national_id: &str,
    ) -> DbResult<(Account, Customer)> {
        let existing: Option<String> =
            sqlx::query_scalar("SELECT id FROM accounts WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Err(DbError::duplicate("username", username));
        }

        let existing: Option<String> =
            sqlx::query_scalar("SELECT id FROM customers WHERE national_id = ?")
                .bind(national_id)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Err(DbError::duplicate("national_id", national_id));
        }

        let account_id = Uuid::new_v4().to_string();
        let customer_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO accounts (id, username, password_hash, is_staff, created_at) \
             VALUES (?, ?, ?, 0, ?)",
        )
        .bind(&account_id)
        .bind(username)
        .bind(password_hash)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO customers (id, account_id, name, phone, national_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&customer_id)
        .bind(&account_id)
        .bind(name)
        .bind(phone)
        .bind(national_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(username = %username, "Account registered");

        let account = self.get(&account_id).await?;
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, account_id, name, phone, national_id, created_at \
             FROM customers WHERE id = ?",
        )
        .bind(&customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((account, customer))
    }

    /// Creates a staff account with no customer profile.
    pub async fn create_staff(&self, username: &str, password_hash: &str) -> DbResult<Account> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO accounts (id, username, password_hash, is_staff, created_at) \
             VALUES (?, ?, ?, 1, ?)",
        )
        .bind(&id)
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get(&id).await
    }

    /// Fetches an account by id.
    pub async fn get(&self, id: &str) -> DbResult<Account> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, password_hash, is_staff, created_at FROM accounts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        account.ok_or_else(|| DbError::not_found("Account", id))
    }

    /// Looks up an account by username for login.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, password_hash, is_staff, created_at \
             FROM accounts WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Returns the account's existing token, or stores the offered one.
    ///
    /// One live token per account keeps login idempotent: logging in
    /// twice hands back the same credential instead of stranding the
    /// first session's token in the table.
    pub async fn issue_or_reuse_token(&self, account_id: &str, token: &str) -> DbResult<String> {
        let existing: Option<String> =
            sqlx::query_scalar("SELECT token FROM auth_tokens WHERE account_id = ? LIMIT 1")
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;

        if let Some(existing) = existing {
            return Ok(existing);
        }

        self.issue_token(account_id, token).await?;
        Ok(token.to_string())
    }

    /// Stores a freshly issued bearer token.
    pub async fn issue_token(&self, account_id: &str, token: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO auth_tokens (token, account_id, created_at) VALUES (?, ?, ?)")
            .bind(token)
            .bind(account_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        debug!(account_id = %account_id, "Token issued");
        Ok(())
    }

    /// Resolves a bearer token to its account and the account's
    /// customer profile id, if one exists.
    pub async fn resolve_token(&self, token: &str) -> DbResult<Option<(Account, Option<String>)>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT a.id, a.username, a.password_hash, a.is_staff, a.created_at \
             FROM accounts a JOIN auth_tokens t ON t.account_id = a.id \
             WHERE t.token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let Some(account) = account else {
            return Ok(None);
        };

        let customer_id: Option<String> =
            sqlx::query_scalar("SELECT id FROM customers WHERE account_id = ?")
                .bind(&account.id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(Some((account, customer_id)))
    }

    /// Deletes a token. Returns false when the token was not present.
    pub async fn revoke_token(&self, token: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_register_creates_account_and_profile() {
        let db = test_db().await;
        let (account, customer) = db
            .accounts()
            .register("ada", "hash", "Ada Lovelace", "0700000000", "NID-1")
            .await
            .unwrap();

        assert!(!account.is_staff);
        assert_eq!(customer.account_id.as_deref(), Some(account.id.as_str()));
        assert_eq!(customer.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_duplicate_registration_leaves_no_partial_rows() {
        let db = test_db().await;
        db.accounts()
            .register("ada", "hash", "Ada Lovelace", "0700000000", "NID-1")
            .await
            .unwrap();

        // Same username, fresh national id.
        let err = db
            .accounts()
            .register("ada", "hash", "Someone Else", "0711111111", "NID-2")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Fresh username, same national id.
        let err = db
            .accounts()
            .register("grace", "hash", "Grace Hopper", "0722222222", "NID-1")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Neither failed attempt left an account or profile behind.
        assert!(db.accounts().find_by_username("grace").await.unwrap().is_none());
        assert_eq!(db.customers().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_token_roundtrip_and_revocation() {
        let db = test_db().await;
        let (account, customer) = db
            .accounts()
            .register("ada", "hash", "Ada Lovelace", "0700000000", "NID-1")
            .await
            .unwrap();

        db.accounts().issue_token(&account.id, "tok-1").await.unwrap();

        let (resolved, customer_id) = db
            .accounts()
            .resolve_token("tok-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, account.id);
        assert_eq!(customer_id.as_deref(), Some(customer.id.as_str()));

        assert!(db.accounts().revoke_token("tok-1").await.unwrap());
        assert!(db.accounts().resolve_token("tok-1").await.unwrap().is_none());
        assert!(!db.accounts().revoke_token("tok-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_login_reuses_live_token() {
        let db = test_db().await;
        let (account, _) = db
            .accounts()
            .register("ada", "hash", "Ada Lovelace", "0700000000", "NID-1")
            .await
            .unwrap();

        let first = db
            .accounts()
            .issue_or_reuse_token(&account.id, "tok-1")
            .await
            .unwrap();
        let second = db
            .accounts()
            .issue_or_reuse_token(&account.id, "tok-2")
            .await
            .unwrap();
        assert_eq!(first, "tok-1");
        assert_eq!(second, "tok-1");

        // After revocation a fresh token is accepted.
        db.accounts().revoke_token("tok-1").await.unwrap();
        let third = db
            .accounts()
            .issue_or_reuse_token(&account.id, "tok-3")
            .await
            .unwrap();
        assert_eq!(third, "tok-3");
    }

    #[tokio::test]
    async fn test_staff_account_has_no_profile() {
        let db = test_db().await;
        let staff = db.accounts().create_staff("manager", "hash").await.unwrap();
        assert!(staff.is_staff);

        db.accounts().issue_token(&staff.id, "tok-s").await.unwrap();
        let (_, customer_id) = db
            .accounts()
            .resolve_token("tok-s")
            .await
            .unwrap()
            .unwrap();
        assert!(customer_id.is_none());
    }
}
