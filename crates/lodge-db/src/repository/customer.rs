//! # Customer Repository
//!
//! Database operations for the customer directory.
//!
//! Customers are created two ways: automatically at registration,
//! linked to the new account, or by staff with no account link.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use lodge_core::Customer;

/// Input for creating a customer profile.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    /// Linked login account, when self-registered.
    pub account_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub national_id: String,
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Creates a customer. A duplicate national id surfaces as
    /// `DbError::UniqueViolation`.
    pub async fn create(&self, new: NewCustomer) -> DbResult<Customer> {
        let id = Uuid::new_v4().to_string();

        debug!(name = %new.name, "Creating customer");

        sqlx::query(
            "INSERT INTO customers (id, account_id, name, phone, national_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.account_id)
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.national_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get(&id).await
    }

    /// Fetches a customer by id.
    pub async fn get(&self, id: &str) -> DbResult<Customer> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Fetches a customer by id, returning None when absent.
    pub async fn find(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, account_id, name, phone, national_id, created_at \
             FROM customers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// The customer profile linked to a login account, if any.
    pub async fn find_by_account(&self, account_id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, account_id, name, phone, national_id, created_at \
             FROM customers WHERE account_id = ?",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// All customers, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, account_id, name, phone, national_id, created_at \
             FROM customers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Number of bookings currently held by a customer.
    pub async fn booking_count(&self, customer_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE customer_id = ?")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn customer(name: &str, national_id: &str) -> NewCustomer {
        NewCustomer {
            account_id: None,
            name: name.to_string(),
            phone: "0700000000".to_string(),
            national_id: national_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_ordered_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.customers()
            .create(customer("Grace Hopper", "NID-2"))
            .await
            .unwrap();
        db.customers()
            .create(customer("Ada Lovelace", "NID-1"))
            .await
            .unwrap();

        let names: Vec<String> = db
            .customers()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ada Lovelace", "Grace Hopper"]);
    }

    #[tokio::test]
    async fn test_duplicate_national_id_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.customers()
            .create(customer("Ada Lovelace", "NID-1"))
            .await
            .unwrap();

        let err = db
            .customers()
            .create(customer("Someone Else", "NID-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
