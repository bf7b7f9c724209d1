//! # Customer Repository
//!
//! Database operations for customers. Customers are optional on a
//! transaction; walk-in sales simply omit the reference.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use kasir_core::validation::validate_name;
use kasir_core::Customer;

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

    /// Lists all customers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, address, created_at, updated_at
            FROM customers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, address, created_at, updated_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a new customer.
    pub async fn insert(&self, name: &str, phone: &str, address: &str) -> DbResult<Customer> {
        validate_name("name", name).map_err(kasir_core::CoreError::from)?;

        debug!(name = %name, "Inserting customer");

        let customer = Customer {
            id: new_id(),
            name: name.to_string(),
            phone: phone.to_string(),
            address: address.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, address, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Updates an existing customer.
    pub async fn update(&self, id: &str, name: &str, phone: &str, address: &str) -> DbResult<()> {
        validate_name("name", name).map_err(kasir_core::CoreError::from)?;

        debug!(id = %id, "Updating customer");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = ?2, phone = ?3, address = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(address)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Deletes a customer. Transactions that referenced the customer keep
    /// their rows; the reference is set to NULL by the schema.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::DbError;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_crud_roundtrip() {
        let db = test_db().await;
        let repo = db.customers();

        let c = repo
            .insert("Budi", "0812000111", "Jl. Merdeka 1")
            .await
            .unwrap();

        repo.update(&c.id, "Budi Santoso", "0812000111", "Jl. Merdeka 1")
            .await
            .unwrap();

        let fetched = repo.get_by_id(&c.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Budi Santoso");

        repo.delete(&c.id).await.unwrap();
        assert!(repo.get_by_id(&c.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_customer_is_not_found() {
        let db = test_db().await;
        let err = db
            .customers()
            .update("ghost", "X", "", "")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
