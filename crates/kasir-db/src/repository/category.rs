//! # Category Repository
//!
//! Database operations for product categories.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use kasir_core::validation::validate_name;
use kasir_core::Category;

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// The created category with generated id and timestamps.
    pub async fn insert(&self, name: &str, description: &str) -> DbResult<Category> {
        validate_name("name", name).map_err(kasir_core::CoreError::from)?;

        debug!(name = %name, "Inserting category");

        let category = Category {
            id: new_id(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(category)
    }

    /// Updates an existing category.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Category doesn't exist
    pub async fn update(&self, id: &str, name: &str, description: &str) -> DbResult<()> {
        validate_name("name", name).map_err(kasir_core::CoreError::from)?;

        debug!(id = %id, "Updating category");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = ?2, description = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Deletes a category.
    ///
    /// Fails with a foreign key violation if products still reference it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
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
    async fn test_insert_and_list() {
        let db = test_db().await;
        let repo = db.categories();

        repo.insert("Minuman", "Drinks").await.unwrap();
        repo.insert("Makanan", "Food").await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        // ordered by name
        assert_eq!(all[0].name, "Makanan");
        assert_eq!(all[1].name, "Minuman");
    }

    #[tokio::test]
    async fn test_update_and_get() {
        let db = test_db().await;
        let repo = db.categories();

        let cat = repo.insert("Minuman", "").await.unwrap();
        repo.update(&cat.id, "Minuman Dingin", "Cold drinks")
            .await
            .unwrap();

        let fetched = repo.get_by_id(&cat.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Minuman Dingin");
        assert_eq!(fetched.description, "Cold drinks");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = test_db().await;
        let err = db
            .categories()
            .update("no-such-id", "X", "")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.categories();

        let cat = repo.insert("Minuman", "").await.unwrap();
        repo.delete(&cat.id).await.unwrap();
        assert!(repo.get_by_id(&cat.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let db = test_db().await;
        let err = db.categories().insert("  ", "").await.unwrap_err();
        assert!(matches!(err, DbError::Domain(_)));
    }
}
