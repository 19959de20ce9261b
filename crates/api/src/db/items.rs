//! Item repository for database operations.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Item;

/// Repository for item database operations.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all items with their current stock levels.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Item>, RepositoryError> {
        let items = sqlx::query_as::<_, Item>(
            r"
            SELECT id, name, quantity
            FROM items
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}
