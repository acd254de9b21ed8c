//! Repository for the `page_categories` table.

use kvp_core::types::DbId;
use sqlx::PgPool;

use crate::models::page_category::PageCategory;

/// Column list for page_categories queries.
const COLUMNS: &str = "id, name, created_at";

/// Provides read operations for page categories.
pub struct PageCategoryRepo;

impl PageCategoryRepo {
    /// Whether a category with the given id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let found: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM page_categories WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(found.is_some())
    }

    /// List all categories in name order.
    pub async fn list(pool: &PgPool) -> Result<Vec<PageCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_categories ORDER BY name");
        sqlx::query_as::<_, PageCategory>(&query)
            .fetch_all(pool)
            .await
    }
}
