//! Repository for the `pages` table.

use kvp_core::page::PageDraft;
use kvp_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::Page;

/// Column list for pages queries.
const COLUMNS: &str = "id, name, author_id, category_id, parent_id, created_at, updated_at";

/// Provides CRUD operations for pages.
pub struct PageRepo;

impl PageRepo {
    /// Find a page by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a page by its unique name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE name = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all pages in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages ORDER BY id");
        sqlx::query_as::<_, Page>(&query).fetch_all(pool).await
    }

    /// Pages whose parent reference equals `parent_id`, in insertion order.
    pub async fn children_of(pool: &PgPool, parent_id: DbId) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE parent_id = $1 ORDER BY id");
        sqlx::query_as::<_, Page>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a new page.
    pub async fn insert(pool: &PgPool, draft: &PageDraft, author_id: DbId) -> Result<Page, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages (name, author_id, category_id, parent_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(&draft.name)
            .bind(author_id)
            .bind(draft.category_id)
            .bind(draft.parent_id)
            .fetch_one(pool)
            .await
    }

    /// Update an existing page.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        draft: &PageDraft,
        author_id: DbId,
    ) -> Result<Page, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET
                name = $1,
                author_id = $2,
                category_id = $3,
                parent_id = $4,
                updated_at = now()
             WHERE id = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(&draft.name)
            .bind(author_id)
            .bind(draft.category_id)
            .bind(draft.parent_id)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Delete a page by ID.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
