use kvp_core::page::PageNode;
use kvp_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub name: String,
    pub author_id: DbId,
    pub category_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Page> for PageNode {
    fn from(page: Page) -> Self {
        Self {
            id: page.id,
            name: page.name,
            author_id: page.author_id,
            category_id: page.category_id,
            parent_id: page.parent_id,
        }
    }
}
