use kvp_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `page_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageCategory {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
