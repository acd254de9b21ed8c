//! [`PageStore`] implementation backed by PostgreSQL.
//!
//! The core page-tree logic talks to the trait; sqlx errors are mapped to
//! [`CoreError`] at this seam so the core never sees database types.

use async_trait::async_trait;
use kvp_core::error::CoreError;
use kvp_core::page::{PageDraft, PageNode, PageStore};
use kvp_core::types::DbId;

use crate::repositories::{PageCategoryRepo, PageRepo, UserRepo};
use crate::DbPool;

/// Wraps a connection pool as a [`PageStore`]. Cheap to clone.
#[derive(Clone)]
pub struct PgPageStore {
    pool: DbPool,
}

impl PgPageStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn internal(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("database error: {err}"))
}

#[async_trait]
impl PageStore for PgPageStore {
    async fn user_exists(&self, id: DbId) -> Result<bool, CoreError> {
        UserRepo::exists(&self.pool, id).await.map_err(internal)
    }

    async fn category_exists(&self, id: DbId) -> Result<bool, CoreError> {
        PageCategoryRepo::exists(&self.pool, id)
            .await
            .map_err(internal)
    }

    async fn find_page(&self, id: DbId) -> Result<Option<PageNode>, CoreError> {
        Ok(PageRepo::find_by_id(&self.pool, id)
            .await
            .map_err(internal)?
            .map(PageNode::from))
    }

    async fn find_page_by_name(&self, name: &str) -> Result<Option<PageNode>, CoreError> {
        Ok(PageRepo::find_by_name(&self.pool, name)
            .await
            .map_err(internal)?
            .map(PageNode::from))
    }

    async fn save_page(&self, draft: &PageDraft) -> Result<PageNode, CoreError> {
        // The tree validates author presence before saving.
        let author_id = draft
            .author_id
            .ok_or_else(|| CoreError::Internal("page draft saved without an author".into()))?;

        let page = match draft.id {
            Some(id) => PageRepo::update(&self.pool, id, draft, author_id)
                .await
                .map_err(|err| match err {
                    sqlx::Error::RowNotFound => CoreError::NotFound { entity: "page", id },
                    other => internal(other),
                })?,
            None => PageRepo::insert(&self.pool, draft, author_id)
                .await
                .map_err(internal)?,
        };
        Ok(page.into())
    }

    async fn children_of(&self, id: DbId) -> Result<Vec<PageNode>, CoreError> {
        Ok(PageRepo::children_of(&self.pool, id)
            .await
            .map_err(internal)?
            .into_iter()
            .map(PageNode::from)
            .collect())
    }

    async fn delete_page(&self, id: DbId) -> Result<(), CoreError> {
        PageRepo::delete(&self.pool, id).await.map_err(internal)
    }
}
