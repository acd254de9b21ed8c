//! Hierarchical content pages.
//!
//! Pages form a tree through an optional parent reference. This module owns
//! the validation rules (name presence/format/uniqueness, reference
//! existence, no self-parenting) and path computation; persistence is
//! reached through the [`PageStore`] trait so the rules stay testable
//! without a database.

use std::collections::HashSet;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::FieldErrors;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A persisted page as seen by the tree logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNode {
    pub id: DbId,
    pub name: String,
    pub author_id: DbId,
    pub category_id: Option<DbId>,
    pub parent_id: Option<DbId>,
}

/// A proposed create (`id: None`) or update (`id: Some`) of a page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageDraft {
    pub id: Option<DbId>,
    pub name: String,
    pub author_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub parent_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Persistence seam
// ---------------------------------------------------------------------------

/// Persistence collaborator for pages and the records they reference.
///
/// Implementations must provide atomic single-record reads and writes;
/// the tree logic never requires a multi-record transaction.
#[async_trait]
pub trait PageStore: Send + Sync {
    async fn user_exists(&self, id: DbId) -> Result<bool, CoreError>;
    async fn category_exists(&self, id: DbId) -> Result<bool, CoreError>;
    async fn find_page(&self, id: DbId) -> Result<Option<PageNode>, CoreError>;
    async fn find_page_by_name(&self, name: &str) -> Result<Option<PageNode>, CoreError>;
    async fn save_page(&self, draft: &PageDraft) -> Result<PageNode, CoreError>;
    /// Pages whose parent is `id`, in insertion (id) order.
    async fn children_of(&self, id: DbId) -> Result<Vec<PageNode>, CoreError>;
    async fn delete_page(&self, id: DbId) -> Result<(), CoreError>;
}

// ---------------------------------------------------------------------------
// Name format
// ---------------------------------------------------------------------------

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-z0-9_-]+").expect("name pattern compiles"))
}

/// Whether a page name contains a run of URL-safe characters.
///
/// The match is deliberately unanchored: a single run of
/// `[A-Za-z0-9_-]` anywhere in the name passes.
pub fn page_name_format_valid(name: &str) -> bool {
    name_pattern().is_match(name)
}

// ---------------------------------------------------------------------------
// PageTree
// ---------------------------------------------------------------------------

/// Validation and traversal over a [`PageStore`].
pub struct PageTree<'a, S: PageStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: PageStore + ?Sized> PageTree<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Validate a draft and persist it.
    ///
    /// All rules accumulate into a field-keyed error map; nothing is saved
    /// unless the map comes back empty.
    pub async fn create_or_update(&self, draft: &PageDraft) -> Result<PageNode, CoreError> {
        let mut errors = FieldErrors::new();

        if draft.name.trim().is_empty() {
            errors.add("name", "is required");
        } else {
            if !page_name_format_valid(&draft.name) {
                errors.add("name", "must contain letters, digits, underscores, or hyphens");
            }
            if let Some(existing) = self.store.find_page_by_name(&draft.name).await? {
                if draft.id != Some(existing.id) {
                    errors.add("name", "is already taken");
                }
            }
        }

        match draft.author_id {
            None => errors.add("author_id", "is required"),
            Some(author_id) => {
                if !self.store.user_exists(author_id).await? {
                    errors.add("author_id", "does not exist");
                }
            }
        }

        if let Some(category_id) = draft.category_id {
            if !self.store.category_exists(category_id).await? {
                errors.add("category_id", "does not exist");
            }
        }

        if let Some(parent_id) = draft.parent_id {
            if self.store.find_page(parent_id).await?.is_none() {
                errors.add("parent_id", "does not exist");
            }
            if draft.id == Some(parent_id) {
                errors.add("parent_id", "cannot be the page itself");
            }
        }

        if !errors.is_empty() {
            return Err(CoreError::invalid(errors));
        }

        self.store.save_page(draft).await
    }

    /// The page's path: `/name` for roots, else the ancestor path followed
    /// by `/name`.
    ///
    /// Walks the ancestor chain iteratively with a visited set, so a cycle
    /// introduced through stored parent references terminates with
    /// [`CoreError::CycleDetected`] instead of looping forever.
    pub async fn path_of(&self, page: &PageNode) -> Result<String, CoreError> {
        let mut segments = vec![page.name.clone()];
        let mut visited = HashSet::from([page.id]);
        let mut cursor = page.parent_id;

        while let Some(parent_id) = cursor {
            if !visited.insert(parent_id) {
                return Err(CoreError::CycleDetected { id: page.id });
            }
            let parent = self
                .store
                .find_page(parent_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "page",
                    id: parent_id,
                })?;
            cursor = parent.parent_id;
            segments.push(parent.name);
        }

        segments.reverse();
        Ok(format!("/{}", segments.join("/")))
    }

    /// All pages whose parent reference equals `id`.
    pub async fn children_of(&self, id: DbId) -> Result<Vec<PageNode>, CoreError> {
        self.store.children_of(id).await
    }

    /// Delete a page. Refused while the page still has children: removing a
    /// subtree root would orphan or destroy content the author never asked
    /// to change.
    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let children = self.store.children_of(id).await?;
        if !children.is_empty() {
            return Err(CoreError::Conflict(format!(
                "page {id} has {} child page(s) and cannot be deleted",
                children.len()
            )));
        }
        self.store.delete_page(id).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
