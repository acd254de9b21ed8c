//! Handlers for the hierarchical content pages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kvp_core::error::CoreError;
use kvp_core::page::{PageDraft, PageNode, PageStore, PageTree};
use kvp_core::types::DbId;
use kvp_db::page_store::PgPageStore;
use kvp_db::repositories::PageRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A page plus its derived path and children.
#[derive(Debug, serde::Serialize)]
pub struct PageDetail {
    #[serde(flatten)]
    pub page: PageNode,
    pub path: String,
    pub children: Vec<PageNode>,
}

/// Fetch a page node by id or return 404.
async fn ensure_page(store: &PgPageStore, id: DbId) -> AppResult<PageNode> {
    store
        .find_page(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "page", id }))
}

/// Assemble the detail response for a page.
async fn detail(store: &PgPageStore, page: PageNode) -> AppResult<PageDetail> {
    let tree = PageTree::new(store);
    let path = tree.path_of(&page).await?;
    let children = tree.children_of(page.id).await?;
    Ok(PageDetail {
        page,
        path,
        children,
    })
}

/// GET /api/v1/pages
///
/// List all pages in insertion order.
pub async fn list_pages(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<kvp_db::models::page::Page>>>> {
    let pages = PageRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: pages }))
}

/// POST /api/v1/pages
///
/// Create a page. The body is a draft (`name`, `author_id`, optional
/// `category_id`/`parent_id`); any client-supplied `id` is ignored.
pub async fn create_page(
    State(state): State<AppState>,
    Json(mut draft): Json<PageDraft>,
) -> AppResult<(StatusCode, Json<DataResponse<PageDetail>>)> {
    draft.id = None;
    let store = PgPageStore::new(state.pool.clone());
    let page = PageTree::new(&store).create_or_update(&draft).await?;
    let detail = detail(&store, page).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/pages/{id}
///
/// A single page with its computed path and children.
pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PageDetail>>> {
    let store = PgPageStore::new(state.pool.clone());
    let page = ensure_page(&store, id).await?;
    let detail = detail(&store, page).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/pages/{id}
///
/// Update a page. The path id wins over any id in the body.
pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut draft): Json<PageDraft>,
) -> AppResult<Json<DataResponse<PageDetail>>> {
    let store = PgPageStore::new(state.pool.clone());
    ensure_page(&store, id).await?;
    draft.id = Some(id);
    let page = PageTree::new(&store).create_or_update(&draft).await?;
    let detail = detail(&store, page).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/v1/pages/{id}/children
///
/// All pages whose parent is the given page.
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PageNode>>>> {
    let store = PgPageStore::new(state.pool.clone());
    ensure_page(&store, id).await?;
    let children = PageTree::new(&store).children_of(id).await?;
    Ok(Json(DataResponse { data: children }))
}

/// DELETE /api/v1/pages/{id}
///
/// Delete a page. Refused with 409 while the page has children.
pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let store = PgPageStore::new(state.pool.clone());
    ensure_page(&store, id).await?;
    PageTree::new(&store).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
