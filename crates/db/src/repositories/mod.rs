//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod page_category_repo;
pub mod page_repo;
pub mod user_repo;

pub use page_category_repo::PageCategoryRepo;
pub use page_repo::PageRepo;
pub use user_repo::UserRepo;
