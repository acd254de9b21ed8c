//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus `Deserialize` DTOs for inserts and updates where
//! the table is written through the API.

pub mod page;
pub mod page_category;
pub mod user;
