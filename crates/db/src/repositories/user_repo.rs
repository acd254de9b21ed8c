//! Repository for the `users` table.

use kvp_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list for users queries.
const COLUMNS: &str = "id, name, email, created_at, updated_at";

/// Read access to user records; writes happen through account tooling,
/// not this API.
pub struct UserRepo;

impl UserRepo {
    /// Whether a user with the given id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let found: Option<(DbId,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
