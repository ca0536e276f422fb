//! Repository for the `users` profile table.

use sqlx::PgPool;
use verde_core::types::DbId;

use crate::models::user::UserProfile;

const COLUMNS: &str = "id, email, full_name, avatar_path, created_at, updated_at";

/// Provides profile operations keyed by the auth provider's user id.
pub struct UserRepo;

impl UserRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create the profile row on first sight of a user, refreshing the email
    /// if it changed upstream.
    pub async fn ensure_exists(
        pool: &PgPool,
        id: DbId,
        email: Option<&str>,
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, email) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET email = COALESCE(EXCLUDED.email, users.email)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .bind(email)
            .fetch_one(pool)
            .await
    }

    pub async fn update_full_name(
        pool: &PgPool,
        id: DbId,
        full_name: Option<&str>,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET full_name = COALESCE($2, full_name) WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .bind(full_name)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the avatar object path.
    pub async fn set_avatar_path(
        pool: &PgPool,
        id: DbId,
        path: Option<&str>,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query =
            format!("UPDATE users SET avatar_path = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .bind(path)
            .fetch_optional(pool)
            .await
    }
}
