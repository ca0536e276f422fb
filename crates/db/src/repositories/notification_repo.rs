//! Repository for the `notifications` table.

use sqlx::PgPool;
use verde_core::types::DbId;

use crate::models::notification::{CreateNotification, Notification};

const COLUMNS: &str = "id, user_id, kind, title, message, is_read, read_at, created_at";

/// Provides per-user notification operations.
pub struct NotificationRepo;

impl NotificationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, kind, title, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.user_id)
            .bind(input.kind.as_str())
            .bind(&input.title)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// List a user's notifications, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE user_id = $1 AND ($2 = false OR is_read = false)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(unread_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark one of the user's notifications read. Returns `false` if it is
    /// not theirs or does not exist.
    pub async fn mark_read(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true, read_at = COALESCE(read_at, NOW())
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all of a user's unread notifications read; returns how many changed.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true, read_at = NOW()
             WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
