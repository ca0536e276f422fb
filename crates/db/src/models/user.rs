//! User profile model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use verde_core::types::{DbId, Timestamp};

/// Profile row from the `users` table, keyed by the auth provider's user id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub email: Option<String>,
    pub full_name: Option<String>,
    /// Object path inside the `avatars` bucket.
    pub avatar_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `PUT /profile`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(min = 1, max = 200, message = "Full name must be 1-200 characters"))]
    pub full_name: Option<String>,
}
