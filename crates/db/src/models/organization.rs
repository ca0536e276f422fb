//! Organization entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use verde_core::types::{DbId, Timestamp};

/// A row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub organization_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// DTO for creating an organization. The caller becomes its first owner.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrganization {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
}
