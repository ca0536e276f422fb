//! Per-project ESG targets.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use verde_core::types::{DbId, Timestamp};

/// The single `project_targets` row for a project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectTargets {
    pub project_id: DbId,
    pub target_scope1: Option<f64>,
    pub target_scope2: Option<f64>,
    pub target_scope3: Option<f64>,
    pub target_trir: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the simplified targets form. Omitted fields are stored as NULL.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SaveTargets {
    #[validate(range(min = 0.0, message = "Scope 1 target must not be negative"))]
    pub target_scope1: Option<f64>,
    #[validate(range(min = 0.0, message = "Scope 2 target must not be negative"))]
    pub target_scope2: Option<f64>,
    #[validate(range(min = 0.0, message = "Scope 3 target must not be negative"))]
    pub target_scope3: Option<f64>,
    #[validate(range(min = 0.0, message = "TRIR target must not be negative"))]
    pub target_trir: Option<f64>,
}
