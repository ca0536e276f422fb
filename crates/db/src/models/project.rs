//! Project row, view model and DTOs.
//!
//! [`ProjectRow`] mirrors the `projects` table with every column optional so
//! partial rows (e.g. from a narrowed `SELECT` or a JSON payload) still map.
//! [`Project`] is the application view model handlers return.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};
use verde_core::status::{ProjectPriority, ProjectStatus};
use verde_core::types::{DbId, Timestamp};

/// A row from the `projects` table in storage shape.
#[derive(Debug, Clone, Default, FromRow, Deserialize)]
pub struct ProjectRow {
    pub project_id: DbId,
    pub organization_id: Option<DbId>,
    pub owner_id: Option<DbId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// Project view model returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: DbId,
    pub organization_id: Option<DbId>,
    pub owner_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub category: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// Map a storage row into the view model.
///
/// Missing text fields fall back to neutral values: the slug falls back to the
/// project id, and unknown status/priority strings fall back to the defaults.
pub fn map_project_row(row: ProjectRow) -> Project {
    let id = row.project_id;

    let status = match row.status.as_deref() {
        Some(raw) => ProjectStatus::parse(raw).unwrap_or_else(|_| {
            tracing::warn!(project_id = %id, status = raw, "Unknown project status, using default");
            ProjectStatus::default()
        }),
        None => ProjectStatus::default(),
    };

    let priority = match row.priority.as_deref() {
        Some(raw) => ProjectPriority::parse(raw).unwrap_or_else(|_| {
            tracing::warn!(project_id = %id, priority = raw, "Unknown project priority, using default");
            ProjectPriority::default()
        }),
        None => ProjectPriority::default(),
    };

    Project {
        id,
        organization_id: row.organization_id,
        owner_id: row.owner_id,
        name: row.name.unwrap_or_default(),
        slug: row
            .slug
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| id.to_string()),
        description: row.description,
        status,
        priority,
        category: row.category,
        location: row.location,
        latitude: row.latitude,
        longitude: row.longitude,
        budget: row.budget,
        start_date: row.start_date,
        end_date: row.end_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        map_project_row(row)
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateProject {
    pub organization_id: DbId,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `planning` if omitted.
    pub status: Option<ProjectStatus>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<ProjectPriority>,
    pub category: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
    #[validate(range(min = 0.0, message = "Budget must not be negative"))]
    pub budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// DTO for updating an existing project. All fields are optional; `None`
/// leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_dates"))]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub category: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
    #[validate(range(min = 0.0, message = "Budget must not be negative"))]
    pub budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn check_date_order(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(s), Some(e)) if e < s => Err(ValidationError::new("date_range")
            .with_message("End date must not be before start date".into())),
        _ => Ok(()),
    }
}

fn validate_create_dates(input: &CreateProject) -> Result<(), ValidationError> {
    check_date_order(input.start_date, input.end_date)
}

fn validate_update_dates(input: &UpdateProject) -> Result<(), ValidationError> {
    check_date_order(input.start_date, input.end_date)
}
