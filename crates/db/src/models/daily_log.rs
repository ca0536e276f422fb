//! Daily operational log models. Logs are append-only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use verde_core::types::{DbId, Timestamp};

/// A row from the `daily_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyLog {
    pub log_id: DbId,
    pub project_id: DbId,
    pub author_id: Option<DbId>,
    pub log_date: NaiveDate,
    /// JSON array of [`EquipmentEntry`] values.
    pub equipment: serde_json::Value,
    pub fuel_consumed_l: f64,
    pub scope1_emissions_kg: f64,
    pub scope2_emissions_kg: f64,
    pub incident_count: i32,
    pub hours_worked: f64,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// One piece of equipment used on site that day.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EquipmentEntry {
    #[validate(length(min = 1, max = 200, message = "Equipment name must be 1-200 characters"))]
    pub name: String,
    pub fuel_type: Option<String>,
    #[validate(range(min = 0.0, message = "Equipment hours must not be negative"))]
    pub hours: Option<f64>,
}

/// DTO for appending a daily log.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDailyLog {
    /// Defaults to the current date if omitted.
    pub log_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(nested)]
    pub equipment: Vec<EquipmentEntry>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Fuel consumed must not be negative"))]
    pub fuel_consumed_l: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Scope 1 emissions must not be negative"))]
    pub scope1_emissions_kg: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Scope 2 emissions must not be negative"))]
    pub scope2_emissions_kg: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Incident count must not be negative"))]
    pub incident_count: i32,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Hours worked must not be negative"))]
    pub hours_worked: f64,
    #[validate(length(max = 4000, message = "Notes must be at most 4000 characters"))]
    pub notes: Option<String>,
}

/// Per-calendar-month totals over a project's daily logs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyLogSummary {
    /// First day of the month.
    pub month: NaiveDate,
    pub fuel_consumed_l: f64,
    pub scope1_emissions_kg: f64,
    pub scope2_emissions_kg: f64,
    pub incident_count: i64,
    pub hours_worked: f64,
    pub log_count: i64,
}

impl MonthlyLogSummary {
    /// Scope 1 + scope 2 emissions for the month.
    pub fn total_emissions_kg(&self) -> f64 {
        self.scope1_emissions_kg + self.scope2_emissions_kg
    }
}
