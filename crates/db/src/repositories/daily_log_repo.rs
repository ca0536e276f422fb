//! Repository for the append-only `daily_logs` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use verde_core::types::DbId;

use crate::models::daily_log::{CreateDailyLog, DailyLog, MonthlyLogSummary};

const COLUMNS: &str = "log_id, project_id, author_id, log_date, equipment, fuel_consumed_l, \
    scope1_emissions_kg, scope2_emissions_kg, incident_count, hours_worked, notes, created_at";

/// Optional date window and paging for log listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: i64,
    pub offset: i64,
}

/// Provides append and read operations for daily logs.
pub struct DailyLogRepo;

impl DailyLogRepo {
    /// Append a log entry. `log_date` defaults to the current date in the database.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        author_id: DbId,
        input: &CreateDailyLog,
    ) -> Result<DailyLog, sqlx::Error> {
        let equipment = serde_json::to_value(&input.equipment)
            .unwrap_or_else(|_| serde_json::Value::Array(Vec::new()));
        let query = format!(
            "INSERT INTO daily_logs (project_id, author_id, log_date, equipment, fuel_consumed_l, \
                                     scope1_emissions_kg, scope2_emissions_kg, incident_count, \
                                     hours_worked, notes)
             VALUES ($1, $2, COALESCE($3, CURRENT_DATE), $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DailyLog>(&query)
            .bind(project_id)
            .bind(author_id)
            .bind(input.log_date)
            .bind(equipment)
            .bind(input.fuel_consumed_l)
            .bind(input.scope1_emissions_kg)
            .bind(input.scope2_emissions_kg)
            .bind(input.incident_count)
            .bind(input.hours_worked)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List a project's logs, newest date first, optionally bounded by date.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        window: LogWindow,
    ) -> Result<Vec<DailyLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM daily_logs
             WHERE project_id = $1
               AND ($2::date IS NULL OR log_date >= $2)
               AND ($3::date IS NULL OR log_date <= $3)
             ORDER BY log_date DESC, created_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, DailyLog>(&query)
            .bind(project_id)
            .bind(window.from)
            .bind(window.to)
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(pool)
            .await
    }

    /// Per-month totals over a project's logs, oldest month first.
    ///
    /// Every calendar month between the first and last logged month is
    /// present; months without logs come back as zero rows.
    pub async fn monthly_summary(
        pool: &PgPool,
        project_id: DbId,
        from: Option<NaiveDate>,
    ) -> Result<Vec<MonthlyLogSummary>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyLogSummary>(
            "WITH totals AS (
                SELECT
                    date_trunc('month', log_date)::date AS month,
                    SUM(fuel_consumed_l) AS fuel_consumed_l,
                    SUM(scope1_emissions_kg) AS scope1_emissions_kg,
                    SUM(scope2_emissions_kg) AS scope2_emissions_kg,
                    SUM(incident_count) AS incident_count,
                    SUM(hours_worked) AS hours_worked,
                    COUNT(*) AS log_count
                FROM daily_logs
                WHERE project_id = $1
                  AND ($2::date IS NULL OR log_date >= $2)
                GROUP BY 1
             ),
             bounds AS (
                SELECT MIN(month) AS first_month, MAX(month) AS last_month FROM totals
             )
             SELECT
                gs.month::date AS month,
                COALESCE(t.fuel_consumed_l, 0)::float8 AS fuel_consumed_l,
                COALESCE(t.scope1_emissions_kg, 0)::float8 AS scope1_emissions_kg,
                COALESCE(t.scope2_emissions_kg, 0)::float8 AS scope2_emissions_kg,
                COALESCE(t.incident_count, 0)::bigint AS incident_count,
                COALESCE(t.hours_worked, 0)::float8 AS hours_worked,
                COALESCE(t.log_count, 0)::bigint AS log_count
             FROM bounds
             CROSS JOIN LATERAL generate_series(
                bounds.first_month::timestamp,
                bounds.last_month::timestamp,
                interval '1 month'
             ) AS gs(month)
             LEFT JOIN totals t ON t.month = gs.month::date
             ORDER BY 1 ASC",
        )
        .bind(project_id)
        .bind(from)
        .fetch_all(pool)
        .await
    }
}
