//! Post-construction analytics dashboard for a project.
//!
//! Monthly totals come from SQL; everything derived from them is computed
//! by the pure functions in [`verde_core::analytics`].

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use verde_core::analytics::{
    calculate_intensity, calculate_mom, calculate_trend, calculate_trir, variance_from_target,
    Trend,
};
use verde_core::types::DbId;
use verde_db::models::daily_log::MonthlyLogSummary;
use verde_db::models::material::{Material, MaterialStage};
use verde_db::models::targets::ProjectTargets;
use verde_db::repositories::{DailyLogRepo, MaterialRepo, TargetsRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_project_access, Access};
use crate::response::DataResponse;
use crate::state::AppState;

/// One point of the monthly emissions series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: NaiveDate,
    pub emissions_kg: f64,
    pub incidents: i64,
    pub hours_worked: f64,
}

/// Sums over every daily log and material of the project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub scope1_emissions_kg: f64,
    pub scope2_emissions_kg: f64,
    pub scope3_emissions_kg: f64,
    pub fuel_consumed_l: f64,
    pub incidents: i64,
    pub hours_worked: f64,
}

/// Actual value, target, and signed percentage distance from the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetComparison {
    pub actual: f64,
    pub target: Option<f64>,
    pub variance_pct: Option<f64>,
}

impl TargetComparison {
    fn new(actual: f64, target: Option<f64>) -> Self {
        Self {
            actual,
            target,
            variance_pct: variance_from_target(actual, target),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetReport {
    pub scope1: TargetComparison,
    pub scope2: TargetComparison,
    pub scope3: TargetComparison,
    pub trir: TargetComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsDashboard {
    pub monthly: Vec<MonthlyPoint>,
    pub trend: Trend,
    /// Change between the two most recent months, in percent.
    pub month_over_month_pct: f64,
    /// Scope 1 + 2 emissions per labour hour.
    pub emissions_intensity: f64,
    pub trir: f64,
    pub totals: Totals,
    /// `None` until targets have been saved.
    pub targets: Option<TargetReport>,
}

/// Assemble the dashboard from monthly log totals (oldest first), the
/// combined delivery emissions of all materials, and the saved targets.
pub fn build_dashboard(
    months: &[MonthlyLogSummary],
    material_emissions_kg: f64,
    targets: Option<&ProjectTargets>,
) -> AnalyticsDashboard {
    let monthly: Vec<MonthlyPoint> = months
        .iter()
        .map(|m| MonthlyPoint {
            month: m.month,
            emissions_kg: m.total_emissions_kg(),
            incidents: m.incident_count,
            hours_worked: m.hours_worked,
        })
        .collect();

    let series: Vec<f64> = monthly.iter().map(|p| p.emissions_kg).collect();
    let month_over_month_pct = match series.as_slice() {
        [.., previous, current] => calculate_mom(*current, *previous),
        _ => 0.0,
    };

    let totals = months.iter().fold(
        Totals {
            scope3_emissions_kg: material_emissions_kg,
            ..Totals::default()
        },
        |mut acc, m| {
            acc.scope1_emissions_kg += m.scope1_emissions_kg;
            acc.scope2_emissions_kg += m.scope2_emissions_kg;
            acc.fuel_consumed_l += m.fuel_consumed_l;
            acc.incidents += m.incident_count;
            acc.hours_worked += m.hours_worked;
            acc
        },
    );

    let site_emissions = totals.scope1_emissions_kg + totals.scope2_emissions_kg;
    let trir = calculate_trir(totals.incidents as f64, totals.hours_worked);

    let targets = targets.map(|t| TargetReport {
        scope1: TargetComparison::new(totals.scope1_emissions_kg, t.target_scope1),
        scope2: TargetComparison::new(totals.scope2_emissions_kg, t.target_scope2),
        scope3: TargetComparison::new(totals.scope3_emissions_kg, t.target_scope3),
        trir: TargetComparison::new(trir, t.target_trir),
    });

    AnalyticsDashboard {
        trend: calculate_trend(&series),
        month_over_month_pct,
        emissions_intensity: calculate_intensity(site_emissions, totals.hours_worked),
        trir,
        totals,
        targets,
        monthly,
    }
}

fn delivery_total(materials: &[Material]) -> f64 {
    materials.iter().map(Material::delivery_emissions_kg).sum()
}

// ---------------------------------------------------------------------------
// GET /projects/{project_id}/analytics
// ---------------------------------------------------------------------------

pub async fn project_analytics(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_project_access(&state.pool, project_id, auth.user_id, Access::Read).await?;

    let months = DailyLogRepo::monthly_summary(&state.pool, project_id, None).await?;
    let mut material_emissions = 0.0;
    for stage in [MaterialStage::Preconstruction, MaterialStage::Sourcing] {
        let materials = MaterialRepo::list_for_project(&state.pool, stage, project_id).await?;
        material_emissions += delivery_total(&materials);
    }
    let targets = TargetsRepo::find(&state.pool, project_id).await?;

    let dashboard = build_dashboard(&months, material_emissions, targets.as_ref());
    tracing::debug!(
        project_id = %project_id,
        months = dashboard.monthly.len(),
        "Analytics computed",
    );
    Ok(Json(DataResponse { data: dashboard }))
}
