//! Material sourcing models and DTOs.
//!
//! The `material` (construction-phase sourcing) and `preconstruction_material`
//! (pre-construction procurement) tables share one shape; [`MaterialStage`]
//! selects between them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use verde_core::emissions::delivery_emissions_kg;
use verde_core::status::{DeliveryStatus, VettingStatus};
use verde_core::storage::{BUCKET_CONSTRUCTION_DOCS, BUCKET_PRECONSTRUCTION_DOCS};
use verde_core::types::{DbId, Timestamp};

/// Which procurement stage a material belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialStage {
    /// Construction-phase sourcing (`material` table).
    Sourcing,
    /// Pre-construction procurement (`preconstruction_material` table).
    Preconstruction,
}

impl MaterialStage {
    pub fn table(self) -> &'static str {
        match self {
            Self::Sourcing => "material",
            Self::Preconstruction => "preconstruction_material",
        }
    }

    /// Bucket holding spec sheets and receipts for this stage.
    pub fn document_bucket(self) -> &'static str {
        match self {
            Self::Sourcing => BUCKET_CONSTRUCTION_DOCS,
            Self::Preconstruction => BUCKET_PRECONSTRUCTION_DOCS,
        }
    }
}

/// Attached document slot on a material row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    SpecSheet,
    Receipt,
}

impl DocumentKind {
    pub fn column(self) -> &'static str {
        match self {
            Self::SpecSheet => "spec_sheet_path",
            Self::Receipt => "receipt_path",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "spec_sheet" => Some(Self::SpecSheet),
            "receipt" => Some(Self::Receipt),
            _ => None,
        }
    }
}

/// A row from `material` or `preconstruction_material`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Material {
    pub material_id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub cost: Option<f64>,
    pub delivery_distance_km: Option<f64>,
    pub fuel_efficiency_km_per_l: Option<f64>,
    pub emission_factor_kg_per_l: Option<f64>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_status: String,
    pub vetting_status: String,
    pub spec_sheet_path: Option<String>,
    pub receipt_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Material {
    /// Estimated delivery emissions for this material, in kg CO2e.
    pub fn delivery_emissions_kg(&self) -> f64 {
        delivery_emissions_kg(
            self.delivery_distance_km,
            self.fuel_efficiency_km_per_l,
            self.emission_factor_kg_per_l,
        )
    }

    /// Current object path stored in the given document slot.
    pub fn document_path(&self, kind: DocumentKind) -> Option<&str> {
        match kind {
            DocumentKind::SpecSheet => self.spec_sheet_path.as_deref(),
            DocumentKind::Receipt => self.receipt_path.as_deref(),
        }
    }
}

/// DTO for creating a material. New materials always start `pending` vetting.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMaterial {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    pub category: Option<String>,
    pub supplier: Option<String>,
    #[validate(range(min = 0.0, message = "Quantity must not be negative"))]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0, message = "Cost must not be negative"))]
    pub cost: Option<f64>,
    #[validate(range(min = 0.0, message = "Delivery distance must not be negative"))]
    pub delivery_distance_km: Option<f64>,
    #[validate(range(min = 0.0, message = "Fuel efficiency must not be negative"))]
    pub fuel_efficiency_km_per_l: Option<f64>,
    #[validate(range(min = 0.0, message = "Emission factor must not be negative"))]
    pub emission_factor_kg_per_l: Option<f64>,
    pub delivery_date: Option<NaiveDate>,
    /// Defaults to `pending` if omitted.
    pub delivery_status: Option<DeliveryStatus>,
}

/// Explicit update payload. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMaterial {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    pub category: Option<String>,
    pub supplier: Option<String>,
    #[validate(range(min = 0.0, message = "Quantity must not be negative"))]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0, message = "Cost must not be negative"))]
    pub cost: Option<f64>,
    #[validate(range(min = 0.0, message = "Delivery distance must not be negative"))]
    pub delivery_distance_km: Option<f64>,
    #[validate(range(min = 0.0, message = "Fuel efficiency must not be negative"))]
    pub fuel_efficiency_km_per_l: Option<f64>,
    #[validate(range(min = 0.0, message = "Emission factor must not be negative"))]
    pub emission_factor_kg_per_l: Option<f64>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_status: Option<DeliveryStatus>,
}

impl UpdateMaterial {
    /// Whether the payload changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.supplier.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.cost.is_none()
            && self.delivery_distance_km.is_none()
            && self.fuel_efficiency_km_per_l.is_none()
            && self.emission_factor_kg_per_l.is_none()
            && self.delivery_date.is_none()
            && self.delivery_status.is_none()
    }
}

/// DTO for `POST .../{material_id}/vetting`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetVetting {
    pub status: VettingStatus,
}
