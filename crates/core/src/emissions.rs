//! Material delivery emissions.

/// Estimated delivery emissions in kg CO2e.
///
/// `distance_km / fuel_efficiency_km_per_l` gives litres burned, multiplied by
/// the fuel's emission factor. Missing inputs or a zero efficiency yield 0.
pub fn delivery_emissions_kg(
    distance_km: Option<f64>,
    fuel_efficiency_km_per_l: Option<f64>,
    emission_factor_kg_per_l: Option<f64>,
) -> f64 {
    match (distance_km, fuel_efficiency_km_per_l, emission_factor_kg_per_l) {
        (Some(distance), Some(efficiency), Some(factor)) if efficiency > 0.0 => {
            distance / efficiency * factor
        }
        _ => 0.0,
    }
}
