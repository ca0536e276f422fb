//! Geocoding proxy. Public, like the address autocomplete it backs; upstream
//! JSON is passed through unchanged.

use std::str::FromStr;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use verde_core::error::CoreError;

use crate::error::AppResult;
use crate::state::AppState;

const DEFAULT_SEARCH_LIMIT: i64 = 5;
const MAX_SEARCH_LIMIT: i64 = 20;

/// Numeric fields arrive as text so malformed values get a JSON
/// validation error rather than the extractor's plain-text rejection.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReverseParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Parse an optional query parameter; blank counts as absent.
fn parse_param<T: FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, CoreError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            CoreError::Validation(format!("Query parameter '{name}' must be a number"))
        }),
    }
}

fn search_limit(limit: Option<i64>) -> u32 {
    // Clamped into 1..=20, so the cast cannot truncate.
    limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT) as u32
}

fn coordinates(lat: Option<f64>, lon: Option<f64>) -> Result<(f64, f64), CoreError> {
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Err(CoreError::Validation(
            "Query parameters 'lat' and 'lon' are required".into(),
        ));
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(CoreError::Validation(
            "Coordinates out of range: lat must be within ±90 and lon within ±180".into(),
        ));
    }
    Ok((lat, lon))
}

// ---------------------------------------------------------------------------
// GET /location/search
// ---------------------------------------------------------------------------

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| CoreError::Validation("Query parameter 'q' is required".into()))?;

    let limit = parse_param("limit", params.limit.as_deref())?;
    let results = state.geocoder.search(query, search_limit(limit)).await?;
    Ok(Json(results))
}

// ---------------------------------------------------------------------------
// GET /location/reverse
// ---------------------------------------------------------------------------

pub async fn reverse(
    State(state): State<AppState>,
    Query(params): Query<ReverseParams>,
) -> AppResult<impl IntoResponse> {
    let (lat, lon) = coordinates(
        parse_param("lat", params.lat.as_deref())?,
        parse_param("lon", params.lon.as_deref())?,
    )?;
    let place = state.geocoder.reverse(lat, lon).await?;
    Ok(Json(place))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(search_limit(None), 5);
        assert_eq!(search_limit(Some(0)), 1);
        assert_eq!(search_limit(Some(-3)), 1);
        assert_eq!(search_limit(Some(12)), 12);
        assert_eq!(search_limit(Some(500)), 20);
    }

    #[test]
    fn numeric_params_parse_or_fail_validation() {
        assert_eq!(parse_param::<f64>("lat", Some(" 51.5 ")).unwrap(), Some(51.5));
        assert_eq!(parse_param::<i64>("limit", Some("")).unwrap(), None);
        assert_eq!(parse_param::<i64>("limit", None).unwrap(), None);
        assert_matches!(
            parse_param::<f64>("lat", Some("abc")),
            Err(CoreError::Validation(msg)) if msg.contains("'lat'")
        );
        assert_matches!(parse_param::<i64>("limit", Some("2.5")), Err(CoreError::Validation(_)));
    }

    #[test]
    fn not_a_number_is_out_of_range() {
        let lat = parse_param::<f64>("lat", Some("NaN")).unwrap();
        assert_matches!(coordinates(lat, Some(0.0)), Err(CoreError::Validation(_)));
    }

    #[test]
    fn coordinates_are_required_and_bounded() {
        assert_matches!(coordinates(None, Some(1.0)), Err(CoreError::Validation(_)));
        assert_matches!(coordinates(Some(91.0), Some(0.0)), Err(CoreError::Validation(_)));
        assert_matches!(coordinates(Some(0.0), Some(-180.5)), Err(CoreError::Validation(_)));
        assert_eq!(coordinates(Some(-33.9), Some(151.2)).unwrap(), (-33.9, 151.2));
    }
}
