use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use nearby_core::{Category, Coordinate, SearchQuery, SearchResult};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{internal_error, ApiError, AppState};

/// Raw query string. Everything is taken as text so that bad input becomes a
/// descriptive validation error instead of a generic extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub category: Option<String>,
    pub radius: Option<String>,
    pub query: Option<String>,
}

pub(super) async fn search_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResult>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::validation(e.body_text()))?;
    let query = parse_search_params(params, state.default_radius_m)?;

    let catalog = state
        .catalog
        .resolve(query.origin)
        .map_err(|e| internal_error(&req_id.0, &e))?;

    let result = nearby_core::search(catalog.places(), &query);
    tracing::debug!(
        request_id = %req_id.0,
        origin = %query.origin,
        total = result.total,
        "places search served"
    );

    Ok(Json(result))
}

/// Turn raw parameters into a validated [`SearchQuery`].
///
/// Empty parameters count as absent, matching how browsers serialize
/// untouched form fields.
fn parse_search_params(
    params: SearchParams,
    default_radius_m: f64,
) -> Result<SearchQuery, ApiError> {
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let (Some(lat), Some(lng)) = (present(params.lat), present(params.lng)) else {
        return Err(ApiError::validation("Latitude and longitude are required"));
    };

    let latitude = parse_number("lat", &lat)?;
    let longitude = parse_number("lng", &lng)?;
    let origin =
        Coordinate::new(latitude, longitude).map_err(|e| ApiError::validation(e.to_string()))?;

    let radius = match present(params.radius) {
        Some(raw) => parse_number("radius", &raw)?,
        None => default_radius_m,
    };

    let category = present(params.category)
        .map(|raw| raw.parse::<Category>())
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let query = SearchQuery::new(origin)
        .with_radius(radius)
        .map_err(|e| ApiError::validation(e.to_string()))?
        .with_category(category)
        .with_text(present(params.query));

    Ok(query)
}

fn parse_number(name: &str, raw: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ApiError::validation(format!("{name} must be a number, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lat: Option<&str>, lng: Option<&str>) -> SearchParams {
        SearchParams {
            lat: lat.map(str::to_string),
            lng: lng.map(str::to_string),
            ..SearchParams::default()
        }
    }

    #[test]
    fn missing_lng_is_rejected() {
        let err = parse_search_params(params(Some("37.5"), None), 2000.0).unwrap_err();
        assert_eq!(err.error, "Latitude and longitude are required");
    }

    #[test]
    fn blank_lat_counts_as_missing() {
        let err = parse_search_params(params(Some(" "), Some("126.9")), 2000.0).unwrap_err();
        assert_eq!(err.error, "Latitude and longitude are required");
    }

    #[test]
    fn non_numeric_lat_is_rejected() {
        let err = parse_search_params(params(Some("north"), Some("126.9")), 2000.0).unwrap_err();
        assert!(err.error.contains("lat must be a number"));
    }

    #[test]
    fn out_of_range_origin_is_rejected() {
        let err = parse_search_params(params(Some("91"), Some("126.9")), 2000.0).unwrap_err();
        assert!(err.error.contains("invalid coordinate"));
    }

    #[test]
    fn nan_origin_is_rejected() {
        assert!(parse_search_params(params(Some("NaN"), Some("126.9")), 2000.0).is_err());
    }

    #[test]
    fn default_radius_comes_from_state() {
        let query = parse_search_params(params(Some("37.5665"), Some("126.978")), 750.0).unwrap();
        assert!((query.radius_meters() - 750.0).abs() < f64::EPSILON);
        assert!(query.category.is_none());
        assert!(query.text.is_none());
    }

    #[test]
    fn explicit_fields_are_parsed() {
        let raw = SearchParams {
            lat: Some("37.5665".to_string()),
            lng: Some("126.978".to_string()),
            category: Some("Pharmacy".to_string()),
            radius: Some("1500".to_string()),
            query: Some("lotte".to_string()),
        };
        let query = parse_search_params(raw, 2000.0).unwrap();
        assert_eq!(query.category, Some(Category::Pharmacy));
        assert_eq!(query.text.as_deref(), Some("lotte"));
        assert!((query.radius_meters() - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_radius_is_rejected() {
        let raw = SearchParams {
            radius: Some("-10".to_string()),
            ..params(Some("37.5665"), Some("126.978"))
        };
        let err = parse_search_params(raw, 2000.0).unwrap_err();
        assert!(err.error.contains("invalid radius"));
    }
}
