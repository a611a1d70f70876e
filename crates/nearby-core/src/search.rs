//! Category, text, and radius filtering with distance ranking.
//!
//! A search is a pure function of the catalog and the query: no I/O, no
//! shared mutable state, safe to run from any number of requests at once.

use serde::Serialize;

use crate::geo::{distance, Coordinate};
use crate::places::{Category, Place};
use crate::CoreError;

/// Radius used when the caller does not supply one.
pub const DEFAULT_RADIUS_METERS: f64 = 2000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub origin: Coordinate,
    pub category: Option<Category>,
    /// Case-insensitive substring matched against name and description.
    pub text: Option<String>,
    radius_meters: f64,
}

impl SearchQuery {
    /// Query around `origin` with the default radius and no filters.
    #[must_use]
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin,
            category: None,
            text: None,
            radius_meters: DEFAULT_RADIUS_METERS,
        }
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRadius`] unless `radius_meters` is finite and > 0.
    pub fn with_radius(mut self, radius_meters: f64) -> Result<Self, CoreError> {
        if !(radius_meters.is_finite() && radius_meters > 0.0) {
            return Err(CoreError::InvalidRadius(radius_meters));
        }
        self.radius_meters = radius_meters;
        Ok(self)
    }

    #[must_use]
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// Surrounding whitespace is ignored; blank text means no text filter.
    #[must_use]
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }
}

/// Places within range, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub places: Vec<Place>,
    pub total: usize,
}

/// A matching place with its distance from the query origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedPlace<'a> {
    pub place: &'a Place,
    pub distance_m: f64,
}

/// Filter `catalog` by `query` and order the survivors by distance.
///
/// The sort is stable, so places at equal distance keep catalog order.
#[must_use]
pub fn rank<'a>(catalog: &'a [Place], query: &SearchQuery) -> Vec<RankedPlace<'a>> {
    let needle = query.text.as_deref().map(str::to_lowercase);

    let mut ranked: Vec<RankedPlace<'a>> = catalog
        .iter()
        .filter(|place| query.category.is_none_or(|c| place.category == c))
        .filter(|place| needle.as_deref().is_none_or(|n| matches_text(place, n)))
        .map(|place| RankedPlace {
            place,
            distance_m: distance(query.origin, place.coordinate),
        })
        .filter(|r| r.distance_m <= query.radius_meters)
        .collect();

    ranked.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    ranked
}

/// Run the full pipeline and drop the per-query distances.
#[must_use]
pub fn search(catalog: &[Place], query: &SearchQuery) -> SearchResult {
    let places: Vec<Place> = rank(catalog, query)
        .into_iter()
        .map(|r| r.place.clone())
        .collect();

    tracing::debug!(
        origin = %query.origin,
        radius_m = query.radius_meters,
        category = ?query.category,
        text = ?query.text,
        total = places.len(),
        "search completed"
    );

    SearchResult {
        total: places.len(),
        places,
    }
}

fn matches_text(place: &Place, needle_lower: &str) -> bool {
    place.name.to_lowercase().contains(needle_lower)
        || place
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle_lower))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn origin() -> Coordinate {
        Coordinate::new(37.5665, 126.9780).unwrap()
    }

    fn place(id: &str, name: &str, category: Category, lat: f64, lng: f64) -> Place {
        Place {
            id: id.to_string(),
            name: name.to_string(),
            category,
            coordinate: Coordinate::new(lat, lng).unwrap(),
            rating: None,
            address: None,
            phone: None,
            hours: None,
            website: None,
            description: None,
        }
    }

    fn seoul_catalog() -> Vec<Place> {
        vec![
            place(
                "bank",
                "Shinhan Bank Jongno",
                Category::Bank,
                37.5685,
                126.9786,
            ),
            place(
                "hospital",
                "Seoul National University Hospital",
                Category::Hospital,
                37.5665,
                126.9780,
            ),
        ]
    }

    fn ids(result: &SearchResult) -> Vec<&str> {
        result.places.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn default_radius_returns_both_nearest_first() {
        let result = search(&seoul_catalog(), &SearchQuery::new(origin()));
        assert_eq!(ids(&result), vec!["hospital", "bank"]);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn small_radius_excludes_the_bank() {
        let query = SearchQuery::new(origin()).with_radius(100.0).unwrap();
        let result = search(&seoul_catalog(), &query);
        assert_eq!(ids(&result), vec!["hospital"]);
        assert_eq!(result.total, 1);
    }

    #[test]
    fn padded_text_is_trimmed_before_matching() {
        let query = SearchQuery::new(origin()).with_text(Some("  shinhan ".to_string()));
        assert_eq!(query.text.as_deref(), Some("shinhan"));
        let result = search(&seoul_catalog(), &query);
        assert_eq!(ids(&result), vec!["bank"]);
    }

    #[test]
    fn category_filter_is_exact() {
        let query = SearchQuery::new(origin()).with_category(Some(Category::Bank));
        let result = search(&seoul_catalog(), &query);
        assert_eq!(ids(&result), vec!["bank"]);
    }

    #[test]
    fn category_with_no_matches_is_empty_not_error() {
        let query = SearchQuery::new(origin()).with_category(Some(Category::Park));
        let result = search(&seoul_catalog(), &query);
        assert!(result.places.is_empty());
        assert_eq!(result.total, 0);
    }

    #[test]
    fn text_filter_is_case_insensitive_on_name() {
        let query = SearchQuery::new(origin()).with_text(Some("SHINHAN".to_string()));
        let result = search(&seoul_catalog(), &query);
        assert_eq!(ids(&result), vec!["bank"]);
    }

    #[test]
    fn text_filter_matches_description() {
        let mut catalog = seoul_catalog();
        catalog[1].description = Some("Open 24 hours, Emergency room".to_string());
        let query = SearchQuery::new(origin()).with_text(Some("emergency".to_string()));
        let result = search(&catalog, &query);
        assert_eq!(ids(&result), vec!["hospital"]);
    }

    #[test]
    fn text_filter_works_on_hangul() {
        let catalog = vec![place(
            "1",
            "서울대학교병원",
            Category::Hospital,
            37.5665,
            126.9780,
        )];
        let query = SearchQuery::new(origin()).with_text(Some("대학교".to_string()));
        assert_eq!(search(&catalog, &query).total, 1);
    }

    #[test]
    fn blank_text_is_ignored() {
        let query = SearchQuery::new(origin()).with_text(Some("   ".to_string()));
        assert!(query.text.is_none());
        assert_eq!(search(&seoul_catalog(), &query).total, 2);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let catalog = seoul_catalog();
        let exact = distance(origin(), catalog[0].coordinate);
        let query = SearchQuery::new(origin()).with_radius(exact).unwrap();
        let result = search(&catalog, &query);
        assert_eq!(ids(&result), vec!["hospital", "bank"]);
    }

    #[test]
    fn equal_distances_keep_catalog_order() {
        let catalog = vec![
            place("a", "First", Category::Cafe, 37.5675, 126.9780),
            place("b", "Second", Category::Cafe, 37.5675, 126.9780),
            place("c", "Third", Category::Cafe, 37.5675, 126.9780),
            place("d", "Nearest", Category::Cafe, 37.5665, 126.9780),
        ];
        let ranked = rank(&catalog, &SearchQuery::new(origin()));
        let order: Vec<&str> = ranked.iter().map(|r| r.place.id.as_str()).collect();
        assert_eq!(order, vec!["d", "a", "b", "c"]);
        assert!(ranked[0].distance_m.abs() < f64::EPSILON);
    }

    #[test]
    fn result_omits_distance_field() {
        let result = search(&seoul_catalog(), &SearchQuery::new(origin()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total"].as_u64(), Some(2));
        assert!(json["places"][0].get("distance").is_none());
    }

    #[test]
    fn radius_must_be_positive() {
        let q = SearchQuery::new(origin());
        assert_eq!(
            q.clone().with_radius(0.0).unwrap_err(),
            CoreError::InvalidRadius(0.0)
        );
        assert!(q.clone().with_radius(-5.0).is_err());
        assert!(q.with_radius(f64::INFINITY).is_err());
    }

    fn catalog_strategy() -> impl Strategy<Value = Vec<Place>> {
        prop::collection::vec(
            (
                -0.05f64..0.05,
                -0.05f64..0.05,
                prop::sample::select(Category::ALL.to_vec()),
            ),
            0..40,
        )
        .prop_map(|offsets| {
            offsets
                .into_iter()
                .enumerate()
                .map(|(i, (d_lat, d_lng, category))| {
                    place(
                        &i.to_string(),
                        &format!("place {i}"),
                        category,
                        37.5665 + d_lat,
                        126.9780 + d_lng,
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn results_are_in_range_sorted_and_filtered(
            catalog in catalog_strategy(),
            radius in 1.0f64..8000.0,
            category in prop::option::of(prop::sample::select(Category::ALL.to_vec())),
        ) {
            let query = SearchQuery::new(origin())
                .with_radius(radius)
                .unwrap()
                .with_category(category);
            let result = search(&catalog, &query);

            prop_assert!(result.places.len() <= catalog.len());
            prop_assert_eq!(result.total, result.places.len());

            let distances: Vec<f64> = result
                .places
                .iter()
                .map(|p| distance(origin(), p.coordinate))
                .collect();
            for d in &distances {
                prop_assert!(*d <= radius);
            }
            for pair in distances.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
            if let Some(c) = category {
                prop_assert!(result.places.iter().all(|p| p.category == c));
            }
        }

        #[test]
        fn search_is_idempotent(catalog in catalog_strategy()) {
            let query = SearchQuery::new(origin());
            prop_assert_eq!(search(&catalog, &query), search(&catalog, &query));
        }
    }
}
