//! Client-side search session as an immutable state machine.
//!
//! A rendering client feeds [`SessionEvent`]s in as they happen (geolocation
//! answered, map clicked, filter changed, search returned) and redraws from
//! the [`SessionState`] that comes back. Nothing is mutated in place.

use crate::geo::Coordinate;
use crate::places::{Category, Place};
use crate::search::{SearchQuery, SearchResult};
use crate::CoreError;

/// Seoul City Hall, used when the device cannot report a position.
pub const DEFAULT_LOCATION: Coordinate = Coordinate {
    latitude: 37.5665,
    longitude: 126.9780,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Device,
    Fallback,
    MapClick,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub source: LocationSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first position.
    Locating,
    Searching,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LocationResolved(Coordinate),
    /// Geolocation denied or timed out; not an error.
    LocationUnavailable,
    MapClicked(Coordinate),
    CategoryChanged(Option<Category>),
    SearchCompleted(SearchResult),
    SearchFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub location: Option<ResolvedLocation>,
    pub category: Option<Category>,
    pub phase: Phase,
    pub places: Vec<Place>,
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            location: None,
            category: None,
            phase: Phase::Locating,
            places: Vec::new(),
            error: None,
        }
    }
}

impl SessionState {
    /// The state that follows `self` after `event`.
    #[must_use]
    pub fn apply(&self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::LocationResolved(coordinate) => {
                self.relocated(coordinate, LocationSource::Device)
            }
            SessionEvent::LocationUnavailable => {
                tracing::info!(
                    fallback = %DEFAULT_LOCATION,
                    "geolocation unavailable, using default location"
                );
                self.relocated(DEFAULT_LOCATION, LocationSource::Fallback)
            }
            SessionEvent::MapClicked(coordinate) => {
                self.relocated(coordinate, LocationSource::MapClick)
            }
            SessionEvent::CategoryChanged(category) => Self {
                category,
                phase: if self.location.is_some() {
                    Phase::Searching
                } else {
                    self.phase
                },
                error: None,
                ..self.clone()
            },
            SessionEvent::SearchCompleted(result) => Self {
                phase: Phase::Ready,
                places: result.places,
                error: None,
                ..self.clone()
            },
            SessionEvent::SearchFailed(message) => Self {
                phase: Phase::Failed,
                places: Vec::new(),
                error: Some(message),
                ..self.clone()
            },
        }
    }

    fn relocated(&self, coordinate: Coordinate, source: LocationSource) -> Self {
        Self {
            location: Some(ResolvedLocation { coordinate, source }),
            phase: Phase::Searching,
            error: None,
            ..self.clone()
        }
    }

    /// The query the client should issue for this snapshot, if it has a location.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRadius`] for a non-positive radius.
    pub fn pending_query(&self, radius_meters: f64) -> Result<Option<SearchQuery>, CoreError> {
        let Some(location) = self.location else {
            return Ok(None);
        };
        let query = SearchQuery::new(location.coordinate)
            .with_radius(radius_meters)?
            .with_category(self.category);
        Ok(Some(query))
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Locating | Phase::Searching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::search;

    fn bank() -> Place {
        Place {
            id: "3".to_string(),
            name: "Shinhan Bank".to_string(),
            category: Category::Bank,
            coordinate: Coordinate::new(37.5685, 126.9786).unwrap(),
            rating: Some(4.0),
            address: None,
            phone: None,
            hours: None,
            website: None,
            description: None,
        }
    }

    #[test]
    fn starts_locating_without_query() {
        let state = SessionState::default();
        assert_eq!(state.phase, Phase::Locating);
        assert!(state.is_loading());
        assert!(state.pending_query(2000.0).unwrap().is_none());
    }

    #[test]
    fn unavailable_location_falls_back_to_default() {
        let state = SessionState::default().apply(SessionEvent::LocationUnavailable);
        let location = state.location.unwrap();
        assert_eq!(location.coordinate, DEFAULT_LOCATION);
        assert_eq!(location.source, LocationSource::Fallback);
        assert_eq!(state.phase, Phase::Searching);
        assert!(state.error.is_none());
    }

    #[test]
    fn apply_does_not_touch_previous_snapshot() {
        let before = SessionState::default();
        let after = before.apply(SessionEvent::CategoryChanged(Some(Category::Cafe)));
        assert!(before.category.is_none());
        assert_eq!(after.category, Some(Category::Cafe));
        // No location yet, so no search starts.
        assert_eq!(after.phase, Phase::Locating);
    }

    #[test]
    fn full_cycle_builds_query_and_stores_results() {
        let origin = Coordinate::new(37.5665, 126.9780).unwrap();
        let state = SessionState::default()
            .apply(SessionEvent::LocationResolved(origin))
            .apply(SessionEvent::CategoryChanged(Some(Category::Bank)));

        let query = state.pending_query(2000.0).unwrap().unwrap();
        assert_eq!(query.origin, origin);
        assert_eq!(query.category, Some(Category::Bank));

        let result = search(&[bank()], &query);
        let state = state.apply(SessionEvent::SearchCompleted(result));
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.places.len(), 1);
        assert!(!state.is_loading());
    }

    #[test]
    fn failure_clears_places_and_relocation_clears_error() {
        let clicked = Coordinate::new(37.55, 126.99).unwrap();
        let failed = SessionState::default()
            .apply(SessionEvent::LocationUnavailable)
            .apply(SessionEvent::SearchCompleted(SearchResult {
                places: vec![bank()],
                total: 1,
            }))
            .apply(SessionEvent::SearchFailed("network down".to_string()));
        assert_eq!(failed.phase, Phase::Failed);
        assert!(failed.places.is_empty());
        assert_eq!(failed.error.as_deref(), Some("network down"));

        let moved = failed.apply(SessionEvent::MapClicked(clicked));
        assert!(moved.error.is_none());
        assert_eq!(moved.phase, Phase::Searching);
        assert_eq!(moved.location.unwrap().source, LocationSource::MapClick);
    }

    #[test]
    fn pending_query_rejects_bad_radius() {
        let state = SessionState::default().apply(SessionEvent::LocationUnavailable);
        assert!(state.pending_query(0.0).is_err());
    }
}
