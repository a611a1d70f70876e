use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::{ConfigError, CoreError};

/// Kind of facility. The set is closed; every consumer matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hospital,
    Pharmacy,
    #[serde(alias = "grocery")]
    Supermarket,
    Restaurant,
    Cafe,
    Bank,
    School,
    Park,
}

impl Category {
    /// Every category, in filter-bar display order.
    pub const ALL: [Category; 8] = [
        Category::Hospital,
        Category::Pharmacy,
        Category::Supermarket,
        Category::Restaurant,
        Category::Cafe,
        Category::Bank,
        Category::School,
        Category::Park,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Hospital => "hospital",
            Category::Pharmacy => "pharmacy",
            Category::Supermarket => "supermarket",
            Category::Restaurant => "restaurant",
            Category::Cafe => "cafe",
            Category::Bank => "bank",
            Category::School => "school",
            Category::Park => "park",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Hospital => "Hospital",
            Category::Pharmacy => "Pharmacy",
            Category::Supermarket => "Supermarket",
            Category::Restaurant => "Restaurant",
            Category::Cafe => "Cafe",
            Category::Bank => "Bank",
            Category::School => "School",
            Category::Park => "Park",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Category::Hospital => "🏥",
            Category::Pharmacy => "💊",
            Category::Supermarket => "🛒",
            Category::Restaurant => "🍽️",
            Category::Cafe => "☕",
            Category::Bank => "🏦",
            Category::School => "🏫",
            Category::Park => "🌳",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CoreError;

    /// Case-insensitive; `grocery` is accepted for [`Category::Supermarket`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "grocery" {
            return Ok(Category::Supermarket);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

/// A facility in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(rename = "location")]
    pub coordinate: Coordinate,
    /// Average review score in `[0, 5]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-form opening hours, e.g. `"10:00-23:00"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub places: Vec<Place>,
}

/// Immutable, shareable snapshot of the places a search runs over.
///
/// Cloning is a reference-count bump; no caller can observe a partial update.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    places: Arc<[Place]>,
}

impl Catalog {
    /// Validate and freeze a list of places.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on the first invalid place.
    pub fn new(places: Vec<Place>) -> Result<Self, ConfigError> {
        validate_places(&places)?;
        Ok(Self {
            places: places.into(),
        })
    }

    /// Freeze places that are valid by construction.
    pub(crate) fn from_trusted(places: Vec<Place>) -> Self {
        Self {
            places: places.into(),
        }
    }

    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Number of places per category, in [`Category::ALL`] order.
    #[must_use]
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.places.iter().filter(|p| p.category == c).count()))
            .collect()
    }
}

/// Where a search gets its catalog from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    Static(Catalog),
    /// Demo places generated around each origin.
    Mock,
}

impl CatalogSource {
    /// The catalog to search for a query centered on `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] if the mock catalog cannot be
    /// placed around `origin` (e.g. right at a pole).
    pub fn resolve(&self, origin: Coordinate) -> Result<Catalog, CoreError> {
        match self {
            CatalogSource::Static(catalog) => Ok(catalog.clone()),
            CatalogSource::Mock => Catalog::mock_around(origin),
        }
    }
}

/// Load and validate a catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CatalogFile = serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;
    let catalog = Catalog::new(file.places)?;

    tracing::info!(path = %path.display(), places = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn validate_places(places: &[Place]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for place in places {
        if place.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "place '{}' has an empty id",
                place.name
            )));
        }

        if place.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "place '{}' must have a non-empty name",
                place.id
            )));
        }

        if !seen_ids.insert(place.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate place id: '{}'",
                place.id
            )));
        }

        if !place.coordinate.is_valid() {
            return Err(ConfigError::Validation(format!(
                "place '{}' has out-of-range location {}",
                place.id, place.coordinate
            )));
        }

        if let Some(rating) = place.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(ConfigError::Validation(format!(
                    "place '{}' has invalid rating {rating}; must be within 0 to 5",
                    place.id
                )));
            }
        }

        if let Some(website) = place.website.as_deref() {
            validate_website(&place.id, website)?;
        }
    }

    Ok(())
}

fn validate_website(id: &str, website: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(website).map_err(|e| {
        ConfigError::Validation(format!("place '{id}' has invalid website '{website}': {e}"))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "place '{id}' website must be http or https, got '{}'",
            parsed.scheme()
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "places_test.rs"]
mod tests;
