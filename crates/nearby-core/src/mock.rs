//! Demo catalog synthesized around the caller's position.
//!
//! Used when no seed file is deployed: every search origin gets the same
//! eight places, one per category, a few hundred meters away.

use crate::geo::Coordinate;
use crate::places::{Catalog, Category, Place};
use crate::CoreError;

struct MockPlace {
    id: &'static str,
    name: &'static str,
    category: Category,
    d_lat: f64,
    d_lng: f64,
    rating: f64,
    address: &'static str,
    phone: Option<&'static str>,
    website: Option<&'static str>,
}

const MOCK_PLACES: [MockPlace; 8] = [
    MockPlace {
        id: "1",
        name: "Seoul National University Hospital",
        category: Category::Hospital,
        d_lat: 0.001,
        d_lng: 0.001,
        rating: 4.2,
        address: "Jongno-gu, Seoul",
        phone: Some("02-2072-2114"),
        website: None,
    },
    MockPlace {
        id: "2",
        name: "E-Mart Seongsu",
        category: Category::Supermarket,
        d_lat: -0.002,
        d_lng: 0.002,
        rating: 4.0,
        address: "Seongdong-gu, Seoul",
        phone: None,
        website: None,
    },
    MockPlace {
        id: "3",
        name: "Starbucks Gangnam Station",
        category: Category::Cafe,
        d_lat: 0.003,
        d_lng: -0.001,
        rating: 4.1,
        address: "Gangnam-gu, Seoul",
        phone: None,
        website: None,
    },
    MockPlace {
        id: "4",
        name: "Lotte Pharmacy",
        category: Category::Pharmacy,
        d_lat: 0.0015,
        d_lng: -0.002,
        rating: 4.3,
        address: "Jung-gu, Seoul",
        phone: Some("02-1234-5678"),
        website: None,
    },
    MockPlace {
        id: "5",
        name: "Hangang Park",
        category: Category::Park,
        d_lat: -0.001,
        d_lng: -0.003,
        rating: 4.5,
        address: "Yongsan-gu, Seoul",
        phone: None,
        website: None,
    },
    MockPlace {
        id: "6",
        name: "KB Kookmin Bank",
        category: Category::Bank,
        d_lat: 0.002,
        d_lng: 0.003,
        rating: 3.8,
        address: "Gangnam-gu, Seoul",
        phone: Some("1588-9999"),
        website: None,
    },
    MockPlace {
        id: "7",
        name: "Seoul Elementary School",
        category: Category::School,
        d_lat: -0.003,
        d_lng: 0.001,
        rating: 4.0,
        address: "Seocho-gu, Seoul",
        phone: None,
        website: None,
    },
    MockPlace {
        id: "8",
        name: "The Place Restaurant",
        category: Category::Restaurant,
        d_lat: 0.0025,
        d_lng: -0.0015,
        rating: 4.4,
        address: "Mapo-gu, Seoul",
        phone: Some("02-987-6543"),
        website: Some("https://example.com"),
    },
];

impl Catalog {
    /// Build the demo catalog around `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when an offset would carry a
    /// place past a pole.
    pub fn mock_around(origin: Coordinate) -> Result<Self, CoreError> {
        let places = MOCK_PLACES
            .iter()
            .map(|m| -> Result<Place, CoreError> {
                Ok(Place {
                    id: m.id.to_string(),
                    name: m.name.to_string(),
                    category: m.category,
                    coordinate: origin.offset(m.d_lat, m.d_lng)?,
                    rating: Some(m.rating),
                    address: Some(m.address.to_string()),
                    phone: m.phone.map(str::to_string),
                    hours: None,
                    website: m.website.map(str::to_string),
                    description: None,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(%origin, places = places.len(), "synthesized mock catalog");
        Ok(Self::from_trusted(places))
    }
}
