//! Offline search: the same pipeline the server runs, printed to stdout.

use std::path::PathBuf;

use clap::Args;
use nearby_core::{
    AppConfig, Catalog, CatalogSourceKind, Category, Coordinate, RankedPlace, SearchResult,
    SessionEvent, SessionState,
};

use crate::catalog::category_heading;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Origin latitude; without a coordinate the default location is used
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Origin longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Only return this category (e.g. `bank`, `pharmacy`)
    #[arg(long)]
    pub category: Option<Category>,

    /// Search radius in meters (defaults to `NEARBY_DEFAULT_RADIUS_M`)
    #[arg(long)]
    pub radius: Option<f64>,

    /// Case-insensitive text to match in name or description
    #[arg(long)]
    pub query: Option<String>,

    /// Catalog YAML file (defaults to `NEARBY_CATALOG_PATH`)
    #[arg(long, conflicts_with = "mock")]
    pub catalog: Option<PathBuf>,

    /// Search the demo places generated around the origin instead of a file
    #[arg(long)]
    pub mock: bool,
}

/// Drive a one-shot session: locate, search, print.
///
/// # Errors
///
/// Returns an error for an invalid coordinate or radius, or a catalog that
/// cannot be loaded.
pub(crate) fn run_search(args: &SearchArgs, config: &AppConfig) -> anyhow::Result<()> {
    let located = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => SessionEvent::LocationResolved(Coordinate::new(lat, lng)?),
        _ => SessionEvent::LocationUnavailable,
    };
    let session = SessionState::default()
        .apply(located)
        .apply(SessionEvent::CategoryChanged(args.category));

    let radius = args.radius.unwrap_or(config.default_radius_m);
    let query = session
        .pending_query(radius)?
        .ok_or_else(|| anyhow::anyhow!("no search location resolved"))?
        .with_text(args.query.clone());

    let catalog = if args.mock
        || (args.catalog.is_none() && config.catalog_source == CatalogSourceKind::Mock)
    {
        Catalog::mock_around(query.origin)?
    } else {
        let path = args.catalog.as_ref().unwrap_or(&config.catalog_path);
        nearby_core::load_catalog(path)?
    };

    let ranked = nearby_core::rank(catalog.places(), &query);
    println!(
        "{} places within {:.0} m of {}",
        ranked.len(),
        query.radius_meters(),
        query.origin
    );
    for entry in &ranked {
        println!("{}", format_ranked(entry));
    }

    let result = SearchResult {
        places: ranked.iter().map(|r| r.place.clone()).collect(),
        total: ranked.len(),
    };
    let session = session.apply(SessionEvent::SearchCompleted(result));
    tracing::debug!(phase = ?session.phase, places = session.places.len(), "session settled");

    Ok(())
}

pub(crate) fn format_ranked(entry: &RankedPlace<'_>) -> String {
    let place = entry.place;
    let mut line = format!(
        "{:>7.0} m  {:<16} {}",
        entry.distance_m,
        category_heading(place.category),
        place.name
    );
    if let Some(rating) = place.rating {
        line.push_str(&format!("  ({rating:.1})"));
    }
    if let Some(address) = place.address.as_deref() {
        line.push_str("  ");
        line.push_str(address);
    }
    line
}
