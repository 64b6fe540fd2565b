//! Venue search contract: filter state, sort modes and client-side ordering.
//!
//! [`VenueFilter`] is what the search endpoint builds from UI state. The
//! PostgreSQL repository translates it into a single query
//! (`infrastructure::persistence::search_query`); [`VenueFilter::matches`]
//! states the same predicate over an in-memory [`Venue`].
//!
//! Ordering that the datastore cannot do for us (distance from the caller,
//! featured-first grouping of nearby results) is applied after fetch with the
//! stable sorts in this module.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::entities::{Facility, NearbyVenue, Venue};
use super::geo::{self, Coordinate, Region};

/// Row ceiling for venue searches.
pub const DEFAULT_VENUE_LIMIT: i64 = 500;
/// Upper bound accepted for a configured search ceiling.
pub const MAX_VENUE_LIMIT: i64 = 2000;
/// Row ceiling for the nearby procedure.
pub const NEARBY_LIMIT: i64 = 600;
/// Largest accepted nearby radius in meters.
pub const MAX_RADIUS_M: f64 = 50_000.0;

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Featured venues first, then by popularity.
    #[default]
    Featured,
    /// Popularity, ties broken by number of ratings.
    Popular,
    /// Case-insensitive alphabetical.
    Name,
    /// Featured first, then by distance from the caller.
    Nearest,
}

impl SortMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortMode::Featured => "featured",
            SortMode::Popular => "popular",
            SortMode::Name => "name",
            SortMode::Nearest => "nearest",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "featured" => Ok(SortMode::Featured),
            "popular" => Ok(SortMode::Popular),
            "name" | "az" => Ok(SortMode::Name),
            "nearest" => Ok(SortMode::Nearest),
            other => Err(format!("unknown sort mode '{other}'")),
        }
    }
}

/// Search filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueFilter {
    /// Case-insensitive substring matched against any searchable text field.
    pub text: Option<String>,
    /// Exact (case-insensitive) city match.
    pub city: Option<String>,
    pub region: Region,
    /// Facilities that must all be present. Ignored when `any_facility` is set.
    pub facilities: Vec<Facility>,
    /// Require at least one tracked facility.
    pub any_facility: bool,
    pub sort: SortMode,
    /// Caller position, used only for [`SortMode::Nearest`].
    pub origin: Option<Coordinate>,
    pub limit: i64,
}

impl Default for VenueFilter {
    fn default() -> Self {
        Self {
            text: None,
            city: None,
            region: Region::All,
            facilities: Vec::new(),
            any_facility: false,
            sort: SortMode::Featured,
            origin: None,
            limit: DEFAULT_VENUE_LIMIT,
        }
    }
}

impl VenueFilter {
    /// Requires `facility` in addition to any already required.
    pub fn require(mut self, facility: Facility) -> Self {
        if !self.facilities.contains(&facility) {
            self.facilities.push(facility);
        }
        self
    }

    /// Whether `venue` satisfies every predicate of this filter.
    pub fn matches(&self, venue: &Venue) -> bool {
        if !venue.approved {
            return false;
        }

        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let hit = searchable_fields(venue)
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(city) = &self.city {
            match &venue.city {
                Some(c) if c.eq_ignore_ascii_case(city) => {}
                _ => return false,
            }
        }

        if let Some(bbox) = self.region.bounding_box() {
            match venue.position() {
                Some((lat, lng)) if bbox.contains(lat, lng) => {}
                _ => return false,
            }
        }

        if self.any_facility {
            venue.facilities.any()
        } else {
            self.facilities.iter().all(|f| venue.facilities.has(*f))
        }
    }
}

/// Text fields covered by the free-text query.
pub const SEARCHABLE_COLUMNS: [&str; 6] = ["name", "address", "suburb", "city", "state", "notes"];

fn searchable_fields(venue: &Venue) -> impl Iterator<Item = &str> {
    std::iter::once(venue.name.as_str()).chain(
        [
            &venue.address,
            &venue.suburb,
            &venue.city,
            &venue.state,
            &venue.notes,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref()),
    )
}

/// Parameters of the server-side nearby procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub center: Coordinate,
    pub radius_m: f64,
    pub venue_type: Option<String>,
    /// Only return venues with a playground within walking distance.
    pub near_playground: bool,
    pub limit: i64,
}

/// Descending comparison of optional numbers; missing values sort last.
fn desc_nulls_last<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn asc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a.filter(|d| !d.is_nan()), b.filter(|d| !d.is_nan())) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn by_name(a: &Venue, b: &Venue) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

fn featured_first(a: &Venue, b: &Venue) -> Ordering {
    b.is_featured.cmp(&a.is_featured)
}

/// Orders two venues by `sort`.
///
/// `distance` gives each venue's distance from the caller and is consulted
/// only for [`SortMode::Nearest`].
pub fn compare_venues<F>(a: &Venue, b: &Venue, sort: SortMode, distance: F) -> Ordering
where
    F: Fn(&Venue) -> Option<f64>,
{
    match sort {
        SortMode::Featured => featured_first(a, b)
            .then_with(|| desc_nulls_last(a.popularity, b.popularity))
            .then_with(|| by_name(a, b)),
        SortMode::Popular => desc_nulls_last(a.popularity, b.popularity)
            .then_with(|| desc_nulls_last(a.rating_count, b.rating_count))
            .then_with(|| by_name(a, b)),
        SortMode::Name => by_name(a, b),
        SortMode::Nearest => featured_first(a, b)
            .then_with(|| asc_nulls_last(distance(a), distance(b)))
            .then_with(|| by_name(a, b)),
    }
}

/// Stable in-place sort of search results.
///
/// [`SortMode::Nearest`] without an origin falls back to [`SortMode::Name`].
pub fn sort_venues(venues: &mut [Venue], sort: SortMode, origin: Option<Coordinate>) {
    match (sort, origin) {
        (SortMode::Nearest, Some(origin)) => {
            let distance = |v: &Venue| {
                v.position()
                    .map(|(lat, lng)| geo::distance_km(&origin, &Coordinate::new(lat, lng)))
            };
            venues.sort_by(|a, b| compare_venues(a, b, SortMode::Nearest, distance));
        }
        (SortMode::Nearest, None) => {
            venues.sort_by(|a, b| compare_venues(a, b, SortMode::Name, |_| None));
        }
        (sort, _) => venues.sort_by(|a, b| compare_venues(a, b, sort, |_| None)),
    }
}

/// Stable featured-first ordering of nearby results.
///
/// The procedure's row order is treated as unordered; [`SortMode::Nearest`]
/// uses the distance it reported.
pub fn sort_nearby(rows: &mut [NearbyVenue], sort: SortMode) {
    rows.sort_by(|a, b| {
        featured_first(&a.venue, &b.venue).then_with(|| {
            compare_venues(&a.venue, &b.venue, sort, |v| {
                if v.id == a.venue.id {
                    Some(a.distance_m)
                } else {
                    Some(b.distance_m)
                }
            })
        })
    });
}
