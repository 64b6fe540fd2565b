//! Venue entity and its facility attributes.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// A tracked kid-friendly facility.
///
/// Each variant maps to one boolean column on the venue record and one query
/// parameter of the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facility {
    /// Outdoor playground on site.
    Playground,
    IndoorPlayground,
    KidsRoom,
    KidsClub,
    GamesRoom,
}

impl Facility {
    pub const ALL: [Facility; 5] = [
        Facility::Playground,
        Facility::IndoorPlayground,
        Facility::KidsRoom,
        Facility::KidsClub,
        Facility::GamesRoom,
    ];

    /// Column name and query parameter key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Facility::Playground => "playground",
            Facility::IndoorPlayground => "indoor_playground",
            Facility::KidsRoom => "kids_room",
            Facility::KidsClub => "kids_club",
            Facility::GamesRoom => "games_room",
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Facility::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown facility '{s}'"))
    }
}

/// Facility flags of a venue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Facilities {
    pub playground: bool,
    pub indoor_playground: bool,
    pub kids_room: bool,
    pub kids_club: bool,
    pub games_room: bool,
}

impl Facilities {
    pub fn has(&self, facility: Facility) -> bool {
        match facility {
            Facility::Playground => self.playground,
            Facility::IndoorPlayground => self.indoor_playground,
            Facility::KidsRoom => self.kids_room,
            Facility::KidsClub => self.kids_club,
            Facility::GamesRoom => self.games_room,
        }
    }

    pub fn any(&self) -> bool {
        Facility::ALL.into_iter().any(|f| self.has(f))
    }
}

/// A listed place.
///
/// `is_featured` and `claimed` are entitlement flags: only the subscription
/// reconciler and admin review may change them.
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: i64,
    /// OSM identifier or `manual/<submission-id>` for approved submissions.
    pub external_id: Option<String>,
    pub name: String,
    pub venue_type: String,
    pub address: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub facilities: Facilities,
    pub popularity: Option<f64>,
    pub rating_count: Option<i32>,
    pub approved: bool,
    pub claimed: bool,
    pub owner_email: Option<String>,
    pub is_featured: bool,
    pub featured_rank: Option<i32>,
    pub cta_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    /// Creates an approved, unclaimed, unfeatured venue with no optional data.
    pub fn new(id: i64, name: impl Into<String>, venue_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            external_id: None,
            name: name.into(),
            venue_type: venue_type.into(),
            address: None,
            suburb: None,
            city: None,
            state: None,
            lat: None,
            lng: None,
            website: None,
            phone: None,
            notes: None,
            facilities: Facilities::default(),
            popularity: None,
            rating_count: None,
            approved: true,
            claimed: false,
            owner_email: None,
            is_featured: false,
            featured_rank: None,
            cta_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Coordinates as `(lat, lng)` when both are present and finite.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }
}

/// A venue returned by the nearby procedure, annotated with distances.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyVenue {
    pub venue: Venue,
    /// Distance from the search center in meters.
    pub distance_m: f64,
    /// Distance to the closest known playground, if any exist.
    pub playground_distance_m: Option<f64>,
}
