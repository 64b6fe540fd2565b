//! DTOs for venue search, nearby lookup and single-venue reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::{Facility, NearbyVenue, Venue};
use crate::domain::geo::{Coordinate, Region};
use crate::domain::search::{NearbyQuery, SortMode, VenueFilter};
use crate::error::AppError;
use crate::utils::flags::is_truthy;

/// Query parameters of `GET /api/venues`.
///
/// Flags are kept as raw strings and interpreted with
/// [`is_truthy`] so that `?playground=0` simply disables the filter.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct VenueListParams {
    pub q: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub sort: Option<String>,
    pub playground: Option<String>,
    pub indoor_playground: Option<String>,
    pub kids_room: Option<String>,
    pub kids_club: Option<String>,
    pub games_room: Option<String>,
    pub any_kids: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub lng: Option<f64>,
}

impl VenueListParams {
    fn flag(&self, facility: Facility) -> bool {
        let raw = match facility {
            Facility::Playground => &self.playground,
            Facility::IndoorPlayground => &self.indoor_playground,
            Facility::KidsRoom => &self.kids_room,
            Facility::KidsClub => &self.kids_club,
            Facility::GamesRoom => &self.games_room,
        };
        is_truthy(raw.as_deref())
    }

    /// Builds the search filter.
    ///
    /// # Errors
    ///
    /// Unknown `region` or `sort` values, a lone `lat`/`lng`, or an
    /// out-of-range position.
    pub fn into_filter(self) -> Result<VenueFilter, AppError> {
        let region: Region = parse_param("region", self.region.as_deref())?;
        let sort: SortMode = parse_param("sort", self.sort.as_deref())?;
        let origin = optional_coordinate(self.lat, self.lng)?;

        let mut filter = VenueFilter {
            text: non_blank(self.q.as_deref()),
            city: non_blank(self.city.as_deref()),
            region,
            any_facility: is_truthy(self.any_kids.as_deref()),
            sort,
            origin,
            ..VenueFilter::default()
        };

        for facility in Facility::ALL {
            if self.flag(facility) {
                filter = filter.require(facility);
            }
        }

        Ok(filter)
    }
}

/// Query parameters of `GET /api/venues/nearby`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct NearbyParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub radius_m: Option<f64>,
    pub venue_type: Option<String>,
    pub near_playground: Option<String>,
    pub sort: Option<String>,
}

/// Radius used when the caller does not send one.
pub const DEFAULT_NEARBY_RADIUS_M: f64 = 5_000.0;

impl NearbyParams {
    /// Builds the procedure parameters and the post-fetch sort.
    ///
    /// `sort` defaults to `nearest` here, unlike the list endpoint.
    pub fn into_query(self) -> Result<(NearbyQuery, SortMode), AppError> {
        let center = optional_coordinate(self.lat, self.lng)?.ok_or_else(|| {
            AppError::bad_request("lat and lng are required", json!({}))
        })?;

        let sort = match non_blank(self.sort.as_deref()) {
            None => SortMode::Nearest,
            Some(raw) => parse_param("sort", Some(&raw))?,
        };

        let query = NearbyQuery {
            center,
            radius_m: self.radius_m.unwrap_or(DEFAULT_NEARBY_RADIUS_M),
            venue_type: non_blank(self.venue_type.as_deref()).map(|t| t.to_lowercase()),
            near_playground: is_truthy(self.near_playground.as_deref()),
            limit: 0,
        };

        Ok((query, sort))
    }
}

fn parse_param<T>(name: &str, raw: Option<&str>) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    raw.unwrap_or_default()
        .parse()
        .map_err(|e: String| AppError::bad_request(e, json!({ "param": name })))
}

fn optional_coordinate(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Coordinate>, AppError> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let c = Coordinate::new(lat, lng);
            if c.is_valid() {
                Ok(Some(c))
            } else {
                Err(AppError::bad_request(
                    "Invalid coordinates",
                    json!({ "lat": lat, "lng": lng }),
                ))
            }
        }
        _ => Err(AppError::bad_request(
            "lat and lng must be supplied together",
            json!({}),
        )),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Public venue representation.
#[derive(Debug, Clone, Serialize)]
pub struct VenueDto {
    pub id: i64,
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
    pub playground: bool,
    pub indoor_playground: bool,
    pub kids_room: bool,
    pub kids_club: bool,
    pub games_room: bool,
    pub popularity: Option<f64>,
    pub rating_count: Option<i32>,
    pub claimed: bool,
    pub is_featured: bool,
    pub featured_rank: Option<i32>,
    pub cta_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Venue> for VenueDto {
    fn from(v: Venue) -> Self {
        Self {
            id: v.id,
            external_id: v.external_id,
            name: v.name,
            venue_type: v.venue_type,
            address: v.address,
            suburb: v.suburb,
            city: v.city,
            state: v.state,
            lat: v.lat,
            lng: v.lng,
            website: v.website,
            phone: v.phone,
            notes: v.notes,
            playground: v.facilities.playground,
            indoor_playground: v.facilities.indoor_playground,
            kids_room: v.facilities.kids_room,
            kids_club: v.facilities.kids_club,
            games_room: v.facilities.games_room,
            popularity: v.popularity,
            rating_count: v.rating_count,
            claimed: v.claimed,
            is_featured: v.is_featured,
            featured_rank: v.featured_rank,
            cta_url: v.cta_url,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NearbyVenueDto {
    #[serde(flatten)]
    pub venue: VenueDto,
    pub distance_m: f64,
    pub playground_distance_m: Option<f64>,
}

impl From<NearbyVenue> for NearbyVenueDto {
    fn from(row: NearbyVenue) -> Self {
        Self {
            venue: row.venue.into(),
            distance_m: row.distance_m,
            playground_distance_m: row.playground_distance_m,
        }
    }
}

/// `{ "venues": [...] }`
#[derive(Debug, Serialize)]
pub struct VenueListResponse<T> {
    pub venues: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    pub venue: VenueDto,
}
