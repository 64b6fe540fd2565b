//! Geographic helpers: great-circle distance and named bounding boxes.

use std::fmt;
use std::str::FromStr;

/// The Earth's mean radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Haversine distance in kilometers.
///
/// Returns NaN when either coordinate is not finite.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self {
            south_west: Coordinate::new(min_lat, min_lng),
            north_east: Coordinate::new(max_lat, max_lng),
        }
    }

    /// Boundary values are inside the box.
    #[rustfmt::skip]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south_west.lat &&
        lng >= self.south_west.lng &&
        lat <= self.north_east.lat &&
        lng <= self.north_east.lng
    }
}

/// Named region presets offered by the search UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// No geographic restriction.
    #[default]
    All,
    Brisbane,
    GoldCoast,
}

impl Region {
    const BRISBANE: BoundingBox = BoundingBox::new(-27.75, 152.70, -27.20, 153.25);
    const GOLD_COAST: BoundingBox = BoundingBox::new(-28.25, 153.20, -27.75, 153.55);

    pub const fn as_str(self) -> &'static str {
        match self {
            Region::All => "all",
            Region::Brisbane => "brisbane",
            Region::GoldCoast => "gold_coast",
        }
    }

    pub fn bounding_box(self) -> Option<BoundingBox> {
        match self {
            Region::All => None,
            Region::Brisbane => Some(Self::BRISBANE),
            Region::GoldCoast => Some(Self::GOLD_COAST),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Region::All),
            "brisbane" => Ok(Region::Brisbane),
            "gold_coast" | "goldcoast" | "gold-coast" => Ok(Region::GoldCoast),
            other => Err(format!("unknown region '{other}'")),
        }
    }
}
