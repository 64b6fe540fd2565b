//! Row types decoded with `sqlx::FromRow` and their mapping onto entities.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::domain::entities::{
    Claim, ClaimWithVenue, Facilities, NearbyVenue, ReviewStatus, Submission, Subscription, Venue,
};
use crate::error::AppError;
use serde_json::json;

/// Column list matching [`VenueRow`], unqualified.
pub const VENUE_COLUMNS: &str = "id, external_id, name, venue_type, address, suburb, city, state, \
     lat, lng, website, phone, notes, playground, indoor_playground, kids_room, kids_club, \
     games_room, popularity, rating_count, approved, claimed, owner_email, is_featured, \
     featured_rank, cta_url, created_at, updated_at";

/// Column list matching [`VenueRow`], qualified with the `v` alias.
pub const VENUE_COLUMNS_V: &str = "v.id, v.external_id, v.name, v.venue_type, v.address, \
     v.suburb, v.city, v.state, v.lat, v.lng, v.website, v.phone, v.notes, v.playground, \
     v.indoor_playground, v.kids_room, v.kids_club, v.games_room, v.popularity, v.rating_count, \
     v.approved, v.claimed, v.owner_email, v.is_featured, v.featured_rank, v.cta_url, \
     v.created_at, v.updated_at";

pub const SUBMISSION_COLUMNS: &str = "id, submitted_name, submitted_venue_type, submitted_address, \
     submitted_notes, submitted_website, submitted_phone, submitted_email, submitted_lat, \
     submitted_lng, status, reviewer_notes, reviewed_at, created_at";

pub const CLAIM_COLUMNS: &str = "id, venue_id, claimant_email, claimant_message, status, \
     reviewer_notes, reviewed_at, created_at";

pub const SUBSCRIPTION_COLUMNS: &str = "id, venue_id, plan, status, stripe_customer_id, \
     stripe_subscription_id, start_date, end_date, created_at, updated_at";

#[derive(Debug, FromRow)]
pub struct VenueRow {
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
    pub approved: bool,
    pub claimed: bool,
    pub owner_email: Option<String>,
    pub is_featured: bool,
    pub featured_rank: Option<i32>,
    pub cta_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VenueRow> for Venue {
    fn from(r: VenueRow) -> Self {
        Venue {
            id: r.id,
            external_id: r.external_id,
            name: r.name,
            venue_type: r.venue_type,
            address: r.address,
            suburb: r.suburb,
            city: r.city,
            state: r.state,
            lat: r.lat,
            lng: r.lng,
            website: r.website,
            phone: r.phone,
            notes: r.notes,
            facilities: Facilities {
                playground: r.playground,
                indoor_playground: r.indoor_playground,
                kids_room: r.kids_room,
                kids_club: r.kids_club,
                games_room: r.games_room,
            },
            popularity: r.popularity,
            rating_count: r.rating_count,
            approved: r.approved,
            claimed: r.claimed,
            owner_email: r.owner_email,
            is_featured: r.is_featured,
            featured_rank: r.featured_rank,
            cta_url: r.cta_url,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct NearbyRow {
    #[sqlx(flatten)]
    pub venue: VenueRow,
    pub distance_m: f64,
    pub playground_distance_m: Option<f64>,
}

impl From<NearbyRow> for NearbyVenue {
    fn from(r: NearbyRow) -> Self {
        NearbyVenue {
            venue: r.venue.into(),
            distance_m: r.distance_m,
            playground_distance_m: r.playground_distance_m,
        }
    }
}

fn parse_status(status: &str) -> Result<ReviewStatus, AppError> {
    status.parse().map_err(|e: String| {
        AppError::internal(e, json!({ "status": status }))
    })
}

#[derive(Debug, FromRow)]
pub struct SubmissionRow {
    pub id: i64,
    pub submitted_name: String,
    pub submitted_venue_type: Option<String>,
    pub submitted_address: Option<String>,
    pub submitted_notes: Option<String>,
    pub submitted_website: Option<String>,
    pub submitted_phone: Option<String>,
    pub submitted_email: Option<String>,
    pub submitted_lat: Option<f64>,
    pub submitted_lng: Option<f64>,
    pub status: String,
    pub reviewer_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = AppError;

    fn try_from(r: SubmissionRow) -> Result<Self, Self::Error> {
        Ok(Submission {
            id: r.id,
            submitted_name: r.submitted_name,
            submitted_venue_type: r.submitted_venue_type,
            submitted_address: r.submitted_address,
            submitted_notes: r.submitted_notes,
            submitted_website: r.submitted_website,
            submitted_phone: r.submitted_phone,
            submitted_email: r.submitted_email,
            submitted_lat: r.submitted_lat,
            submitted_lng: r.submitted_lng,
            status: parse_status(&r.status)?,
            reviewer_notes: r.reviewer_notes,
            reviewed_at: r.reviewed_at,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct ClaimRow {
    pub id: i64,
    pub venue_id: i64,
    pub claimant_email: String,
    pub claimant_message: Option<String>,
    pub status: String,
    pub reviewer_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ClaimRow> for Claim {
    type Error = AppError;

    fn try_from(r: ClaimRow) -> Result<Self, Self::Error> {
        Ok(Claim {
            id: r.id,
            venue_id: r.venue_id,
            claimant_email: r.claimant_email,
            claimant_message: r.claimant_message,
            status: parse_status(&r.status)?,
            reviewer_notes: r.reviewer_notes,
            reviewed_at: r.reviewed_at,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct ClaimWithVenueRow {
    #[sqlx(flatten)]
    pub claim: ClaimRow,
    pub venue_name: Option<String>,
}

impl TryFrom<ClaimWithVenueRow> for ClaimWithVenue {
    type Error = AppError;

    fn try_from(r: ClaimWithVenueRow) -> Result<Self, Self::Error> {
        Ok(ClaimWithVenue {
            claim: r.claim.try_into()?,
            venue_name: r.venue_name,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct SubscriptionRow {
    pub id: i64,
    pub venue_id: i64,
    pub plan: String,
    pub status: String,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(r: SubscriptionRow) -> Self {
        Subscription {
            id: r.id,
            venue_id: r.venue_id,
            plan: r.plan,
            status: r.status,
            stripe_customer_id: r.stripe_customer_id,
            stripe_subscription_id: r.stripe_subscription_id,
            start_date: r.start_date,
            end_date: r.end_date,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
