//! PostgreSQL implementation of the venue repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{NearbyRow, VENUE_COLUMNS, VENUE_COLUMNS_V, VenueRow};
use super::search_query::build_search;
use crate::domain::entities::{NearbyVenue, Venue};
use crate::domain::repositories::VenueRepository;
use crate::domain::search::{NearbyQuery, VenueFilter};
use crate::error::AppError;

pub struct PgVenueRepository {
    pool: Arc<PgPool>,
}

impl PgVenueRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueRepository for PgVenueRepository {
    async fn search(&self, filter: &VenueFilter) -> Result<Vec<Venue>, AppError> {
        let mut qb = build_search(filter);

        let rows: Vec<VenueRow> = qb.build_query_as().fetch_all(self.pool.as_ref()).await?;

        Ok(rows.into_iter().map(Venue::from).collect())
    }

    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyVenue>, AppError> {
        // Predicates live in venues_near(); this only hydrates the rows.
        let sql = format!(
            "SELECT {VENUE_COLUMNS_V}, n.distance_m, n.playground_distance_m \
             FROM venues_near($1, $2, $3, $4, $5) n \
             JOIN venues v ON v.id = n.venue_id \
             LIMIT $6"
        );

        let rows: Vec<NearbyRow> = sqlx::query_as(&sql)
            .bind(query.center.lat)
            .bind(query.center.lng)
            .bind(query.radius_m)
            .bind(query.venue_type.as_deref())
            .bind(query.near_playground)
            .bind(query.limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(NearbyVenue::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Venue>, AppError> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1");

        let row: Option<VenueRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Venue::from))
    }

    async fn set_featured(&self, id: i64, featured: bool) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE venues SET is_featured = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(featured)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_claimed(&self, id: i64, claimed: bool) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE venues SET claimed = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(claimed)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
