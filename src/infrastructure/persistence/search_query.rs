//! Translation of a [`VenueFilter`] into one parameterised SELECT.
//!
//! Column names pushed into the SQL come from [`Facility::as_str`] and
//! [`SEARCHABLE_COLUMNS`]; every caller-supplied value is bound.

use sqlx::{Postgres, QueryBuilder};

use super::rows::VENUE_COLUMNS;
use crate::domain::entities::Facility;
use crate::domain::search::{SEARCHABLE_COLUMNS, SortMode, VenueFilter};

/// Escapes `%`, `_` and `\` so the text is matched literally by ILIKE.
pub fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// ORDER BY clause for `sort`; every mode ends with a case-insensitive name tiebreak.
///
/// [`SortMode::Nearest`] needs a bound origin and is built by
/// [`push_order_by`]; on its own it falls back to name order.
pub fn order_by(sort: SortMode) -> &'static str {
    match sort {
        SortMode::Featured => {
            " ORDER BY is_featured DESC, popularity DESC NULLS LAST, lower(name) ASC, id ASC"
        }
        SortMode::Popular => {
            " ORDER BY popularity DESC NULLS LAST, rating_count DESC NULLS LAST, lower(name) ASC, id ASC"
        }
        SortMode::Name | SortMode::Nearest => " ORDER BY lower(name) ASC, id ASC",
    }
}

/// Appends the ORDER BY for `filter`, ahead of the LIMIT.
///
/// With an origin, `nearest` orders by `haversine_m` so the cap keeps the
/// closest rows. Venues without coordinates sort last.
pub fn push_order_by(qb: &mut QueryBuilder<'static, Postgres>, filter: &VenueFilter) {
    match (filter.sort, filter.origin) {
        (SortMode::Nearest, Some(origin)) => {
            qb.push(" ORDER BY is_featured DESC, haversine_m(")
                .push_bind(origin.lat)
                .push(", ")
                .push_bind(origin.lng)
                .push(", lat, lng) ASC NULLS LAST, lower(name) ASC, id ASC");
        }
        (sort, _) => {
            qb.push(order_by(sort));
        }
    }
}

pub fn build_search(filter: &VenueFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {VENUE_COLUMNS} FROM venues WHERE approved = TRUE"));

    if let Some(text) = filter.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = like_pattern(text);
        qb.push(" AND (");
        for (i, column) in SEARCHABLE_COLUMNS.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
        }
        qb.push(")");
    }

    if let Some(city) = filter.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        qb.push(" AND lower(city) = lower(")
            .push_bind(city.to_string())
            .push(")");
    }

    if let Some(bbox) = filter.region.bounding_box() {
        qb.push(" AND lat BETWEEN ")
            .push_bind(bbox.south_west.lat)
            .push(" AND ")
            .push_bind(bbox.north_east.lat)
            .push(" AND lng BETWEEN ")
            .push_bind(bbox.south_west.lng)
            .push(" AND ")
            .push_bind(bbox.north_east.lng);
    }

    if filter.any_facility {
        qb.push(" AND (");
        for (i, facility) in Facility::ALL.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(facility.as_str());
        }
        qb.push(")");
    } else {
        for facility in &filter.facilities {
            qb.push(" AND ").push(facility.as_str()).push(" = TRUE");
        }
    }

    push_order_by(&mut qb, filter);
    qb.push(" LIMIT ").push_bind(filter.limit);

    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::{Coordinate, Region};

    #[test]
    fn test_default_filter_only_gates_approval() {
        let qb = build_search(&VenueFilter::default());
        let sql = qb.sql();

        assert!(sql.contains("WHERE approved = TRUE"));
        assert!(!sql.contains("ILIKE"));
        assert!(!sql.contains("BETWEEN"));
        assert!(sql.contains("ORDER BY is_featured DESC, popularity DESC NULLS LAST"));
        assert!(sql.ends_with("LIMIT $1"));
    }

    #[test]
    fn test_text_is_ored_across_columns() {
        let filter = VenueFilter {
            text: Some("royal".to_string()),
            ..VenueFilter::default()
        };
        let qb = build_search(&filter);
        let sql = qb.sql();

        assert!(sql.contains(
            "AND (name ILIKE $1 OR address ILIKE $2 OR suburb ILIKE $3 OR city ILIKE $4 OR state ILIKE $5 OR notes ILIKE $6)"
        ));
        assert!(sql.ends_with("LIMIT $7"));
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let filter = VenueFilter {
            text: Some("   ".to_string()),
            ..VenueFilter::default()
        };
        assert!(!build_search(&filter).sql().contains("ILIKE"));
    }

    #[test]
    fn test_any_facility_is_or() {
        let filter = VenueFilter {
            any_facility: true,
            ..VenueFilter::default().require(Facility::Playground)
        };
        let qb = build_search(&filter);
        let sql = qb.sql();

        assert!(sql.contains(
            "AND (playground OR indoor_playground OR kids_room OR kids_club OR games_room)"
        ));
        assert!(!sql.contains("playground = TRUE"));
    }

    #[test]
    fn test_checked_facilities_are_and() {
        let filter = VenueFilter::default()
            .require(Facility::Playground)
            .require(Facility::GamesRoom);
        let qb = build_search(&filter);
        let sql = qb.sql();

        assert!(sql.contains("AND playground = TRUE AND games_room = TRUE"));
    }

    #[test]
    fn test_region_and_city() {
        let filter = VenueFilter {
            region: Region::GoldCoast,
            city: Some("Southport".to_string()),
            ..VenueFilter::default()
        };
        let qb = build_search(&filter);
        let sql = qb.sql();

        assert!(sql.contains("AND lower(city) = lower($1)"));
        assert!(sql.contains("AND lat BETWEEN $2 AND $3 AND lng BETWEEN $4 AND $5"));
    }

    #[test]
    fn test_sort_clauses() {
        assert!(order_by(SortMode::Popular).contains("rating_count DESC NULLS LAST"));
        assert_eq!(order_by(SortMode::Name), " ORDER BY lower(name) ASC, id ASC");
        assert_eq!(order_by(SortMode::Nearest), order_by(SortMode::Name));
    }

    #[test]
    fn test_nearest_orders_by_distance_before_limit() {
        let filter = VenueFilter {
            sort: SortMode::Nearest,
            origin: Some(Coordinate::new(-27.46, 153.02)),
            ..VenueFilter::default()
        };
        let qb = build_search(&filter);
        let sql = qb.sql();

        assert!(sql.ends_with(
            " ORDER BY is_featured DESC, haversine_m($1, $2, lat, lng) ASC NULLS LAST, \
             lower(name) ASC, id ASC LIMIT $3"
        ));
    }

    #[test]
    fn test_nearest_without_origin_orders_by_name() {
        let filter = VenueFilter {
            sort: SortMode::Nearest,
            ..VenueFilter::default()
        };
        let qb = build_search(&filter);
        assert!(qb.sql().ends_with(" ORDER BY lower(name) ASC, id ASC LIMIT $1"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("pub"), "%pub%");
    }
}
