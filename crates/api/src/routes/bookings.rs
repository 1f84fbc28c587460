//! Student booking listing with keyset pagination.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::models::ClassBooking;
use persistence::repositories::{BookingQuery, ClassBookingRepository};
use shared::pagination::{decode_cursor, encode_cursor};

use crate::app::AppState;
use crate::error::ApiError;

const DEFAULT_PAGE_SIZE: i32 = 20;
const MAX_PAGE_SIZE: i32 = 100;

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub after: Option<String>,
    pub limit: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListResponse {
    pub bookings: Vec<ClassBooking>,
    pub pagination: PaginationInfo,
}

/// List a student's bookings in calendar order, earliest first.
pub async fn list_student_bookings(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    // A bad cursor is rejected before touching the database.
    let (cursor_day, cursor_id) = match query.after.as_deref() {
        Some(cursor) => {
            let (ts, id) = decode_cursor(cursor)
                .map_err(|e| ApiError::Validation(format!("Invalid cursor: {}", e)))?;
            (
                Some(ts.date_naive().format("%Y-%m-%d").to_string()),
                Some(id),
            )
        }
        None => (None, None),
    };

    let repo = ClassBookingRepository::new(state.pool.clone());
    let (entities, has_more) = repo
        .list_for_student(BookingQuery {
            student_id,
            cursor_day,
            cursor_id,
            limit,
        })
        .await?;

    // Bookings sort by day, so the cursor encodes the day at midnight UTC
    // with the row id as tiebreaker.
    let next_cursor = if has_more {
        entities.last().and_then(|e| {
            let day = NaiveDate::parse_from_str(&e.day, "%Y-%m-%d").ok()?;
            let midnight = day.and_hms_opt(0, 0, 0)?;
            Some(encode_cursor(Utc.from_utc_datetime(&midnight), e.id))
        })
    } else {
        None
    };

    Ok(Json(BookingListResponse {
        bookings: entities.into_iter().map(ClassBooking::from).collect(),
        pagination: PaginationInfo {
            next_cursor,
            has_more,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_preserves_booking_day() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let midnight = day.and_hms_opt(0, 0, 0).unwrap();
        let cursor = encode_cursor(Utc.from_utc_datetime(&midnight), Uuid::nil());

        let (ts, id) = decode_cursor(&cursor).unwrap();
        assert_eq!(ts.date_naive().format("%Y-%m-%d").to_string(), "2026-03-09");
        assert_eq!(id, Uuid::nil());
    }

    #[test]
    fn test_limit_clamping() {
        assert_eq!(500i32.clamp(1, MAX_PAGE_SIZE), 100);
        assert_eq!(0i32.clamp(1, MAX_PAGE_SIZE), 1);
        assert_eq!((-5i32).clamp(1, MAX_PAGE_SIZE), 1);
    }
}
