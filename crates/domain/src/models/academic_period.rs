//! Academic period domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bounded teaching period (month/term) bookings are generated within.
///
/// Special weeks (exam weeks, breaks) never resolve as the enrollment
/// period for a new purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicPeriod {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_special_week: bool,
    pub created_at: DateTime<Utc>,
}

impl AcademicPeriod {
    /// Whether the given UTC calendar date falls inside the period, bounds
    /// inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether the period has not started yet as of the given date.
    pub fn is_upcoming(&self, date: NaiveDate) -> bool {
        self.start_date >= date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(start: (i32, u32, u32), end: (i32, u32, u32)) -> AcademicPeriod {
        AcademicPeriod {
            id: Uuid::new_v4(),
            name: "March 2026".to_string(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            is_special_week: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_contains_is_inclusive_on_both_bounds() {
        let p = period((2026, 3, 1), (2026, 3, 31));
        assert!(p.contains(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
        assert!(p.contains(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()));
        assert!(p.contains(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
        assert!(!p.contains(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()));
        assert!(!p.contains(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));
    }

    #[test]
    fn test_is_upcoming() {
        let p = period((2026, 5, 1), (2026, 5, 31));
        assert!(p.is_upcoming(NaiveDate::from_ymd_opt(2026, 4, 20).unwrap()));
        assert!(p.is_upcoming(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()));
        assert!(!p.is_upcoming(NaiveDate::from_ymd_opt(2026, 5, 2).unwrap()));
    }
}
