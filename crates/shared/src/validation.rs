//! Common validation utilities.

use validator::ValidationError;

/// Validates a wall-clock time in `HH:MM` 24-hour format.
pub fn validate_wall_clock(value: &str) -> Result<(), ValidationError> {
    if parse_wall_clock(value).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("wall_clock_format");
        err.message = Some("Time must be in HH:MM 24-hour format".into());
        Err(err)
    }
}

/// Parses a `HH:MM` string into (hour, minute), rejecting out-of-range values.
pub fn parse_wall_clock(value: &str) -> Option<(u32, u32)> {
    let (h, m) = value.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour < 24 && minute < 60 {
        Some((hour, minute))
    } else {
        None
    }
}

/// Validates that a day-of-week index is within 0 (Sunday) to 6 (Saturday).
pub fn validate_day_of_week(day: i16) -> Result<(), ValidationError> {
    if (0..=6).contains(&day) {
        Ok(())
    } else {
        let mut err = ValidationError::new("day_of_week_range");
        err.message = Some("Day of week must be between 0 (Sunday) and 6 (Saturday)".into());
        Err(err)
    }
}

/// Validates that a quantity is at least 1.
pub fn validate_quantity(quantity: i32) -> Result<(), ValidationError> {
    if quantity >= 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("quantity_range");
        err.message = Some("Quantity must be at least 1".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_wall_clock() {
        assert!(validate_wall_clock("00:00").is_ok());
        assert!(validate_wall_clock("09:05").is_ok());
        assert!(validate_wall_clock("14:00").is_ok());
        assert!(validate_wall_clock("23:59").is_ok());
    }

    #[test]
    fn test_invalid_wall_clock() {
        assert!(validate_wall_clock("24:00").is_err());
        assert!(validate_wall_clock("12:60").is_err());
        assert!(validate_wall_clock("9:00").is_err());
        assert!(validate_wall_clock("09:0").is_err());
        assert!(validate_wall_clock("0900").is_err());
        assert!(validate_wall_clock("").is_err());
        assert!(validate_wall_clock("ab:cd").is_err());
    }

    #[test]
    fn test_parse_wall_clock_values() {
        assert_eq!(parse_wall_clock("09:30"), Some((9, 30)));
        assert_eq!(parse_wall_clock("23:59"), Some((23, 59)));
        assert_eq!(parse_wall_clock("24:00"), None);
    }

    #[test]
    fn test_day_of_week_range() {
        for day in 0..=6 {
            assert!(validate_day_of_week(day).is_ok());
        }
        assert!(validate_day_of_week(-1).is_err());
        assert!(validate_day_of_week(7).is_err());
    }

    #[test]
    fn test_quantity_range() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }
}
