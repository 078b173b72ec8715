//! Time-window arithmetic over calendar dates.
//!
//! Whole-day truncation throughout: two events on the same calendar day are
//! zero days apart regardless of time of day.

use jiff::civil::Date;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("event on {event} precedes reference date {reference}")]
    BeforeReference { reference: Date, event: Date },

    #[error("date arithmetic failed: {0}")]
    Arithmetic(String),
}

/// Whole days from `reference` to `event`. Errors if `event` is earlier.
pub fn elapsed_days(reference: Date, event: Date) -> Result<u32, WindowError> {
    if event < reference {
        return Err(WindowError::BeforeReference { reference, event });
    }
    let span = event
        .since(reference)
        .map_err(|e| WindowError::Arithmetic(e.to_string()))?;
    u32::try_from(span.get_days()).map_err(|e| WindowError::Arithmetic(e.to_string()))
}

/// Whole weeks from `reference` to `event`, floored.
pub fn elapsed_weeks(reference: Date, event: Date) -> Result<u32, WindowError> {
    Ok(elapsed_days(reference, event)? / 7)
}

pub fn within_deadline(elapsed: u32, deadline: u32) -> bool {
    elapsed <= deadline
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn same_calendar_day_is_zero_days() {
        let morning = date(2024, 2, 29).at(0, 5, 0, 0);
        let night = date(2024, 2, 29).at(23, 55, 0, 0);
        assert_eq!(elapsed_days(morning.date(), night.date()), Ok(0));
    }

    #[test]
    fn counts_across_month_and_leap_day() {
        assert_eq!(elapsed_days(date(2024, 2, 1), date(2024, 3, 2)), Ok(30));
        assert_eq!(elapsed_days(date(2023, 12, 31), date(2024, 12, 31)), Ok(366));
    }

    #[test]
    fn weeks_are_floored() {
        assert_eq!(elapsed_weeks(date(2024, 1, 1), date(2024, 1, 7)), Ok(0));
        assert_eq!(elapsed_weeks(date(2024, 1, 1), date(2024, 1, 8)), Ok(1));
        assert_eq!(elapsed_weeks(date(2024, 1, 1), date(2024, 3, 31)), Ok(12));
    }

    #[test]
    fn event_before_reference_is_rejected() {
        assert_eq!(
            elapsed_days(date(2024, 5, 10), date(2024, 5, 9)),
            Err(WindowError::BeforeReference {
                reference: date(2024, 5, 10),
                event: date(2024, 5, 9),
            })
        );
    }

    #[test]
    fn deadline_is_inclusive() {
        assert!(within_deadline(30, 30));
        assert!(!within_deadline(31, 30));
    }
}
