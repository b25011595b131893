use chrono::NaiveDate;

use super::domain::parse_calendar_date;

/// Which query parameter a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl DateField {
    pub const fn param(self) -> &'static str {
        match self {
            Self::Start => "startDate",
            Self::End => "endDate",
        }
    }
}

/// Rejected query parameters. Display yields the client-facing detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{} must be in YYYY-MM-DD format.", .field.param())]
    InvalidDateFormat { field: DateField },
    #[error("endDate must be on or after startDate.")]
    InvalidDateRange,
}

impl ValidationError {
    /// Stable short title for the Problem-Details envelope.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::InvalidDateFormat { .. } => "Invalid Date Format",
            Self::InvalidDateRange => "Invalid Date Range",
        }
    }
}

/// Inclusive calendar-date bounds; `start <= end` when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRangeFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRangeFilter {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `date` falls inside the bounds. Unreadable dates never match a
    /// bounded range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Parses optional raw bounds. Absent and empty values mean "no bound".
pub fn validate_date_range(
    start_raw: Option<&str>,
    end_raw: Option<&str>,
) -> Result<DateRangeFilter, ValidationError> {
    let start = parse_bound(start_raw, DateField::Start)?;
    let end = parse_bound(end_raw, DateField::End)?;

    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ValidationError::InvalidDateRange);
        }
    }

    Ok(DateRangeFilter { start, end })
}

fn parse_bound(raw: Option<&str>, field: DateField) -> Result<Option<NaiveDate>, ValidationError> {
    let Some(raw) = raw.filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    if !has_iso_date_prefix(raw) {
        return Err(ValidationError::InvalidDateFormat { field });
    }

    parse_calendar_date(raw)
        .map(Some)
        .ok_or(ValidationError::InvalidDateFormat { field })
}

// Four digits, dash, two digits, dash, two digits.
fn has_iso_date_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() < 10 {
        return false;
    }
    bytes[..10].iter().enumerate().all(|(idx, byte)| match idx {
        4 | 7 => *byte == b'-',
        _ => byte.is_ascii_digit(),
    })
}
