use serde::Deserialize;

use super::domain::SessionRecord;
use super::validation::{validate_date_range, ValidationError};

/// Raw query parameters as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl SessionQuery {
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref().filter(|value| !value.is_empty())
    }

    pub fn start_date(&self) -> Option<&str> {
        self.start_date.as_deref().filter(|value| !value.is_empty())
    }

    pub fn end_date(&self) -> Option<&str> {
        self.end_date.as_deref().filter(|value| !value.is_empty())
    }
}

/// Keeps the records matching the department and inclusive date range, in
/// their original order. Date bounds are validated even when the department
/// filter already emptied the list.
pub fn filter_sessions(
    records: Vec<SessionRecord>,
    query: &SessionQuery,
) -> Result<Vec<SessionRecord>, ValidationError> {
    let range = validate_date_range(query.start_date(), query.end_date())?;
    let department = query.department().map(str::to_lowercase);

    Ok(records
        .into_iter()
        .filter(|record| {
            department
                .as_deref()
                .map_or(true, |wanted| record.department.to_lowercase() == wanted)
        })
        .filter(|record| range.contains(record.calendar_date()))
        .collect())
}
