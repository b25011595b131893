use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Opaque dataset header (generation timestamp, version, ...) echoed in reports.
pub type DatasetMetadata = serde_json::Value;

/// A single recorded training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub department: String,
    pub date: String,
    pub overall_score: f64,
    pub passed: bool,
    /// Skill name to score; keys differ between records.
    pub skills: IndexMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<f64>,
}

impl SessionRecord {
    /// Calendar date of the session, if the stored value can be read as one.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }
}

/// The data source document: a metadata block plus the session list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingDataset {
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: DatasetMetadata,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Reads `YYYY-MM-DD`, RFC 3339 timestamps, and naive ISO date-times (`T` or
/// space separated), keeping only the calendar date.
pub(crate) fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    parse_naive_date_time(trimmed).map(|dt| dt.date())
}

/// Point in time (UTC) for ordering. A plain date reads as midnight UTC.
pub(crate) fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    parse_naive_date_time(trimmed)
}

fn parse_naive_date_time(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_timestamp_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
        assert_eq!(parse_calendar_date("2024-03-05"), Some(expected));
        assert_eq!(parse_calendar_date("2024-03-05T23:10:00Z"), Some(expected));
        assert_eq!(parse_calendar_date("2024-03-05T08:00:00.250"), Some(expected));
        assert_eq!(parse_calendar_date("2024-03-05T08:00"), Some(expected));
        assert_eq!(parse_calendar_date("2024-03-05 10:00"), Some(expected));
        assert_eq!(parse_calendar_date("2024-03-05 10:00:30.5"), Some(expected));
        assert_eq!(parse_calendar_date("March 5th"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn instants_treat_plain_dates_as_midnight_utc() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
        let midnight = day.and_time(NaiveTime::MIN);
        assert_eq!(parse_instant("2024-01-15"), Some(midnight));

        let nine = day.and_hms_opt(9, 0, 0).expect("valid time");
        assert_eq!(parse_instant("2024-01-15T09:00:00Z"), Some(nine));
        assert_eq!(parse_instant("2024-01-15T11:00:00+02:00"), Some(nine));
        assert_eq!(parse_instant("2024-01-15 09:00"), Some(nine));
        assert!(parse_instant("2024-01-15") < parse_instant("2024-01-15T09:00:00Z"));
        assert_eq!(parse_instant("soon"), None);
    }

    #[test]
    fn dataset_defaults_missing_sections() {
        let dataset: TrainingDataset = serde_json::from_str("{}").expect("empty dataset parses");
        assert!(dataset.metadata.is_null());
        assert!(dataset.sessions.is_empty());
    }

    #[test]
    fn session_keeps_skill_document_order() {
        let raw = r#"{
            "department": "Sales",
            "date": "2024-01-01",
            "overallScore": 72.5,
            "passed": true,
            "skills": { "negotiation": 80, "closing": 65, "empathy": 90 }
        }"#;
        let record: SessionRecord = serde_json::from_str(raw).expect("record parses");
        let keys: Vec<&str> = record.skills.keys().map(String::as_str).collect();
        assert_eq!(keys, ["negotiation", "closing", "empathy"]);
        assert!(record.completion_time.is_none());
    }
}
