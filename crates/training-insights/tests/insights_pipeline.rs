use std::sync::Arc;

use serde_json::json;
use training_insights::insights::{
    aggregate, filter_sessions, InsightsError, InsightsService, JsonFileSource, SessionQuery,
    SessionSource, ValidationError,
};

fn fixture_source() -> JsonFileSource {
    JsonFileSource::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/training-data.json"
    ))
}

fn service() -> InsightsService<JsonFileSource> {
    InsightsService::new(Arc::new(fixture_source()))
}

fn query(department: Option<&str>, start: Option<&str>, end: Option<&str>) -> SessionQuery {
    SessionQuery {
        department: department.map(str::to_string),
        start_date: start.map(str::to_string),
        end_date: end.map(str::to_string),
    }
}

#[tokio::test]
async fn unfiltered_fixture_produces_expected_summary() {
    let result = service()
        .get_insights(&SessionQuery::default())
        .await
        .expect("fixture aggregates");

    assert_eq!(
        result.metadata,
        json!({ "generatedAt": "2024-04-01T00:00:00Z", "version": "1.2" })
    );
    assert_eq!(result.total_sessions, 6);
    assert_eq!(result.pass_rate, 66.67);
    assert_eq!(result.average_completion_time, 35.0);
    assert_eq!(result.overall_skill_average, 38.79);

    let skills: Vec<(&str, f64)> = result
        .top_skills
        .iter()
        .map(|skill| (skill.skill.as_str(), skill.average))
        .collect();
    assert_eq!(
        skills,
        [
            ("communication", 77.33),
            ("negotiation", 36.0),
            ("problemSolving", 26.5),
            ("empathy", 15.33),
        ]
    );

    let trends: Vec<(&str, f64)> = result
        .performance_trends
        .iter()
        .map(|trend| (trend.date.as_str(), trend.average_score))
        .collect();
    assert_eq!(
        trends,
        [
            ("2024-03-01", 78.0),
            ("2024-03-02", 58.0),
            ("2024-03-03", 78.5),
            ("2024-03-04", 88.0),
        ]
    );
}

#[tokio::test]
async fn departments_group_by_exact_name_and_sort_ordinally() {
    let result = service()
        .get_insights(&SessionQuery::default())
        .await
        .expect("fixture aggregates");

    let departments: Vec<&str> = result
        .average_scores_by_department
        .iter()
        .map(|entry| entry.department.as_str())
        .collect();
    assert_eq!(departments, ["Engineering", "Sales", "Support", "sales"]);

    let engineering = serde_json::to_value(&result.average_scores_by_department[0])
        .expect("department serializes");
    assert_eq!(
        engineering,
        json!({
            "department": "Engineering",
            "average": 70.0,
            "passRate": 50.0,
            "communicationAvg": 67.0,
            "problemSolvingAvg": 79.5,
        })
    );
}

#[tokio::test]
async fn department_filter_is_case_insensitive_across_spellings() {
    let upper = service()
        .get_insights(&query(Some("SALES"), None, None))
        .await
        .expect("filter applies");
    let lower = service()
        .get_insights(&query(Some("sales"), None, None))
        .await
        .expect("filter applies");

    assert_eq!(upper, lower);
    assert_eq!(upper.total_sessions, 3);
    assert_eq!(upper.pass_rate, 66.67);
    assert_eq!(upper.average_completion_time, 41.67);
    assert_eq!(upper.average_scores_by_department.len(), 2);
}

#[tokio::test]
async fn inclusive_date_window() {
    let result = service()
        .get_insights(&query(None, Some("2024-03-02"), Some("2024-03-03")))
        .await
        .expect("range applies");

    assert_eq!(result.total_sessions, 3);
    assert_eq!(result.pass_rate, 33.33);
    assert_eq!(result.performance_trends.len(), 2);
    assert_eq!(result.performance_trends[0].date, "2024-03-02");
    assert_eq!(result.performance_trends[1].date, "2024-03-03");
}

#[tokio::test]
async fn window_outside_dataset_matches_empty_aggregation() {
    let dataset = fixture_source().load().await.expect("fixture loads");
    let filtered = filter_sessions(
        dataset.sessions,
        &query(None, Some("2030-01-01"), Some("2030-12-31")),
    )
    .expect("range is valid");
    assert!(filtered.is_empty());

    let via_service = service()
        .get_insights(&query(None, Some("2030-01-01"), Some("2030-12-31")))
        .await
        .expect("range applies");
    assert_eq!(via_service, aggregate(&[], &dataset.metadata));
}

#[tokio::test]
async fn malformed_dates_are_rejected_before_aggregation() {
    match service()
        .get_insights(&query(Some("Sales"), Some("03/01/2024"), None))
        .await
    {
        Err(InsightsError::Validation(err @ ValidationError::InvalidDateFormat { .. })) => {
            assert_eq!(err.to_string(), "startDate must be in YYYY-MM-DD format.")
        }
        other => panic!("expected date format error, got {other:?}"),
    }
}

#[tokio::test]
async fn bundled_sample_dataset_loads() {
    let source = JsonFileSource::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../data/training-data.json"
    ));
    let dataset = source.load().await.expect("sample dataset parses");
    assert!(!dataset.sessions.is_empty());
    assert!(dataset.metadata.get("version").is_some());
}
