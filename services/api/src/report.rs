use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use training_insights::config::AppConfig;
use training_insights::error::AppError;
use training_insights::insights::{
    AggregationResult, InsightsService, JsonFileSource, SessionQuery,
};
use training_insights::narrative::{build_prompt, SYSTEM_PROMPT};

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Restrict the report to one department (case-insensitive)
    #[arg(long)]
    pub(crate) department: Option<String>,
    /// Inclusive lower bound (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) start_date: Option<String>,
    /// Inclusive upper bound (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) end_date: Option<String>,
    /// Training data JSON file (defaults to TRAINING_DATA_PATH)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Print the aggregation as JSON instead of text
    #[arg(long, conflicts_with = "prompt")]
    pub(crate) json: bool,
    /// Print the narrative prompt that would be sent to the model
    #[arg(long)]
    pub(crate) prompt: bool,
}

pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        department,
        start_date,
        end_date,
        data,
        json,
        prompt,
    } = args;

    let path = match data {
        Some(path) => path,
        None => AppConfig::load()?.data.sessions_path,
    };
    let query = SessionQuery {
        department,
        start_date,
        end_date,
    };

    let service = InsightsService::new(Arc::new(JsonFileSource::new(path)));
    let result = service.get_insights(&query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if prompt {
        println!("System: {SYSTEM_PROMPT}\n");
        println!("{}", build_prompt(&result, &query));
    } else {
        print!("{}", render_report(&result, &query));
    }
    Ok(())
}

pub(crate) fn render_report(result: &AggregationResult, query: &SessionQuery) -> String {
    let mut lines = vec![
        "Training insights report".to_string(),
        format!(
            "Filters: department {}, from {}, to {}",
            query.department().unwrap_or("all"),
            query.start_date().unwrap_or("all"),
            query.end_date().unwrap_or("all"),
        ),
        String::new(),
        format!("Sessions: {}", result.total_sessions),
        format!("Pass rate: {}%", result.pass_rate),
        format!(
            "Average completion time: {} minutes",
            result.average_completion_time
        ),
        format!("Overall skill average: {}", result.overall_skill_average),
    ];

    if result.average_scores_by_department.is_empty() {
        lines.push("\nDepartments: none".to_string());
    } else {
        lines.push("\nDepartments".to_string());
        for dept in &result.average_scores_by_department {
            lines.push(format!(
                "- {}: {} average, {}% pass rate",
                dept.department, dept.average, dept.pass_rate
            ));
        }
    }

    if result.top_skills.is_empty() {
        lines.push("\nTop skills: none".to_string());
    } else {
        lines.push("\nTop skills".to_string());
        for skill in &result.top_skills {
            lines.push(format!("- {}: {}", skill.skill, skill.average));
        }
    }

    if result.performance_trends.is_empty() {
        lines.push("\nTrends: none".to_string());
    } else {
        lines.push("\nTrends".to_string());
        for trend in &result.performance_trends {
            lines.push(format!("- {}: {}", trend.date, trend.average_score));
        }
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use training_insights::insights::aggregate;

    fn fixture_service() -> InsightsService<JsonFileSource> {
        InsightsService::new(Arc::new(JsonFileSource::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../crates/training-insights/tests/fixtures/training-data.json"
        ))))
    }

    #[tokio::test]
    async fn render_lists_each_section() {
        let query = SessionQuery {
            department: Some("Support".to_string()),
            ..SessionQuery::default()
        };
        let result = fixture_service()
            .get_insights(&query)
            .await
            .expect("fixture aggregates");
        let rendered = render_report(&result, &query);

        assert!(rendered.contains("Filters: department Support, from all, to all"));
        assert!(rendered.contains("Sessions: 1"));
        assert!(rendered.contains("- Support:"));
        assert!(rendered.contains("\nTop skills\n- communication: 95\n- empathy: 92\n"));
    }

    #[test]
    fn render_marks_empty_sections() {
        let result = aggregate(&[], &serde_json::Value::Null);
        let rendered = render_report(&result, &SessionQuery::default());

        assert!(rendered.contains("Sessions: 0"));
        assert!(rendered.contains("Departments: none"));
        assert!(rendered.contains("Top skills: none"));
        assert!(rendered.contains("Trends: none"));
    }

    #[tokio::test]
    async fn report_surfaces_validation_errors() {
        let args = ReportArgs {
            start_date: Some("2024/03/01".to_string()),
            data: Some(PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../../crates/training-insights/tests/fixtures/training-data.json"
            ))),
            ..ReportArgs::default()
        };

        match run_report(args).await {
            Err(AppError::Insights(err)) => {
                assert_eq!(err.to_string(), "startDate must be in YYYY-MM-DD format.")
            }
            other => panic!("expected insights error, got {other:?}"),
        }
    }
}
