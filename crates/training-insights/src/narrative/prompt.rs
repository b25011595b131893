use super::service::FilterLabels;
use crate::insights::{AggregationResult, SessionQuery};

/// System instruction sent alongside every narrative prompt.
pub const SYSTEM_PROMPT: &str = "You are a business analyst specializing in training performance insights. Provide clear, actionable insights based on training data.";

const INSTRUCTIONS: &str = ", provide natural language insights in a short paragraph that would be valuable for business stakeholders. \
Focus on trends, improvements, areas of concern, and actionable recommendations. \
Use natural business language and include specific numbers and percentages where relevant. \
Make the insights conversational and easy to understand for non-technical audiences.";

/// Renders the user prompt for `insights`, scoped by the active `filters`.
/// Deterministic: the same inputs always produce the same text.
pub fn build_prompt(insights: &AggregationResult, filters: &SessionQuery) -> String {
    let mut context = String::from("Based on the following training performance data");

    if let Some(department) = filters.department() {
        context.push_str(&format!(" for the {department} department"));
    }

    match (filters.start_date(), filters.end_date()) {
        (Some(start), Some(end)) => context.push_str(&format!(" from {start} to {end}")),
        (Some(start), None) => context.push_str(&format!(" from {start} onwards")),
        (None, Some(end)) => context.push_str(&format!(" up to {end}")),
        (None, None) => {}
    }

    context.push_str(INSTRUCTIONS);
    let labels = FilterLabels::from_query(filters);

    let departments = insights
        .average_scores_by_department
        .iter()
        .map(|dept| {
            format!(
                "- {}: {}% average score, {}% pass rate",
                dept.department, dept.average, dept.pass_rate
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let skills = insights
        .top_skills
        .iter()
        .map(|skill| format!("- {}: {}% average", skill.skill, skill.average))
        .collect::<Vec<_>>()
        .join("\n");

    let trends = insights
        .performance_trends
        .iter()
        .map(|trend| format!("- {}: {}% average score", trend.date, trend.average_score))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{context}\n\n\
Training Data Summary:\n\
- Filters: department {department}, start date {start}, end date {end}\n\
- Total Sessions: {total}\n\
- Overall Pass Rate: {pass_rate}%\n\
- Average Completion Time: {completion} minutes\n\
- Overall Skill Average: {skill_avg}%\n\n\
Department Performance:\n{departments}\n\n\
Top Skills:\n{skills}\n\n\
Performance Trends:\n{trends}\n\n\
Please provide natural language insights based on this data:",
        department = labels.department,
        start = labels.start_date,
        end = labels.end_date,
        total = insights.total_sessions,
        pass_rate = insights.pass_rate,
        completion = insights.average_completion_time,
        skill_avg = insights.overall_skill_average,
    )
}
