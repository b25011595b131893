use super::super::domain::{parse_instant, DatasetMetadata, SessionRecord};
use super::views::{AggregationResult, DepartmentAverage, PerformanceTrend, SkillAverage};
use indexmap::IndexMap;
use std::cmp::Ordering;

#[derive(Debug, Default)]
struct DepartmentTotals {
    score_sum: f64,
    count: usize,
    passed: usize,
    skill_sums: IndexMap<String, f64>,
}

#[derive(Debug, Default)]
struct TrendTotals {
    score_sum: f64,
    count: usize,
}

/// Computes the statistical summary of `records`. Total: an empty slice
/// produces a zero-valued result.
///
/// Global skill averages divide by the total session count, not by the
/// number of sessions that carry the skill.
pub fn aggregate(records: &[SessionRecord], metadata: &DatasetMetadata) -> AggregationResult {
    let total_sessions = records.len();
    let passed = records.iter().filter(|record| record.passed).count();
    let pass_rate = percentage(passed, total_sessions);

    let average_scores_by_department = department_averages(records);

    let mut skill_sums: IndexMap<&str, f64> = IndexMap::new();
    for record in records {
        for (skill, score) in &record.skills {
            *skill_sums.entry(skill.as_str()).or_insert(0.0) += score;
        }
    }

    let mut top_skills: Vec<SkillAverage> = skill_sums
        .iter()
        .map(|(skill, total)| SkillAverage {
            skill: (*skill).to_string(),
            average: round2(mean(*total, total_sessions)),
        })
        .collect();
    // Stable: equal averages keep first-occurrence order.
    top_skills.sort_by(|a, b| b.average.partial_cmp(&a.average).unwrap_or(Ordering::Equal));

    let skill_score_total: f64 = skill_sums.values().sum();
    let overall_skill_average = round2(mean(skill_score_total, skill_sums.len() * total_sessions));

    let completion_total: f64 = records
        .iter()
        .map(|record| record.completion_time.unwrap_or(0.0))
        .sum();
    let average_completion_time = round2(mean(completion_total, total_sessions));

    AggregationResult {
        metadata: metadata.clone(),
        total_sessions,
        pass_rate,
        average_completion_time,
        overall_skill_average,
        average_scores_by_department,
        top_skills,
        performance_trends: performance_trends(records),
    }
}

fn department_averages(records: &[SessionRecord]) -> Vec<DepartmentAverage> {
    let mut totals: IndexMap<&str, DepartmentTotals> = IndexMap::new();
    for record in records {
        let entry = totals.entry(record.department.as_str()).or_default();
        entry.score_sum += record.overall_score;
        entry.count += 1;
        if record.passed {
            entry.passed += 1;
        }
        for (skill, score) in &record.skills {
            *entry.skill_sums.entry(skill.clone()).or_insert(0.0) += score;
        }
    }

    let mut departments: Vec<DepartmentAverage> = totals
        .into_iter()
        .map(|(department, totals)| DepartmentAverage {
            department: department.to_string(),
            average: round2(mean(totals.score_sum, totals.count)),
            pass_rate: percentage(totals.passed, totals.count),
            skill_averages: totals
                .skill_sums
                .into_iter()
                .map(|(skill, sum)| (skill, round2(mean(sum, totals.count))))
                .collect(),
        })
        .collect();

    // Ordinal (byte-wise) collation.
    departments.sort_by(|a, b| a.department.cmp(&b.department));
    departments
}

fn performance_trends(records: &[SessionRecord]) -> Vec<PerformanceTrend> {
    let mut by_date: IndexMap<&str, TrendTotals> = IndexMap::new();
    for record in records {
        let entry = by_date.entry(record.date.as_str()).or_default();
        entry.score_sum += record.overall_score;
        entry.count += 1;
    }

    let mut trends: Vec<PerformanceTrend> = by_date
        .into_iter()
        .map(|(date, totals)| PerformanceTrend {
            date: date.to_string(),
            average_score: round2(mean(totals.score_sum, totals.count)),
        })
        .collect();

    // Unreadable dates sort after every readable one.
    trends.sort_by_key(|trend| {
        let parsed = parse_instant(&trend.date);
        (parsed.is_none(), parsed)
    });
    trends
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    round2(mean(part as f64 * 100.0, whole))
}

/// Rounds half away from zero at two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
