use super::super::domain::DatasetMetadata;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: DatasetMetadata,
    pub total_sessions: usize,
    pub pass_rate: f64,
    pub average_completion_time: f64,
    pub overall_skill_average: f64,
    pub average_scores_by_department: Vec<DepartmentAverage>,
    pub top_skills: Vec<SkillAverage>,
    pub performance_trends: Vec<PerformanceTrend>,
}

impl AggregationResult {
    pub fn summary(&self) -> InsightsSummary {
        InsightsSummary {
            total_sessions: self.total_sessions,
            pass_rate: self.pass_rate,
            average_completion_time: self.average_completion_time,
            overall_skill_average: self.overall_skill_average,
        }
    }
}

/// Headline numbers only, as embedded in narrative responses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsSummary {
    pub total_sessions: usize,
    pub pass_rate: f64,
    pub average_completion_time: f64,
    pub overall_skill_average: f64,
}

/// Per-department figures. Serialized flat, one `<skill>Avg` field per skill
/// observed in the department.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentAverage {
    pub department: String,
    pub average: f64,
    pub pass_rate: f64,
    pub skill_averages: IndexMap<String, f64>,
}

impl Serialize for DepartmentAverage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3 + self.skill_averages.len()))?;
        map.serialize_entry("department", &self.department)?;
        map.serialize_entry("average", &self.average)?;
        map.serialize_entry("passRate", &self.pass_rate)?;
        for (skill, average) in &self.skill_averages {
            map.serialize_entry(&format!("{skill}Avg"), average)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillAverage {
    pub skill: String,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTrend {
    pub date: String,
    pub average_score: f64,
}
