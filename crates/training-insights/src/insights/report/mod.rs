mod aggregate;
pub mod views;

pub use aggregate::aggregate;
pub use views::{
    AggregationResult, DepartmentAverage, InsightsSummary, PerformanceTrend, SkillAverage,
};
