//! Training session reporting: query validation, filtering, and aggregation
//! over a swappable session data source.

pub mod domain;
pub mod filter;
pub mod report;
pub mod service;
pub mod source;
pub mod validation;

pub use domain::{DatasetMetadata, SessionRecord, TrainingDataset};
pub use filter::{filter_sessions, SessionQuery};
pub use report::{
    aggregate, AggregationResult, DepartmentAverage, InsightsSummary, PerformanceTrend,
    SkillAverage,
};
pub use service::{InsightsError, InsightsService};
pub use source::{DataSourceError, InMemorySessionSource, JsonFileSource, SessionSource};
pub use validation::{validate_date_range, DateField, DateRangeFilter, ValidationError};
