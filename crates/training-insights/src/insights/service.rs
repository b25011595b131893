use std::sync::Arc;

use tracing::debug;

use super::filter::{filter_sessions, SessionQuery};
use super::report::{aggregate, AggregationResult};
use super::source::{DataSourceError, SessionSource};
use super::validation::ValidationError;

/// Service composing the data source, the session filter, and the aggregator.
pub struct InsightsService<S> {
    source: Arc<S>,
}

impl<S> InsightsService<S>
where
    S: SessionSource + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Load a fresh snapshot, filter it, and aggregate what remains.
    pub async fn get_insights(
        &self,
        query: &SessionQuery,
    ) -> Result<AggregationResult, InsightsError> {
        let dataset = self.source.load().await?;
        let available = dataset.sessions.len();
        let sessions = filter_sessions(dataset.sessions, query)?;

        debug!(
            available,
            matched = sessions.len(),
            department = query.department(),
            "sessions filtered"
        );

        Ok(aggregate(&sessions, &dataset.metadata))
    }
}

/// Error raised by the insights service.
#[derive(Debug, thiserror::Error)]
pub enum InsightsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}
