use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

use super::client::{NarrativeError, NarrativeGenerator};
use super::prompt::build_prompt;
use crate::insights::{InsightsError, InsightsService, InsightsSummary, SessionQuery, SessionSource};

pub const NARRATIVE_VERSION: &str = "1.0";

/// Response body for natural-language insights.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NaturalLanguageInsights {
    pub metadata: NarrativeMetadata,
    pub summary: InsightsSummary,
    pub natural_language_insights: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeMetadata {
    pub generated_at: String,
    pub version: &'static str,
    pub filters: FilterLabels,
}

/// Active filters as echoed to clients; unset values read `all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterLabels {
    pub department: String,
    pub start_date: String,
    pub end_date: String,
}

impl FilterLabels {
    pub fn from_query(query: &SessionQuery) -> Self {
        let label = |value: Option<&str>| value.unwrap_or("all").to_string();
        Self {
            department: label(query.department()),
            start_date: label(query.start_date()),
            end_date: label(query.end_date()),
        }
    }
}

/// Runs the insights pipeline and narrates the result through `G`.
pub struct NarrativeService<S, G> {
    insights: Arc<InsightsService<S>>,
    generator: Arc<G>,
}

impl<S, G> NarrativeService<S, G>
where
    S: SessionSource + 'static,
    G: NarrativeGenerator + 'static,
{
    pub fn new(insights: Arc<InsightsService<S>>, generator: Arc<G>) -> Self {
        Self {
            insights,
            generator,
        }
    }

    /// Validation and data source errors surface before the generator is
    /// called.
    pub async fn generate(
        &self,
        query: &SessionQuery,
        generated_at: DateTime<Utc>,
    ) -> Result<NaturalLanguageInsights, NarrativeServiceError> {
        let insights = self.insights.get_insights(query).await?;
        let prompt = build_prompt(&insights, query);
        debug!(%prompt, "narrative prompt built");

        let narrative = self.generator.generate(&prompt).await?;

        Ok(NaturalLanguageInsights {
            metadata: NarrativeMetadata {
                generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                version: NARRATIVE_VERSION,
                filters: FilterLabels::from_query(query),
            },
            summary: insights.summary(),
            natural_language_insights: narrative.text,
        })
    }
}

/// Error raised by the narrative service.
#[derive(Debug, thiserror::Error)]
pub enum NarrativeServiceError {
    #[error(transparent)]
    Insights(#[from] InsightsError),
    #[error(transparent)]
    Generation(#[from] NarrativeError),
}
