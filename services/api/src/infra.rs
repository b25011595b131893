use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use training_insights::config::NarrativeConfig;
use training_insights::insights::{InsightsService, JsonFileSource};
use training_insights::narrative::{NarrativeService, OpenAiClient};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type Insights = InsightsService<JsonFileSource>;
pub(crate) type Narrative = NarrativeService<JsonFileSource, OpenAiClient>;

/// Builds the service graph once at startup; the generation client is shared
/// by every request.
pub(crate) fn build_services(
    sessions_path: PathBuf,
    narrative: NarrativeConfig,
) -> (Arc<Insights>, Arc<Narrative>) {
    let source = Arc::new(JsonFileSource::new(sessions_path));
    let insights = Arc::new(InsightsService::new(source));
    let client = Arc::new(OpenAiClient::new(narrative));
    let narrative = Arc::new(NarrativeService::new(insights.clone(), client));
    (insights, narrative)
}
