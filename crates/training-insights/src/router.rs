use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::insights::{InsightsError, InsightsService, SessionQuery, SessionSource};
use crate::narrative::{NarrativeError, NarrativeGenerator, NarrativeService, NarrativeServiceError};
use crate::problem::{instance_of, ProblemDetails};

pub const INSIGHTS_PATH: &str = "/api/v1/insights";
pub const NARRATIVE_PATH: &str = "/api/v1/natural-language-insights";

/// Shared handles for the reporting endpoints.
pub struct InsightsState<S, G> {
    insights: Arc<InsightsService<S>>,
    narrative: Arc<NarrativeService<S, G>>,
}

impl<S, G> Clone for InsightsState<S, G> {
    fn clone(&self) -> Self {
        Self {
            insights: Arc::clone(&self.insights),
            narrative: Arc::clone(&self.narrative),
        }
    }
}

/// Router builder exposing the reporting endpoints, the root redirect, and
/// the not-found fallback.
pub fn insights_router<S, G>(
    insights: Arc<InsightsService<S>>,
    narrative: Arc<NarrativeService<S, G>>,
) -> Router
where
    S: SessionSource + 'static,
    G: NarrativeGenerator + 'static,
{
    Router::new()
        .route("/", get(root_redirect))
        .route(INSIGHTS_PATH, get(insights_handler::<S, G>))
        .route(NARRATIVE_PATH, get(narrative_handler::<S, G>))
        .fallback(not_found_handler)
        .with_state(InsightsState {
            insights,
            narrative,
        })
}

pub(crate) async fn root_redirect() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, INSIGHTS_PATH)]).into_response()
}

pub(crate) async fn insights_handler<S, G>(
    State(state): State<InsightsState<S, G>>,
    uri: Uri,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Response
where
    S: SessionSource + 'static,
    G: NarrativeGenerator + 'static,
{
    let instance = instance_of(&uri);
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_problem(rejection, instance).into_response(),
    };

    match state.insights.get_insights(&query).await {
        Ok(result) => {
            info!(sessions = result.total_sessions, "insights generated");
            Json(result).into_response()
        }
        Err(err) => insights_problem(&err, "Failed to load insights", instance).into_response(),
    }
}

pub(crate) async fn narrative_handler<S, G>(
    State(state): State<InsightsState<S, G>>,
    uri: Uri,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Response
where
    S: SessionSource + 'static,
    G: NarrativeGenerator + 'static,
{
    let instance = instance_of(&uri);
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_problem(rejection, instance).into_response(),
    };

    match state.narrative.generate(&query, Utc::now()).await {
        Ok(body) => {
            info!(
                sessions = body.summary.total_sessions,
                "natural language insights generated"
            );
            Json(body).into_response()
        }
        Err(NarrativeServiceError::Insights(err)) => insights_problem(
            &err,
            "Failed to generate natural language insights",
            instance,
        )
        .into_response(),
        Err(NarrativeServiceError::Generation(err)) => {
            narrative_problem(&err, instance).into_response()
        }
    }
}

pub(crate) async fn not_found_handler(uri: Uri) -> Response {
    if uri.path().starts_with("/api") {
        return ProblemDetails::not_found(instance_of(&uri)).into_response();
    }

    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "status": 404,
            "detail": "The requested resource was not found",
        })),
    )
        .into_response()
}

fn query_problem(rejection: QueryRejection, instance: String) -> ProblemDetails {
    ProblemDetails::new(
        StatusCode::BAD_REQUEST,
        "Invalid Query Parameter",
        rejection.body_text(),
        instance,
    )
}

/// Validation failures pass through verbatim; data source failures are
/// logged and reported with a generic `internal_detail`.
fn insights_problem(err: &InsightsError, internal_detail: &str, instance: String) -> ProblemDetails {
    match err {
        InsightsError::Validation(validation) => ProblemDetails::new(
            StatusCode::BAD_REQUEST,
            validation.title(),
            validation.to_string(),
            instance,
        ),
        InsightsError::DataSource(source) => {
            error!(error = %source, %instance, "failed to load training data");
            ProblemDetails::internal(internal_detail, instance)
        }
    }
}

fn narrative_problem(err: &NarrativeError, instance: String) -> ProblemDetails {
    match err {
        NarrativeError::MissingApiKey => ProblemDetails::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Configuration Error",
            "OpenAI API key not configured. Please set OPENAI_API_KEY environment variable.",
            instance,
        ),
        NarrativeError::Authentication => {
            warn!(%instance, "text generation provider rejected credentials");
            ProblemDetails::new(
                StatusCode::UNAUTHORIZED,
                "Authentication Error",
                "Invalid OpenAI API key. Please check your configuration.",
                instance,
            )
        }
        NarrativeError::RateLimited { retry_after_secs } => {
            warn!(?retry_after_secs, %instance, "text generation provider rate limited");
            ProblemDetails::new(
                StatusCode::TOO_MANY_REQUESTS,
                "Rate Limit Exceeded",
                "OpenAI API rate limit exceeded. Please try again later.",
                instance,
            )
        }
        NarrativeError::Api { .. } | NarrativeError::Http(_) => {
            error!(error = %err, %instance, "natural language generation failed");
            ProblemDetails::internal("Failed to generate natural language insights", instance)
        }
    }
}
