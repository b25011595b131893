//! Natural-language narration of aggregated insights via an external
//! text-generation provider.

pub mod client;
pub mod prompt;
pub mod service;

pub use client::{Narrative, NarrativeError, NarrativeGenerator, OpenAiClient, FALLBACK_NARRATIVE};
pub use prompt::{build_prompt, SYSTEM_PROMPT};
pub use service::{
    FilterLabels, NarrativeMetadata, NarrativeService, NarrativeServiceError,
    NaturalLanguageInsights,
};
