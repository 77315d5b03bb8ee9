//! Cosmetic, non-authoritative enrichment attached to a candidate after evaluation.
//!
//! The service only depends on [`CandidateEnricher`]. [`MockEnricher`] fabricates a templated
//! summary locally; [`PromptedEnricher`] drives any [`ModelClient`] with the recruiting analyst
//! prompt and parses its reply.

mod mock;
mod prompt;

pub use mock::{MockEnricher, FOLLOW_UP_POOL};
pub use prompt::{
    build_evaluation_prompt, parse_model_response, ModelClient, PromptedEnricher, SYSTEM_PROMPT,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::CandidateProfile;
use super::experience::ExperienceYears;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

/// Summary, quality score, data gaps, and follow-up questions for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub summary: String,
    pub score: u8,
    #[serde(default)]
    pub issues: Vec<String>,
    pub follow_ups: Vec<String>,
}

/// Enrichment as stored on the record, keyed by the profile fingerprint it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub enrichment: Enrichment,
    pub fingerprint: String,
    pub enriched_at: DateTime<Utc>,
}

/// Pluggable evaluation collaborator so a model-backed implementation can replace the mock.
pub trait CandidateEnricher: Send + Sync {
    fn enrich(
        &self,
        profile: &CandidateProfile,
        total_years: ExperienceYears,
    ) -> Result<Enrichment, EnrichmentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("enrichment backend unavailable: {0}")]
    Unavailable(String),
    #[error("enrichment response rejected: {0}")]
    InvalidResponse(String),
}
