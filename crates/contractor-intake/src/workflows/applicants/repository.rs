use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, CandidateRecord, ShortlistStatus};
use super::enrichment::{MAX_SCORE, MIN_SCORE};

/// Score at or above which an enriched candidate counts as a high scorer.
pub const HIGH_SCORE_THRESHOLD: u8 = 8;

impl CandidateRecord {
    pub fn evaluation_summary(&self) -> String {
        match &self.evaluation {
            Some(outcome) => outcome.summary(),
            None => "pending evaluation".to_string(),
        }
    }

    pub fn status_view(&self) -> CandidateStatusView {
        CandidateStatusView {
            candidate_id: self.id().clone(),
            full_name: self.profile.personal.full_name.clone(),
            status: self.status.label(),
            evaluation_summary: self.evaluation_summary(),
            total_years: self
                .evaluation
                .as_ref()
                .map(|outcome| outcome.total_years.as_f64()),
            score: self
                .enrichment
                .as_ref()
                .map(|record| record.enrichment.score),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait CandidateRepository: Send + Sync {
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError>;
    /// Apply `change` to the stored record as one atomic step and return the result. Every
    /// write after insertion goes through here, so concurrent callers never overwrite each
    /// other with stale copies.
    fn modify(
        &self,
        id: &CandidateId,
        change: &mut dyn FnMut(&mut CandidateRecord),
    ) -> Result<CandidateRecord, RepositoryError>;
    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError>;
    /// Every stored record in submission order.
    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError>;
    /// Records still awaiting evaluation, oldest first.
    fn pending(&self, limit: usize) -> Result<Vec<CandidateRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook receiving shortlisted leads (CRM tables, e-mail digests, queues).
pub trait ShortlistPublisher: Send + Sync {
    fn publish(&self, lead: ShortlistedLead) -> Result<(), PublishError>;
}

/// Lead emitted at most once per candidate, when it is first shortlisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortlistedLead {
    pub candidate_id: CandidateId,
    /// Pretty compressed JSON of the applicant at the time of shortlisting.
    pub compressed_json: String,
    pub score_reason: String,
    pub created_at: DateTime<Utc>,
    pub auto_generated: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("lead transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a candidate's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateStatusView {
    pub candidate_id: CandidateId,
    pub full_name: String,
    pub status: &'static str,
    pub evaluation_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_years: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

/// Listing filter: optional status plus a case-insensitive search over name, email, and employer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantFilter {
    #[serde(default)]
    pub status: Option<ShortlistStatus>,
    #[serde(default, rename = "q")]
    pub query: Option<String>,
}

impl ApplicantFilter {
    pub fn matches(&self, record: &CandidateRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }

        let needle = match self.query.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => needle.to_lowercase(),
            _ => return true,
        };

        let personal = &record.profile.personal;
        personal.full_name.to_lowercase().contains(&needle)
            || personal.email.to_lowercase().contains(&needle)
            || record
                .profile
                .experience
                .iter()
                .any(|entry| entry.company.to_lowercase().contains(&needle))
    }
}

/// Aggregate dashboard figures over every stored record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistStatistics {
    pub total_applicants: usize,
    pub total_evaluated: usize,
    pub total_shortlisted: usize,
    pub total_rejected: usize,
    /// Shortlisted over evaluated, as a percentage rounded to one decimal.
    pub shortlist_rate: f64,
    pub leads_created: usize,
    pub total_enriched: usize,
    pub average_score: f64,
    /// Count per score, keyed `"1"` through `"10"`.
    pub score_distribution: BTreeMap<String, usize>,
    pub high_scoring_candidates: usize,
}

impl ShortlistStatistics {
    pub fn from_records(records: &[CandidateRecord]) -> Self {
        let count = |status: ShortlistStatus| {
            records
                .iter()
                .filter(|record| record.status == status)
                .count()
        };

        let total_evaluated = records
            .iter()
            .filter(|record| record.evaluation.is_some())
            .count();
        let total_shortlisted = count(ShortlistStatus::Shortlisted);
        let total_rejected = count(ShortlistStatus::Rejected);

        let scores: Vec<u8> = records
            .iter()
            .filter_map(|record| record.enrichment.as_ref())
            .map(|record| record.enrichment.score)
            .collect();

        let average_score = if scores.is_empty() {
            0.0
        } else {
            let sum: u32 = scores.iter().map(|score| u32::from(*score)).sum();
            round_one_decimal(f64::from(sum) / scores.len() as f64)
        };

        let score_distribution = (MIN_SCORE..=MAX_SCORE)
            .map(|score| {
                let hits = scores.iter().filter(|value| **value == score).count();
                (score.to_string(), hits)
            })
            .collect();

        Self {
            total_applicants: records.len(),
            total_evaluated,
            total_shortlisted,
            total_rejected,
            shortlist_rate: round_one_decimal(
                total_shortlisted as f64 / total_evaluated.max(1) as f64 * 100.0,
            ),
            leads_created: records.iter().filter(|record| record.lead_published).count(),
            total_enriched: scores.len(),
            average_score,
            score_distribution,
            high_scoring_candidates: scores
                .iter()
                .filter(|score| **score >= HIGH_SCORE_THRESHOLD)
                .count(),
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
