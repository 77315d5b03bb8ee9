mod config;
mod policy;
mod rules;

pub use config::{ShortlistCriteria, DEFAULT_ALLOWED_LOCATIONS, DEFAULT_TIER_ONE_EMPLOYERS};
pub use policy::ShortlistVerdict;

use chrono::NaiveDate;
use policy::{decide_verdict, evaluation_summary, shortlist_reason};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, CandidateProfile};
use super::experience::ExperienceYears;

/// Stateless evaluator applying the shortlist rubric to a profile.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEvaluator {
    criteria: ShortlistCriteria,
}

impl EligibilityEvaluator {
    pub fn new(criteria: ShortlistCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &ShortlistCriteria {
        &self.criteria
    }

    /// Evaluate the three clauses against a single `now` snapshot. Never fails: missing or
    /// malformed data only makes the affected clause fail.
    pub fn evaluate(&self, profile: &CandidateProfile, now: NaiveDate) -> EligibilityOutcome {
        let (criteria, signals) = rules::evaluate_clauses(profile, &self.criteria, now);
        let verdict = decide_verdict(&criteria);

        EligibilityOutcome {
            candidate_id: profile.candidate_id.clone(),
            verdict,
            total_years: signals.total_years,
            tier_one_companies: signals.tier_one_companies,
            criteria,
        }
    }

    /// Human readable reason used when publishing a shortlisted lead.
    pub fn shortlist_reason(
        &self,
        profile: &CandidateProfile,
        outcome: &EligibilityOutcome,
    ) -> String {
        shortlist_reason(profile, &outcome.criteria)
    }
}

/// Rubric clause identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Experience,
    Compensation,
    Location,
}

impl Criterion {
    pub const fn label(self) -> &'static str {
        match self {
            Criterion::Experience => "Experience",
            Criterion::Compensation => "Compensation",
            Criterion::Location => "Location",
        }
    }
}

/// Pass/fail for one clause plus the reason shown to reviewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion: Criterion,
    pub passed: bool,
    pub reason: String,
}

/// Verdict, aggregate experience, and the per-clause trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub candidate_id: CandidateId,
    pub verdict: ShortlistVerdict,
    pub total_years: ExperienceYears,
    pub tier_one_companies: Vec<String>,
    pub criteria: Vec<CriterionResult>,
}

impl EligibilityOutcome {
    pub fn summary(&self) -> String {
        evaluation_summary(&self.criteria, self.verdict)
    }

    pub fn criterion(&self, criterion: Criterion) -> Option<&CriterionResult> {
        self.criteria
            .iter()
            .find(|result| result.criterion == criterion)
    }
}
