use serde::{Deserialize, Serialize};

use super::super::domain::{CandidateProfile, ShortlistStatus};
use super::CriterionResult;

/// Binary outcome of the shortlist rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortlistVerdict {
    Shortlisted,
    Rejected,
}

impl ShortlistVerdict {
    pub const fn label(self) -> &'static str {
        match self {
            ShortlistVerdict::Shortlisted => "shortlisted",
            ShortlistVerdict::Rejected => "rejected",
        }
    }

    pub const fn status(self) -> ShortlistStatus {
        match self {
            ShortlistVerdict::Shortlisted => ShortlistStatus::Shortlisted,
            ShortlistVerdict::Rejected => ShortlistStatus::Rejected,
        }
    }
}

pub(crate) fn decide_verdict(criteria: &[CriterionResult]) -> ShortlistVerdict {
    if !criteria.is_empty() && criteria.iter().all(|result| result.passed) {
        ShortlistVerdict::Shortlisted
    } else {
        ShortlistVerdict::Rejected
    }
}

/// PASS/FAIL breakdown stored alongside the verdict.
pub(crate) fn evaluation_summary(
    criteria: &[CriterionResult],
    verdict: ShortlistVerdict,
) -> String {
    let mut lines = vec!["Evaluation Summary:".to_string()];
    for result in criteria {
        let status = if result.passed { "PASS" } else { "FAIL" };
        lines.push(format!(
            "- {}: {} - {}",
            result.criterion.label(),
            status,
            result.reason
        ));
    }
    lines.push(String::new());
    lines.push(format!("Final Status: {}", verdict.label().to_ascii_uppercase()));
    lines.join("\n")
}

/// Reason attached to a shortlisted lead.
pub(crate) fn shortlist_reason(profile: &CandidateProfile, criteria: &[CriterionResult]) -> String {
    let mut lines = vec![
        format!("Candidate: {}", profile.personal.full_name),
        format!("Location: {}", profile.personal.location),
        format!(
            "Rate: ${}/hr {}",
            profile.salary.preferred_rate, profile.salary.currency
        ),
        format!(
            "Availability: {} hrs/week",
            profile.salary.availability_hours_per_week
        ),
        String::new(),
        "Qualification Details:".to_string(),
    ];
    for result in criteria {
        lines.push(format!("- {}: {}", result.criterion.label(), result.reason));
    }
    lines.join("\n")
}
