use chrono::{DateTime, Utc};

use super::domain::{
    ApplicationSubmission, CandidateId, CandidateProfile, PersonalDetails, SalaryPreference,
    WorkEntry,
};

pub const MAX_WEEKLY_HOURS: f64 = 168.0;

/// Validation errors raised before a candidate record is constructed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("full name is required")]
    MissingName,
    #[error("email {0:?} is not a valid address")]
    InvalidEmail(String),
    #[error("location is required")]
    MissingLocation,
    #[error("work entry {index} is missing a company or title")]
    IncompleteWorkEntry { index: usize },
    #[error("no work entry at position {index}")]
    UnknownWorkEntry { index: usize },
    #[error("{field} must be greater than zero (found {found})")]
    NonPositiveRate { field: &'static str, found: f64 },
    #[error("minimum rate {minimum} exceeds preferred rate {preferred}")]
    MinimumAbovePreferred { minimum: f64, preferred: f64 },
    #[error("availability must be within (0, 168] hours per week (found {0})")]
    AvailabilityOutOfRange(f64),
    #[error("{0} must be completed before continuing")]
    IncompleteStep(&'static str),
    #[error("the review step has no next step; submit the application instead")]
    NoNextStep,
}

/// Guard producing [`CandidateProfile`] values from raw submissions.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn profile_from_submission(
        &self,
        submission: ApplicationSubmission,
        candidate_id: CandidateId,
        submitted_at: DateTime<Utc>,
    ) -> Result<CandidateProfile, IntakeViolation> {
        self.validate(&submission)?;

        let ApplicationSubmission {
            personal,
            experience,
            salary,
        } = submission;

        Ok(CandidateProfile {
            candidate_id,
            personal: PersonalDetails {
                full_name: personal.full_name.trim().to_string(),
                email: personal.email.trim().to_string(),
                location: personal.location.trim().to_string(),
                linkedin: personal
                    .linkedin
                    .map(|link| link.trim().to_string())
                    .filter(|link| !link.is_empty()),
            },
            experience,
            salary,
            submitted_at,
        })
    }

    pub fn validate(&self, submission: &ApplicationSubmission) -> Result<(), IntakeViolation> {
        validate_personal(&submission.personal)?;
        for (index, entry) in submission.experience.iter().enumerate() {
            validate_work_entry(index, entry)?;
        }
        validate_salary(&submission.salary)
    }
}

pub fn validate_personal(personal: &PersonalDetails) -> Result<(), IntakeViolation> {
    if personal.full_name.trim().is_empty() {
        return Err(IntakeViolation::MissingName);
    }
    if !is_email_shaped(&personal.email) {
        return Err(IntakeViolation::InvalidEmail(personal.email.clone()));
    }
    if personal.location.trim().is_empty() {
        return Err(IntakeViolation::MissingLocation);
    }
    Ok(())
}

pub fn validate_work_entry(index: usize, entry: &WorkEntry) -> Result<(), IntakeViolation> {
    if entry.company.trim().is_empty() || entry.title.trim().is_empty() {
        return Err(IntakeViolation::IncompleteWorkEntry { index });
    }
    Ok(())
}

pub fn validate_salary(salary: &SalaryPreference) -> Result<(), IntakeViolation> {
    // NaN fails every comparison, so `!(x > 0.0)` rejects it too.
    if !(salary.preferred_rate > 0.0) {
        return Err(IntakeViolation::NonPositiveRate {
            field: "preferred rate",
            found: salary.preferred_rate,
        });
    }
    if !(salary.minimum_rate > 0.0) {
        return Err(IntakeViolation::NonPositiveRate {
            field: "minimum rate",
            found: salary.minimum_rate,
        });
    }
    if salary.minimum_rate > salary.preferred_rate {
        return Err(IntakeViolation::MinimumAbovePreferred {
            minimum: salary.minimum_rate,
            preferred: salary.preferred_rate,
        });
    }
    let hours = salary.availability_hours_per_week;
    if !(hours > 0.0 && hours <= MAX_WEEKLY_HOURS) {
        return Err(IntakeViolation::AvailabilityOutOfRange(hours));
    }
    Ok(())
}

fn is_email_shaped(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
