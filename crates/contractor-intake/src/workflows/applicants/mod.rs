//! Contractor applicant intake, shortlist evaluation, and enrichment.
//!
//! Submissions pass through the [`guard`] into a [`CandidateRecord`]. The [`evaluation`]
//! rubric decides the shortlist verdict exactly once per record, shortlisted candidates are
//! published as [`ShortlistedLead`]s, and [`enrichment`] attaches a cosmetic summary and score.

pub mod compression;
pub mod domain;
pub mod enrichment;
pub mod evaluation;
pub mod experience;
pub mod guard;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use compression::{
    compress, decompress, decompress_value, fingerprint, verify_integrity, CompressedApplicant,
    CompressedBody, CompressionError, IntegrityReport,
};
pub use domain::{
    parse_lenient_date, ApplicationSubmission, CandidateId, CandidateProfile, CandidateRecord,
    Currency, PersonalDetails, SalaryPreference, ShortlistStatus, WorkEntry,
};
pub use enrichment::{
    CandidateEnricher, Enrichment, EnrichmentError, EnrichmentRecord, MockEnricher, ModelClient,
    PromptedEnricher,
};
pub use evaluation::{
    Criterion, CriterionResult, EligibilityEvaluator, EligibilityOutcome, ShortlistCriteria,
    ShortlistVerdict,
};
pub use experience::{total_years, ExperienceYears};
pub use guard::{IntakeGuard, IntakeViolation};
pub use intake::{finish, transition, IntakeAction, IntakeState, IntakeStep};
pub use repository::{
    ApplicantFilter, CandidateRepository, CandidateStatusView, PublishError, RepositoryError,
    ShortlistPublisher, ShortlistStatistics, ShortlistedLead,
};
pub use router::applicant_router;
pub use service::{
    ApplicantIntakeService, ApplicantServiceError, EnrichmentOutcome, EvaluationBatchSummary,
    ProfileUpdate,
};
