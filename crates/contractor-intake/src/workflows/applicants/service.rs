use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::compression::{
    compress, decompress, fingerprint, verify_integrity, CompressionError, IntegrityReport,
};
use super::domain::{ApplicationSubmission, CandidateId, CandidateRecord, ShortlistStatus};
use super::enrichment::{CandidateEnricher, EnrichmentError, EnrichmentRecord};
use super::evaluation::{
    EligibilityEvaluator, EligibilityOutcome, ShortlistCriteria, ShortlistVerdict,
};
use super::guard::{IntakeGuard, IntakeViolation};
use super::intake::{finish, IntakeState};
use super::repository::{
    ApplicantFilter, CandidateRepository, PublishError, RepositoryError, ShortlistPublisher,
    ShortlistStatistics, ShortlistedLead,
};

/// Service composing the intake guard, evaluator, repository, lead publisher, and enricher.
pub struct ApplicantIntakeService<R, P, E> {
    guard: Arc<IntakeGuard>,
    evaluator: Arc<EligibilityEvaluator>,
    repository: Arc<R>,
    publisher: Arc<P>,
    enricher: Arc<E>,
}

static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_candidate_id() -> CandidateId {
    let id = CANDIDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidateId(format!("cand-{id:06}"))
}

impl<R, P, E> ApplicantIntakeService<R, P, E>
where
    R: CandidateRepository + 'static,
    P: ShortlistPublisher + 'static,
    E: CandidateEnricher + 'static,
{
    pub fn new(
        repository: Arc<R>,
        publisher: Arc<P>,
        enricher: Arc<E>,
        criteria: ShortlistCriteria,
    ) -> Self {
        Self {
            guard: Arc::new(IntakeGuard),
            evaluator: Arc::new(EligibilityEvaluator::new(criteria)),
            repository,
            publisher,
            enricher,
        }
    }

    pub fn evaluator(&self) -> &EligibilityEvaluator {
        &self.evaluator
    }

    /// Validate and store a new application with status `pending`.
    pub fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<CandidateRecord, ApplicantServiceError> {
        self.submit_at(submission, Utc::now())
    }

    pub fn submit_at(
        &self,
        submission: ApplicationSubmission,
        submitted_at: DateTime<Utc>,
    ) -> Result<CandidateRecord, ApplicantServiceError> {
        let candidate_id = next_candidate_id();
        let profile = self
            .guard
            .profile_from_submission(submission, candidate_id, submitted_at)?;

        let stored = self.repository.insert(CandidateRecord::new(profile))?;
        info!(
            candidate_id = %stored.id(),
            experience_entries = stored.profile.experience.len(),
            "applicant submitted"
        );
        Ok(stored)
    }

    /// Submit a completed multi-step form.
    pub fn submit_intake(
        &self,
        state: IntakeState,
    ) -> Result<CandidateRecord, ApplicantServiceError> {
        let submission = finish(state)?;
        self.submit(submission)
    }

    /// Evaluate a candidate once. Later calls return the stored outcome; a shortlisted record
    /// whose lead never reached the publisher gets another publication attempt.
    ///
    /// The lead is claimed on the stored record before publishing, so concurrent callers
    /// publish at most one lead per candidate.
    pub fn evaluate(
        &self,
        candidate_id: &CandidateId,
        now: DateTime<Utc>,
    ) -> Result<EligibilityOutcome, ApplicantServiceError> {
        let today = now.date_naive();
        let mut recorded = false;
        let record = self
            .repository
            .modify(candidate_id, &mut |current: &mut CandidateRecord| {
                if current.evaluation.is_none() {
                    let outcome = self.evaluator.evaluate(&current.profile, today);
                    current.status = outcome.verdict.status();
                    current.evaluation = Some(outcome);
                    recorded = true;
                }
            })?;
        let outcome = record
            .evaluation
            .clone()
            .ok_or(RepositoryError::NotFound)?;

        if recorded {
            info!(
                candidate_id = %candidate_id,
                verdict = outcome.verdict.label(),
                total_years = %outcome.total_years,
                "applicant evaluated"
            );
        } else {
            debug!(candidate_id = %candidate_id, "evaluation already recorded");
        }

        if outcome.verdict == ShortlistVerdict::Shortlisted && !record.lead_published {
            self.publish_once(candidate_id, now)?;
        }

        Ok(outcome)
    }

    /// Evaluate every pending record. Individual failures are logged and counted, never fatal.
    pub fn evaluate_pending(
        &self,
        now: DateTime<Utc>,
    ) -> Result<EvaluationBatchSummary, ApplicantServiceError> {
        let pending = self.repository.pending(usize::MAX)?;
        let mut summary = EvaluationBatchSummary::default();

        for record in pending {
            match self.evaluate(record.id(), now) {
                Ok(outcome) => {
                    summary.evaluated += 1;
                    match outcome.verdict {
                        ShortlistVerdict::Shortlisted => summary.shortlisted += 1,
                        ShortlistVerdict::Rejected => summary.rejected += 1,
                    }
                }
                Err(error) => {
                    summary.failed += 1;
                    warn!(candidate_id = %record.id(), %error, "evaluation failed");
                }
            }
        }

        info!(
            evaluated = summary.evaluated,
            shortlisted = summary.shortlisted,
            rejected = summary.rejected,
            failed = summary.failed,
            "batch evaluation complete"
        );
        Ok(summary)
    }

    /// Attach enrichment to an evaluated candidate, skipping the enricher when the profile
    /// fingerprint matches the one already stored.
    pub fn enrich(
        &self,
        candidate_id: &CandidateId,
        now: DateTime<Utc>,
    ) -> Result<EnrichmentOutcome, ApplicantServiceError> {
        let record = self
            .repository
            .fetch(candidate_id)?
            .ok_or(RepositoryError::NotFound)?;

        let total_years = match &record.evaluation {
            Some(outcome) => outcome.total_years,
            None => return Err(ApplicantServiceError::NotEvaluated(candidate_id.clone())),
        };

        let current = fingerprint(&record.profile)?;
        if let Some(existing) = &record.enrichment {
            if existing.fingerprint == current {
                debug!(candidate_id = %candidate_id, "profile unchanged, enrichment skipped");
                return Ok(EnrichmentOutcome::Unchanged(existing.clone()));
            }
        }

        let enrichment = self.enricher.enrich(&record.profile, total_years)?;
        let stored = EnrichmentRecord {
            enrichment,
            fingerprint: current,
            enriched_at: now,
        };
        self.repository
            .modify(candidate_id, &mut |latest: &mut CandidateRecord| {
                latest.enrichment = Some(stored.clone());
            })?;

        info!(
            candidate_id = %candidate_id,
            score = stored.enrichment.score,
            issues = stored.enrichment.issues.len(),
            "applicant enriched"
        );
        Ok(EnrichmentOutcome::Fresh(stored))
    }

    /// Replace a candidate's profile from its compressed JSON and report which sections the
    /// stored profile reproduces. A changed profile drops the recorded evaluation and returns
    /// the candidate to `pending`; stored enrichment stays until its fingerprint is refreshed.
    /// The lead flag is kept, so an edited candidate never produces a second lead.
    pub fn apply_compressed(
        &self,
        candidate_id: &CandidateId,
        raw: &str,
    ) -> Result<ProfileUpdate, ApplicantServiceError> {
        let existing = self
            .repository
            .fetch(candidate_id)?
            .ok_or(RepositoryError::NotFound)?;

        let applicant = decompress(raw)?;
        let profile = self.guard.profile_from_submission(
            applicant.body.clone().into_submission(),
            candidate_id.clone(),
            existing.profile.submitted_at,
        )?;
        let integrity = verify_integrity(&applicant.body, &profile);

        let mut changed = false;
        let record = self
            .repository
            .modify(candidate_id, &mut |current: &mut CandidateRecord| {
                if current.profile != profile {
                    current.profile = profile.clone();
                    current.status = ShortlistStatus::Pending;
                    current.evaluation = None;
                    changed = true;
                }
            })?;

        if !integrity.is_intact() {
            warn!(
                candidate_id = %candidate_id,
                personal = integrity.personal,
                experience = integrity.experience,
                salary = integrity.salary,
                "compressed applicant does not match stored sections"
            );
        }
        info!(candidate_id = %candidate_id, changed, "applicant profile applied");
        Ok(ProfileUpdate {
            record,
            integrity,
            changed,
        })
    }

    pub fn get(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<CandidateRecord, ApplicantServiceError> {
        let record = self
            .repository
            .fetch(candidate_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(
        &self,
        filter: &ApplicantFilter,
    ) -> Result<Vec<CandidateRecord>, ApplicantServiceError> {
        Ok(self
            .repository
            .all()?
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect())
    }

    pub fn statistics(&self) -> Result<ShortlistStatistics, ApplicantServiceError> {
        let records = self.repository.all()?;
        Ok(ShortlistStatistics::from_records(&records))
    }

    /// Claim the lead flag, publish, and release the claim if publication fails.
    fn publish_once(
        &self,
        candidate_id: &CandidateId,
        now: DateTime<Utc>,
    ) -> Result<(), ApplicantServiceError> {
        let mut claimed = None;
        let record = self
            .repository
            .modify(candidate_id, &mut |current: &mut CandidateRecord| {
                if current.lead_published {
                    return;
                }
                if let Some(outcome) = current
                    .evaluation
                    .as_ref()
                    .filter(|outcome| outcome.verdict == ShortlistVerdict::Shortlisted)
                {
                    claimed = Some(outcome.clone());
                    current.lead_published = true;
                }
            })?;

        let Some(outcome) = claimed else {
            debug!(candidate_id = %candidate_id, "lead already claimed");
            return Ok(());
        };

        if let Err(error) = self.publish_lead(&record, &outcome, now) {
            self.repository
                .modify(candidate_id, &mut |current: &mut CandidateRecord| {
                    current.lead_published = false;
                })?;
            return Err(error);
        }
        Ok(())
    }

    fn publish_lead(
        &self,
        record: &CandidateRecord,
        outcome: &EligibilityOutcome,
        now: DateTime<Utc>,
    ) -> Result<(), ApplicantServiceError> {
        let lead = ShortlistedLead {
            candidate_id: record.id().clone(),
            compressed_json: compress(&record.profile, now)?,
            score_reason: self.evaluator.shortlist_reason(&record.profile, outcome),
            created_at: now,
            auto_generated: true,
        };
        self.publisher.publish(lead)?;
        info!(candidate_id = %record.id(), "shortlisted lead published");
        Ok(())
    }
}

/// Counts reported by [`ApplicantIntakeService::evaluate_pending`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationBatchSummary {
    pub evaluated: usize,
    pub shortlisted: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Result of [`ApplicantIntakeService::apply_compressed`].
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub record: CandidateRecord,
    pub integrity: IntegrityReport,
    /// False when the payload reproduced the stored profile exactly.
    pub changed: bool,
}

/// Result of an enrichment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    Fresh(EnrichmentRecord),
    /// Profile fingerprint matched; the stored enrichment is returned untouched.
    Unchanged(EnrichmentRecord),
}

impl EnrichmentOutcome {
    pub fn record(&self) -> &EnrichmentRecord {
        match self {
            EnrichmentOutcome::Fresh(record) | EnrichmentOutcome::Unchanged(record) => record,
        }
    }

    pub const fn was_skipped(&self) -> bool {
        matches!(self, EnrichmentOutcome::Unchanged(_))
    }
}

/// Error raised by the applicant service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicantServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),
    #[error(transparent)]
    Compression(#[from] CompressionError),
    #[error("candidate {0} has not been evaluated yet")]
    NotEvaluated(CandidateId),
}
