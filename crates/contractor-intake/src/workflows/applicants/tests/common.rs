use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::applicants::domain::{
    ApplicationSubmission, CandidateId, CandidateProfile, CandidateRecord, Currency,
    PersonalDetails, SalaryPreference, WorkEntry,
};
use crate::workflows::applicants::enrichment::{CandidateEnricher, Enrichment, EnrichmentError};
use crate::workflows::applicants::experience::ExperienceYears;
use crate::workflows::applicants::repository::{
    CandidateRepository, PublishError, RepositoryError, ShortlistPublisher, ShortlistedLead,
};
use crate::workflows::applicants::{
    applicant_router, ApplicantIntakeService, EligibilityEvaluator, ShortlistCriteria,
};

pub(super) fn date(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid date")
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn entry(company: &str, start: NaiveDate, end: Option<NaiveDate>) -> WorkEntry {
    WorkEntry {
        company: company.to_string(),
        title: "Backend Engineer".to_string(),
        start_date: Some(start),
        end_date: end,
        current: end.is_none(),
        technologies: vec!["Rust".to_string(), "Postgres".to_string()],
    }
}

pub(super) fn salary(currency: Currency, rate: f64, hours: f64) -> SalaryPreference {
    SalaryPreference {
        preferred_rate: rate,
        minimum_rate: rate * 0.8,
        currency,
        availability_hours_per_week: hours,
    }
}

pub(super) fn submission(
    location: &str,
    experience: Vec<WorkEntry>,
    salary: SalaryPreference,
) -> ApplicationSubmission {
    ApplicationSubmission {
        personal: PersonalDetails {
            full_name: "Lena Fischer".to_string(),
            email: "lena.fischer@example.com".to_string(),
            location: location.to_string(),
            linkedin: Some("https://www.linkedin.com/in/lena-fischer".to_string()),
        },
        experience,
        salary,
    }
}

/// Five years at Stripe, USD at $90/hr, 25 hrs/week, based in Berlin.
pub(super) fn shortlisted_submission() -> ApplicationSubmission {
    submission(
        "Berlin, Germany",
        vec![entry("Stripe", date(2019, 1), Some(date(2024, 1)))],
        salary(Currency::Usd, 90.0, 25.0),
    )
}

/// Two years at a non tier-1 employer.
pub(super) fn junior_submission() -> ApplicationSubmission {
    submission(
        "USA",
        vec![entry("Acme Corp", date(2022, 1), Some(date(2024, 1)))],
        salary(Currency::Usd, 90.0, 25.0),
    )
}

/// Five years at Google but asking to be paid in EUR.
pub(super) fn euro_submission() -> ApplicationSubmission {
    submission(
        "USA",
        vec![entry("Google", date(2019, 1), Some(date(2024, 1)))],
        salary(Currency::Eur, 90.0, 25.0),
    )
}

pub(super) fn profile(submission: ApplicationSubmission) -> CandidateProfile {
    CandidateProfile {
        candidate_id: CandidateId("cand-fixture".to_string()),
        personal: submission.personal,
        experience: submission.experience,
        salary: submission.salary,
        submitted_at: now(),
    }
}

pub(super) fn evaluator() -> EligibilityEvaluator {
    EligibilityEvaluator::new(ShortlistCriteria::default())
}

pub(super) type TestService =
    ApplicantIntakeService<MemoryRepository, MemoryPublisher, FixedEnricher>;

pub(super) fn build_service() -> (
    TestService,
    Arc<MemoryRepository>,
    Arc<MemoryPublisher>,
    Arc<FixedEnricher>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let publisher = Arc::new(MemoryPublisher::default());
    let enricher = Arc::new(FixedEnricher::default());
    let service = ApplicantIntakeService::new(
        repository.clone(),
        publisher.clone(),
        enricher.clone(),
        ShortlistCriteria::default(),
    );
    (service, repository, publisher, enricher)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<CandidateId, CandidateRecord>>>,
    order: Arc<Mutex<Vec<CandidateId>>>,
}

impl CandidateRepository for MemoryRepository {
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(record.id()) {
            return Err(RepositoryError::Conflict);
        }
        self.order
            .lock()
            .expect("order mutex poisoned")
            .push(record.id().clone());
        guard.insert(record.id().clone(), record.clone());
        Ok(record)
    }

    fn modify(
        &self,
        id: &CandidateId,
        change: &mut dyn FnMut(&mut CandidateRecord),
    ) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        change(record);
        Ok(record.clone())
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let order = self.order.lock().expect("order mutex poisoned");
        Ok(order.iter().filter_map(|id| guard.get(id).cloned()).collect())
    }

    fn pending(&self, limit: usize) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(CandidateRecord::is_pending)
            .take(limit)
            .collect())
    }
}

/// Memory store whose writers wait for each other before taking the lock, so two callers
/// always observe the same state before either of them writes.
pub(super) struct RendezvousRepository {
    pub(super) inner: MemoryRepository,
    barrier: Barrier,
}

impl RendezvousRepository {
    pub(super) fn new(parties: usize) -> Self {
        Self {
            inner: MemoryRepository::default(),
            barrier: Barrier::new(parties),
        }
    }
}

impl CandidateRepository for RendezvousRepository {
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn modify(
        &self,
        id: &CandidateId,
        change: &mut dyn FnMut(&mut CandidateRecord),
    ) -> Result<CandidateRecord, RepositoryError> {
        self.barrier.wait();
        self.inner.modify(id, change)
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        self.inner.all()
    }

    fn pending(&self, limit: usize) -> Result<Vec<CandidateRecord>, RepositoryError> {
        self.inner.pending(limit)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryPublisher {
    leads: Arc<Mutex<Vec<ShortlistedLead>>>,
}

impl MemoryPublisher {
    pub(super) fn leads(&self) -> Vec<ShortlistedLead> {
        self.leads.lock().expect("publisher mutex poisoned").clone()
    }
}

impl ShortlistPublisher for MemoryPublisher {
    fn publish(&self, lead: ShortlistedLead) -> Result<(), PublishError> {
        self.leads
            .lock()
            .expect("publisher mutex poisoned")
            .push(lead);
        Ok(())
    }
}

/// Publisher that fails until `recover` is called.
#[derive(Default)]
pub(super) struct FlakyPublisher {
    recovered: Mutex<bool>,
    pub(super) delivered: Mutex<Vec<ShortlistedLead>>,
}

impl FlakyPublisher {
    pub(super) fn recover(&self) {
        *self.recovered.lock().expect("publisher mutex poisoned") = true;
    }
}

impl ShortlistPublisher for FlakyPublisher {
    fn publish(&self, lead: ShortlistedLead) -> Result<(), PublishError> {
        if !*self.recovered.lock().expect("publisher mutex poisoned") {
            return Err(PublishError::Transport("crm offline".to_string()));
        }
        self.delivered
            .lock()
            .expect("publisher mutex poisoned")
            .push(lead);
        Ok(())
    }
}

/// Enricher returning a fixed score and counting invocations.
pub(super) struct FixedEnricher {
    pub(super) score: u8,
    calls: AtomicUsize,
}

impl Default for FixedEnricher {
    fn default() -> Self {
        Self {
            score: 8,
            calls: AtomicUsize::new(0),
        }
    }
}

impl FixedEnricher {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CandidateEnricher for FixedEnricher {
    fn enrich(
        &self,
        profile: &CandidateProfile,
        total_years: ExperienceYears,
    ) -> Result<Enrichment, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Enrichment {
            summary: format!("{} with {total_years} years", profile.personal.full_name),
            score: self.score,
            issues: Vec::new(),
            follow_ups: vec!["What are you working on now?".to_string()],
        })
    }
}

pub(super) struct ConflictRepository;

impl CandidateRepository for ConflictRepository {
    fn insert(&self, _record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn modify(
        &self,
        _id: &CandidateId,
        _change: &mut dyn FnMut(&mut CandidateRecord),
    ) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        Ok(None)
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn pending(&self, _limit: usize) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn insert(&self, _record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify(
        &self,
        _id: &CandidateId,
        _change: &mut dyn FnMut(&mut CandidateRecord),
    ) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn pending(&self, _limit: usize) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn applicant_router_with_service(service: TestService) -> axum::Router {
    applicant_router(Arc::new(service))
}
