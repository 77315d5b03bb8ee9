use chrono::NaiveDate;
use contractor_intake::config::ScreeningConfig;
use contractor_intake::error::AppError;
use contractor_intake::workflows::applicants::{
    decompress_value, ApplicationSubmission, CandidateId, CandidateRecord, CandidateRepository,
    CompressedBody, CompressionError, EligibilityEvaluator, MockEnricher, PublishError,
    RepositoryError, ShortlistPublisher, ShortlistedLead,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) evaluator: Arc<EligibilityEvaluator>,
}

#[derive(Default)]
struct CandidateStore {
    records: HashMap<CandidateId, CandidateRecord>,
    order: Vec<CandidateId>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateRepository {
    store: Arc<Mutex<CandidateStore>>,
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        if guard.records.contains_key(record.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.order.push(record.id().clone());
        guard.records.insert(record.id().clone(), record.clone());
        Ok(record)
    }

    fn modify(
        &self,
        id: &CandidateId,
        change: &mut dyn FnMut(&mut CandidateRecord),
    ) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        let record = guard.records.get_mut(id).ok_or(RepositoryError::NotFound)?;
        change(record);
        Ok(record.clone())
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.records.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard
            .order
            .iter()
            .filter_map(|id| guard.records.get(id).cloned())
            .collect())
    }

    fn pending(&self, limit: usize) -> Result<Vec<CandidateRecord>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard
            .order
            .iter()
            .filter_map(|id| guard.records.get(id))
            .filter(|record| record.is_pending())
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryShortlistPublisher {
    leads: Arc<Mutex<Vec<ShortlistedLead>>>,
}

impl ShortlistPublisher for InMemoryShortlistPublisher {
    fn publish(&self, lead: ShortlistedLead) -> Result<(), PublishError> {
        let mut guard = self.leads.lock().expect("publisher mutex poisoned");
        guard.push(lead);
        Ok(())
    }
}

impl InMemoryShortlistPublisher {
    pub(crate) fn leads(&self) -> Vec<ShortlistedLead> {
        self.leads.lock().expect("publisher mutex poisoned").clone()
    }
}

pub(crate) fn build_enricher(screening: &ScreeningConfig, seed: Option<u64>) -> MockEnricher {
    match seed.or(screening.enrichment_seed) {
        Some(seed) => MockEnricher::seeded(screening.criteria.clone(), seed),
        None => MockEnricher::new(screening.criteria.clone()),
    }
}

/// Parse an applicant in the compressed layout. `metadata` is optional; when present its
/// version is checked.
pub(crate) fn parse_applicant(raw: &str) -> Result<ApplicationSubmission, AppError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(CompressionError::from)?;
    applicant_from_value(value)
}

pub(crate) fn applicant_from_value(
    value: serde_json::Value,
) -> Result<ApplicationSubmission, AppError> {
    if value.get("metadata").is_some() {
        return Ok(decompress_value(value)?.into_submission());
    }
    let body: CompressedBody = serde_json::from_value(value).map_err(CompressionError::from)?;
    Ok(body.into_submission())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
