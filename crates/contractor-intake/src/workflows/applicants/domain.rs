use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::enrichment::EnrichmentRecord;
use super::evaluation::EligibilityOutcome;

/// Identifier wrapper for submitted applicants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact and location details captured on the first intake step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub full_name: String,
    pub email: String,
    /// Free text, matched by substring against the allowed locations.
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// One date-ranged position in the applicant's work history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub company: String,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Currencies accepted by the salary step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Cad,
    Inr,
}

impl Currency {
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Cad => "CAD",
            Currency::Inr => "INR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "EUR" => Some(Currency::Eur),
            "GBP" => Some(Currency::Gbp),
            "CAD" => Some(Currency::Cad),
            "INR" => Some(Currency::Inr),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Compensation and availability preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryPreference {
    pub preferred_rate: f64,
    pub minimum_rate: f64,
    pub currency: Currency,
    pub availability_hours_per_week: f64,
}

/// Applicant provided payload accepted by the intake service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub personal: PersonalDetails,
    #[serde(default)]
    pub experience: Vec<WorkEntry>,
    pub salary: SalaryPreference,
}

/// Validated applicant data once intake has accepted the submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: CandidateId,
    pub personal: PersonalDetails,
    pub experience: Vec<WorkEntry>,
    pub salary: SalaryPreference,
    pub submitted_at: DateTime<Utc>,
}

impl CandidateProfile {
    /// Most recent role: the current position if any, otherwise the latest start date.
    pub fn top_role(&self) -> Option<&WorkEntry> {
        self.experience
            .iter()
            .find(|entry| entry.current)
            .or_else(|| {
                self.experience
                    .iter()
                    .filter(|entry| entry.start_date.is_some())
                    .max_by_key(|entry| entry.start_date)
            })
            .or_else(|| self.experience.first())
    }
}

/// Shortlist status tracked on each candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortlistStatus {
    Pending,
    Shortlisted,
    Rejected,
}

impl ShortlistStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ShortlistStatus::Pending => "pending",
            ShortlistStatus::Shortlisted => "shortlisted",
            ShortlistStatus::Rejected => "rejected",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(ShortlistStatus::Pending),
            "shortlisted" => Some(ShortlistStatus::Shortlisted),
            "rejected" => Some(ShortlistStatus::Rejected),
            _ => None,
        }
    }
}

/// Stored candidate: the profile plus the derived fields populated once after evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub profile: CandidateProfile,
    pub status: ShortlistStatus,
    pub evaluation: Option<EligibilityOutcome>,
    pub enrichment: Option<EnrichmentRecord>,
    /// Set once the shortlisted lead has been handed to the publisher.
    #[serde(default)]
    pub lead_published: bool,
}

impl CandidateRecord {
    pub fn new(profile: CandidateProfile) -> Self {
        Self {
            profile,
            status: ShortlistStatus::Pending,
            evaluation: None,
            enrichment: None,
            lead_published: false,
        }
    }

    pub fn id(&self) -> &CandidateId {
        &self.profile.candidate_id
    }

    pub fn is_pending(&self) -> bool {
        self.status == ShortlistStatus::Pending
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM`, or RFC 3339. Anything else, including an empty string,
/// becomes `None` so a bad date degrades the experience figure instead of failing the record.
pub fn parse_lenient_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

pub(crate) fn deserialize_lenient_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    // Numbers, objects, and other non-string shapes degrade to `None` like malformed text.
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(parse_lenient_date))
}
