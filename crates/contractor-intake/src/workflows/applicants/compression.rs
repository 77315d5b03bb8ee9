//! Compact JSON form of a candidate, as stored alongside the applicant and handed to
//! enrichment backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::domain::{
    parse_lenient_date, ApplicationSubmission, CandidateProfile, Currency, PersonalDetails,
    SalaryPreference, WorkEntry,
};

pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    #[error("compressed applicant is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported compressed applicant version {0:?} (expected 1.0)")]
    UnsupportedVersion(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedPersonal {
    pub name: String,
    pub email: String,
    pub location: String,
    #[serde(default)]
    pub linkedin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressedExperience {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedSalary {
    pub preferred_rate: f64,
    pub minimum_rate: f64,
    pub currency: Currency,
    pub availability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedBody {
    pub personal: CompressedPersonal,
    #[serde(default)]
    pub experience: Vec<CompressedExperience>,
    pub salary: CompressedSalary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionMetadata {
    pub compressed_at: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedApplicant {
    #[serde(flatten)]
    pub body: CompressedBody,
    pub metadata: CompressionMetadata,
}

impl CompressedApplicant {
    pub fn into_submission(self) -> ApplicationSubmission {
        self.body.into_submission()
    }
}

impl CompressedBody {
    /// Dates that fail lenient parsing become `None` instead of rejecting the payload.
    pub fn into_submission(self) -> ApplicationSubmission {
        let CompressedBody {
            personal,
            experience,
            salary,
        } = self;

        ApplicationSubmission {
            personal: PersonalDetails {
                full_name: personal.name,
                email: personal.email,
                location: personal.location,
                linkedin: Some(personal.linkedin).filter(|link| !link.trim().is_empty()),
            },
            experience: experience
                .into_iter()
                .map(|entry| WorkEntry {
                    company: entry.company,
                    title: entry.title,
                    start_date: parse_lenient_date(&entry.start),
                    end_date: parse_lenient_date(&entry.end),
                    current: entry.current,
                    technologies: entry.technologies,
                })
                .collect(),
            salary: SalaryPreference {
                preferred_rate: salary.preferred_rate,
                minimum_rate: salary.minimum_rate,
                currency: salary.currency,
                availability_hours_per_week: salary.availability,
            },
        }
    }
}

fn body_from(
    personal: &PersonalDetails,
    experience: &[WorkEntry],
    salary: &SalaryPreference,
) -> CompressedBody {
    CompressedBody {
        personal: CompressedPersonal {
            name: personal.full_name.clone(),
            email: personal.email.clone(),
            location: personal.location.clone(),
            linkedin: personal.linkedin.clone().unwrap_or_default(),
        },
        experience: experience
            .iter()
            .map(|entry| CompressedExperience {
                company: entry.company.clone(),
                title: entry.title.clone(),
                start: format_date(entry.start_date),
                end: if entry.current {
                    String::new()
                } else {
                    format_date(entry.end_date)
                },
                technologies: entry.technologies.clone(),
                current: entry.current,
            })
            .collect(),
        salary: CompressedSalary {
            preferred_rate: salary.preferred_rate,
            minimum_rate: salary.minimum_rate,
            currency: salary.currency,
            availability: salary.availability_hours_per_week,
        },
    }
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Pretty-printed compressed JSON stamped with `compressed_at`.
pub fn compress(
    profile: &CandidateProfile,
    compressed_at: DateTime<Utc>,
) -> Result<String, CompressionError> {
    let applicant = CompressedApplicant {
        body: body_from(&profile.personal, &profile.experience, &profile.salary),
        metadata: CompressionMetadata {
            compressed_at,
            version: FORMAT_VERSION.to_string(),
        },
    };
    Ok(serde_json::to_string_pretty(&applicant)?)
}

pub fn decompress(raw: &str) -> Result<CompressedApplicant, CompressionError> {
    decompress_value(serde_json::from_str(raw)?)
}

/// [`decompress`] over an already parsed document.
pub fn decompress_value(value: serde_json::Value) -> Result<CompressedApplicant, CompressionError> {
    let applicant: CompressedApplicant = serde_json::from_value(value)?;
    if applicant.metadata.version != FORMAT_VERSION {
        return Err(CompressionError::UnsupportedVersion(applicant.metadata.version));
    }
    Ok(applicant)
}

/// Per-section agreement between a compressed payload and the stored profile it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub personal: bool,
    pub experience: bool,
    pub salary: bool,
}

impl IntegrityReport {
    pub const fn is_intact(&self) -> bool {
        self.personal && self.experience && self.salary
    }
}

/// Compare `expected` with what `profile` holds. Experience is matched on company and title
/// after sorting by company, so reordered histories still agree.
pub fn verify_integrity(expected: &CompressedBody, profile: &CandidateProfile) -> IntegrityReport {
    let actual = body_from(&profile.personal, &profile.experience, &profile.salary);

    let mut wanted: Vec<_> = expected
        .experience
        .iter()
        .map(|entry| (entry.company.as_str(), entry.title.as_str()))
        .collect();
    let mut stored: Vec<_> = actual
        .experience
        .iter()
        .map(|entry| (entry.company.as_str(), entry.title.as_str()))
        .collect();
    wanted.sort_by_key(|(company, _)| *company);
    stored.sort_by_key(|(company, _)| *company);

    IntegrityReport {
        personal: expected.personal == actual.personal,
        experience: wanted == stored,
        salary: expected.salary == actual.salary,
    }
}

/// Single-line JSON of the applicant sections, without metadata.
pub fn compact_json(profile: &CandidateProfile) -> Result<String, CompressionError> {
    let body = body_from(&profile.personal, &profile.experience, &profile.salary);
    Ok(serde_json::to_string(&body)?)
}

/// SHA-256 of [`compact_json`], hex encoded. Stable across compressions of unchanged data.
pub fn fingerprint(profile: &CandidateProfile) -> Result<String, CompressionError> {
    let mut hasher = Sha256::new();
    hasher.update(compact_json(profile)?.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
