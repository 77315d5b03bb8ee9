use chrono::NaiveDate;

use super::super::domain::{CandidateProfile, PersonalDetails, SalaryPreference, WorkEntry};
use super::super::experience::{total_years, ExperienceYears};
use super::config::ShortlistCriteria;
use super::{Criterion, CriterionResult};

pub(crate) struct ClauseSignals {
    pub total_years: ExperienceYears,
    pub tier_one_companies: Vec<String>,
}

pub(crate) fn evaluate_clauses(
    profile: &CandidateProfile,
    criteria: &ShortlistCriteria,
    now: NaiveDate,
) -> (Vec<CriterionResult>, ClauseSignals) {
    let (experience, signals) = experience_clause(&profile.experience, criteria, now);
    let compensation = compensation_clause(&profile.salary, criteria);
    let location = location_clause(&profile.personal, criteria);

    (vec![experience, compensation, location], signals)
}

fn experience_clause(
    entries: &[WorkEntry],
    criteria: &ShortlistCriteria,
    now: NaiveDate,
) -> (CriterionResult, ClauseSignals) {
    let years = total_years(entries, now);
    let minimum = criteria.min_experience();
    let tier_one_companies: Vec<String> = criteria
        .tier_one_matches(entries.iter().map(|entry| entry.company.as_str()))
        .into_iter()
        .map(str::to_string)
        .collect();

    let result = if years >= minimum {
        CriterionResult {
            criterion: Criterion::Experience,
            passed: true,
            reason: format!("Total experience: {years} years (≥{minimum} required)"),
        }
    } else if !tier_one_companies.is_empty() {
        CriterionResult {
            criterion: Criterion::Experience,
            passed: true,
            reason: format!(
                "Tier-1 company experience: {}",
                tier_one_companies.join(", ")
            ),
        }
    } else {
        CriterionResult {
            criterion: Criterion::Experience,
            passed: false,
            reason: format!("Insufficient experience: {years} years, no Tier-1 companies"),
        }
    };

    let signals = ClauseSignals {
        total_years: years,
        tier_one_companies,
    };
    (result, signals)
}

fn compensation_clause(
    salary: &SalaryPreference,
    criteria: &ShortlistCriteria,
) -> CriterionResult {
    let currency_ok = salary.currency == criteria.required_currency;
    let rate_ok = salary.preferred_rate <= criteria.max_hourly_rate;
    let availability_ok = salary.availability_hours_per_week >= criteria.min_availability_hours;

    if currency_ok && rate_ok && availability_ok {
        return CriterionResult {
            criterion: Criterion::Compensation,
            passed: true,
            reason: format!(
                "${}/hr {}, {} hrs/week available",
                salary.preferred_rate, salary.currency, salary.availability_hours_per_week
            ),
        };
    }

    let mut issues = Vec::new();
    if !currency_ok {
        issues.push(format!(
            "Currency: {} ({} required)",
            salary.currency, criteria.required_currency
        ));
    }
    if !rate_ok {
        issues.push(format!(
            "Rate: ${}/hr (≤${} required)",
            salary.preferred_rate, criteria.max_hourly_rate
        ));
    }
    if !availability_ok {
        issues.push(format!(
            "Availability: {} hrs/week (≥{} required)",
            salary.availability_hours_per_week, criteria.min_availability_hours
        ));
    }

    CriterionResult {
        criterion: Criterion::Compensation,
        passed: false,
        reason: format!("Compensation issues: {}", issues.join("; ")),
    }
}

fn location_clause(personal: &PersonalDetails, criteria: &ShortlistCriteria) -> CriterionResult {
    match criteria.matching_location(&personal.location) {
        Some(_) => CriterionResult {
            criterion: Criterion::Location,
            passed: true,
            reason: format!("Location: {} (allowed region)", personal.location),
        },
        None => CriterionResult {
            criterion: Criterion::Location,
            passed: false,
            reason: format!("Location: {} (not in allowed regions)", personal.location),
        },
    }
}
