use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::super::domain::CandidateProfile;
use super::super::evaluation::ShortlistCriteria;
use super::super::experience::ExperienceYears;
use super::{CandidateEnricher, Enrichment, EnrichmentError, MAX_SCORE, MIN_SCORE};

pub const FOLLOW_UP_POOL: [&str; 3] = [
    "Can you walk us through a recent project where you owned the technical design end to end?",
    "What does your availability look like over the next three months, and which project types do you prefer?",
    "Can you share references or work samples that validate your most recent role?",
];

const BASE_SCORE: i16 = 5;
const HIGH_AVAILABILITY_HOURS: f64 = 30.0;

/// Templated stand-in for a model evaluation. Only the score jitter and the number of
/// follow-ups are random; seed it for reproducible output.
pub struct MockEnricher {
    criteria: ShortlistCriteria,
    rng: Mutex<StdRng>,
}

impl MockEnricher {
    pub fn new(criteria: ShortlistCriteria) -> Self {
        Self {
            criteria,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(criteria: ShortlistCriteria, seed: u64) -> Self {
        Self {
            criteria,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Score before jitter.
    pub fn base_score(&self, profile: &CandidateProfile, total_years: ExperienceYears) -> i16 {
        let mut score = BASE_SCORE;
        if total_years >= self.criteria.min_experience() {
            score += 2;
        }
        if !self.tier_one(profile).is_empty() {
            score += 2;
        }
        if profile.salary.preferred_rate <= self.criteria.max_hourly_rate {
            score += 1;
        }
        if profile.salary.availability_hours_per_week >= HIGH_AVAILABILITY_HOURS {
            score += 1;
        }
        score
    }

    pub fn summary(&self, profile: &CandidateProfile, total_years: ExperienceYears) -> String {
        let role = profile
            .top_role()
            .map(|entry| entry.title.trim())
            .filter(|title| !title.is_empty())
            .unwrap_or("contractor");
        let tier_one = self.tier_one(profile);
        let pedigree = if tier_one.is_empty() {
            String::new()
        } else {
            format!(", including tier-1 experience at {}", tier_one.join(", "))
        };

        format!(
            "{name} is a {role} with {total_years} years of experience{pedigree}. \
             Available {hours} hrs/week at ${rate}/hr {currency}, based in {location}.",
            name = profile.personal.full_name,
            hours = profile.salary.availability_hours_per_week,
            rate = profile.salary.preferred_rate,
            currency = profile.salary.currency,
            location = profile.personal.location,
        )
    }

    fn tier_one<'a>(&self, profile: &'a CandidateProfile) -> Vec<&'a str> {
        self.criteria
            .tier_one_matches(profile.experience.iter().map(|entry| entry.company.as_str()))
    }
}

impl CandidateEnricher for MockEnricher {
    fn enrich(
        &self,
        profile: &CandidateProfile,
        total_years: ExperienceYears,
    ) -> Result<Enrichment, EnrichmentError> {
        let (jitter, follow_up_count) = {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            (
                rng.gen_range(-1i16..=1),
                rng.gen_range(1..=FOLLOW_UP_POOL.len()),
            )
        };

        let score = (self.base_score(profile, total_years) + jitter)
            .clamp(i16::from(MIN_SCORE), i16::from(MAX_SCORE)) as u8;

        Ok(Enrichment {
            summary: self.summary(profile, total_years),
            score,
            issues: data_gaps(profile),
            follow_ups: FOLLOW_UP_POOL
                .iter()
                .take(follow_up_count)
                .map(|question| question.to_string())
                .collect(),
        })
    }
}

fn data_gaps(profile: &CandidateProfile) -> Vec<String> {
    let mut issues = Vec::new();
    if profile
        .personal
        .linkedin
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .is_empty()
    {
        issues.push("No LinkedIn profile provided".to_string());
    }
    if profile.experience.is_empty() {
        issues.push("No work history provided".to_string());
    }
    let undated = profile
        .experience
        .iter()
        .filter(|entry| entry.start_date.is_none())
        .count();
    if undated > 0 {
        issues.push(format!("{undated} work entries missing a start date"));
    }
    issues
}
