use super::super::compression::compact_json;
use super::super::domain::CandidateProfile;
use super::super::evaluation::ShortlistCriteria;
use super::super::experience::ExperienceYears;
use super::{CandidateEnricher, Enrichment, EnrichmentError, MAX_SCORE, MIN_SCORE};

const DEFAULT_SCORE: u8 = 5;
const SUMMARY_WORD_LIMIT: usize = 75;
const SUMMARY_TRIM_THRESHOLD: usize = 90;
const MAX_FOLLOW_UPS: usize = 3;

pub const SYSTEM_PROMPT: &str = "You are a skilled recruiting analyst with expertise in evaluating technical contractor profiles. Provide clear, actionable insights.";

/// Completion backend used by [`PromptedEnricher`].
pub trait ModelClient: Send + Sync {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, EnrichmentError>;
}

/// Enricher that prompts a model and parses the structured reply.
pub struct PromptedEnricher<C> {
    client: C,
    criteria: ShortlistCriteria,
}

impl<C: ModelClient> PromptedEnricher<C> {
    pub fn new(client: C, criteria: ShortlistCriteria) -> Self {
        Self { client, criteria }
    }
}

impl<C: ModelClient> CandidateEnricher for PromptedEnricher<C> {
    fn enrich(
        &self,
        profile: &CandidateProfile,
        total_years: ExperienceYears,
    ) -> Result<Enrichment, EnrichmentError> {
        let prompt = build_evaluation_prompt(profile, total_years, &self.criteria)?;
        let reply = self.client.complete(SYSTEM_PROMPT, &prompt)?;
        if reply.trim().is_empty() {
            return Err(EnrichmentError::InvalidResponse("empty completion".to_string()));
        }
        Ok(parse_model_response(&reply))
    }
}

pub fn build_evaluation_prompt(
    profile: &CandidateProfile,
    total_years: ExperienceYears,
    criteria: &ShortlistCriteria,
) -> Result<String, EnrichmentError> {
    let profile_json = compact_json(profile)
        .map_err(|err| EnrichmentError::InvalidResponse(err.to_string()))?;
    let notable = criteria
        .tier_one_matches(profile.experience.iter().map(|entry| entry.company.as_str()));
    let notable = if notable.is_empty() {
        "None".to_string()
    } else {
        notable.join(", ")
    };

    Ok(format!(
        "You are a recruiting analyst reviewing contractor applications.
Given this JSON applicant profile, please provide four specific deliverables:

1. A concise 75-word summary of the candidate highlighting their key strengths
2. Rate overall candidate quality from 1-10 (higher is better) based on:
   - Technical experience and skills
   - Company background and career progression
   - Rate competitiveness and availability
   - Overall profile completeness
3. List any data gaps or inconsistencies you notice (or 'None' if profile is complete)
4. Suggest up to three follow-up questions to better assess the candidate

Context:
- Candidate has {total_years} years total experience
- Notable companies: {notable}
- Seeking ${rate}/hr, {hours} hrs/week
- Located in {location}

Candidate Profile JSON:
{profile_json}

Please return exactly in this format:
Summary: [Exactly 75 words summarizing key qualifications, experience, and value proposition]
Score: [Integer from 1-10]
Issues: [Comma-separated list of gaps/inconsistencies or 'None']
Follow-Ups:
• [Specific question about technical capabilities]
• [Question about availability/project preferences]
• [Question to clarify any gaps or validate claims]",
        rate = profile.salary.preferred_rate,
        hours = profile.salary.availability_hours_per_week,
        location = profile.personal.location,
    ))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Summary,
    Score,
    Issues,
    FollowUps,
}

/// Parse a `Summary:/Score:/Issues:/Follow-Ups:` reply. Never fails; missing or out-of-range
/// pieces fall back to defaults.
pub fn parse_model_response(text: &str) -> Enrichment {
    let mut summary = String::new();
    let mut score = DEFAULT_SCORE;
    let mut issues = Vec::new();
    let mut follow_ups = Vec::new();
    let mut section = Section::None;

    for line in text.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("Summary:") {
            summary = rest.trim().to_string();
            section = Section::Summary;
        } else if let Some(rest) = line.strip_prefix("Score:") {
            score = rest
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|value| (MIN_SCORE..=MAX_SCORE).contains(value))
                .unwrap_or(DEFAULT_SCORE);
            section = Section::Score;
        } else if let Some(rest) = line.strip_prefix("Issues:") {
            let rest = rest.trim();
            if !matches!(rest.to_lowercase().as_str(), "none" | "n/a" | "") {
                issues = rest
                    .split(',')
                    .map(str::trim)
                    .filter(|issue| !issue.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            section = Section::Issues;
        } else if line.starts_with("Follow-Ups:") {
            section = Section::FollowUps;
        } else if let Some(rest) = line.strip_prefix('•') {
            if section == Section::FollowUps && !rest.trim().is_empty() {
                follow_ups.push(rest.trim().to_string());
            }
        } else if section == Section::Summary && !line.is_empty() {
            summary.push(' ');
            summary.push_str(line);
        }
    }

    let words: Vec<&str> = summary.split_whitespace().collect();
    if words.len() > SUMMARY_TRIM_THRESHOLD {
        summary = format!("{}...", words[..SUMMARY_WORD_LIMIT].join(" "));
    }
    follow_ups.truncate(MAX_FOLLOW_UPS);

    Enrichment {
        summary,
        score,
        issues,
        follow_ups,
    }
}
