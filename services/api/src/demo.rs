use crate::infra::{
    build_enricher, parse_applicant, InMemoryCandidateRepository, InMemoryShortlistPublisher,
};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use contractor_intake::config::AppConfig;
use contractor_intake::error::AppError;
use contractor_intake::workflows::applicants::{
    ApplicantFilter, ApplicantIntakeService, ApplicantServiceError, ApplicationSubmission,
    CandidateEnricher, CandidateId, Currency, EligibilityEvaluator, EligibilityOutcome, Enrichment,
    IntakeGuard, PersonalDetails, SalaryPreference, ShortlistStatistics, WorkEntry,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Applicant JSON in the compressed layout (metadata optional)
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Also run the mock enricher and print its summary, score, and follow-ups
    #[arg(long)]
    pub(crate) enrich: bool,
    /// Seed for reproducible enrichment output
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Seed for reproducible enrichment output
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        file,
        today,
        enrich,
        seed,
    } = args;

    let config = AppConfig::load()?;
    let now = evaluation_instant(today);
    let raw = std::fs::read_to_string(&file)?;
    let submission = parse_applicant(&raw)?;
    let profile = IntakeGuard.profile_from_submission(
        submission,
        CandidateId(file.display().to_string()),
        now,
    )?;

    let evaluator = EligibilityEvaluator::new(config.screening.criteria.clone());
    let outcome = evaluator.evaluate(&profile, now.date_naive());
    println!(
        "{} ({}) evaluated on {}",
        profile.personal.full_name,
        profile.personal.email,
        now.date_naive()
    );
    render_outcome(&outcome);

    if enrich {
        let enricher = build_enricher(&config.screening, seed);
        let enrichment = enricher
            .enrich(&profile, outcome.total_years)
            .map_err(ApplicantServiceError::from)?;
        render_enrichment(&enrichment);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, seed } = args;

    let config = AppConfig::load()?;
    let now = evaluation_instant(today);
    let criteria = config.screening.criteria.clone();
    let repository = Arc::new(InMemoryCandidateRepository::default());
    let publisher = Arc::new(InMemoryShortlistPublisher::default());
    let enricher = Arc::new(build_enricher(&config.screening, seed));
    let service = ApplicantIntakeService::new(repository, publisher.clone(), enricher, criteria);

    println!("Contractor intake demo ({})", now.date_naive());
    println!("\nSubmissions");
    for submission in demo_submissions(now.date_naive()) {
        let name = submission.personal.full_name.clone();
        match service.submit_at(submission, now) {
            Ok(record) => println!("- {} -> {} ({})", name, record.id(), record.status.label()),
            Err(err) => println!("- {} rejected at intake: {}", name, err),
        }
    }

    let batch = service.evaluate_pending(now)?;
    println!(
        "\nBatch evaluation: {} evaluated | {} shortlisted | {} rejected | {} failed",
        batch.evaluated, batch.shortlisted, batch.rejected, batch.failed
    );

    for record in service.list(&ApplicantFilter::default())? {
        println!("\n{} ({})", record.profile.personal.full_name, record.id());
        if let Some(outcome) = &record.evaluation {
            render_outcome(outcome);
        }
        match service.enrich(record.id(), now) {
            Ok(outcome) => render_enrichment(&outcome.record().enrichment),
            Err(err) => println!("  Enrichment unavailable: {}", err),
        }
    }

    let leads = publisher.leads();
    if leads.is_empty() {
        println!("\nShortlisted leads: none published");
    } else {
        println!("\nShortlisted leads:");
        for lead in &leads {
            println!("- {}", lead.candidate_id);
            for line in lead.score_reason.lines() {
                println!("    {}", line);
            }
        }
    }

    render_statistics(&service.statistics()?);
    Ok(())
}

fn evaluation_instant(today: Option<NaiveDate>) -> DateTime<Utc> {
    match today {
        Some(date) => Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
        None => Utc::now(),
    }
}

fn render_outcome(outcome: &EligibilityOutcome) {
    println!(
        "  Verdict: {} | total experience {} years",
        outcome.verdict.label().to_ascii_uppercase(),
        outcome.total_years
    );
    if !outcome.tier_one_companies.is_empty() {
        println!("  Tier-1 employers: {}", outcome.tier_one_companies.join(", "));
    }
    for result in &outcome.criteria {
        let status = if result.passed { "PASS" } else { "FAIL" };
        println!("  - {}: {} - {}", result.criterion.label(), status, result.reason);
    }
}

fn render_enrichment(enrichment: &Enrichment) {
    println!("  Enrichment score: {}/10", enrichment.score);
    println!("  Summary: {}", enrichment.summary);
    if enrichment.issues.is_empty() {
        println!("  Data gaps: none");
    } else {
        println!("  Data gaps: {}", enrichment.issues.join("; "));
    }
    println!("  Follow-ups:");
    for question in &enrichment.follow_ups {
        println!("    - {}", question);
    }
}

fn render_statistics(stats: &ShortlistStatistics) {
    println!("\nShortlist dashboard");
    println!(
        "- {} applicants | {} evaluated | {} shortlisted | {} rejected",
        stats.total_applicants, stats.total_evaluated, stats.total_shortlisted, stats.total_rejected
    );
    println!(
        "- Shortlist rate {:.1}% | {} leads created",
        stats.shortlist_rate, stats.leads_created
    );
    println!(
        "- {} enriched | average score {:.1}/10 | {} high scorers (>= 8)",
        stats.total_enriched, stats.average_score, stats.high_scoring_candidates
    );
    let distribution: Vec<String> = stats
        .score_distribution
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(score, count)| format!("{score}: {count}"))
        .collect();
    if !distribution.is_empty() {
        println!("- Score distribution: {}", distribution.join(", "));
    }
}

fn demo_submissions(today: NaiveDate) -> Vec<ApplicationSubmission> {
    let years_ago =
        |years: i32| NaiveDate::from_ymd_opt(today.year() - years, 1, 1).unwrap_or(today);

    vec![
        applicant(
            "Sofia Martinez",
            "sofia.martinez@example.com",
            "Austin, USA",
            vec![
                role("Stripe", "Senior Backend Engineer", years_ago(3), None),
                role("Shopify", "Backend Engineer", years_ago(6), Some(years_ago(3))),
            ],
            rate(Currency::Usd, 95.0, 80.0, 35.0),
        ),
        applicant(
            "Daniel Okafor",
            "daniel.okafor@example.com",
            "Toronto, Canada",
            vec![role("Brightline Labs", "Data Engineer", years_ago(2), None)],
            rate(Currency::Usd, 70.0, 60.0, 40.0),
        ),
        applicant(
            "Ingrid Larsen",
            "ingrid.larsen@example.com",
            "London, UK",
            vec![role("Google", "ML Engineer", years_ago(7), None)],
            rate(Currency::Gbp, 110.0, 90.0, 20.0),
        ),
        applicant(
            "Arjun Mehta",
            "arjun.mehta@example.com",
            "Lisbon, Portugal",
            vec![role("Netflix", "Platform Engineer", years_ago(5), None)],
            rate(Currency::Usd, 85.0, 75.0, 30.0),
        ),
    ]
}

fn applicant(
    name: &str,
    email: &str,
    location: &str,
    experience: Vec<WorkEntry>,
    salary: SalaryPreference,
) -> ApplicationSubmission {
    ApplicationSubmission {
        personal: PersonalDetails {
            full_name: name.to_string(),
            email: email.to_string(),
            location: location.to_string(),
            linkedin: None,
        },
        experience,
        salary,
    }
}

fn role(company: &str, title: &str, start: NaiveDate, end: Option<NaiveDate>) -> WorkEntry {
    WorkEntry {
        company: company.to_string(),
        title: title.to_string(),
        start_date: Some(start),
        end_date: end,
        current: end.is_none(),
        technologies: Vec::new(),
    }
}

fn rate(currency: Currency, preferred: f64, minimum: f64, hours: f64) -> SalaryPreference {
    SalaryPreference {
        preferred_rate: preferred,
        minimum_rate: minimum,
        currency,
        availability_hours_per_week: hours,
    }
}
