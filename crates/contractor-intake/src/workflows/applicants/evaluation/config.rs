use serde::{Deserialize, Serialize};

use super::super::domain::Currency;
use super::super::experience::ExperienceYears;

pub const DEFAULT_TIER_ONE_EMPLOYERS: [&str; 13] = [
    "Google",
    "Meta",
    "Facebook",
    "OpenAI",
    "Microsoft",
    "Amazon",
    "Apple",
    "Netflix",
    "Tesla",
    "Uber",
    "Airbnb",
    "Stripe",
    "Coinbase",
];

pub const DEFAULT_ALLOWED_LOCATIONS: [&str; 8] = [
    "US",
    "USA",
    "United States",
    "Canada",
    "UK",
    "United Kingdom",
    "Germany",
    "India",
];

/// Shortlist rubric. The employer and location lists are matched by case-insensitive substring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortlistCriteria {
    pub tier_one_employers: Vec<String>,
    pub allowed_locations: Vec<String>,
    pub min_experience_years: f64,
    pub required_currency: Currency,
    pub max_hourly_rate: f64,
    pub min_availability_hours: f64,
}

impl ShortlistCriteria {
    pub fn min_experience(&self) -> ExperienceYears {
        ExperienceYears::from_years(self.min_experience_years)
    }

    /// Companies in `companies` that contain a tier-one name, in input order.
    pub fn tier_one_matches<'a, I>(&self, companies: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let needles = lowercase_all(&self.tier_one_employers);
        companies
            .into_iter()
            .filter(|company| {
                let haystack = company.to_lowercase();
                needles.iter().any(|needle| haystack.contains(needle.as_str()))
            })
            .collect()
    }

    /// First allowed location contained in `location`, if any.
    pub fn matching_location(&self, location: &str) -> Option<&str> {
        let haystack = location.to_lowercase();
        self.allowed_locations
            .iter()
            .filter(|allowed| !allowed.is_empty())
            .find(|allowed| haystack.contains(&allowed.to_lowercase()))
            .map(String::as_str)
    }
}

impl Default for ShortlistCriteria {
    fn default() -> Self {
        Self {
            tier_one_employers: DEFAULT_TIER_ONE_EMPLOYERS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            allowed_locations: DEFAULT_ALLOWED_LOCATIONS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            min_experience_years: 4.0,
            required_currency: Currency::Usd,
            max_hourly_rate: 100.0,
            min_availability_hours: 20.0,
        }
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.to_lowercase())
        .filter(|value| !value.is_empty())
        .collect()
}
