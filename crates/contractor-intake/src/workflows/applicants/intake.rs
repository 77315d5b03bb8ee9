//! Multi-step intake form as an explicit state value.
//!
//! Each [`IntakeAction`] is applied with [`transition`], which consumes the current
//! [`IntakeState`] and returns the next one. Step gating reuses the [`guard`](super::guard)
//! validators so a state that reaches [`IntakeStep::Review`] always produces a valid submission.

use serde::{Deserialize, Serialize};

use super::domain::{ApplicationSubmission, PersonalDetails, SalaryPreference, WorkEntry};
use super::guard::{validate_personal, validate_salary, validate_work_entry, IntakeViolation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    PersonalDetails,
    WorkExperience,
    SalaryPreferences,
    Review,
}

impl IntakeStep {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::PersonalDetails,
            Self::WorkExperience,
            Self::SalaryPreferences,
            Self::Review,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PersonalDetails => "Personal Details",
            Self::WorkExperience => "Work Experience",
            Self::SalaryPreferences => "Salary Preferences",
            Self::Review => "Review",
        }
    }

    /// 1-based position for progress indicators.
    pub const fn position(self) -> usize {
        match self {
            Self::PersonalDetails => 1,
            Self::WorkExperience => 2,
            Self::SalaryPreferences => 3,
            Self::Review => 4,
        }
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::PersonalDetails => Some(Self::WorkExperience),
            Self::WorkExperience => Some(Self::SalaryPreferences),
            Self::SalaryPreferences => Some(Self::Review),
            Self::Review => None,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::PersonalDetails | Self::WorkExperience => Self::PersonalDetails,
            Self::SalaryPreferences => Self::WorkExperience,
            Self::Review => Self::SalaryPreferences,
        }
    }
}

/// Accumulated partial application plus the step currently shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeState {
    pub step: IntakeStep,
    pub personal: Option<PersonalDetails>,
    pub experience: Vec<WorkEntry>,
    pub salary: Option<SalaryPreference>,
}

impl Default for IntakeState {
    fn default() -> Self {
        Self {
            step: IntakeStep::PersonalDetails,
            personal: None,
            experience: Vec::new(),
            salary: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum IntakeAction {
    SavePersonal(PersonalDetails),
    AddWorkEntry(WorkEntry),
    RemoveWorkEntry(usize),
    SaveSalary(SalaryPreference),
    Next,
    Back,
}

/// Apply one action. Saving data never moves the step; only `Next` and `Back` do.
pub fn transition(
    mut state: IntakeState,
    action: IntakeAction,
) -> Result<IntakeState, IntakeViolation> {
    match action {
        IntakeAction::SavePersonal(personal) => {
            state.personal = Some(personal);
        }
        IntakeAction::AddWorkEntry(entry) => {
            validate_work_entry(state.experience.len(), &entry)?;
            state.experience.push(entry);
        }
        IntakeAction::RemoveWorkEntry(index) => {
            if index >= state.experience.len() {
                return Err(IntakeViolation::UnknownWorkEntry { index });
            }
            state.experience.remove(index);
        }
        IntakeAction::SaveSalary(salary) => {
            state.salary = Some(salary);
        }
        IntakeAction::Next => {
            ensure_step_complete(&state)?;
            state.step = state.step.next().ok_or(IntakeViolation::NoNextStep)?;
        }
        IntakeAction::Back => {
            state.step = state.step.previous();
        }
    }
    Ok(state)
}

/// Convert a completed form into a submission for the applicant service.
pub fn finish(state: IntakeState) -> Result<ApplicationSubmission, IntakeViolation> {
    for step in IntakeStep::ordered() {
        ensure_complete(&state, step)?;
    }

    let IntakeState {
        personal,
        experience,
        salary,
        ..
    } = state;

    match (personal, salary) {
        (Some(personal), Some(salary)) => Ok(ApplicationSubmission {
            personal,
            experience,
            salary,
        }),
        (None, _) => Err(IntakeViolation::IncompleteStep(
            IntakeStep::PersonalDetails.label(),
        )),
        (_, None) => Err(IntakeViolation::IncompleteStep(
            IntakeStep::SalaryPreferences.label(),
        )),
    }
}

fn ensure_step_complete(state: &IntakeState) -> Result<(), IntakeViolation> {
    ensure_complete(state, state.step)
}

fn ensure_complete(state: &IntakeState, step: IntakeStep) -> Result<(), IntakeViolation> {
    match step {
        IntakeStep::PersonalDetails => match &state.personal {
            Some(personal) => validate_personal(personal),
            None => Err(IntakeViolation::IncompleteStep(step.label())),
        },
        IntakeStep::WorkExperience => state
            .experience
            .iter()
            .enumerate()
            .try_for_each(|(index, entry)| validate_work_entry(index, entry)),
        IntakeStep::SalaryPreferences => match &state.salary {
            Some(salary) => validate_salary(salary),
            None => Err(IntakeViolation::IncompleteStep(step.label())),
        },
        IntakeStep::Review => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::applicants::domain::Currency;
    use chrono::NaiveDate;

    fn personal() -> PersonalDetails {
        PersonalDetails {
            full_name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            location: "Toronto, Canada".to_string(),
            linkedin: None,
        }
    }

    fn salary(minimum: f64, preferred: f64) -> SalaryPreference {
        SalaryPreference {
            preferred_rate: preferred,
            minimum_rate: minimum,
            currency: Currency::Usd,
            availability_hours_per_week: 30.0,
        }
    }

    fn entry(company: &str) -> WorkEntry {
        WorkEntry {
            company: company.to_string(),
            title: "Data Engineer".to_string(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            current: false,
            technologies: vec!["Python".to_string()],
        }
    }

    fn apply(
        state: IntakeState,
        actions: Vec<IntakeAction>,
    ) -> Result<IntakeState, IntakeViolation> {
        actions.into_iter().try_fold(state, transition)
    }

    #[test]
    fn walks_all_steps_to_review() {
        let state = apply(
            IntakeState::default(),
            vec![
                IntakeAction::SavePersonal(personal()),
                IntakeAction::Next,
                IntakeAction::AddWorkEntry(entry("Shopify")),
                IntakeAction::Next,
                IntakeAction::SaveSalary(salary(60.0, 80.0)),
                IntakeAction::Next,
            ],
        )
        .expect("valid walk");

        assert_eq!(state.step, IntakeStep::Review);
        let submission = finish(state).expect("complete form");
        assert_eq!(submission.experience.len(), 1);
        assert_eq!(submission.personal.full_name, "Ana Souza");
    }

    #[test]
    fn next_is_gated_on_personal_details() {
        let err = transition(IntakeState::default(), IntakeAction::Next).unwrap_err();
        assert_eq!(err, IntakeViolation::IncompleteStep("Personal Details"));

        let mut invalid = personal();
        invalid.email = "not-an-email".to_string();
        let err = apply(
            IntakeState::default(),
            vec![IntakeAction::SavePersonal(invalid), IntakeAction::Next],
        )
        .unwrap_err();
        assert!(matches!(err, IntakeViolation::InvalidEmail(_)));
    }

    #[test]
    fn experience_step_allows_empty_history() {
        let state = apply(
            IntakeState::default(),
            vec![
                IntakeAction::SavePersonal(personal()),
                IntakeAction::Next,
                IntakeAction::Next,
            ],
        )
        .expect("empty history is allowed");
        assert_eq!(state.step, IntakeStep::SalaryPreferences);
    }

    #[test]
    fn salary_step_rejects_minimum_above_preferred() {
        let err = apply(
            IntakeState::default(),
            vec![
                IntakeAction::SavePersonal(personal()),
                IntakeAction::Next,
                IntakeAction::Next,
                IntakeAction::SaveSalary(salary(90.0, 80.0)),
                IntakeAction::Next,
            ],
        )
        .unwrap_err();
        assert!(matches!(err, IntakeViolation::MinimumAbovePreferred { .. }));
    }

    #[test]
    fn back_keeps_entered_data() {
        let state = apply(
            IntakeState::default(),
            vec![
                IntakeAction::SavePersonal(personal()),
                IntakeAction::Next,
                IntakeAction::AddWorkEntry(entry("Shopify")),
                IntakeAction::Back,
                IntakeAction::Back,
            ],
        )
        .expect("back never fails");
        assert_eq!(state.step, IntakeStep::PersonalDetails);
        assert_eq!(state.experience.len(), 1);
        assert!(state.personal.is_some());
    }

    #[test]
    fn review_has_no_next_step() {
        let state = apply(
            IntakeState::default(),
            vec![
                IntakeAction::SavePersonal(personal()),
                IntakeAction::Next,
                IntakeAction::Next,
                IntakeAction::SaveSalary(salary(50.0, 50.0)),
                IntakeAction::Next,
            ],
        )
        .expect("reaches review");
        assert_eq!(
            transition(state, IntakeAction::Next).unwrap_err(),
            IntakeViolation::NoNextStep
        );
    }

    #[test]
    fn removing_unknown_entry_fails() {
        let err = transition(IntakeState::default(), IntakeAction::RemoveWorkEntry(0)).unwrap_err();
        assert_eq!(err, IntakeViolation::UnknownWorkEntry { index: 0 });
    }

    #[test]
    fn incomplete_work_entries_are_refused() {
        let mut blank = entry("");
        blank.title.clear();
        let err =
            transition(IntakeState::default(), IntakeAction::AddWorkEntry(blank)).unwrap_err();
        assert_eq!(err, IntakeViolation::IncompleteWorkEntry { index: 0 });
    }

    #[test]
    fn finish_requires_salary() {
        let mut state = IntakeState::default();
        state.personal = Some(personal());
        let err = finish(state).unwrap_err();
        assert_eq!(err, IntakeViolation::IncompleteStep("Salary Preferences"));
    }
}
