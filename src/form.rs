//! Client-side submission forms.
//!
//! Each form validates itself against its schema before anything is sent,
//! and a [`FormController`] tracks the idle / submitting / settled states with
//! at most one request in flight.

use std::collections::BTreeMap;

use clap::Args;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::models::{IncidentType, RecordKind, RoomType, SuggestionCategory};

/// Shared code printed on the residence notice board. It only hides the
/// suggestion form from casual visitors; it is not authentication.
pub const SUGGESTION_ACCESS_CODE: &str = "CONC2026";

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Field name (as sent on the wire) to message.
pub type FieldErrors = BTreeMap<&'static str, String>;

pub trait FormSchema: Serialize + Clone + Default {
    const KIND: RecordKind;
    const SUCCESS_TITLE: &'static str;
    const SUCCESS_MESSAGE: &'static str;
    const ERROR_MESSAGE: &'static str;

    fn validate(&self) -> Result<(), FieldErrors>;
}

struct Checks {
    errors: FieldErrors,
}

impl Checks {
    fn new() -> Self {
        Self {
            errors: FieldErrors::new(),
        }
    }

    fn min_len(
        &mut self,
        field: &'static str,
        value: &str,
        min: usize,
        message: &str,
    ) -> &mut Self {
        if value.chars().count() < min {
            self.fail(field, message);
        }
        self
    }

    fn email(&mut self, field: &'static str, value: &str, message: &str) -> &mut Self {
        if !EMAIL.is_match(value) {
            self.fail(field, message);
        }
        self
    }

    fn one_of(
        &mut self,
        field: &'static str,
        value: &str,
        allowed: &[&str],
        message: &str,
    ) -> &mut Self {
        if !allowed.contains(&value) {
            self.fail(field, message);
        }
        self
    }

    fn fail(&mut self, field: &'static str, message: &str) {
        self.errors
            .entry(field)
            .or_insert_with(|| message.to_string());
    }

    fn finish(&mut self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Args)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    /// Full name
    #[arg(long, default_value = "")]
    pub name: String,
    /// South African ID number
    #[arg(long, default_value = "")]
    pub id_number: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    /// single or double
    #[arg(long, default_value = "")]
    pub room_type: String,
    #[arg(long, default_value = "")]
    pub course: String,
    #[arg(long, default_value = "")]
    pub year_of_study: String,
    /// yes or no
    #[arg(long, default_value = "")]
    pub nsfas_funded: String,
}

impl FormSchema for ApplicationForm {
    const KIND: RecordKind = RecordKind::Application;
    const SUCCESS_TITLE: &'static str = "Application Submitted!";
    const SUCCESS_MESSAGE: &'static str = "Thank you for your application! We've received your submission and will review it promptly. Applications are processed on a first-come basis and a waitlist is maintained. We'll contact you as soon as a space becomes available.";
    const ERROR_MESSAGE: &'static str =
        "There was an error submitting your application. Please try again or contact us directly.";

    fn validate(&self) -> Result<(), FieldErrors> {
        Checks::new()
            .min_len("name", &self.name, 2, "Name must be at least 2 characters")
            .email("email", &self.email, "Please enter a valid email address")
            .min_len("phone", &self.phone, 10, "Please enter a valid phone number")
            .one_of(
                "roomType",
                &self.room_type,
                RoomType::VALUES,
                "Please select a room type",
            )
            .min_len("course", &self.course, 2, "Please enter your course")
            .min_len(
                "yearOfStudy",
                &self.year_of_study,
                1,
                "Please select your year of study",
            )
            .one_of(
                "nsfasFunded",
                &self.nsfas_funded,
                &["yes", "no"],
                "Please indicate if you are NSFAS funded",
            )
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Args)]
#[serde(rename_all = "camelCase")]
pub struct IncidentForm {
    /// Date of the incident (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    pub date: String,
    /// Time of the incident (HH:MM)
    #[arg(long, default_value = "")]
    pub time: String,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// safety, maintenance, noise or other
    #[serde(rename = "type")]
    #[arg(long = "type", default_value = "")]
    pub incident_type: String,
    #[arg(long, default_value = "")]
    pub reporter_name: String,
    #[arg(long, default_value = "")]
    pub reporter_contact: String,
}

impl FormSchema for IncidentForm {
    const KIND: RecordKind = RecordKind::Incident;
    const SUCCESS_TITLE: &'static str = "Incident Reported";
    const SUCCESS_MESSAGE: &'static str = "Thank you for reporting this incident. Our team will review it and take appropriate action. If this is an emergency, please contact security immediately.";
    const ERROR_MESSAGE: &'static str = "There was an error submitting your report. Please try again or contact us directly if this is urgent.";

    fn validate(&self) -> Result<(), FieldErrors> {
        Checks::new()
            .min_len("date", &self.date, 1, "Please select a date")
            .min_len("time", &self.time, 1, "Please enter a time")
            .min_len("location", &self.location, 2, "Please enter the location")
            .min_len(
                "description",
                &self.description,
                10,
                "Please provide a detailed description",
            )
            .one_of(
                "type",
                &self.incident_type,
                IncidentType::VALUES,
                "Please select an incident type",
            )
            .min_len("reporterName", &self.reporter_name, 2, "Please enter your name")
            .min_len(
                "reporterContact",
                &self.reporter_contact,
                10,
                "Please enter your contact number",
            )
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Args)]
#[serde(rename_all = "camelCase")]
pub struct InterestForm {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    /// Preferred move-in date (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    pub preferred_date: Option<String>,
}

impl FormSchema for InterestForm {
    const KIND: RecordKind = RecordKind::Interest;
    const SUCCESS_TITLE: &'static str = "You're on the Waitlist!";
    const SUCCESS_MESSAGE: &'static str = "Thank you for your interest in Concordia House. We've added you to our waitlist and will contact you as soon as a space becomes available.";
    const ERROR_MESSAGE: &'static str =
        "There was an error adding you to the waitlist. Please try again or contact us directly.";

    fn validate(&self) -> Result<(), FieldErrors> {
        Checks::new()
            .min_len("name", &self.name, 2, "Name must be at least 2 characters")
            .email("email", &self.email, "Please enter a valid email address")
            .min_len("phone", &self.phone, 10, "Please enter a valid phone number")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Args)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionForm {
    /// Leave out to submit anonymously
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    /// facilities, activities, food, rules or other
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub suggestion: String,
}

impl FormSchema for SuggestionForm {
    const KIND: RecordKind = RecordKind::Suggestion;
    const SUCCESS_TITLE: &'static str = "Suggestion Submitted!";
    const SUCCESS_MESSAGE: &'static str = "Thank you for your suggestion! We value your input and will carefully consider all suggestions to improve Concordia House for everyone.";
    const ERROR_MESSAGE: &'static str =
        "There was an error submitting your suggestion. Please try again.";

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut checks = Checks::new();

        if !self.email.is_empty() {
            checks.email("email", &self.email, "Please enter a valid email");
        }

        checks
            .one_of(
                "category",
                &self.category,
                SuggestionCategory::VALUES,
                "Please select a category",
            )
            .min_len(
                "suggestion",
                &self.suggestion,
                10,
                "Please provide a detailed suggestion (at least 10 characters)",
            )
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Success,
    Error(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubmitRefused {
    #[error("a submission is already in flight")]
    Busy,

    #[error("{} field(s) failed validation", .0.len())]
    Invalid(FieldErrors),
}

/// What a rendering layer should show for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    /// Input controls, optionally with an error banner above them.
    Input { banner: Option<&'a str>, busy: bool },
    Confirmation { title: &'a str, message: &'a str },
}

#[derive(Debug, Clone)]
pub struct FormController<F> {
    form: F,
    state: SubmitState,
}

impl<F: FormSchema> Default for FormController<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F: FormSchema> FormController<F> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            state: SubmitState::Idle,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// Validates and moves to `Submitting`, returning the payload to send.
    ///
    /// Refused while another submission is in flight. On validation failure
    /// the state is left untouched so an earlier banner stays visible.
    pub fn begin_submit(&mut self) -> Result<F, SubmitRefused> {
        if self.state == SubmitState::Submitting {
            return Err(SubmitRefused::Busy);
        }

        self.form.validate().map_err(SubmitRefused::Invalid)?;
        self.state = SubmitState::Submitting;

        Ok(self.form.clone())
    }

    /// Settles an in-flight submission. Success clears the inputs; failure
    /// keeps them for resubmission.
    pub fn finish<E>(&mut self, outcome: Result<(), E>) {
        match outcome {
            Ok(()) => {
                self.form = F::default();
                self.state = SubmitState::Success;
            }
            Err(_) => {
                self.state = SubmitState::Error(F::ERROR_MESSAGE.to_string());
            }
        }
    }

    /// "Submit another" from the confirmation view.
    pub fn start_over(&mut self) {
        self.state = SubmitState::Idle;
    }

    pub fn view(&self) -> View<'_> {
        match &self.state {
            SubmitState::Success => View::Confirmation {
                title: F::SUCCESS_TITLE,
                message: F::SUCCESS_MESSAGE,
            },
            SubmitState::Error(message) => View::Input {
                banner: Some(message.as_str()),
                busy: false,
            },
            SubmitState::Submitting => View::Input {
                banner: None,
                busy: true,
            },
            SubmitState::Idle => View::Input {
                banner: None,
                busy: false,
            },
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GateError {
    #[error("Please enter the access code")]
    Empty,

    #[error("Invalid access code. Please check and try again.")]
    Invalid,
}

/// Locked suggestion form. Unlocking compares against
/// [`SUGGESTION_ACCESS_CODE`] locally and never talks to the server.
#[derive(Debug, Default)]
pub struct SuggestionGate;

impl SuggestionGate {
    pub fn unlock(self, code: &str) -> Result<FormController<SuggestionForm>, (Self, GateError)> {
        if code.is_empty() {
            return Err((self, GateError::Empty));
        }

        if code != SUGGESTION_ACCESS_CODE {
            return Err((self, GateError::Invalid));
        }

        Ok(FormController::default())
    }
}
