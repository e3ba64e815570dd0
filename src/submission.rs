//! Server-side handling of inbound form payloads.
//!
//! The endpoints only check that required fields are present (absent, `null`
//! and `""` all count as missing), that enumerated fields hold one of their
//! closed values and that dates parse. Length and format rules live in the
//! client schemas in [`crate::form`].

use chrono::{DateTime, NaiveDate};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::models::{
    NewApplication, NewIncident, NewInterest, NewRecord, NewSuggestion, RecordKind,
    PENDING_STATUS,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid {0}")]
    InvalidField(&'static str),
}

/// A JSON payload accepted by one submission endpoint.
pub trait Submission: DeserializeOwned + std::fmt::Debug + Send + 'static {
    const KIND: RecordKind;

    fn into_record(self) -> Result<NewRecord, ValidationError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub name: Option<String>,
    pub id_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub room_type: Option<String>,
    pub course: Option<String>,
    pub year_of_study: Option<String>,
    pub nsfas_funded: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentPayload {
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub incident_type: Option<String>,
    pub reporter_name: Option<String>,
    pub reporter_contact: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub preferred_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub category: Option<String>,
    pub suggestion: Option<String>,
}

impl Submission for ApplicationPayload {
    const KIND: RecordKind = RecordKind::Application;

    fn into_record(self) -> Result<NewRecord, ValidationError> {
        let name = required(self.name)?;
        let email = required(self.email)?;
        let phone = required(self.phone)?;
        let room_type = required(self.room_type)?;
        let course = required(self.course)?;
        let year_of_study = required(self.year_of_study)?;
        let nsfas_funded = required(self.nsfas_funded)?;

        Ok(NewRecord::Application(NewApplication {
            name,
            id_number: optional(self.id_number),
            email,
            phone,
            room_type: room_type
                .parse()
                .map_err(|_| ValidationError::InvalidField("roomType"))?,
            course,
            year_of_study,
            nsfas_status: nsfas_funded == "yes",
            status: PENDING_STATUS.to_string(),
        }))
    }
}

impl Submission for IncidentPayload {
    const KIND: RecordKind = RecordKind::Incident;

    fn into_record(self) -> Result<NewRecord, ValidationError> {
        let date = required(self.date)?;
        let time = required(self.time)?;
        let location = required(self.location)?;
        let description = required(self.description)?;
        let incident_type = required(self.incident_type)?;
        let reporter_name = required(self.reporter_name)?;
        let reporter_contact = required(self.reporter_contact)?;

        Ok(NewRecord::Incident(NewIncident {
            date: parse_date(&date).ok_or(ValidationError::InvalidField("date"))?,
            time,
            location,
            description,
            incident_type: incident_type
                .parse()
                .map_err(|_| ValidationError::InvalidField("type"))?,
            reporter_name,
            reporter_contact,
        }))
    }
}

impl Submission for InterestPayload {
    const KIND: RecordKind = RecordKind::Interest;

    fn into_record(self) -> Result<NewRecord, ValidationError> {
        let name = required(self.name)?;
        let email = required(self.email)?;
        let phone = required(self.phone)?;

        let preferred_date = match optional(self.preferred_date) {
            Some(value) => Some(
                parse_date(&value).ok_or(ValidationError::InvalidField("preferredDate"))?,
            ),
            None => None,
        };

        Ok(NewRecord::Interest(NewInterest {
            name,
            email,
            phone,
            preferred_date,
        }))
    }
}

impl Submission for SuggestionPayload {
    const KIND: RecordKind = RecordKind::Suggestion;

    fn into_record(self) -> Result<NewRecord, ValidationError> {
        let category = required(self.category)?;
        let suggestion = required(self.suggestion)?;

        Ok(NewRecord::Suggestion(NewSuggestion {
            name: optional(self.name),
            email: optional(self.email),
            category: category
                .parse()
                .map_err(|_| ValidationError::InvalidField("category"))?,
            suggestion,
        }))
    }
}

fn required(value: Option<String>) -> Result<String, ValidationError> {
    optional(value).ok_or(ValidationError::MissingFields)
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Accepts a calendar date (`2026-03-14`) or a full RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IncidentType, RoomType, SuggestionCategory};

    fn jane() -> ApplicationPayload {
        ApplicationPayload {
            name: Some("Jane Doe".to_string()),
            id_number: None,
            email: Some("jane@x.com".to_string()),
            phone: Some("0821234567".to_string()),
            room_type: Some("single".to_string()),
            course: Some("BCom".to_string()),
            year_of_study: Some("1".to_string()),
            nsfas_funded: Some("yes".to_string()),
        }
    }

    #[test]
    fn application_maps_nsfas_and_pending_status() {
        let NewRecord::Application(application) = jane().into_record().unwrap() else {
            panic!("expected an application");
        };

        assert!(application.nsfas_status);
        assert_eq!(application.status, "pending");
        assert_eq!(application.room_type, RoomType::Single);
        assert_eq!(application.id_number, None);
    }

    #[test]
    fn nsfas_is_false_for_anything_but_yes() {
        let payload = ApplicationPayload {
            nsfas_funded: Some("no".to_string()),
            ..jane()
        };
        let NewRecord::Application(application) = payload.into_record().unwrap() else {
            panic!("expected an application");
        };
        assert!(!application.nsfas_status);
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let payload = ApplicationPayload {
            course: Some(String::new()),
            ..jane()
        };
        assert_eq!(payload.into_record(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn empty_id_number_is_stored_absent() {
        let payload = ApplicationPayload {
            id_number: Some(String::new()),
            ..jane()
        };
        let NewRecord::Application(application) = payload.into_record().unwrap() else {
            panic!("expected an application");
        };
        assert_eq!(application.id_number, None);
    }

    #[test]
    fn missing_fields_win_over_invalid_choices() {
        let payload = ApplicationPayload {
            room_type: Some("penthouse".to_string()),
            phone: None,
            ..jane()
        };
        assert_eq!(payload.into_record(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn room_type_outside_closed_set_is_rejected() {
        let payload = ApplicationPayload {
            room_type: Some("triple".to_string()),
            ..jane()
        };
        assert_eq!(
            payload.into_record(),
            Err(ValidationError::InvalidField("roomType"))
        );
    }

    #[test]
    fn incident_date_is_parsed() {
        let payload = IncidentPayload {
            date: Some("2026-03-14".to_string()),
            time: Some("22:15".to_string()),
            location: Some("Block B".to_string()),
            description: Some("Loud music after quiet hours".to_string()),
            incident_type: Some("noise".to_string()),
            reporter_name: Some("Sam".to_string()),
            reporter_contact: Some("0820000000".to_string()),
        };
        let NewRecord::Incident(incident) = payload.into_record().unwrap() else {
            panic!("expected an incident");
        };
        assert_eq!(incident.date, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert_eq!(incident.incident_type, IncidentType::Noise);
    }

    #[test]
    fn unparsable_incident_date_is_rejected() {
        let payload = IncidentPayload {
            date: Some("yesterday".to_string()),
            time: Some("22:15".to_string()),
            location: Some("Block B".to_string()),
            description: Some("Loud music after quiet hours".to_string()),
            incident_type: Some("noise".to_string()),
            reporter_name: Some("Sam".to_string()),
            reporter_contact: Some("0820000000".to_string()),
        };
        assert_eq!(
            payload.into_record(),
            Err(ValidationError::InvalidField("date"))
        );
    }

    #[test]
    fn interest_preferred_date_is_optional() {
        let payload = InterestPayload {
            name: Some("Lwazi".to_string()),
            email: Some("lwazi@example.com".to_string()),
            phone: Some("0831112222".to_string()),
            preferred_date: Some(String::new()),
        };
        let NewRecord::Interest(interest) = payload.into_record().unwrap() else {
            panic!("expected an interest entry");
        };
        assert_eq!(interest.preferred_date, None);
    }

    #[test]
    fn anonymous_suggestion_is_accepted() {
        let payload = SuggestionPayload {
            name: None,
            email: Some(String::new()),
            category: Some("facilities".to_string()),
            suggestion: Some("More study rooms on weekends".to_string()),
        };
        let NewRecord::Suggestion(suggestion) = payload.into_record().unwrap() else {
            panic!("expected a suggestion");
        };
        assert_eq!(suggestion.name, None);
        assert_eq!(suggestion.email, None);
        assert_eq!(suggestion.category, SuggestionCategory::Facilities);
    }

    #[test]
    fn suggestion_without_category_is_missing_fields() {
        let payload = SuggestionPayload {
            suggestion: Some("More study rooms on weekends".to_string()),
            ..SuggestionPayload::default()
        };
        assert_eq!(payload.into_record(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn dates_accept_timestamps() {
        assert_eq!(
            parse_date("2026-05-01T08:30:00Z"),
            NaiveDate::from_ymd_opt(2026, 5, 1)
        );
        assert_eq!(parse_date("01/05/2026"), None);
    }
}
