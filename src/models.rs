use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PENDING_STATUS: &str = "pending";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum RecordKind {
    Application,
    Incident,
    Interest,
    Suggestion,
}

impl RecordKind {
    /// Generic message returned to the client when the insert fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            RecordKind::Application => "Failed to submit application",
            RecordKind::Incident => "Failed to submit incident report",
            RecordKind::Interest => "Failed to add to waitlist",
            RecordKind::Suggestion => "Failed to submit suggestion",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            RecordKind::Application => "/api/applications",
            RecordKind::Incident => "/api/incidents",
            RecordKind::Interest => "/api/interest",
            RecordKind::Suggestion => "/api/suggestions",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Application => "application",
            RecordKind::Incident => "incident",
            RecordKind::Interest => "interest",
            RecordKind::Suggestion => "suggestion",
        };
        f.write_str(label)
    }
}

/// Closed set parsed from the lowercase wire value.
macro_rules! choice_enum {
    ($name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(RoomType {
    Single => "single",
    Double => "double",
});

choice_enum!(IncidentType {
    Safety => "safety",
    Maintenance => "maintenance",
    Noise => "noise",
    Other => "other",
});

choice_enum!(SuggestionCategory {
    Facilities => "facilities",
    Activities => "activities",
    Food => "food",
    Rules => "rules",
    Other => "other",
});

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub name: String,
    pub id_number: Option<String>,
    pub email: String,
    pub phone: String,
    pub room_type: RoomType,
    pub course: String,
    pub year_of_study: String,
    pub nsfas_status: bool,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub description: String,
    pub incident_type: IncidentType,
    pub reporter_name: String,
    pub reporter_contact: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInterest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub preferred_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSuggestion {
    pub name: Option<String>,
    pub email: Option<String>,
    pub category: SuggestionCategory,
    pub suggestion: String,
}

/// A validated submission ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    Application(NewApplication),
    Incident(NewIncident),
    Interest(NewInterest),
    Suggestion(NewSuggestion),
}

impl NewRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            NewRecord::Application(_) => RecordKind::Application,
            NewRecord::Incident(_) => RecordKind::Incident,
            NewRecord::Interest(_) => RecordKind::Interest,
            NewRecord::Suggestion(_) => RecordKind::Suggestion,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub name: String,
    pub id_number: Option<String>,
    pub email: String,
    pub phone: String,
    pub room_type: String,
    pub course: String,
    pub year_of_study: String,
    pub nsfas_status: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub description: String,
    #[serde(rename = "type")]
    pub incident_type: String,
    pub reporter_name: String,
    pub reporter_contact: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub preferred_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecord {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub category: String,
    pub suggestion: String,
    pub created_at: DateTime<Utc>,
}

/// Result envelope shared by every submission endpoint and the form client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SubmissionResponse {
    pub fn created(id: Uuid) -> Self {
        Self {
            success: true,
            id: Some(id),
            error: None,
            details: None,
        }
    }

    pub fn failed(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error.into()),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_parse_only_their_closed_set() {
        assert_eq!("single".parse::<RoomType>(), Ok(RoomType::Single));
        assert_eq!("double".parse::<RoomType>(), Ok(RoomType::Double));
        assert!("triple".parse::<RoomType>().is_err());
        assert!("Single".parse::<RoomType>().is_err());
        assert_eq!("noise".parse::<IncidentType>(), Ok(IncidentType::Noise));
        assert!("fire".parse::<IncidentType>().is_err());
        assert_eq!(
            "food".parse::<SuggestionCategory>(),
            Ok(SuggestionCategory::Food)
        );
        assert!("parking".parse::<SuggestionCategory>().is_err());
    }

    #[test]
    fn created_envelope_omits_error_fields() {
        let id = Uuid::new_v4();
        let value = serde_json::to_value(SubmissionResponse::created(id)).unwrap();
        assert_eq!(value, serde_json::json!({ "success": true, "id": id }));
    }

    #[test]
    fn failed_envelope_carries_details_only_when_given() {
        let value =
            serde_json::to_value(SubmissionResponse::failed("Missing required fields", None))
                .unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "success": false, "error": "Missing required fields" })
        );

        let value = serde_json::to_value(SubmissionResponse::failed(
            "Failed to submit suggestion",
            Some("connection refused".to_string()),
        ))
        .unwrap();
        assert_eq!(value["details"], "connection refused");
    }

    #[test]
    fn kinds_map_to_their_endpoints() {
        assert_eq!(RecordKind::Interest.endpoint(), "/api/interest");
        assert_eq!(RecordKind::Incident.to_string(), "incident");
        assert_eq!(
            RecordKind::Interest.failure_message(),
            "Failed to add to waitlist"
        );
    }
}
