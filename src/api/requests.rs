use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{ActivityType, Location, SubsectionKind, SubsectionType};

/// `POST /api/subsections`
///
/// The variant fields sit next to the shared ones, selected by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsectionCreateRequest {
    pub title: String,
    pub journal_id: Uuid,
    #[serde(flatten)]
    pub kind: SubsectionKind,
}

/// `PUT /api/subsections/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsectionUpdateRequest {
    pub title: String,
    #[serde(flatten)]
    pub changes: SubsectionChanges,
}

/// Variant-specific part of an update. Absent optional fields leave the
/// stored values untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum SubsectionChanges {
    Activity {
        activity_type: ActivityType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        location: Option<Location>,
    },
    Sightseeing {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        location: Option<Location>,
    },
    Route {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        waypoints: Option<Vec<Location>>,
    },
}

impl SubsectionChanges {
    pub fn subsection_type(&self) -> SubsectionType {
        match self {
            SubsectionChanges::Activity { .. } => SubsectionType::Activity,
            SubsectionChanges::Sightseeing { .. } => SubsectionType::Sightseeing,
            SubsectionChanges::Route { .. } => SubsectionType::Route,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalCreateRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_reads_variant_fields_inline() {
        let journal_id = Uuid::new_v4();
        let request: SubsectionCreateRequest = serde_json::from_value(json!({
            "title": "Lunch",
            "journalId": journal_id,
            "type": "ACTIVITY",
            "activityType": "DINING",
            "location": {"latitude": 40.0, "longitude": -73.0}
        }))
        .unwrap();

        assert_eq!(request.journal_id, journal_id);
        assert_eq!(
            request.kind,
            SubsectionKind::Activity {
                activity_type: ActivityType::Dining,
                location: Location::new(40.0, -73.0),
            }
        );
    }

    #[test]
    fn update_request_optional_fields_default_to_none() {
        let request: SubsectionUpdateRequest = serde_json::from_value(json!({
            "title": "Walk",
            "type": "ROUTE"
        }))
        .unwrap();
        assert_eq!(request.changes, SubsectionChanges::Route { waypoints: None });
    }

    #[test]
    fn unknown_discriminator_is_rejected() {
        let err = serde_json::from_value::<SubsectionUpdateRequest>(json!({
            "title": "Boat",
            "type": "CRUISE"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("CRUISE"), "{}", err);
    }
}
