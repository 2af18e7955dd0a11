use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Audit, Location};

/// Discriminator carried in the `type` field of every subsection payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubsectionType {
    Activity,
    Sightseeing,
    Route,
}

impl SubsectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubsectionType::Activity => "ACTIVITY",
            SubsectionType::Sightseeing => "SIGHTSEEING",
            SubsectionType::Route => "ROUTE",
        }
    }
}

impl std::fmt::Display for SubsectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Dining,
    Hiking,
    Swimming,
    Shopping,
    Sports,
    Entertainment,
    Cultural,
    Relaxation,
    Adventure,
    Other,
}

/// Variant-specific payload of a subsection.
///
/// Serialized inline with the shared fields, tagged by `type`:
/// `{"type": "ACTIVITY", "activityType": "DINING", "location": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum SubsectionKind {
    Activity {
        activity_type: ActivityType,
        location: Location,
    },
    Sightseeing {
        location: Location,
    },
    Route {
        #[serde(default)]
        waypoints: Vec<Location>,
    },
}

impl SubsectionKind {
    pub fn subsection_type(&self) -> SubsectionType {
        match self {
            SubsectionKind::Activity { .. } => SubsectionType::Activity,
            SubsectionKind::Sightseeing { .. } => SubsectionType::Sightseeing,
            SubsectionKind::Route { .. } => SubsectionType::Route,
        }
    }
}

/// An entry inside a journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    pub id: Uuid,
    pub title: String,
    /// Back-reference to the owning journal; `None` only while being removed.
    pub journal_id: Option<Uuid>,
    pub audit: Audit,
    pub kind: SubsectionKind,
}

impl Subsection {
    pub fn subsection_type(&self) -> SubsectionType {
        self.kind.subsection_type()
    }
}
