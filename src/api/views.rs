use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Audit, Journal, Subsection, SubsectionKind, SubsectionType};

/// Full projection of a subsection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsectionDetail {
    pub id: Uuid,
    pub title: String,
    pub journal_id: Option<Uuid>,
    #[serde(flatten)]
    pub kind: SubsectionKind,
    pub audit: Audit,
}

impl From<&Subsection> for SubsectionDetail {
    fn from(subsection: &Subsection) -> Self {
        Self {
            id: subsection.id,
            title: subsection.title.clone(),
            journal_id: subsection.journal_id,
            kind: subsection.kind.clone(),
            audit: subsection.audit.clone(),
        }
    }
}

/// List projection; carries the owning journal's id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsectionBrief {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub subsection_type: SubsectionType,
    pub journal_id: Option<Uuid>,
}

impl From<&Subsection> for SubsectionBrief {
    fn from(subsection: &Subsection) -> Self {
        Self {
            id: subsection.id,
            title: subsection.title.clone(),
            subsection_type: subsection.subsection_type(),
            journal_id: subsection.journal_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalBrief {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub subsection_count: usize,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

impl From<&Journal> for JournalBrief {
    fn from(journal: &Journal) -> Self {
        Self {
            id: journal.id,
            title: journal.title.clone(),
            description: journal.description.clone(),
            subsection_count: journal.subsection_ids.len(),
            created_at: journal.audit.created_at,
            last_modified_at: journal.audit.last_modified_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDetail {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub audit: Audit,
    pub subsections: Vec<SubsectionBrief>,
}

impl JournalDetail {
    pub fn new(journal: &Journal, subsections: &[Subsection]) -> Self {
        Self {
            id: journal.id,
            title: journal.title.clone(),
            description: journal.description.clone(),
            audit: journal.audit.clone(),
            subsections: subsections.iter().map(SubsectionBrief::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReplyView {
    pub reply: String,
}
