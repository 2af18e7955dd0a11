use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Audit;

/// A travel log. Owns the ordered list of its subsection ids; each subsection
/// points back through `Subsection::journal_id`. Only the store changes the
/// list, so both sides move together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub audit: Audit,
    pub subsection_ids: Vec<Uuid>,
}

impl Journal {
    pub fn new(title: impl Into<String>, description: Option<String>, creator: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description,
            audit: Audit::new(creator),
            subsection_ids: Vec::new(),
        }
    }

    pub fn is_created_by(&self, user_id: Uuid) -> bool {
        self.audit.created_by == user_id
    }

    /// Append a subsection id, ignoring duplicates.
    pub fn attach(&mut self, subsection_id: Uuid) {
        if !self.subsection_ids.contains(&subsection_id) {
            self.subsection_ids.push(subsection_id);
        }
    }

    /// Returns true when the id was present.
    pub fn detach(&mut self, subsection_id: Uuid) -> bool {
        let before = self.subsection_ids.len();
        self.subsection_ids.retain(|id| *id != subsection_id);
        before != self.subsection_ids.len()
    }
}
