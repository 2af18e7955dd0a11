use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who created and last touched a record. `created_by` drives authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_modified_by: Uuid,
    pub last_modified_at: DateTime<Utc>,
}

impl Audit {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            created_by: user_id,
            created_at: now,
            last_modified_by: user_id,
            last_modified_at: now,
        }
    }

    pub fn touch(&mut self, user_id: Uuid) {
        self.last_modified_by = user_id;
        self.last_modified_at = Utc::now();
    }
}
