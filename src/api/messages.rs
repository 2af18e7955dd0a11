// Client-facing envelope messages

use uuid::Uuid;

pub const SUBSECTION_CREATE_SUCCESS: &str = "Subsection created successfully!";
pub const SUBSECTIONS_FETCH_SUCCESS: &str = "Subsections fetched successfully!";
pub const SUBSECTION_FETCH_SUCCESS: &str = "Subsection fetched successfully!";
pub const SUBSECTION_UPDATE_SUCCESS: &str = "Subsection updated successfully!";
pub const SUBSECTION_DELETE_SUCCESS: &str = "Subsection deleted successfully!";

pub const JOURNAL_CREATE_SUCCESS: &str = "Journal created successfully!";
pub const JOURNALS_FETCH_SUCCESS: &str = "Journals fetched successfully!";
pub const JOURNAL_FETCH_SUCCESS: &str = "Journal fetched successfully!";
pub const JOURNAL_UPDATE_SUCCESS: &str = "Journal updated successfully!";
pub const JOURNAL_DELETE_SUCCESS: &str = "Journal deleted successfully!";

pub const ASSISTANT_REPLY_SUCCESS: &str = "Assistant replied successfully!";

pub fn journal_not_found(id: Uuid) -> String {
    format!("Journal not found with id: {}", id)
}

pub fn subsection_not_found(id: Uuid) -> String {
    format!("Subsection not found with id: {}", id)
}
