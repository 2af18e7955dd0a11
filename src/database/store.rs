use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Journal, Subsection};
use crate::pagination::PageRequest;

/// Persistence for journals. Missing ids yield `Ok(None)`, never an error.
///
/// Membership (`Journal::subsection_ids`) is owned by the store. It only
/// changes through `SubsectionStore::attach_subsection`,
/// `SubsectionStore::detach_and_delete_subsection` and `delete_journal`,
/// each of which is a single atomic unit.
#[async_trait]
pub trait JournalStore: Send + Sync {
    async fn find_journal(&self, id: Uuid) -> Result<Option<Journal>, DatabaseError>;

    async fn find_journals_by_creator(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Vec<Journal>, DatabaseError>;

    /// Insert or update title, description and audit. The incoming
    /// `subsection_ids` is ignored; the returned journal carries the stored
    /// membership.
    async fn save_journal(&self, journal: Journal) -> Result<Journal, DatabaseError>;

    /// Detach and delete every subsection of the journal, then the journal.
    async fn delete_journal(&self, id: Uuid) -> Result<(), DatabaseError>;
}

/// Persistence for subsections.
#[async_trait]
pub trait SubsectionStore: Send + Sync {
    async fn find_subsection(&self, id: Uuid) -> Result<Option<Subsection>, DatabaseError>;

    /// Subsections whose owning journal was created by `user_id`.
    async fn find_subsections_by_journal_creator(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Vec<Subsection>, DatabaseError>;

    /// All subsections of a journal in journal order.
    async fn find_subsections_by_journal(&self, journal_id: Uuid) -> Result<Vec<Subsection>, DatabaseError>;

    /// Insert a new subsection and append it to the end of its journal.
    /// `NotFound` when the journal is gone, `Constraint` when the subsection
    /// has no journal or its id is taken.
    async fn attach_subsection(&self, subsection: Subsection) -> Result<Subsection, DatabaseError>;

    /// Update title, variant payload and audit of an existing subsection.
    /// The stored journal back-reference is kept as is.
    async fn save_subsection(&self, subsection: Subsection) -> Result<Subsection, DatabaseError>;

    /// Remove the subsection from its journal, then delete it.
    async fn detach_and_delete_subsection(&self, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait Store: JournalStore + SubsectionStore {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
