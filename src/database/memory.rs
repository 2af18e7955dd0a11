use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Journal, Subsection};
use crate::database::store::{JournalStore, Store, SubsectionStore};
use crate::pagination::{PageRequest, SortField};

#[derive(Default)]
struct Tables {
    journals: HashMap<Uuid, Journal>,
    subsections: HashMap<Uuid, Subsection>,
}

/// Process-local store used when no `DATABASE_URL` is configured, and by tests.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_journals(a: &Journal, b: &Journal, field: SortField) -> Ordering {
    match field {
        SortField::Title | SortField::Type => a.title.cmp(&b.title),
        SortField::CreatedAt => a.audit.created_at.cmp(&b.audit.created_at),
        SortField::LastModifiedAt => a.audit.last_modified_at.cmp(&b.audit.last_modified_at),
    }
}

fn compare_subsections(a: &Subsection, b: &Subsection, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.cmp(&b.title),
        SortField::Type => a.subsection_type().as_str().cmp(b.subsection_type().as_str()),
        SortField::CreatedAt => a.audit.created_at.cmp(&b.audit.created_at),
        SortField::LastModifiedAt => a.audit.last_modified_at.cmp(&b.audit.last_modified_at),
    }
}

#[async_trait]
impl JournalStore for InMemoryStore {
    async fn find_journal(&self, id: Uuid) -> Result<Option<Journal>, DatabaseError> {
        Ok(self.tables.read().await.journals.get(&id).cloned())
    }

    async fn find_journals_by_creator(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Vec<Journal>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut journals: Vec<Journal> = tables
            .journals
            .values()
            .filter(|j| j.is_created_by(user_id))
            .cloned()
            .collect();
        journals.sort_by(|a, b| page.sort_dir.apply(compare_journals(a, b, page.sort_by)));
        Ok(page.slice(journals))
    }

    async fn save_journal(&self, mut journal: Journal) -> Result<Journal, DatabaseError> {
        let mut tables = self.tables.write().await;
        journal.subsection_ids = tables
            .journals
            .get(&journal.id)
            .map(|stored| stored.subsection_ids.clone())
            .unwrap_or_default();
        tables.journals.insert(journal.id, journal.clone());
        Ok(journal)
    }

    async fn delete_journal(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let journal = tables
            .journals
            .remove(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("journal {}", id)))?;

        for subsection_id in &journal.subsection_ids {
            tables.subsections.remove(subsection_id);
        }
        tables.subsections.retain(|_, s| s.journal_id != Some(id));
        Ok(())
    }
}

#[async_trait]
impl SubsectionStore for InMemoryStore {
    async fn find_subsection(&self, id: Uuid) -> Result<Option<Subsection>, DatabaseError> {
        Ok(self.tables.read().await.subsections.get(&id).cloned())
    }

    async fn find_subsections_by_journal_creator(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Vec<Subsection>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut subsections: Vec<Subsection> = tables
            .subsections
            .values()
            .filter(|s| {
                s.journal_id
                    .and_then(|jid| tables.journals.get(&jid))
                    .is_some_and(|j| j.is_created_by(user_id))
            })
            .cloned()
            .collect();
        subsections.sort_by(|a, b| page.sort_dir.apply(compare_subsections(a, b, page.sort_by)));
        Ok(page.slice(subsections))
    }

    async fn find_subsections_by_journal(&self, journal_id: Uuid) -> Result<Vec<Subsection>, DatabaseError> {
        let tables = self.tables.read().await;
        let Some(journal) = tables.journals.get(&journal_id) else {
            return Ok(Vec::new());
        };
        Ok(journal
            .subsection_ids
            .iter()
            .filter_map(|id| tables.subsections.get(id))
            .cloned()
            .collect())
    }

    async fn attach_subsection(&self, subsection: Subsection) -> Result<Subsection, DatabaseError> {
        let journal_id = subsection
            .journal_id
            .ok_or_else(|| DatabaseError::Constraint(format!("subsection {} has no journal", subsection.id)))?;

        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        if tables.subsections.contains_key(&subsection.id) {
            return Err(DatabaseError::Constraint(format!("subsection {} already exists", subsection.id)));
        }
        let journal = tables
            .journals
            .get_mut(&journal_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("journal {}", journal_id)))?;

        journal.attach(subsection.id);
        tables.subsections.insert(subsection.id, subsection.clone());
        Ok(subsection)
    }

    async fn save_subsection(&self, mut subsection: Subsection) -> Result<Subsection, DatabaseError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .subsections
            .get_mut(&subsection.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("subsection {}", subsection.id)))?;

        subsection.journal_id = stored.journal_id;
        *stored = subsection.clone();
        Ok(subsection)
    }

    async fn detach_and_delete_subsection(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let subsection = tables
            .subsections
            .remove(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("subsection {}", id)))?;

        if let Some(journal) = subsection.journal_id.and_then(|jid| tables.journals.get_mut(&jid)) {
            journal.detach(id);
        }
        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
