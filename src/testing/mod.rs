use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{Journal, Subsection};
use crate::database::{DatabaseError, InMemoryStore, JournalStore, Store, SubsectionStore};
use crate::middleware::AuthUser;
use crate::pagination::PageRequest;

/// Shared fixtures for service tests: an in-memory store plus two callers.
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub owner: AuthUser,
    pub stranger: AuthUser,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            owner: Self::user("owner@example.com"),
            stranger: Self::user("stranger@example.com"),
        }
    }

    pub fn user(email: &str) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
        }
    }

    pub fn store(&self) -> Arc<dyn Store> {
        self.store.clone()
    }

    /// The same store behind a `LaggingStore`, so concurrent requests interleave
    pub fn lagging_store(&self, lag: Duration) -> Arc<dyn Store> {
        Arc::new(LaggingStore {
            inner: self.store.clone(),
            lag,
        })
    }

    /// Persist an empty journal created by the owner
    pub async fn journal(&self, title: &str) -> Journal {
        self.store
            .save_journal(Journal::new(title, None, self.owner.user_id))
            .await
            .expect("save journal")
    }
}

/// Delegates to an `InMemoryStore`, sleeping after every read so that
/// read-then-write sequences of concurrent callers overlap.
pub struct LaggingStore {
    inner: Arc<InMemoryStore>,
    lag: Duration,
}

#[async_trait]
impl JournalStore for LaggingStore {
    async fn find_journal(&self, id: Uuid) -> Result<Option<Journal>, DatabaseError> {
        let found = self.inner.find_journal(id).await;
        tokio::time::sleep(self.lag).await;
        found
    }

    async fn find_journals_by_creator(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Vec<Journal>, DatabaseError> {
        self.inner.find_journals_by_creator(user_id, page).await
    }

    async fn save_journal(&self, journal: Journal) -> Result<Journal, DatabaseError> {
        self.inner.save_journal(journal).await
    }

    async fn delete_journal(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.inner.delete_journal(id).await
    }
}

#[async_trait]
impl SubsectionStore for LaggingStore {
    async fn find_subsection(&self, id: Uuid) -> Result<Option<Subsection>, DatabaseError> {
        let found = self.inner.find_subsection(id).await;
        tokio::time::sleep(self.lag).await;
        found
    }

    async fn find_subsections_by_journal_creator(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Vec<Subsection>, DatabaseError> {
        self.inner.find_subsections_by_journal_creator(user_id, page).await
    }

    async fn find_subsections_by_journal(&self, journal_id: Uuid) -> Result<Vec<Subsection>, DatabaseError> {
        self.inner.find_subsections_by_journal(journal_id).await
    }

    async fn attach_subsection(&self, subsection: Subsection) -> Result<Subsection, DatabaseError> {
        self.inner.attach_subsection(subsection).await
    }

    async fn save_subsection(&self, subsection: Subsection) -> Result<Subsection, DatabaseError> {
        self.inner.save_subsection(subsection).await
    }

    async fn detach_and_delete_subsection(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.inner.detach_and_delete_subsection(id).await
    }
}

#[async_trait]
impl Store for LaggingStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn journal_fixture_is_owned_by_owner() {
        let ctx = TestContext::new();
        let journal = ctx.journal("Iceland").await;
        assert!(journal.is_created_by(ctx.owner.user_id));
        assert!(!journal.is_created_by(ctx.stranger.user_id));
    }

    #[tokio::test]
    async fn lagging_store_shares_the_underlying_tables() {
        let ctx = TestContext::new();
        let journal = ctx.journal("Faroe").await;
        let lagging = ctx.lagging_store(Duration::from_millis(1));
        assert_eq!(lagging.find_journal(journal.id).await.unwrap(), Some(journal));
    }
}
