use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::api::{messages, JournalBrief, JournalCreateRequest, JournalDetail, JournalUpdateRequest};
use crate::database::models::Journal;
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::pagination::{PageRequest, PaginationError, SortField};
use crate::services::access::authorize;
use crate::services::resolver::validate_title;
use crate::types::Operation;

/// Journal CRUD. A journal owns its subsections; deleting one removes them too.
pub struct JournalService {
    store: Arc<dyn Store>,
}

impl JournalService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, caller: &AuthUser, request: JournalCreateRequest) -> ApiResult<JournalDetail> {
        info!("Creating journal with title: '{}'", request.title);

        validate_title(&request.title)?;
        let journal = Journal::new(request.title, request.description, caller.user_id);
        let saved = self.store.save_journal(journal).await?;

        info!("Successfully created journal with ID: {}", saved.id);
        Ok(ApiResponse::created(
            messages::JOURNAL_CREATE_SUCCESS,
            JournalDetail::new(&saved, &[]),
        ))
    }

    pub async fn get_all(&self, caller: &AuthUser, page: PageRequest) -> ApiResult<Vec<JournalBrief>> {
        info!(
            "Fetching journals for user {} - page: {}, size: {}",
            caller.user_id, page.page_number, page.page_size
        );

        if page.sort_by == SortField::Type {
            return Err(PaginationError::UnsupportedSortField(SortField::Type.name()).into());
        }

        let journals = self.store.find_journals_by_creator(caller.user_id, &page).await?;
        let briefs: Vec<JournalBrief> = journals.iter().map(JournalBrief::from).collect();

        info!("Successfully fetched {} journals", briefs.len());
        Ok(ApiResponse::success(messages::JOURNALS_FETCH_SUCCESS, briefs))
    }

    pub async fn get(&self, caller: &AuthUser, id: Uuid) -> ApiResult<JournalDetail> {
        info!("Fetching journal with id: {}", id);

        let journal = self.load(id).await?;
        authorize(caller, &journal, Operation::Access, id)?;
        let subsections = self.store.find_subsections_by_journal(id).await?;

        Ok(ApiResponse::success(
            messages::JOURNAL_FETCH_SUCCESS,
            JournalDetail::new(&journal, &subsections),
        ))
    }

    /// Only fields present in the request are changed.
    pub async fn update(&self, caller: &AuthUser, request: JournalUpdateRequest, id: Uuid) -> ApiResult<JournalDetail> {
        info!("Updating journal with id: {}", id);

        let mut journal = self.load(id).await?;
        authorize(caller, &journal, Operation::Update, id)?;

        if let Some(title) = request.title {
            validate_title(&title)?;
            journal.title = title;
        }
        if let Some(description) = request.description {
            journal.description = Some(description);
        }
        journal.audit.touch(caller.user_id);

        let saved = self.store.save_journal(journal).await?;
        let subsections = self.store.find_subsections_by_journal(id).await?;

        info!("Successfully updated journal with id: {}", id);
        Ok(ApiResponse::success(
            messages::JOURNAL_UPDATE_SUCCESS,
            JournalDetail::new(&saved, &subsections),
        ))
    }

    pub async fn delete(&self, caller: &AuthUser, id: Uuid) -> ApiResult<()> {
        info!("Deleting journal with id: {}", id);

        let journal = self.load(id).await?;
        authorize(caller, &journal, Operation::Delete, id)?;

        self.store.delete_journal(id).await?;

        info!("Successfully deleted journal with id: {}", id);
        Ok(ApiResponse::message_only(messages::JOURNAL_DELETE_SUCCESS))
    }

    async fn load(&self, id: Uuid) -> Result<Journal, ApiError> {
        self.store
            .find_journal(id)
            .await?
            .ok_or_else(|| ApiError::not_found(messages::journal_not_found(id)))
    }
}
