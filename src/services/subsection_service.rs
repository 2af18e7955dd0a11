use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::api::{messages, SubsectionBrief, SubsectionCreateRequest, SubsectionDetail, SubsectionUpdateRequest};
use crate::database::models::{Journal, Subsection};
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::pagination::PageRequest;
use crate::services::access::authorize;
use crate::services::resolver::{validate_title, SubsectionResolver};
use crate::types::Operation;

/// Subsection CRUD with journal ownership checks
pub struct SubsectionService {
    store: Arc<dyn Store>,
}

impl SubsectionService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, caller: &AuthUser, request: SubsectionCreateRequest) -> ApiResult<SubsectionDetail> {
        info!(
            "Creating subsection with title: '{}' for journal with ID: {}",
            request.title, request.journal_id
        );

        let journal = self
            .store
            .find_journal(request.journal_id)
            .await?
            .ok_or_else(|| ApiError::not_found(messages::journal_not_found(request.journal_id)))?;

        authorize(caller, &journal, Operation::Create, journal.id)?;

        let mut subsection = SubsectionResolver::create(request, caller.user_id)?;
        subsection.journal_id = Some(journal.id);

        let saved = self.store.attach_subsection(subsection).await?;

        info!("Successfully created subsection with ID: {} linked to journal: {:?}", saved.id, saved.journal_id);

        Ok(ApiResponse::created(
            messages::SUBSECTION_CREATE_SUCCESS,
            SubsectionDetail::from(&saved),
        ))
    }

    pub async fn get_all(&self, caller: &AuthUser, page: PageRequest) -> ApiResult<Vec<SubsectionBrief>> {
        info!(
            "Fetching all subsections with pagination - page: {}, size: {}, sortBy: {}, sortDir: {}",
            page.page_number,
            page.page_size,
            page.sort_by.name(),
            page.sort_dir.to_sql()
        );

        let subsections = self
            .store
            .find_subsections_by_journal_creator(caller.user_id, &page)
            .await?;
        let briefs: Vec<SubsectionBrief> = subsections.iter().map(SubsectionBrief::from).collect();

        info!("Successfully fetched {} subsections for user {}", briefs.len(), caller.user_id);

        Ok(ApiResponse::success(messages::SUBSECTIONS_FETCH_SUCCESS, briefs))
    }

    pub async fn get(&self, caller: &AuthUser, id: Uuid) -> ApiResult<SubsectionDetail> {
        info!("Fetching subsection with id: {}", id);

        let subsection = self.load(id).await?;
        let journal = self.owning_journal(&subsection).await?;
        authorize(caller, &journal, Operation::Access, id)?;

        info!("Successfully fetched subsection with title: '{}'", subsection.title);

        Ok(ApiResponse::success(
            messages::SUBSECTION_FETCH_SUCCESS,
            SubsectionDetail::from(&subsection),
        ))
    }

    pub async fn update(
        &self,
        caller: &AuthUser,
        request: SubsectionUpdateRequest,
        id: Uuid,
    ) -> ApiResult<SubsectionDetail> {
        info!("Updating subsection with id: {}", id);

        let mut subsection = self.load(id).await?;
        let journal = self.owning_journal(&subsection).await?;
        authorize(caller, &journal, Operation::Update, id)?;

        validate_title(&request.title)?;
        subsection.title = request.title;
        SubsectionResolver::apply_update(&mut subsection, request.changes)?;
        subsection.audit.touch(caller.user_id);

        let saved = self.store.save_subsection(subsection).await?;
        info!("Successfully updated subsection with id: {}", id);

        Ok(ApiResponse::success(
            messages::SUBSECTION_UPDATE_SUCCESS,
            SubsectionDetail::from(&saved),
        ))
    }

    pub async fn delete(&self, caller: &AuthUser, id: Uuid) -> ApiResult<()> {
        info!("Deleting subsection with id: {}", id);

        let subsection = self.load(id).await?;
        let journal = self.owning_journal(&subsection).await?;
        authorize(caller, &journal, Operation::Delete, id)?;

        info!("Detaching subsection from journal with ID: {}", journal.id);
        self.store.detach_and_delete_subsection(id).await?;

        info!("Successfully deleted subsection with id: {}", id);
        Ok(ApiResponse::message_only(messages::SUBSECTION_DELETE_SUCCESS))
    }

    async fn load(&self, id: Uuid) -> Result<Subsection, ApiError> {
        self.store
            .find_subsection(id)
            .await?
            .ok_or_else(|| ApiError::not_found(messages::subsection_not_found(id)))
    }

    async fn owning_journal(&self, subsection: &Subsection) -> Result<Journal, ApiError> {
        let journal_id = subsection
            .journal_id
            .ok_or_else(|| ApiError::not_found(format!("Subsection {} has no journal", subsection.id)))?;

        self.store
            .find_journal(journal_id)
            .await?
            .ok_or_else(|| ApiError::not_found(messages::journal_not_found(journal_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SubsectionChanges;
    use crate::database::models::{ActivityType, Location, SubsectionKind};
    use crate::database::{JournalStore, SubsectionStore};
    use crate::pagination::{SortDirection, SortField};
    use crate::testing::TestContext;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::time::Duration;

    fn lunch(journal_id: Uuid) -> SubsectionCreateRequest {
        SubsectionCreateRequest {
            title: "Lunch".to_string(),
            journal_id,
            kind: SubsectionKind::Activity {
                activity_type: ActivityType::Dining,
                location: Location::new(40.0, -73.0),
            },
        }
    }

    async fn created(service: &SubsectionService, caller: &AuthUser, request: SubsectionCreateRequest) -> SubsectionDetail {
        service.create(caller, request).await.unwrap().into_data().unwrap()
    }

    #[tokio::test]
    async fn create_returns_201_with_detail_view() {
        let ctx = TestContext::new();
        let journal = ctx.journal("New York").await;
        let service = SubsectionService::new(ctx.store());

        let response = service.create(&ctx.owner, lunch(journal.id)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.message(), messages::SUBSECTION_CREATE_SUCCESS);

        let data = serde_json::to_value(response.data().unwrap()).unwrap();
        assert_eq!(data["title"], "Lunch");
        assert_eq!(data["type"], "ACTIVITY");
        assert_eq!(data["activityType"], "DINING");
        assert_eq!(data["location"], json!({"latitude": 40.0, "longitude": -73.0}));
    }

    #[tokio::test]
    async fn create_attaches_to_exactly_one_journal() {
        let ctx = TestContext::new();
        let journal = ctx.journal("Rome").await;
        let other = ctx.journal("Milan").await;
        let service = SubsectionService::new(ctx.store());

        let detail = created(&service, &ctx.owner, lunch(journal.id)).await;

        let journal = ctx.store.find_journal(journal.id).await.unwrap().unwrap();
        let other = ctx.store.find_journal(other.id).await.unwrap().unwrap();
        assert_eq!(journal.subsection_ids, vec![detail.id]);
        assert!(other.subsection_ids.is_empty());

        let stored = ctx.store.find_subsection(detail.id).await.unwrap().unwrap();
        assert_eq!(stored.journal_id, Some(journal.id));
    }

    #[tokio::test]
    async fn missing_journal_or_subsection_is_not_found() {
        let ctx = TestContext::new();
        let service = SubsectionService::new(ctx.store());
        let missing = Uuid::new_v4();

        let err = service.create(&ctx.owner, lunch(missing)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(matches!(service.get(&ctx.owner, missing).await.unwrap_err(), ApiError::NotFound(_)));
        assert!(matches!(service.delete(&ctx.owner, missing).await.unwrap_err(), ApiError::NotFound(_)));

        let update = SubsectionUpdateRequest {
            title: "x".to_string(),
            changes: SubsectionChanges::Sightseeing { location: None },
        };
        assert!(matches!(
            service.update(&ctx.owner, update, missing).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn every_operation_rejects_non_creators() {
        let ctx = TestContext::new();
        let journal = ctx.journal("Lisbon").await;
        let service = SubsectionService::new(ctx.store());
        let detail = created(&service, &ctx.owner, lunch(journal.id)).await;

        let err = service.create(&ctx.stranger, lunch(journal.id)).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert!(err.message().contains("create"));

        let err = service.get(&ctx.stranger, detail.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let update = SubsectionUpdateRequest {
            title: "Stolen".to_string(),
            changes: SubsectionChanges::Activity {
                activity_type: ActivityType::Other,
                location: None,
            },
        };
        let err = service.update(&ctx.stranger, update, detail.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err = service.delete(&ctx.stranger, detail.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert!(err.message().contains(&detail.id.to_string()));

        // Nothing changed
        let stored = ctx.store.find_subsection(detail.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Lunch");
    }

    #[tokio::test]
    async fn update_overwrites_title_and_merges_variant_fields() {
        let ctx = TestContext::new();
        let journal = ctx.journal("Tokyo").await;
        let service = SubsectionService::new(ctx.store());
        let detail = created(&service, &ctx.owner, lunch(journal.id)).await;

        let update = SubsectionUpdateRequest {
            title: "Dinner".to_string(),
            changes: SubsectionChanges::Activity {
                activity_type: ActivityType::Entertainment,
                location: None,
            },
        };
        let updated = service
            .update(&ctx.owner, update, detail.id)
            .await
            .unwrap()
            .into_data()
            .unwrap();

        assert_eq!(updated.title, "Dinner");
        assert_eq!(
            updated.kind,
            SubsectionKind::Activity {
                activity_type: ActivityType::Entertainment,
                location: Location::new(40.0, -73.0),
            }
        );
    }

    #[tokio::test]
    async fn failed_merge_persists_nothing() {
        let ctx = TestContext::new();
        let journal = ctx.journal("Cairo").await;
        let service = SubsectionService::new(ctx.store());
        let detail = created(&service, &ctx.owner, lunch(journal.id)).await;

        let update = SubsectionUpdateRequest {
            title: "Renamed".to_string(),
            changes: SubsectionChanges::Route {
                waypoints: Some(vec![Location::new(1.0, 1.0)]),
            },
        };
        let err = service.update(&ctx.owner, update, detail.id).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));

        let stored = ctx.store.find_subsection(detail.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Lunch");
    }

    #[tokio::test]
    async fn delete_detaches_before_removal() {
        let ctx = TestContext::new();
        let journal = ctx.journal("Oslo").await;
        let service = SubsectionService::new(ctx.store());
        let keep = created(&service, &ctx.owner, lunch(journal.id)).await;
        let gone = created(&service, &ctx.owner, lunch(journal.id)).await;

        let response = service.delete(&ctx.owner, gone.id).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.data().is_none());

        let journal = ctx.store.find_journal(journal.id).await.unwrap().unwrap();
        assert_eq!(journal.subsection_ids, vec![keep.id]);
        assert!(ctx.store.find_subsection(gone.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_all_is_scoped_to_the_callers_journals() {
        let ctx = TestContext::new();
        let mine = ctx.journal("Mine").await;
        let theirs = ctx
            .store
            .save_journal(Journal::new("Theirs", None, ctx.stranger.user_id))
            .await
            .unwrap();
        let service = SubsectionService::new(ctx.store());

        created(&service, &ctx.owner, lunch(mine.id)).await;
        created(&service, &ctx.stranger, lunch(theirs.id)).await;

        let page = PageRequest::new(0, 10, SortField::CreatedAt, SortDirection::Desc);
        let briefs = service.get_all(&ctx.owner, page).await.unwrap().into_data().unwrap();
        assert_eq!(briefs.len(), 1);
        assert_eq!(briefs[0].journal_id, Some(mine.id));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_all_join_the_journal() {
        let ctx = TestContext::new();
        let journal = ctx.journal("Porto").await;
        let journal_id = journal.id;
        let service = Arc::new(SubsectionService::new(ctx.lagging_store(Duration::from_millis(5))));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                let owner = ctx.owner.clone();
                tokio::spawn(async move { service.create(&owner, lunch(journal_id)).await })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            let detail = task.await.unwrap().unwrap().into_data().unwrap();
            ids.push(detail.id);
        }

        let stored = ctx.store.find_journal(journal.id).await.unwrap().unwrap();
        assert_eq!(stored.subsection_ids.len(), ids.len());
        for id in &ids {
            assert!(stored.subsection_ids.contains(id));
            let subsection = ctx.store.find_subsection(*id).await.unwrap().unwrap();
            assert_eq!(subsection.journal_id, Some(journal.id));
        }

        let journals = crate::services::JournalService::new(ctx.store());
        journals.delete(&ctx.owner, journal.id).await.unwrap();
        for id in &ids {
            assert!(ctx.store.find_subsection(*id).await.unwrap().is_none());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_deletes_keep_the_remaining_subsections() {
        let ctx = TestContext::new();
        let journal = ctx.journal("Bergen").await;
        let plain = SubsectionService::new(ctx.store());
        let mut ids = Vec::new();
        for _ in 0..6 {
            ids.push(created(&plain, &ctx.owner, lunch(journal.id)).await.id);
        }

        let service = Arc::new(SubsectionService::new(ctx.lagging_store(Duration::from_millis(5))));
        let (doomed, kept) = ids.split_at(3);
        let tasks: Vec<_> = doomed
            .iter()
            .map(|id| {
                let (service, owner, id) = (service.clone(), ctx.owner.clone(), *id);
                tokio::spawn(async move { service.delete(&owner, id).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = ctx.store.find_journal(journal.id).await.unwrap().unwrap();
        assert_eq!(stored.subsection_ids, kept.to_vec());
    }
}
