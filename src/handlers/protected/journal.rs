use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use uuid::Uuid;

use crate::api::{JournalBrief, JournalCreateRequest, JournalDetail, JournalUpdateRequest};
use crate::app::AppState;
use crate::middleware::{ApiResult, AuthUser};
use crate::pagination::{PageQuery, PageRequest};
use crate::services::JournalService;

/// GET /api/journals - the caller's journals, paginated
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Vec<JournalBrief>> {
    let Query(query) = query?;
    let page = PageRequest::from_query(&query, &state.config.api)?;

    JournalService::new(state.store.clone()).get_all(&user, page).await
}

/// POST /api/journals
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<JournalCreateRequest>, JsonRejection>,
) -> ApiResult<JournalDetail> {
    let Json(request) = payload?;

    JournalService::new(state.store.clone()).create(&user, request).await
}

/// GET /api/journals/:id - journal with its subsections in order
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<JournalDetail> {
    let Path(id) = id?;

    JournalService::new(state.store.clone()).get(&user, id).await
}

/// PUT /api/journals/:id - absent fields are left unchanged
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<JournalUpdateRequest>, JsonRejection>,
) -> ApiResult<JournalDetail> {
    let Path(id) = id?;
    let Json(request) = payload?;

    JournalService::new(state.store.clone()).update(&user, request, id).await
}

/// DELETE /api/journals/:id - removes the journal together with its subsections
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;

    JournalService::new(state.store.clone()).delete(&user, id).await
}
