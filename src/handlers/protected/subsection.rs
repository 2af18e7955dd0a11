use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use uuid::Uuid;

use crate::api::{SubsectionBrief, SubsectionCreateRequest, SubsectionDetail, SubsectionUpdateRequest};
use crate::app::AppState;
use crate::middleware::{ApiResult, AuthUser};
use crate::pagination::{PageQuery, PageRequest};
use crate::services::SubsectionService;

/// GET /api/subsections - subsections of the caller's journals, paginated
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Vec<SubsectionBrief>> {
    let Query(query) = query?;
    let page = PageRequest::from_query(&query, &state.config.api)?;

    SubsectionService::new(state.store.clone()).get_all(&user, page).await
}

/// POST /api/subsections - create a subsection inside one of the caller's journals
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<SubsectionCreateRequest>, JsonRejection>,
) -> ApiResult<SubsectionDetail> {
    let Json(request) = payload?;

    SubsectionService::new(state.store.clone()).create(&user, request).await
}

/// GET /api/subsections/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<SubsectionDetail> {
    let Path(id) = id?;

    SubsectionService::new(state.store.clone()).get(&user, id).await
}

/// PUT /api/subsections/:id - title is overwritten, variant fields merged
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SubsectionUpdateRequest>, JsonRejection>,
) -> ApiResult<SubsectionDetail> {
    let Path(id) = id?;
    let Json(request) = payload?;

    SubsectionService::new(state.store.clone()).update(&user, request, id).await
}

/// DELETE /api/subsections/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;

    SubsectionService::new(state.store.clone()).delete(&user, id).await
}
