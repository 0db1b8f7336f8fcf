// ==========================================
// Catalogue endpoints
// ==========================================
// Read-only queries over the imported price list. Every route here
// sits behind the catalogue scope guard; handlers only validate their
// parameters and shape repository rows into response bodies.
// ==========================================

use axum::extract::{Path, State};
use axum::Json;

use crate::api::dto::{sections_from_rows, ListedPartDto, PartDetailDto, SearchRequest, SectionDto};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::app::AppState;
use crate::repository::RepositoryError;

/// GET /sections/
pub async fn sections(State(state): State<AppState>) -> ApiResult<Json<Vec<SectionDto>>> {
    let rows = state.catalogue.fetch_hierarchy()?;
    Ok(Json(sections_from_rows(&rows)))
}

/// GET /sections/{group_id}/
///
/// Unknown group ids yield an empty list, not a 404. The group id is
/// an opaque reference handed out by the sections listing, probing it
/// is harmless.
pub async fn products_by_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> ApiResult<Json<Vec<ListedPartDto>>> {
    if group_id < 1 {
        return Err(ApiError::field(
            "group_id",
            "Group id must be a positive integer",
        ));
    }
    let parts = state.catalogue.products_by_group(group_id)?;
    Ok(Json(parts.into_iter().map(ListedPartDto::from).collect()))
}

/// GET /products/{part_number}/
pub async fn product(
    State(state): State<AppState>,
    Path(part_number): Path<String>,
) -> ApiResult<Json<PartDetailDto>> {
    let part_no = validator::part_number(&part_number)?;
    let detail = state.catalogue.part_detail(&part_no).map_err(|e| match e {
        RepositoryError::NotFound { .. } => ApiError::NotFound("No such product".to_string()),
        other => ApiError::from(other),
    })?;
    Ok(Json(PartDetailDto::from(detail)))
}

/// POST /products/search/
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Json<Vec<ListedPartDto>>> {
    let pattern = validator::search_query(&request.search_query)?;
    let matches = state.catalogue.search_parts(&pattern)?;
    Ok(Json(matches.into_iter().map(ListedPartDto::from).collect()))
}
