use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::models::discovery::{
    DeveloperDirectoryQuery, DeveloperPage, PlatformStats, SearchQuery, SearchResults,
};
use crate::services::discovery;
use crate::AppState;

/// Handler for GET /api/developers
pub async fn list_developers(
    State(state): State<AppState>,
    Query(query): Query<DeveloperDirectoryQuery>,
) -> AppResult<Json<DeveloperPage>> {
    Ok(Json(discovery::list_public_developers(&state.db, query).await?))
}

/// Handler for GET /api/search?q=...&type=all|developers|articles
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchResults>> {
    Ok(Json(discovery::search(&state.db, query).await?))
}

pub async fn stats(State(state): State<AppState>) -> AppResult<Json<PlatformStats>> {
    Ok(Json(discovery::platform_stats(&state.db).await?))
}
