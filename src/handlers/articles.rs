use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::auth::{AdminUser, DeveloperUser};
use crate::entities::articles;
use crate::error::AppResult;
use crate::handlers::upload::read_upload_form;
use crate::models::article::{
    AdminArticleFilter, ArticleView, CreateArticleRequest, PublishedArticleFilter,
    RejectArticleRequest, UpdateArticleRequest,
};
use crate::services::articles as article_service;
use crate::AppState;

/// Handler for GET /api/articles
pub async fn list_published(
    State(state): State<AppState>,
    Query(filter): Query<PublishedArticleFilter>,
) -> AppResult<Json<Vec<ArticleView>>> {
    Ok(Json(
        article_service::list_published(&state.db, state.directory.as_ref(), filter).await?,
    ))
}

/// Handler for GET /api/articles/{slug}
pub async fn view_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ArticleView>> {
    Ok(Json(
        article_service::view_article(&state.db, state.directory.as_ref(), &slug).await?,
    ))
}

pub async fn list_own(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
) -> AppResult<Json<Vec<articles::Model>>> {
    Ok(Json(article_service::list_own_articles(&state.db, &developer).await?))
}

pub async fn create_article(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
    Json(req): Json<CreateArticleRequest>,
) -> AppResult<(StatusCode, Json<articles::Model>)> {
    let article = article_service::create_article(&state.db, &developer, req).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn update_article(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
    Path(article_id): Path<i32>,
    Json(req): Json<UpdateArticleRequest>,
) -> AppResult<Json<articles::Model>> {
    Ok(Json(
        article_service::update_article(&state.db, &developer, article_id, req).await?,
    ))
}

pub async fn submit_article(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
    Path(article_id): Path<i32>,
) -> AppResult<Json<articles::Model>> {
    Ok(Json(
        article_service::submit_article(&state.db, &developer, article_id).await?,
    ))
}

/// Handler for PUT /api/developer/articles/{id}/cover
pub async fn set_cover(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
    Path(article_id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Json<articles::Model>> {
    let mut form = read_upload_form(multipart).await?;
    let file = form.require_file()?;
    Ok(Json(
        article_service::set_cover_image(
            &state.db,
            state.file_store.as_ref(),
            &developer,
            article_id,
            file,
        )
        .await?,
    ))
}

pub async fn delete_own(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
    Path(article_id): Path<i32>,
) -> AppResult<StatusCode> {
    article_service::delete_article(&state.db, state.file_store.as_ref(), &developer, article_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_admin(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(filter): Query<AdminArticleFilter>,
) -> AppResult<Json<Vec<ArticleView>>> {
    Ok(Json(
        article_service::list_articles_admin(&state.db, state.directory.as_ref(), filter).await?,
    ))
}

pub async fn approve(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(article_id): Path<i32>,
) -> AppResult<Json<articles::Model>> {
    Ok(Json(article_service::approve_article(&state.db, &admin, article_id).await?))
}

pub async fn reject(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(article_id): Path<i32>,
    Json(req): Json<RejectArticleRequest>,
) -> AppResult<Json<articles::Model>> {
    Ok(Json(
        article_service::reject_article(&state.db, &admin, article_id, &req.reason).await?,
    ))
}

pub async fn hide(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(article_id): Path<i32>,
) -> AppResult<Json<articles::Model>> {
    Ok(Json(article_service::hide_article(&state.db, &admin, article_id).await?))
}

pub async fn restore(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(article_id): Path<i32>,
) -> AppResult<Json<articles::Model>> {
    Ok(Json(article_service::restore_article(&state.db, &admin, article_id).await?))
}

pub async fn delete_admin(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(article_id): Path<i32>,
) -> AppResult<StatusCode> {
    article_service::delete_article(&state.db, state.file_store.as_ref(), &admin, article_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
