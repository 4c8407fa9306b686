//! Accounts, profiles, developer moderation and KYC review.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::ActiveEnum;

use crate::auth::{AdminUser, AnyUser, ClientUser, DeveloperUser};
use crate::entities::{
    client_profiles, developer_profiles,
    kyc_documents::{self, KycDocumentType},
    users::{self, UserStatus},
};
use crate::error::{AppError, AppResult};
use crate::handlers::upload::read_upload_form;
use crate::models::identity::{
    CreateAdminRequest, KycFilter, LoginRequest, RegisterRequest, RejectKycRequest,
    SubmitKycRequest, UpdateClientProfileRequest, UpdateDeveloperProfileRequest, UserFilter,
    UserView,
};
use crate::services::identity;
use crate::AppState;

/// Handler for POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<users::Model>)> {
    let user = identity::register(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<users::Model>> {
    Ok(Json(
        identity::authenticate(&state.db, &req.email, &req.password).await?,
    ))
}

pub async fn me(State(state): State<AppState>, AnyUser(user): AnyUser) -> AppResult<Json<UserView>> {
    Ok(Json(identity::get_user(&state.db, user.id).await?))
}

/// Handler for PUT /api/me/avatar
pub async fn update_avatar(
    State(state): State<AppState>,
    AnyUser(user): AnyUser,
    multipart: Multipart,
) -> AppResult<Json<users::Model>> {
    let mut form = read_upload_form(multipart).await?;
    let file = form.require_file()?;
    Ok(Json(
        identity::update_avatar(&state.db, state.file_store.as_ref(), &user, file).await?,
    ))
}

pub async fn update_developer_profile(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
    Json(req): Json<UpdateDeveloperProfileRequest>,
) -> AppResult<Json<developer_profiles::Model>> {
    Ok(Json(
        identity::update_developer_profile(&state.db, &developer, req).await?,
    ))
}

pub async fn update_client_profile(
    State(state): State<AppState>,
    ClientUser(client): ClientUser,
    Json(req): Json<UpdateClientProfileRequest>,
) -> AppResult<Json<client_profiles::Model>> {
    Ok(Json(identity::update_client_profile(&state.db, &client, req).await?))
}

/// Handler for POST /api/developer/kyc
///
/// Multipart form with a `file` part plus `document_type` and `document_number` fields.
pub async fn submit_kyc(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<kyc_documents::Model>)> {
    let mut form = read_upload_form(multipart).await?;
    let raw_type = form.require_field("document_type")?.to_string();
    let document_type = KycDocumentType::try_from_value(&raw_type)
        .map_err(|_| AppError::validation(format!("Unknown document type {raw_type}")))?;
    let req = SubmitKycRequest {
        document_type,
        document_number: form.require_field("document_number")?.to_string(),
    };
    let file = form.require_file()?;

    let document =
        identity::submit_kyc(&state.db, state.file_store.as_ref(), &developer, req, file).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn list_own_kyc(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
) -> AppResult<Json<Vec<kyc_documents::Model>>> {
    Ok(Json(identity::list_own_kyc(&state.db, &developer).await?))
}

/// Handler for POST /api/admin/admins
pub async fn create_admin(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateAdminRequest>,
) -> AppResult<(StatusCode, Json<users::Model>)> {
    let (user, created) = identity::create_admin(&state.db, req).await?;
    tracing::info!(user_id = user.id, created, acting_user_id = admin.id, "Admin account requested");
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(filter): Query<UserFilter>,
) -> AppResult<Json<Vec<users::Model>>> {
    Ok(Json(identity::list_users(&state.db, filter).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<UserView>> {
    Ok(Json(identity::get_user(&state.db, user_id).await?))
}

pub async fn verify_developer(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<users::Model>> {
    Ok(Json(
        identity::moderate_developer(&state.db, &admin, user_id, UserStatus::Verified).await?,
    ))
}

pub async fn reject_developer(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<users::Model>> {
    Ok(Json(
        identity::moderate_developer(&state.db, &admin, user_id, UserStatus::Rejected).await?,
    ))
}

pub async fn suspend_developer(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<users::Model>> {
    Ok(Json(
        identity::moderate_developer(&state.db, &admin, user_id, UserStatus::Suspended).await?,
    ))
}

pub async fn list_kyc(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(filter): Query<KycFilter>,
) -> AppResult<Json<Vec<kyc_documents::Model>>> {
    Ok(Json(identity::list_kyc(&state.db, filter).await?))
}

pub async fn approve_kyc(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(kyc_id): Path<i32>,
) -> AppResult<Json<kyc_documents::Model>> {
    Ok(Json(identity::approve_kyc(&state.db, &admin, kyc_id).await?))
}

pub async fn reject_kyc(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(kyc_id): Path<i32>,
    Json(req): Json<RejectKycRequest>,
) -> AppResult<Json<kyc_documents::Model>> {
    Ok(Json(
        identity::reject_kyc(&state.db, &admin, kyc_id, &req.reason).await?,
    ))
}
