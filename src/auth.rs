//! Request guards resolving the acting user.
//!
//! Admin routes need the shared `x-api-key` plus an `x-acting-user-id` naming
//! an admin. Developer and client routes need an `x-acting-user-id` naming a
//! user with that role. The resolved [`Identity`] is handed to the services
//! explicitly; nothing about the caller is kept between requests.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::services::directory::Identity;
use crate::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const ACTING_USER_HEADER: &str = "x-acting-user-id";

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn check_api_key(parts: &Parts, state: &AppState) -> Result<(), AppError> {
    let expected = state.config.admin_api_key.as_str();
    match header(parts, API_KEY_HEADER) {
        Some(key) if !expected.is_empty() && key == expected => Ok(()),
        Some(_) => {
            tracing::warn!("Rejected admin request with an invalid API key");
            Err(AppError::Unauthorized("Invalid API key".to_string()))
        }
        None => Err(AppError::Unauthorized(format!("{API_KEY_HEADER} header is required"))),
    }
}

async fn acting_identity(parts: &Parts, state: &AppState) -> Result<Identity, AppError> {
    let raw = header(parts, ACTING_USER_HEADER)
        .ok_or_else(|| AppError::Unauthorized(format!("{ACTING_USER_HEADER} header is required")))?;
    let user_id: i32 = raw
        .parse()
        .map_err(|_| AppError::Unauthorized(format!("{ACTING_USER_HEADER} must be a user id")))?;
    let identity = state
        .directory
        .lookup(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("Unknown acting user {user_id}")))?;
    if !identity.status.can_sign_in() {
        return Err(AppError::forbidden(format!("Account {user_id} is not active")));
    }
    Ok(identity)
}

/// Any signed-in user, whatever the role.
#[derive(Debug, Clone)]
pub struct AnyUser(pub Identity);

impl FromRequestParts<AppState> for AnyUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        acting_identity(parts, state).await.map(AnyUser)
    }
}

#[derive(Debug, Clone)]
pub struct AdminUser(pub Identity);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        check_api_key(parts, state)?;
        let identity = acting_identity(parts, state).await?;
        identity.require_role(UserRole::Admin)?;
        Ok(AdminUser(identity))
    }
}

#[derive(Debug, Clone)]
pub struct DeveloperUser(pub Identity);

impl FromRequestParts<AppState> for DeveloperUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = acting_identity(parts, state).await?;
        identity.require_role(UserRole::Developer)?;
        Ok(DeveloperUser(identity))
    }
}

#[derive(Debug, Clone)]
pub struct ClientUser(pub Identity);

impl FromRequestParts<AppState> for ClientUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = acting_identity(parts, state).await?;
        identity.require_role(UserRole::Client)?;
        Ok(ClientUser(identity))
    }
}
