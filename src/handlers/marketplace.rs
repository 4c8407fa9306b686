use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::auth::{AdminUser, ClientUser};
use crate::entities::{projects, team_members, teams};
use crate::error::AppResult;
use crate::models::marketplace::{
    AddTeamMemberRequest, CreateTeamRequest, ProjectFilter, SubmitProjectRequest, TeamDetail,
    UpdateProjectStatusRequest,
};
use crate::services::marketplace;
use crate::AppState;

/// Handler for POST /api/client/projects
pub async fn submit_project(
    State(state): State<AppState>,
    ClientUser(client): ClientUser,
    Json(req): Json<SubmitProjectRequest>,
) -> AppResult<(StatusCode, Json<projects::Model>)> {
    let project = marketplace::submit_project(&state.db, &client, req).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list_client_projects(
    State(state): State<AppState>,
    ClientUser(client): ClientUser,
) -> AppResult<Json<Vec<projects::Model>>> {
    Ok(Json(marketplace::list_client_projects(&state.db, &client).await?))
}

pub async fn list_projects(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<Vec<projects::Model>>> {
    Ok(Json(marketplace::list_projects(&state.db, filter).await?))
}

/// Handler for PUT /api/admin/projects/{id}/status
pub async fn update_project_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(project_id): Path<i32>,
    Json(req): Json<UpdateProjectStatusRequest>,
) -> AppResult<Json<projects::Model>> {
    Ok(Json(
        marketplace::update_project_status(&state.db, &admin, project_id, req).await?,
    ))
}

pub async fn list_teams(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<teams::Model>>> {
    Ok(Json(marketplace::list_teams(&state.db).await?))
}

/// Handler for POST /api/admin/teams
pub async fn create_team(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateTeamRequest>,
) -> AppResult<(StatusCode, Json<TeamDetail>)> {
    let team = marketplace::create_team(&state.db, state.directory.as_ref(), &admin, req).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn get_team(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(team_id): Path<i32>,
) -> AppResult<Json<TeamDetail>> {
    Ok(Json(marketplace::get_team(&state.db, team_id).await?))
}

/// Handler for POST /api/admin/teams/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(team_id): Path<i32>,
    Json(req): Json<AddTeamMemberRequest>,
) -> AppResult<(StatusCode, Json<team_members::Model>)> {
    let member =
        marketplace::add_team_member(&state.db, state.directory.as_ref(), &admin, team_id, req)
            .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn remove_member(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path((team_id, member_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    marketplace::remove_team_member(&state.db, &admin, team_id, member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn start_team(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(team_id): Path<i32>,
) -> AppResult<Json<TeamDetail>> {
    Ok(Json(marketplace::start_team(&state.db, &admin, team_id).await?))
}

pub async fn complete_team(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(team_id): Path<i32>,
) -> AppResult<Json<TeamDetail>> {
    Ok(Json(marketplace::complete_team(&state.db, &admin, team_id).await?))
}
