//! Client project submissions and the delivery teams formed around them.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{
    client_profiles,
    projects::{self, ProjectPriority, ProjectStatus},
    string_list::StringList,
    team_members,
    teams::{self, TeamStatus},
    users::{UserRole, UserStatus},
};
use crate::error::{AppError, AppResult};
use crate::models::marketplace::{
    AddTeamMemberRequest, CreateTeamRequest, ProjectFilter, SubmitProjectRequest, TeamDetail,
    UpdateProjectStatusRequest,
};
use crate::money::non_negative_minor_units;
use crate::services::directory::{resolve_with_role, Identity, IdentityDirectory};
use crate::services::input::{optional_text, required_text};

pub const TEAM_LEAD_ROLE: &str = "Team Lead";
const MEMBER_ACTIVE: &str = "active";

pub async fn find_project<C: ConnectionTrait>(conn: &C, project_id: i32) -> AppResult<projects::Model> {
    projects::Entity::find_by_id(project_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))
}

pub async fn find_team<C: ConnectionTrait>(conn: &C, team_id: i32) -> AppResult<teams::Model> {
    teams::Entity::find_by_id(team_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Team", team_id))
}

/// Team members must be verified developers.
async fn resolve_verified_developer(
    directory: &dyn IdentityDirectory,
    user_id: i32,
    field: &str,
) -> AppResult<Identity> {
    let developer = resolve_with_role(directory, user_id, &[UserRole::Developer], field).await?;
    if developer.status != UserStatus::Verified {
        return Err(AppError::validation(format!(
            "{field}: developer {user_id} is not verified"
        )));
    }
    Ok(developer)
}

async fn bump_client_counter<C: ConnectionTrait>(
    conn: &C,
    client_id: i32,
    column: client_profiles::Column,
) -> AppResult<()> {
    client_profiles::Entity::update_many()
        .col_expr(column, Expr::col(column).add(1))
        .col_expr(client_profiles::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(client_profiles::Column::UserId.eq(client_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn submit_project(
    db: &DatabaseConnection,
    actor: &Identity,
    req: SubmitProjectRequest,
) -> AppResult<projects::Model> {
    actor.require_role(UserRole::Client)?;
    let title = required_text(&req.title, "Title")?;
    let description = required_text(&req.description, "Description")?;
    let budget_min = req
        .budget_min
        .map(|b| non_negative_minor_units(b, "Minimum budget"))
        .transpose()?;
    let budget_max = req
        .budget_max
        .map(|b| non_negative_minor_units(b, "Maximum budget"))
        .transpose()?;
    if let (Some(min), Some(max)) = (budget_min, budget_max) {
        if min > max {
            return Err(AppError::validation("Minimum budget exceeds maximum budget"));
        }
    }
    if matches!(req.timeline_weeks, Some(weeks) if weeks <= 0) {
        return Err(AppError::validation("Timeline must be at least one week"));
    }
    let now = Utc::now();

    let txn = db.begin().await?;
    let project = projects::ActiveModel {
        client_id: Set(actor.id),
        title: Set(title),
        description: Set(description),
        requirements: Set(optional_text(req.requirements)),
        project_type: Set(optional_text(req.project_type)),
        technologies: Set(StringList::cleaned(req.technologies)),
        domain: Set(optional_text(req.domain)),
        budget_min: Set(budget_min),
        budget_max: Set(budget_max),
        currency: Set(optional_text(req.currency).unwrap_or_else(|| "INR".to_string())),
        timeline_weeks: Set(req.timeline_weeks),
        status: Set(ProjectStatus::Submitted),
        priority: Set(ProjectPriority::Normal),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    bump_client_counter(&txn, actor.id, client_profiles::Column::ProjectsSubmitted).await?;
    txn.commit().await?;

    info!(project_id = project.id, client_id = actor.id, "Client project submitted");
    Ok(project)
}

pub async fn list_client_projects(
    db: &DatabaseConnection,
    actor: &Identity,
) -> AppResult<Vec<projects::Model>> {
    Ok(projects::Entity::find()
        .filter(projects::Column::ClientId.eq(actor.id))
        .order_by_desc(projects::Column::CreatedAt)
        .order_by_desc(projects::Column::Id)
        .all(db)
        .await?)
}

pub async fn list_projects(db: &DatabaseConnection, filter: ProjectFilter) -> AppResult<Vec<projects::Model>> {
    let mut query = projects::Entity::find();
    if let Some(status) = filter.status {
        query = query.filter(projects::Column::Status.eq(status));
    }
    Ok(query
        .order_by_desc(projects::Column::CreatedAt)
        .order_by_desc(projects::Column::Id)
        .all(db)
        .await?)
}

/// Admin review step: moves the project along its lifecycle.
pub async fn update_project_status(
    db: &DatabaseConnection,
    actor: &Identity,
    project_id: i32,
    req: UpdateProjectStatusRequest,
) -> AppResult<projects::Model> {
    let project = find_project(db, project_id).await?;
    let current = project.status;
    if !current.can_transition_to(req.status) {
        return Err(AppError::conflict(format!(
            "Project {project_id} cannot move from {current:?} to {:?}",
            req.status
        )));
    }
    let client_id = project.client_id;
    let now = Utc::now();

    let txn = db.begin().await?;
    let mut active: projects::ActiveModel = project.into();
    active.status = Set(req.status);
    active.reviewed_by_id = Set(Some(actor.id));
    active.reviewed_at = Set(Some(now));
    if let Some(priority) = req.priority {
        active.priority = Set(priority);
    }
    if let Some(notes) = optional_text(req.admin_notes) {
        active.admin_notes = Set(Some(notes));
    }
    match req.status {
        ProjectStatus::InProgress => active.started_at = Set(Some(now)),
        ProjectStatus::Completed => active.completed_at = Set(Some(now)),
        _ => {}
    }
    active.updated_at = Set(now);
    let project = active.update(&txn).await?;
    if project.status == ProjectStatus::Completed {
        bump_client_counter(&txn, client_id, client_profiles::Column::ProjectsCompleted).await?;
    }
    txn.commit().await?;

    info!(project_id, from = ?current, to = ?project.status, acting_user_id = actor.id, "Project status updated");
    Ok(project)
}

fn parse_deadline(raw: Option<String>) -> AppResult<Option<chrono::DateTime<Utc>>> {
    let Some(raw) = optional_text(raw) else {
        return Ok(None);
    };
    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Deadline {raw} is not a YYYY-MM-DD date")))?;
    Ok(date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()))
}

/// Forms a team; the lead joins as its first member and a linked project
/// moves to `team_forming`.
pub async fn create_team(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    actor: &Identity,
    req: CreateTeamRequest,
) -> AppResult<TeamDetail> {
    let name = required_text(&req.name, "Team name")?;
    let deadline = parse_deadline(req.deadline)?;
    let lead = resolve_verified_developer(directory, req.lead_developer_id, "lead_developer_id").await?;
    let now = Utc::now();

    let txn = db.begin().await?;

    let project = match req.project_id {
        Some(project_id) => {
            let project = find_project(&txn, project_id).await?;
            let taken = teams::Entity::find()
                .filter(teams::Column::ProjectId.eq(project_id))
                .one(&txn)
                .await?;
            if taken.is_some() {
                return Err(AppError::conflict(format!(
                    "Project {project_id} already has a team"
                )));
            }
            if !project.status.accepts_team() {
                return Err(AppError::conflict(format!(
                    "Project {project_id} is {:?} and cannot take a new team",
                    project.status
                )));
            }
            Some(project)
        }
        None => None,
    };

    let team = teams::ActiveModel {
        name: Set(name),
        description: Set(optional_text(req.description)),
        project_id: Set(req.project_id),
        lead_developer_id: Set(lead.id),
        status: Set(TeamStatus::Forming),
        deadline: Set(deadline),
        created_by_id: Set(Some(actor.id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let lead_member = team_members::ActiveModel {
        team_id: Set(team.id),
        developer_id: Set(lead.id),
        role: Set(TEAM_LEAD_ROLE.to_string()),
        status: Set(MEMBER_ACTIVE.to_string()),
        joined_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let project = match project {
        Some(project) => {
            let mut active: projects::ActiveModel = project.into();
            active.status = Set(ProjectStatus::TeamForming);
            active.updated_at = Set(now);
            Some(active.update(&txn).await?)
        }
        None => None,
    };

    txn.commit().await?;

    info!(team_id = team.id, project_id = ?team.project_id, lead_developer_id = lead.id, acting_user_id = actor.id, "Team created");
    Ok(TeamDetail {
        team,
        project,
        members: vec![lead_member],
    })
}

pub async fn get_team(db: &DatabaseConnection, team_id: i32) -> AppResult<TeamDetail> {
    let team = find_team(db, team_id).await?;
    let project = match team.project_id {
        Some(project_id) => projects::Entity::find_by_id(project_id).one(db).await?,
        None => None,
    };
    let members = team_members::Entity::find()
        .filter(team_members::Column::TeamId.eq(team_id))
        .order_by_asc(team_members::Column::JoinedAt)
        .order_by_asc(team_members::Column::Id)
        .all(db)
        .await?;
    Ok(TeamDetail { team, project, members })
}

pub async fn list_teams(db: &DatabaseConnection) -> AppResult<Vec<teams::Model>> {
    Ok(teams::Entity::find()
        .order_by_desc(teams::Column::CreatedAt)
        .order_by_desc(teams::Column::Id)
        .all(db)
        .await?)
}

/// A developer can be on a team only once.
pub async fn add_team_member(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    actor: &Identity,
    team_id: i32,
    req: AddTeamMemberRequest,
) -> AppResult<team_members::Model> {
    let team = find_team(db, team_id).await?;
    if matches!(team.status, TeamStatus::Completed | TeamStatus::Disbanded) {
        return Err(AppError::conflict(format!("Team {team_id} is {:?}", team.status)));
    }
    let developer = resolve_verified_developer(directory, req.developer_id, "developer_id").await?;
    let role = required_text(&req.role, "Role")?;

    let existing = team_members::Entity::find()
        .filter(team_members::Column::TeamId.eq(team_id))
        .filter(team_members::Column::DeveloperId.eq(developer.id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(AppError::conflict(format!(
            "Developer {} is already a member of team {team_id}",
            developer.id
        )));
    }

    let member = team_members::ActiveModel {
        team_id: Set(team_id),
        developer_id: Set(developer.id),
        role: Set(role),
        responsibilities: Set(optional_text(req.responsibilities)),
        status: Set(MEMBER_ACTIVE.to_string()),
        joined_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(team_id, member_id = member.id, developer_id = developer.id, acting_user_id = actor.id, "Team member added");
    Ok(member)
}

pub async fn remove_team_member(
    db: &DatabaseConnection,
    actor: &Identity,
    team_id: i32,
    member_id: i32,
) -> AppResult<()> {
    let member = team_members::Entity::find_by_id(member_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("TeamMember", member_id))?;
    if member.team_id != team_id {
        return Err(AppError::forbidden(format!(
            "Member {member_id} does not belong to team {team_id}"
        )));
    }
    team_members::Entity::delete_by_id(member_id).exec(db).await?;
    info!(team_id, member_id, developer_id = member.developer_id, acting_user_id = actor.id, "Team member removed");
    Ok(())
}

/// Moves the team to `next` and its linked project to `project_next`.
async fn advance_team(
    db: &DatabaseConnection,
    actor: &Identity,
    team_id: i32,
    next: TeamStatus,
    project_next: ProjectStatus,
) -> AppResult<TeamDetail> {
    let team = find_team(db, team_id).await?;
    if !team.status.can_transition_to(next) {
        return Err(AppError::conflict(format!(
            "Team {team_id} cannot move from {:?} to {next:?}",
            team.status
        )));
    }
    let now = Utc::now();

    let txn = db.begin().await?;
    let project_id = team.project_id;
    let mut active: teams::ActiveModel = team.into();
    active.status = Set(next);
    match next {
        TeamStatus::Active => active.started_at = Set(Some(now)),
        TeamStatus::Completed => active.completed_at = Set(Some(now)),
        TeamStatus::Forming | TeamStatus::Disbanded => {}
    }
    active.updated_at = Set(now);
    active.update(&txn).await?;

    if let Some(project_id) = project_id {
        let project = find_project(&txn, project_id).await?;
        if !project.status.can_transition_to(project_next) {
            return Err(AppError::conflict(format!(
                "Project {project_id} cannot move from {:?} to {project_next:?}",
                project.status
            )));
        }
        let mut project: projects::ActiveModel = project.into();
        project.status = Set(project_next);
        if project_next == ProjectStatus::InProgress {
            project.started_at = Set(Some(now));
        }
        project.updated_at = Set(now);
        project.update(&txn).await?;
    }
    txn.commit().await?;

    info!(team_id, status = ?next, project_id = ?project_id, acting_user_id = actor.id, "Team advanced");
    get_team(db, team_id).await
}

pub async fn start_team(db: &DatabaseConnection, actor: &Identity, team_id: i32) -> AppResult<TeamDetail> {
    advance_team(db, actor, team_id, TeamStatus::Active, ProjectStatus::InProgress).await
}

pub async fn complete_team(db: &DatabaseConnection, actor: &Identity, team_id: i32) -> AppResult<TeamDetail> {
    advance_team(db, actor, team_id, TeamStatus::Completed, ProjectStatus::Delivered).await
}
