//! Developer assignments and payouts on confirmed projects.
//!
//! The same developer may be assigned to a project more than once (for
//! example as Developer and later as Mentor); only team membership in the
//! marketplace is unique.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use crate::entities::{developer_assignments, users::UserRole};
use crate::error::AppResult;
use crate::models::student_project::AssignDeveloperRequest;
use crate::money::non_negative_minor_units;
use crate::services::directory::{resolve_with_role, Identity, IdentityDirectory};
use crate::services::input::optional_text;
use crate::services::ledger::find_project;

pub async fn add_assignment(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    actor: &Identity,
    project_id: i32,
    req: AssignDeveloperRequest,
) -> AppResult<developer_assignments::Model> {
    let payout = non_negative_minor_units(req.payout_amount, "Payout amount")?;
    let allowed_roles: &[UserRole] = if req.role.is_internal() {
        &[UserRole::Admin]
    } else {
        &[UserRole::Developer, UserRole::Admin]
    };
    resolve_with_role(directory, req.developer_id, allowed_roles, "developer_id").await?;
    find_project(db, project_id).await?;

    let assignment = developer_assignments::ActiveModel {
        project_id: Set(project_id),
        developer_id: Set(req.developer_id),
        role: Set(req.role),
        payout_amount: Set(payout),
        internal_notes: Set(optional_text(req.internal_notes)),
        assigned_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        project_id,
        assignment_id = assignment.id,
        developer_id = assignment.developer_id,
        role = assignment.role.label(),
        payout,
        acting_user_id = actor.id,
        "Developer assigned"
    );
    Ok(assignment)
}

/// Assignments of a project in the order they were made.
pub async fn list_assignments(
    db: &DatabaseConnection,
    project_id: i32,
) -> AppResult<Vec<developer_assignments::Model>> {
    Ok(developer_assignments::Entity::find()
        .filter(developer_assignments::Column::ProjectId.eq(project_id))
        .order_by_asc(developer_assignments::Column::AssignedAt)
        .order_by_asc(developer_assignments::Column::Id)
        .all(db)
        .await?)
}
