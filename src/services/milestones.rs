use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tracing::{info, warn};

use crate::entities::project_milestones::{self, MilestoneStatus};
use crate::error::{AppError, AppResult};
use crate::services::directory::Identity;
use crate::services::ledger::find_project;

/// Flips a milestone between Pending and Completed.
///
/// Completion stamps the current time and reverting clears it. Milestones are
/// independent of each other. A milestone id from another project is refused
/// without touching anything.
pub async fn toggle_milestone(
    db: &DatabaseConnection,
    actor: &Identity,
    project_id: i32,
    milestone_id: i32,
) -> AppResult<project_milestones::Model> {
    let txn = db.begin().await?;

    find_project(&txn, project_id).await?;
    let milestone = project_milestones::Entity::find_by_id(milestone_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Milestone", milestone_id))?;

    if milestone.project_id != project_id {
        warn!(
            project_id,
            milestone_id,
            owner_project_id = milestone.project_id,
            acting_user_id = actor.id,
            "Milestone toggle for another project refused"
        );
        return Err(AppError::forbidden(format!(
            "Milestone {milestone_id} does not belong to project {project_id}"
        )));
    }

    let next = milestone.status.toggled();
    let completed_at = match next {
        MilestoneStatus::Completed => Some(Utc::now()),
        MilestoneStatus::Pending => None,
    };

    let mut active: project_milestones::ActiveModel = milestone.into();
    active.status = Set(next);
    active.completed_at = Set(completed_at);
    let milestone = active.update(&txn).await?;
    txn.commit().await?;

    info!(
        project_id,
        milestone_id,
        status = ?milestone.status,
        acting_user_id = actor.id,
        "Milestone toggled"
    );
    Ok(milestone)
}
