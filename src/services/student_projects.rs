//! Read models and small updates on confirmed student projects.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use crate::entities::{
    leads, payments, project_documents, project_milestones,
    student_projects::{self, StudentProjectStatus},
};
use crate::error::{AppError, AppResult};
use crate::models::student_project::{
    AssignmentView, PaymentView, StudentProjectDetail, StudentProjectView, TransactionView,
};
use crate::services::assignments::list_assignments;
use crate::services::directory::{collect_ids, Identity, IdentityDirectory};
use crate::services::input::normalize_url;
use crate::services::ledger::{find_project, list_transactions};

/// Newest first.
pub async fn list_student_projects(db: &DatabaseConnection) -> AppResult<Vec<student_projects::Model>> {
    Ok(student_projects::Entity::find()
        .order_by_desc(student_projects::Column::CreatedAt)
        .order_by_desc(student_projects::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_student_project(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    project_id: i32,
) -> AppResult<StudentProjectDetail> {
    let project = find_project(db, project_id).await?;

    let lead = match project.lead_id {
        Some(lead_id) => leads::Entity::find_by_id(lead_id).one(db).await?,
        None => None,
    };

    let payment = payments::Entity::find()
        .filter(payments::Column::ProjectId.eq(project_id))
        .one(db)
        .await?;
    let transactions = match &payment {
        Some(p) => list_transactions(db, p.id).await?,
        None => Vec::new(),
    };

    let milestones = project_milestones::Entity::find()
        .filter(project_milestones::Column::ProjectId.eq(project_id))
        .order_by_asc(project_milestones::Column::Position)
        .all(db)
        .await?;

    let documents = project_documents::Entity::find()
        .filter(project_documents::Column::ProjectId.eq(project_id))
        .order_by_asc(project_documents::Column::UploadedAt)
        .order_by_asc(project_documents::Column::Id)
        .all(db)
        .await?;

    let assignments = list_assignments(db, project_id).await?;

    let ids = collect_ids(
        [project.closed_by_id, project.confirmed_by_id]
            .into_iter()
            .chain(transactions.iter().map(|t| t.recorded_by_id))
            .chain(assignments.iter().map(|a| Some(a.developer_id))),
    );
    let names = directory.display_names(&ids).await?;
    let name_of = |id: Option<i32>| id.and_then(|id| names.get(&id).cloned());

    Ok(StudentProjectDetail {
        project: StudentProjectView {
            closed_by_name: name_of(project.closed_by_id),
            confirmed_by_name: name_of(project.confirmed_by_id),
            project,
        },
        lead,
        payment: payment.map(PaymentView::from),
        transactions: transactions
            .into_iter()
            .map(|t| {
                let name = name_of(t.recorded_by_id);
                TransactionView::new(t, name)
            })
            .collect(),
        milestones,
        documents,
        assignments: assignments
            .into_iter()
            .map(|a| {
                let name = name_of(Some(a.developer_id));
                AssignmentView::new(a, name)
            })
            .collect(),
    })
}

pub async fn update_status(
    db: &DatabaseConnection,
    actor: &Identity,
    project_id: i32,
    next: StudentProjectStatus,
) -> AppResult<student_projects::Model> {
    let project = find_project(db, project_id).await?;
    let current = project.status;
    let next = current.advance_to(next).ok_or_else(|| {
        AppError::conflict(format!(
            "Project {project_id} cannot move from {} to {}",
            current.label(),
            next.label()
        ))
    })?;

    let mut active: student_projects::ActiveModel = project.into();
    active.status = Set(next);
    active.updated_at = Set(Utc::now());
    let project = active.update(db).await?;

    info!(
        project_id,
        from = current.label(),
        to = next.label(),
        acting_user_id = actor.id,
        "Student project status updated"
    );
    Ok(project)
}

/// Sets or clears the external repository link.
pub async fn update_repository_link(
    db: &DatabaseConnection,
    actor: &Identity,
    project_id: i32,
    link: Option<String>,
) -> AppResult<student_projects::Model> {
    let link = match link.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(l) => Some(normalize_url(l)?),
        None => None,
    };
    let project = find_project(db, project_id).await?;

    let mut active: student_projects::ActiveModel = project.into();
    active.repository_link = Set(link);
    active.updated_at = Set(Utc::now());
    let project = active.update(db).await?;

    info!(
        project_id,
        repository_link = ?project.repository_link,
        acting_user_id = actor.id,
        "Repository link updated"
    );
    Ok(project)
}
