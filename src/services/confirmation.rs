//! Converting a lead into a confirmed student project.
//!
//! The project, its payment ledger, the first developer assignment, the
//! milestone checklist and the lead status change are written in one
//! database transaction. Any failure drops the transaction and nothing is
//! persisted.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{info, warn};

use crate::entities::{
    developer_assignments::{self, AssignmentRole},
    leads::{self, LeadTransitionError},
    payments,
    project_milestones::{self, MilestoneStatus, DEFAULT_MILESTONES},
    student_projects::{self, StudentProjectStatus},
    string_list::StringList,
    users::UserRole,
};
use crate::error::{AppError, AppResult};
use crate::models::lead::{ConfirmLeadRequest, DeveloperSelection};
use crate::models::student_project::ConfirmedProject;
use crate::money::non_negative_minor_units;
use crate::services::directory::{resolve_with_role, Identity, IdentityDirectory};
use crate::services::input::{optional_text, required_text};

const ADMIN_BUILT_NOTE: &str = "Project being built directly by the admin team.";

/// Assignment created by a confirmation: who builds it and in which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialAssignment {
    pub developer_id: i32,
    pub role: AssignmentRole,
}

/// Maps the developer selection onto the first assignment.
///
/// Admin-built projects are attributed to the confirming admin unless a
/// specific internal assignee is named.
pub fn initial_assignment(selection: &DeveloperSelection, confirming_admin: i32) -> InitialAssignment {
    match *selection {
        DeveloperSelection::Developer { developer_id } => InitialAssignment {
            developer_id,
            role: AssignmentRole::LeadDeveloper,
        },
        DeveloperSelection::AdminBuilt { assignee_id: None } => InitialAssignment {
            developer_id: confirming_admin,
            role: AssignmentRole::AdminBuilder,
        },
        DeveloperSelection::AdminBuilt {
            assignee_id: Some(assignee_id),
        } => InitialAssignment {
            developer_id: assignee_id,
            role: AssignmentRole::AdminBuilderAssigned,
        },
    }
}

pub async fn confirm_lead(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    actor: &Identity,
    lead_id: i32,
    req: ConfirmLeadRequest,
) -> AppResult<ConfirmedProject> {
    // Everything that can be rejected for bad input is checked before the transaction opens
    let title = required_text(&req.title, "Project title")?;
    let total_cost = non_negative_minor_units(req.total_cost, "Total cost")?;
    let payout = non_negative_minor_units(req.payout_amount, "Payout amount")?;
    if let Some(weeks) = req.timeline_weeks {
        if weeks <= 0 {
            return Err(AppError::validation("Timeline must be at least one week"));
        }
    }

    let assignment = initial_assignment(&req.developer, actor.id);
    match req.developer {
        DeveloperSelection::Developer { developer_id } => {
            let developer =
                resolve_with_role(directory, developer_id, &[UserRole::Developer], "developer_id")
                    .await?;
            developer
                .require_verified()
                .map_err(|_| AppError::validation(format!("Developer {developer_id} is not verified")))?;
        }
        DeveloperSelection::AdminBuilt {
            assignee_id: Some(assignee_id),
        } => {
            resolve_with_role(directory, assignee_id, &[UserRole::Admin], "assignee_id").await?;
        }
        DeveloperSelection::AdminBuilt { assignee_id: None } => {}
    }

    let closed_by = match req.closed_by_id {
        Some(id) if id != actor.id => {
            resolve_with_role(directory, id, &[UserRole::Admin], "closed_by_id")
                .await?
                .id
        }
        _ => actor.id,
    };

    let txn = db.begin().await?;

    let lead = leads::Entity::find_by_id(lead_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Lead", lead_id))?;

    let confirmed_status = lead.status.confirm().map_err(|e| match e {
        LeadTransitionError::AlreadyConfirmed | LeadTransitionError::ConfirmationRequired => {
            AppError::conflict(format!("Lead {lead_id} has already been confirmed"))
        }
    })?;

    let existing = student_projects::Entity::find()
        .filter(student_projects::Column::LeadId.eq(lead_id))
        .count(&txn)
        .await?;
    if existing > 0 {
        warn!(lead_id, "Lead has a project but is not marked confirmed");
        return Err(AppError::conflict(format!(
            "Lead {lead_id} already has a confirmed project"
        )));
    }

    let now = Utc::now();

    let project = student_projects::ActiveModel {
        lead_id: Set(Some(lead_id)),
        closed_by_id: Set(Some(closed_by)),
        confirmed_by_id: Set(Some(actor.id)),
        title: Set(title),
        scope: Set(optional_text(req.scope)),
        tech_stack: Set(StringList::cleaned(&req.tech_stack)),
        timeline_weeks: Set(req.timeline_weeks),
        academic_requirements: Set(optional_text(req.academic_requirements)),
        status: Set(StudentProjectStatus::Confirmed),
        repository_link: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let payment = payments::ActiveModel {
        project_id: Set(project.id),
        total_cost: Set(total_cost),
        payment_structure: Set(optional_text(req.payment_structure)),
        amount_paid: Set(0),
        pending_balance: Set(total_cost),
        payment_mode: Set(None),
        invoice_ref: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let internal_notes = assignment
        .role
        .is_internal()
        .then(|| ADMIN_BUILT_NOTE.to_string());
    let assignment = developer_assignments::ActiveModel {
        project_id: Set(project.id),
        developer_id: Set(assignment.developer_id),
        role: Set(assignment.role),
        payout_amount: Set(payout),
        internal_notes: Set(internal_notes),
        assigned_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut lead: leads::ActiveModel = lead.into();
    lead.status = Set(confirmed_status);
    lead.updated_at = Set(now);
    lead.update(&txn).await?;

    let mut milestones = Vec::with_capacity(DEFAULT_MILESTONES.len());
    for (position, title) in (1i16..).zip(DEFAULT_MILESTONES) {
        let milestone = project_milestones::ActiveModel {
            project_id: Set(project.id),
            position: Set(position),
            title: Set(title.to_string()),
            status: Set(MilestoneStatus::Pending),
            completed_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        milestones.push(milestone);
    }

    txn.commit().await?;

    info!(
        lead_id,
        project_id = project.id,
        payment_id = payment.id,
        total_cost,
        developer_id = assignment.developer_id,
        role = assignment.role.label(),
        closed_by,
        confirmed_by = actor.id,
        "Lead confirmed"
    );

    Ok(ConfirmedProject {
        project,
        payment,
        assignment,
        milestones,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_developer_leads_the_build() {
        let a = initial_assignment(&DeveloperSelection::Developer { developer_id: 7 }, 1);
        assert_eq!(
            a,
            InitialAssignment {
                developer_id: 7,
                role: AssignmentRole::LeadDeveloper
            }
        );
    }

    #[test]
    fn test_admin_built_defaults_to_confirming_admin() {
        let a = initial_assignment(&DeveloperSelection::AdminBuilt { assignee_id: None }, 1);
        assert_eq!(a.developer_id, 1);
        assert_eq!(a.role, AssignmentRole::AdminBuilder);
    }

    #[test]
    fn test_admin_built_with_named_assignee() {
        let a = initial_assignment(&DeveloperSelection::AdminBuilt { assignee_id: Some(4) }, 1);
        assert_eq!(a.developer_id, 4);
        assert_eq!(a.role, AssignmentRole::AdminBuilderAssigned);
    }
}
