//! Lead intake, follow-up tracking and the tabular export.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::entities::{
    lead_follow_ups,
    leads::{self, LeadStatus, LeadTransitionError},
    student_projects,
    users::UserRole,
};
use crate::error::{AppError, AppResult};
use crate::models::lead::{CreateLeadRequest, FollowUpView, LeadDetail, LeadFilter, RecordFollowUpRequest};
use crate::services::directory::{collect_ids, resolve_with_role, Identity, IdentityDirectory};
use crate::services::input::{optional_text, parse_date_time, required_text};

pub const EXPORT_HEADER: [&str; 10] = [
    "ID",
    "Student Name",
    "Phone",
    "Email",
    "College",
    "Domain",
    "Source",
    "Status",
    "Confirmed Project Title",
    "Created At",
];

pub async fn create_lead(
    db: &DatabaseConnection,
    actor: &Identity,
    req: CreateLeadRequest,
) -> AppResult<leads::Model> {
    let student_name = required_text(&req.student_name, "Student name")?;
    let phone = required_text(&req.phone, "Phone")?;
    let now = Utc::now();

    let lead = leads::ActiveModel {
        student_name: Set(student_name),
        phone: Set(phone),
        email: Set(optional_text(req.email)),
        college: Set(optional_text(req.college)),
        domain: Set(optional_text(req.domain)),
        source: Set(optional_text(req.source)),
        requirement_summary: Set(optional_text(req.requirement_summary)),
        status: Set(LeadStatus::NewLead),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(lead_id = lead.id, acting_user_id = actor.id, "Lead created");
    Ok(lead)
}

/// Combines separate `YYYY-MM-DD` and `HH:MM` fields into a callback time.
///
/// Both blank means no callback. One without the other, or either one
/// malformed, rejects the request.
pub fn parse_callback(date: Option<&str>, time: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    let date = date.map(str::trim).filter(|d| !d.is_empty());
    let time = time.map(str::trim).filter(|t| !t.is_empty());

    match (date, time) {
        (None, None) => Ok(None),
        (Some(_), None) | (None, Some(_)) => Err(AppError::validation(
            "A callback needs both a date and a time",
        )),
        (Some(date), Some(time)) => parse_date_time(date, time, "Callback").map(Some),
    }
}

/// Appends a follow-up and moves the lead to the submitted status in one transaction.
pub async fn record_follow_up(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    actor: &Identity,
    lead_id: i32,
    req: RecordFollowUpRequest,
) -> AppResult<lead_follow_ups::Model> {
    let notes = required_text(&req.notes, "Notes")?;
    let callback_at = parse_callback(req.callback_date.as_deref(), req.callback_time.as_deref())?;
    let recorded_by = match req.interacted_by_id {
        Some(id) if id != actor.id => {
            resolve_with_role(directory, id, &[UserRole::Admin], "interacted_by_id")
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

    let next = lead.status.follow_up_to(req.status).map_err(|e| match e {
        LeadTransitionError::AlreadyConfirmed => AppError::conflict(format!(
            "Lead {lead_id} is confirmed and its status can no longer change"
        )),
        LeadTransitionError::ConfirmationRequired => {
            AppError::validation("Leads become Confirmed only through project confirmation")
        }
    })?;

    let now = Utc::now();
    let previous = lead.status;
    let mut lead: leads::ActiveModel = lead.into();
    lead.status = Set(next);
    lead.updated_at = Set(now);
    lead.update(&txn).await?;

    let follow_up = lead_follow_ups::ActiveModel {
        lead_id: Set(lead_id),
        interaction_notes: Set(notes),
        callback_at: Set(callback_at),
        status_at_time: Set(next),
        recorded_by_id: Set(Some(recorded_by)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        lead_id,
        follow_up_id = follow_up.id,
        from = previous.label(),
        to = next.label(),
        recorded_by,
        acting_user_id = actor.id,
        "Follow-up recorded"
    );
    Ok(follow_up)
}

/// Newest first, optionally filtered by status and domain.
pub async fn list_leads(db: &DatabaseConnection, filter: LeadFilter) -> AppResult<Vec<leads::Model>> {
    let mut query = leads::Entity::find();
    if let Some(status) = filter.status {
        query = query.filter(leads::Column::Status.eq(status));
    }
    if let Some(domain) = optional_text(filter.domain) {
        query = query.filter(leads::Column::Domain.eq(domain));
    }
    Ok(query
        .order_by_desc(leads::Column::CreatedAt)
        .order_by_desc(leads::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_lead(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    lead_id: i32,
) -> AppResult<LeadDetail> {
    let lead = leads::Entity::find_by_id(lead_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Lead", lead_id))?;

    let follow_ups = lead_follow_ups::Entity::find()
        .filter(lead_follow_ups::Column::LeadId.eq(lead_id))
        .order_by_asc(lead_follow_ups::Column::CreatedAt)
        .order_by_asc(lead_follow_ups::Column::Id)
        .all(db)
        .await?;

    let student_project_id = student_projects::Entity::find()
        .filter(student_projects::Column::LeadId.eq(lead_id))
        .one(db)
        .await?
        .map(|p| p.id);

    let names = directory
        .display_names(&collect_ids(follow_ups.iter().map(|f| f.recorded_by_id)))
        .await?;
    let follow_ups = follow_ups
        .into_iter()
        .map(|follow_up| FollowUpView {
            recorded_by_name: follow_up.recorded_by_id.and_then(|id| names.get(&id).cloned()),
            follow_up,
        })
        .collect();

    Ok(LeadDetail {
        lead,
        follow_ups,
        student_project_id,
    })
}

/// One row per lead, newest first, in [`EXPORT_HEADER`] column order.
pub async fn export_leads_csv(db: &DatabaseConnection) -> AppResult<Vec<u8>> {
    let rows = leads::Entity::find()
        .find_also_related(student_projects::Entity)
        .order_by_desc(leads::Column::CreatedAt)
        .order_by_desc(leads::Column::Id)
        .all(db)
        .await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    write_export(&mut writer, &rows)
        .map_err(|e| AppError::Internal(format!("lead export failed: {e}")))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("lead export failed: {e}")))?;

    info!(rows = rows.len(), "Leads exported");
    Ok(bytes)
}

fn write_export<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    rows: &[(leads::Model, Option<student_projects::Model>)],
) -> csv::Result<()> {
    writer.write_record(EXPORT_HEADER)?;
    for (lead, project) in rows {
        writer.write_record([
            lead.id.to_string(),
            lead.student_name.clone(),
            lead.phone.clone(),
            lead.email.clone().unwrap_or_default(),
            lead.college.clone().unwrap_or_default(),
            lead.domain.clone().unwrap_or_default(),
            lead.source.clone().unwrap_or_default(),
            lead.status.label().to_string(),
            project
                .as_ref()
                .map(|p| p.title.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            lead.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
