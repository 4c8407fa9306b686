//! Paid sessions (classes, consulting, support) booked by clients with developers.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use crate::entities::{
    appointments::{self, AppointmentStatus},
    users::{UserRole, UserStatus},
};
use crate::error::{AppError, AppResult};
use crate::models::marketplace::{
    AppointmentFilter, AppointmentView, BookAppointmentRequest, ConfirmAppointmentRequest,
};
use crate::money::non_negative_minor_units;
use crate::services::directory::{collect_ids, resolve_with_role, Identity, IdentityDirectory};
use crate::services::input::{normalize_url, optional_text, parse_date_time, required_text};

pub const DEFAULT_DURATION_MINUTES: i32 = 60;
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

async fn find_appointment(db: &DatabaseConnection, appointment_id: i32) -> AppResult<appointments::Model> {
    appointments::Entity::find_by_id(appointment_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Appointment", appointment_id))
}

fn check_transition(appointment: &appointments::Model, next: AppointmentStatus) -> AppResult<()> {
    if !appointment.status.can_transition_to(next) {
        return Err(AppError::conflict(format!(
            "Appointment {} cannot move from {:?} to {next:?}",
            appointment.id, appointment.status
        )));
    }
    Ok(())
}

fn require_developer_owner(appointment: &appointments::Model, actor: &Identity) -> AppResult<()> {
    if appointment.developer_id != actor.id {
        return Err(AppError::forbidden(format!(
            "Appointment {} is booked with another developer",
            appointment.id
        )));
    }
    Ok(())
}

pub async fn book_appointment(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    actor: &Identity,
    req: BookAppointmentRequest,
) -> AppResult<appointments::Model> {
    actor.require_role(UserRole::Client)?;
    let title = required_text(&req.title, "Title")?;
    let scheduled_at = parse_date_time(&req.date, &req.time, "Appointment")?;
    let duration = req.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
    if duration <= 0 {
        return Err(AppError::validation("Duration must be positive"));
    }
    let developer =
        resolve_with_role(directory, req.developer_id, &[UserRole::Developer], "developer_id").await?;
    if developer.status != UserStatus::Verified {
        return Err(AppError::validation(format!(
            "Developer {} is not available for booking",
            developer.id
        )));
    }
    let now = Utc::now();

    let appointment = appointments::ActiveModel {
        client_id: Set(actor.id),
        developer_id: Set(developer.id),
        appointment_type: Set(req.appointment_type),
        title: Set(title),
        description: Set(optional_text(req.description)),
        scheduled_at: Set(scheduled_at),
        duration_minutes: Set(duration),
        timezone: Set(optional_text(req.timezone).unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())),
        status: Set(AppointmentStatus::Pending),
        client_notes: Set(optional_text(req.client_notes)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        appointment_id = appointment.id,
        client_id = actor.id,
        developer_id = developer.id,
        scheduled_at = %appointment.scheduled_at,
        "Appointment booked"
    );
    Ok(appointment)
}

pub async fn confirm_appointment(
    db: &DatabaseConnection,
    actor: &Identity,
    appointment_id: i32,
    req: ConfirmAppointmentRequest,
) -> AppResult<appointments::Model> {
    let appointment = find_appointment(db, appointment_id).await?;
    require_developer_owner(&appointment, actor)?;
    check_transition(&appointment, AppointmentStatus::Confirmed)?;
    let meeting_link = match optional_text(req.meeting_link) {
        Some(link) => Some(normalize_url(&link)?),
        None => None,
    };
    let amount = req
        .amount
        .map(|a| non_negative_minor_units(a, "Amount"))
        .transpose()?;

    let mut active: appointments::ActiveModel = appointment.into();
    active.status = Set(AppointmentStatus::Confirmed);
    active.meeting_link = Set(meeting_link);
    active.meeting_platform = Set(optional_text(req.meeting_platform));
    if amount.is_some() {
        active.amount = Set(amount);
    }
    if let Some(notes) = optional_text(req.developer_notes) {
        active.developer_notes = Set(Some(notes));
    }
    active.updated_at = Set(Utc::now());
    let appointment = active.update(db).await?;

    info!(appointment_id, developer_id = actor.id, "Appointment confirmed");
    Ok(appointment)
}

async fn close_as(
    db: &DatabaseConnection,
    actor: &Identity,
    appointment_id: i32,
    next: AppointmentStatus,
) -> AppResult<appointments::Model> {
    let appointment = find_appointment(db, appointment_id).await?;
    require_developer_owner(&appointment, actor)?;
    check_transition(&appointment, next)?;

    let mut active: appointments::ActiveModel = appointment.into();
    active.status = Set(next);
    active.updated_at = Set(Utc::now());
    let appointment = active.update(db).await?;

    info!(appointment_id, status = ?next, developer_id = actor.id, "Appointment closed");
    Ok(appointment)
}

pub async fn complete_appointment(
    db: &DatabaseConnection,
    actor: &Identity,
    appointment_id: i32,
) -> AppResult<appointments::Model> {
    close_as(db, actor, appointment_id, AppointmentStatus::Completed).await
}

pub async fn mark_no_show(
    db: &DatabaseConnection,
    actor: &Identity,
    appointment_id: i32,
) -> AppResult<appointments::Model> {
    close_as(db, actor, appointment_id, AppointmentStatus::NoShow).await
}

/// Either party of the appointment may cancel it.
pub async fn cancel_appointment(
    db: &DatabaseConnection,
    actor: &Identity,
    appointment_id: i32,
    reason: &str,
) -> AppResult<appointments::Model> {
    let appointment = find_appointment(db, appointment_id).await?;
    if appointment.client_id != actor.id && appointment.developer_id != actor.id {
        return Err(AppError::forbidden(format!(
            "Appointment {appointment_id} belongs to other users"
        )));
    }
    check_transition(&appointment, AppointmentStatus::Cancelled)?;
    let reason = required_text(reason, "Cancellation reason")?;
    let now = Utc::now();

    let mut active: appointments::ActiveModel = appointment.into();
    active.status = Set(AppointmentStatus::Cancelled);
    active.cancellation_reason = Set(Some(reason));
    active.cancelled_by_id = Set(Some(actor.id));
    active.cancelled_at = Set(Some(now));
    active.updated_at = Set(now);
    let appointment = active.update(db).await?;

    info!(appointment_id, cancelled_by = actor.id, "Appointment cancelled");
    Ok(appointment)
}

/// Clients see their bookings, developers their sessions, admins everything.
pub async fn list_appointments(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    actor: &Identity,
    filter: AppointmentFilter,
) -> AppResult<Vec<AppointmentView>> {
    let mut query = appointments::Entity::find();
    match actor.role {
        UserRole::Client => query = query.filter(appointments::Column::ClientId.eq(actor.id)),
        UserRole::Developer => query = query.filter(appointments::Column::DeveloperId.eq(actor.id)),
        UserRole::Admin => {}
    }
    if let Some(status) = filter.status {
        query = query.filter(appointments::Column::Status.eq(status));
    }
    let rows = query
        .order_by_asc(appointments::Column::ScheduledAt)
        .order_by_asc(appointments::Column::Id)
        .all(db)
        .await?;

    let names = directory
        .display_names(&collect_ids(
            rows.iter()
                .flat_map(|a| [Some(a.client_id), Some(a.developer_id)]),
        ))
        .await?;
    Ok(rows
        .into_iter()
        .map(|appointment| AppointmentView {
            client_name: names.get(&appointment.client_id).cloned(),
            developer_name: names.get(&appointment.developer_id).cloned(),
            appointment,
        })
        .collect())
}
