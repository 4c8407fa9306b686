use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::auth::{AdminUser, AnyUser, ClientUser, DeveloperUser};
use crate::entities::appointments;
use crate::error::AppResult;
use crate::models::marketplace::{
    AppointmentFilter, AppointmentView, BookAppointmentRequest, CancelAppointmentRequest,
    ConfirmAppointmentRequest,
};
use crate::services::appointments as appointment_service;
use crate::AppState;

/// Handler for POST /api/client/appointments
pub async fn book(
    State(state): State<AppState>,
    ClientUser(client): ClientUser,
    Json(req): Json<BookAppointmentRequest>,
) -> AppResult<(StatusCode, Json<appointments::Model>)> {
    let appointment =
        appointment_service::book_appointment(&state.db, state.directory.as_ref(), &client, req)
            .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn list_for_client(
    State(state): State<AppState>,
    ClientUser(client): ClientUser,
    Query(filter): Query<AppointmentFilter>,
) -> AppResult<Json<Vec<AppointmentView>>> {
    Ok(Json(
        appointment_service::list_appointments(&state.db, state.directory.as_ref(), &client, filter)
            .await?,
    ))
}

pub async fn list_for_developer(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
    Query(filter): Query<AppointmentFilter>,
) -> AppResult<Json<Vec<AppointmentView>>> {
    Ok(Json(
        appointment_service::list_appointments(
            &state.db,
            state.directory.as_ref(),
            &developer,
            filter,
        )
        .await?,
    ))
}

pub async fn list_all(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(filter): Query<AppointmentFilter>,
) -> AppResult<Json<Vec<AppointmentView>>> {
    Ok(Json(
        appointment_service::list_appointments(&state.db, state.directory.as_ref(), &admin, filter)
            .await?,
    ))
}

pub async fn confirm(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
    Path(appointment_id): Path<i32>,
    Json(req): Json<ConfirmAppointmentRequest>,
) -> AppResult<Json<appointments::Model>> {
    Ok(Json(
        appointment_service::confirm_appointment(&state.db, &developer, appointment_id, req)
            .await?,
    ))
}

pub async fn complete(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
    Path(appointment_id): Path<i32>,
) -> AppResult<Json<appointments::Model>> {
    Ok(Json(
        appointment_service::complete_appointment(&state.db, &developer, appointment_id).await?,
    ))
}

pub async fn no_show(
    State(state): State<AppState>,
    DeveloperUser(developer): DeveloperUser,
    Path(appointment_id): Path<i32>,
) -> AppResult<Json<appointments::Model>> {
    Ok(Json(
        appointment_service::mark_no_show(&state.db, &developer, appointment_id).await?,
    ))
}

/// Handler for POST /api/appointments/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    AnyUser(user): AnyUser,
    Path(appointment_id): Path<i32>,
    Json(req): Json<CancelAppointmentRequest>,
) -> AppResult<Json<appointments::Model>> {
    Ok(Json(
        appointment_service::cancel_appointment(&state.db, &user, appointment_id, &req.reason)
            .await?,
    ))
}
