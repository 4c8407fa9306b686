//! Admin lead-management API: leads, confirmation, ledger, delivery tracking.

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use chrono::Utc;
use sea_orm::ActiveEnum;

use crate::auth::AdminUser;
use crate::entities::{
    developer_assignments, lead_follow_ups, leads, project_documents,
    project_documents::DocumentType, project_milestones, student_projects,
};
use crate::error::{AppError, AppResult};
use crate::handlers::upload::read_upload_form;
use crate::models::dashboard::Dashboard;
use crate::models::lead::{
    ConfirmLeadRequest, CreateLeadRequest, LeadDetail, LeadFilter, RecordFollowUpRequest,
};
use crate::models::student_project::{
    AssignDeveloperRequest, AssignmentView, ConfirmedProjectResponse, InvoiceQuery,
    RecordPaymentRequest, RecordedPaymentResponse, StudentProjectDetail,
    UpdateRepositoryRequest, UpdateStudentProjectStatusRequest,
};
use crate::services::{
    assignments, confirmation, documents, invoice, leads as lead_service, ledger, milestones,
    reporting, student_projects as project_service,
};
use crate::AppState;

/// Handler for GET /api/admin/leads-management/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Dashboard>> {
    Ok(Json(reporting::dashboard(&state.db, Utc::now()).await?))
}

/// Handler for GET /api/admin/leads-management/leads
pub async fn list_leads(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(filter): Query<LeadFilter>,
) -> AppResult<Json<Vec<leads::Model>>> {
    Ok(Json(lead_service::list_leads(&state.db, filter).await?))
}

/// Handler for POST /api/admin/leads-management/leads
pub async fn create_lead(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateLeadRequest>,
) -> AppResult<(StatusCode, Json<leads::Model>)> {
    let lead = lead_service::create_lead(&state.db, &admin, req).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

pub async fn get_lead(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(lead_id): Path<i32>,
) -> AppResult<Json<LeadDetail>> {
    Ok(Json(
        lead_service::get_lead(&state.db, state.directory.as_ref(), lead_id).await?,
    ))
}

/// Handler for GET /api/admin/leads-management/leads/export
pub async fn export_leads(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> AppResult<Response> {
    let csv = lead_service::export_leads_csv(&state.db).await?;
    let filename = format!("leads_export_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
    tracing::info!(acting_user_id = admin.id, bytes = csv.len(), "Leads exported");

    download(csv, "text/csv; charset=utf-8", &filename, false)
}

/// Handler for POST /api/admin/leads-management/leads/{id}/follow-ups
pub async fn record_follow_up(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(lead_id): Path<i32>,
    Json(req): Json<RecordFollowUpRequest>,
) -> AppResult<(StatusCode, Json<lead_follow_ups::Model>)> {
    let follow_up =
        lead_service::record_follow_up(&state.db, state.directory.as_ref(), &admin, lead_id, req)
            .await?;
    Ok((StatusCode::CREATED, Json(follow_up)))
}

/// Handler for POST /api/admin/leads-management/leads/{id}/confirm
pub async fn confirm_lead(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(lead_id): Path<i32>,
    Json(req): Json<ConfirmLeadRequest>,
) -> AppResult<(StatusCode, Json<ConfirmedProjectResponse>)> {
    let confirmed =
        confirmation::confirm_lead(&state.db, state.directory.as_ref(), &admin, lead_id, req)
            .await?;
    Ok((StatusCode::CREATED, Json(confirmed.into())))
}

pub async fn list_projects(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<student_projects::Model>>> {
    Ok(Json(project_service::list_student_projects(&state.db).await?))
}

pub async fn get_project(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(project_id): Path<i32>,
) -> AppResult<Json<StudentProjectDetail>> {
    Ok(Json(
        project_service::get_student_project(&state.db, state.directory.as_ref(), project_id)
            .await?,
    ))
}

/// Handler for POST /api/admin/leads-management/projects/{id}/payments
pub async fn record_payment(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(project_id): Path<i32>,
    Json(req): Json<RecordPaymentRequest>,
) -> AppResult<(StatusCode, Json<RecordedPaymentResponse>)> {
    let recorded = ledger::record_payment(&state.db, &admin, project_id, req).await?;
    Ok((StatusCode::CREATED, Json(recorded.into())))
}

/// Handler for GET /api/admin/leads-management/projects/{id}/invoice/{transaction_id}
///
/// Served as an attachment unless `?view=true`.
pub async fn download_invoice(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path((project_id, transaction_id)): Path<(i32, i32)>,
    Query(query): Query<InvoiceQuery>,
) -> AppResult<Response> {
    let invoice =
        invoice::assemble_invoice(&state.db, &state.config.issuer, project_id, transaction_id)
            .await?;
    let rendered = state.invoice_renderer.render(&invoice)?;
    let filename = invoice.file_name(rendered.extension);
    tracing::info!(
        project_id,
        transaction_id,
        invoice = %invoice.number,
        acting_user_id = admin.id,
        "Invoice generated"
    );

    download(rendered.bytes, rendered.content_type, &filename, query.view)
}

/// Handler for POST /api/admin/leads-management/projects/{id}/milestones/{milestone_id}/toggle
pub async fn toggle_milestone(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path((project_id, milestone_id)): Path<(i32, i32)>,
) -> AppResult<Json<project_milestones::Model>> {
    Ok(Json(
        milestones::toggle_milestone(&state.db, &admin, project_id, milestone_id).await?,
    ))
}

/// Handler for POST /api/admin/leads-management/projects/{id}/documents
///
/// Multipart form with a `file` part and a `document_type` field.
pub async fn upload_document(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(project_id): Path<i32>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<project_documents::Model>)> {
    let mut form = read_upload_form(multipart).await?;
    let raw_type = form.require_field("document_type")?.to_string();
    let document_type = DocumentType::try_from_value(&raw_type)
        .map_err(|_| AppError::validation(format!("Unknown document type {raw_type}")))?;
    let file = form.require_file()?;

    let document = documents::upload_document(
        &state.db,
        state.file_store.as_ref(),
        &admin,
        project_id,
        document_type,
        file,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn list_assignments(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(project_id): Path<i32>,
) -> AppResult<Json<Vec<AssignmentView>>> {
    ledger::find_project(&state.db, project_id).await?;
    let rows = assignments::list_assignments(&state.db, project_id).await?;
    let names = state
        .directory
        .display_names(&rows.iter().map(|a| a.developer_id).collect::<Vec<_>>())
        .await?;
    Ok(Json(
        rows.into_iter()
            .map(|a| {
                let name = names.get(&a.developer_id).cloned();
                AssignmentView::new(a, name)
            })
            .collect(),
    ))
}

/// Handler for POST /api/admin/leads-management/projects/{id}/assignments
pub async fn add_assignment(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(project_id): Path<i32>,
    Json(req): Json<AssignDeveloperRequest>,
) -> AppResult<(StatusCode, Json<AssignmentView>)> {
    let assignment: developer_assignments::Model = assignments::add_assignment(
        &state.db,
        state.directory.as_ref(),
        &admin,
        project_id,
        req,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(AssignmentView::new(assignment, None))))
}

/// Handler for PUT /api/admin/leads-management/projects/{id}/repository
pub async fn update_repository(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(project_id): Path<i32>,
    Json(req): Json<UpdateRepositoryRequest>,
) -> AppResult<Json<student_projects::Model>> {
    Ok(Json(
        project_service::update_repository_link(&state.db, &admin, project_id, req.repository_link)
            .await?,
    ))
}

/// Handler for PUT /api/admin/leads-management/projects/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(project_id): Path<i32>,
    Json(req): Json<UpdateStudentProjectStatusRequest>,
) -> AppResult<Json<student_projects::Model>> {
    Ok(Json(
        project_service::update_status(&state.db, &admin, project_id, req.status).await?,
    ))
}

fn download(bytes: Vec<u8>, content_type: &str, filename: &str, inline: bool) -> AppResult<Response> {
    let disposition = format!(
        "{}; filename=\"{filename}\"",
        if inline { "inline" } else { "attachment" }
    );
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build download response: {e}")))
}
