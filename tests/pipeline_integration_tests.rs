mod common;

use async_trait::async_trait;
use rust_decimal_macros::dec;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};
use std::path::Path;
use std::collections::HashMap;

use devnest_backend::entities::{
    developer_assignments::{self, AssignmentRole},
    lead_follow_ups,
    leads::{self, LeadStatus},
    payment_transactions, payments,
    project_documents::{self, DocumentType},
    project_milestones::{self, MilestoneStatus},
    student_projects::{self, StudentProjectStatus},
    users::{UserRole, UserStatus},
};
use devnest_backend::config::{AppConfig, IssuerConfig};
use devnest_backend::error::{AppError, AppResult};
use devnest_backend::models::lead::{
    ConfirmLeadRequest, CreateLeadRequest, DeveloperSelection, RecordFollowUpRequest,
};
use devnest_backend::models::student_project::{AssignDeveloperRequest, RecordPaymentRequest};
use devnest_backend::money::from_minor_units;
use devnest_backend::services::directory::{DbDirectory, Identity, IdentityDirectory};
use devnest_backend::services::file_store::{FileCategory, LocalFileStore, UploadedFile};
use devnest_backend::services::{
    assignments, confirmation, documents, invoice, leads as lead_service, ledger, milestones,
    student_projects as project_service,
};

use crate::common::{seed_admin, seed_ravi, setup_test_db, DEVELOPER_ID};

fn follow_up(status: LeadStatus, notes: &str) -> RecordFollowUpRequest {
    RecordFollowUpRequest {
        notes: notes.to_string(),
        callback_date: None,
        callback_time: None,
        status,
        interacted_by_id: None,
    }
}

fn confirm_request(developer_id: i32) -> ConfirmLeadRequest {
    ConfirmLeadRequest {
        title: "Smart Attendance System".to_string(),
        scope: Some("Face recognition attendance".to_string()),
        tech_stack: vec!["Python".to_string(), " OpenCV ".to_string()],
        timeline_weeks: Some(6),
        academic_requirements: None,
        total_cost: dec!(50000),
        payment_structure: Some("50% Advance, 50% Delivery".to_string()),
        developer: DeveloperSelection::Developer { developer_id },
        payout_amount: dec!(10000),
        closed_by_id: None,
    }
}

fn payment(amount: rust_decimal::Decimal) -> RecordPaymentRequest {
    RecordPaymentRequest {
        amount,
        payment_mode: Some("UPI".to_string()),
        invoice_ref: None,
        notes: None,
    }
}

async fn create_asha(db: &DatabaseConnection, admin: &Identity) -> leads::Model {
    lead_service::create_lead(
        db,
        admin,
        CreateLeadRequest {
            student_name: "Asha".to_string(),
            phone: "9990001111".to_string(),
            email: Some("asha@example.com".to_string()),
            college: Some("REC".to_string()),
            domain: Some("AI".to_string()),
            source: Some("WhatsApp".to_string()),
            requirement_summary: None,
        },
    )
    .await
    .expect("Failed to create lead")
}

/// Lead with two follow-ups, confirmed with Ravi as lead developer.
async fn confirmed_asha(
    db: &DatabaseConnection,
    directory: &DbDirectory,
    admin: &Identity,
) -> student_projects::Model {
    let lead = create_asha(db, admin).await;
    lead_service::record_follow_up(db, directory, admin, lead.id, follow_up(LeadStatus::FollowUp, "Called"))
        .await
        .unwrap();
    lead_service::record_follow_up(db, directory, admin, lead.id, follow_up(LeadStatus::Interested, "Wants AI"))
        .await
        .unwrap();
    confirmation::confirm_lead(db, directory, admin, lead.id, confirm_request(DEVELOPER_ID))
        .await
        .unwrap()
        .project
}

async fn payment_of(db: &DatabaseConnection, project_id: i32) -> payments::Model {
    payments::Entity::find()
        .filter(payments::Column::ProjectId.eq(project_id))
        .one(db)
        .await
        .unwrap()
        .expect("Payment row should exist")
}

#[tokio::test]
async fn test_lead_confirmation_creates_project_ledger_and_checklist() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());

    let project = confirmed_asha(&db, &directory, &admin).await;

    assert_eq!(project.status, StudentProjectStatus::Confirmed);
    assert_eq!(project.closed_by_id, Some(admin.id));
    assert_eq!(project.confirmed_by_id, Some(admin.id));
    assert_eq!(project.tech_stack.0, vec!["Python", "OpenCV"]);

    let payment = payment_of(&db, project.id).await;
    assert_eq!(from_minor_units(payment.total_cost), dec!(50000));
    assert_eq!(from_minor_units(payment.pending_balance), dec!(50000));
    assert_eq!(payment.amount_paid, 0);

    let milestones = project_milestones::Entity::find()
        .filter(project_milestones::Column::ProjectId.eq(project.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(milestones.len(), 5);
    assert!(milestones.iter().all(|m| m.status == MilestoneStatus::Pending));
    assert!(milestones.iter().all(|m| m.completed_at.is_none()));

    let assignments = developer_assignments::Entity::find()
        .filter(developer_assignments::Column::ProjectId.eq(project.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].developer_id, DEVELOPER_ID);
    assert_eq!(assignments[0].role, AssignmentRole::LeadDeveloper);
    assert_eq!(from_minor_units(assignments[0].payout_amount), dec!(10000));

    let lead = leads::Entity::find_by_id(project.lead_id.unwrap())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lead.status, LeadStatus::Confirmed);

    let follow_ups = lead_follow_ups::Entity::find()
        .filter(lead_follow_ups::Column::LeadId.eq(lead.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(follow_ups, 2);
}

#[tokio::test]
async fn test_follow_ups_are_listed_in_recording_order() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let directory = DbDirectory::new(db.clone());
    let lead = create_asha(&db, &admin).await;

    lead_service::record_follow_up(&db, &directory, &admin, lead.id, follow_up(LeadStatus::FollowUp, "first"))
        .await
        .unwrap();
    let mut with_callback = follow_up(LeadStatus::Interested, "second");
    with_callback.callback_date = Some("2030-01-15".to_string());
    with_callback.callback_time = Some("10:30".to_string());
    lead_service::record_follow_up(&db, &directory, &admin, lead.id, with_callback)
        .await
        .unwrap();

    let detail = lead_service::get_lead(&db, &directory, lead.id).await.unwrap();
    assert_eq!(detail.lead.status, LeadStatus::Interested);
    let notes: Vec<&str> = detail
        .follow_ups
        .iter()
        .map(|f| f.follow_up.interaction_notes.as_str())
        .collect();
    assert_eq!(notes, vec!["first", "second"]);
    assert!(detail.follow_ups[1].follow_up.callback_at.is_some());
    assert_eq!(detail.follow_ups[0].recorded_by_name.as_deref(), Some("Meera"));
    assert_eq!(detail.student_project_id, None);
}

#[tokio::test]
async fn test_partial_callback_is_rejected_without_writing() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let directory = DbDirectory::new(db.clone());
    let lead = create_asha(&db, &admin).await;

    let mut req = follow_up(LeadStatus::Interested, "call back");
    req.callback_date = Some("2030-01-15".to_string());
    let result = lead_service::record_follow_up(&db, &directory, &admin, lead.id, req).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let lead = leads::Entity::find_by_id(lead.id).one(&db).await.unwrap().unwrap();
    assert_eq!(lead.status, LeadStatus::NewLead);
    assert_eq!(lead_follow_ups::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_follow_up_cannot_confirm_a_lead() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let directory = DbDirectory::new(db.clone());
    let lead = create_asha(&db, &admin).await;

    let result = lead_service::record_follow_up(
        &db,
        &directory,
        &admin,
        lead.id,
        follow_up(LeadStatus::Confirmed, "sure"),
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_payments_keep_balance_and_history_consistent() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;

    let first = ledger::record_payment(&db, &admin, project.id, payment(dec!(20000)))
        .await
        .unwrap();
    assert_eq!(from_minor_units(first.payment.amount_paid), dec!(20000));
    assert_eq!(from_minor_units(first.payment.pending_balance), dec!(30000));
    assert_eq!(from_minor_units(first.transaction.amount), dec!(20000));
    assert_eq!(payment_transactions::Entity::find().count(&db).await.unwrap(), 1);

    let second = ledger::record_payment(&db, &admin, project.id, payment(dec!(30000)))
        .await
        .unwrap();
    assert_eq!(from_minor_units(second.payment.amount_paid), dec!(50000));
    assert_eq!(second.payment.pending_balance, 0);

    let transactions = payment_transactions::Entity::find()
        .filter(payment_transactions::Column::PaymentId.eq(second.payment.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(transactions.len(), 2);
    let sum: i64 = transactions.iter().map(|t| t.amount).sum();
    assert_eq!(sum, second.payment.amount_paid);
    assert_eq!(
        second.payment.pending_balance,
        second.payment.total_cost - second.payment.amount_paid
    );
    assert!(transactions.iter().all(|t| t.recorded_by_id == Some(admin.id)));
}

#[tokio::test]
async fn test_overpayment_leaves_a_negative_balance() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;

    let recorded = ledger::record_payment(&db, &admin, project.id, payment(dec!(999999)))
        .await
        .unwrap();
    assert_eq!(from_minor_units(recorded.payment.pending_balance), dec!(-949999));
}

#[tokio::test]
async fn test_non_positive_payment_is_rejected() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;

    for amount in [dec!(0), dec!(-10)] {
        let result = ledger::record_payment(&db, &admin, project.id, payment(amount)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
    assert_eq!(payment_of(&db, project.id).await.amount_paid, 0);
}

#[tokio::test]
async fn test_oversized_payment_is_a_validation_error() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;

    for _ in 0..2 {
        let result =
            ledger::record_payment(&db, &admin, project.id, payment(dec!(900000000000000))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
    assert_eq!(payment_transactions::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(payment_of(&db, project.id).await.amount_paid, 0);
}

#[tokio::test]
async fn test_second_confirmation_is_a_conflict() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;

    let result = confirmation::confirm_lead(
        &db,
        &directory,
        &admin,
        project.lead_id.unwrap(),
        confirm_request(DEVELOPER_ID),
    )
    .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(student_projects::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_unverified_developer_cannot_be_selected() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let pending = common::seed_developer(&db, None, "new@example.com", "Kiran", UserStatus::Pending).await;
    let directory = DbDirectory::new(db.clone());
    let lead = create_asha(&db, &admin).await;

    let result =
        confirmation::confirm_lead(&db, &directory, &admin, lead.id, confirm_request(pending.id)).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(student_projects::Entity::find().count(&db).await.unwrap(), 0);
}

/// Vouches for a developer id that has no row in `users`, so the assignment
/// insert fails on its foreign key halfway through the confirmation.
struct PhantomDeveloperDirectory {
    inner: DbDirectory,
}

const PHANTOM_DEVELOPER_ID: i32 = 999;

#[async_trait]
impl IdentityDirectory for PhantomDeveloperDirectory {
    async fn lookup(&self, user_id: i32) -> AppResult<Option<Identity>> {
        if user_id == PHANTOM_DEVELOPER_ID {
            return Ok(Some(Identity {
                id: PHANTOM_DEVELOPER_ID,
                full_name: "Ghost".to_string(),
                role: UserRole::Developer,
                status: UserStatus::Verified,
            }));
        }
        self.inner.lookup(user_id).await
    }

    async fn display_names(&self, user_ids: &[i32]) -> AppResult<HashMap<i32, String>> {
        self.inner.display_names(user_ids).await
    }
}

#[tokio::test]
async fn test_failed_confirmation_writes_nothing() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let directory = PhantomDeveloperDirectory {
        inner: DbDirectory::new(db.clone()),
    };
    let lead = create_asha(&db, &admin).await;

    let result = confirmation::confirm_lead(
        &db,
        &directory,
        &admin,
        lead.id,
        confirm_request(PHANTOM_DEVELOPER_ID),
    )
    .await;
    assert!(matches!(result, Err(AppError::Database(_))));

    assert_eq!(student_projects::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(payments::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(developer_assignments::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(project_milestones::Entity::find().count(&db).await.unwrap(), 0);
    let lead = leads::Entity::find_by_id(lead.id).one(&db).await.unwrap().unwrap();
    assert_eq!(lead.status, LeadStatus::NewLead);
}

#[tokio::test]
async fn test_milestone_toggle_round_trip() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;

    let milestone = project_milestones::Entity::find()
        .filter(project_milestones::Column::ProjectId.eq(project.id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    let done = milestones::toggle_milestone(&db, &admin, project.id, milestone.id)
        .await
        .unwrap();
    assert_eq!(done.status, MilestoneStatus::Completed);
    assert!(done.completed_at.is_some());

    let reverted = milestones::toggle_milestone(&db, &admin, project.id, milestone.id)
        .await
        .unwrap();
    assert_eq!(reverted.status, MilestoneStatus::Pending);
    assert!(reverted.completed_at.is_none());
}

#[tokio::test]
async fn test_cross_project_milestone_is_refused() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let first = confirmed_asha(&db, &directory, &admin).await;
    let second = confirmed_asha(&db, &directory, &admin).await;

    let foreign = project_milestones::Entity::find()
        .filter(project_milestones::Column::ProjectId.eq(second.id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    let result = milestones::toggle_milestone(&db, &admin, first.id, foreign.id).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let untouched = project_milestones::Entity::find_by_id(foreign.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched, foreign);
}

#[tokio::test]
async fn test_duplicate_assignments_are_allowed() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;

    assignments::add_assignment(
        &db,
        &directory,
        &admin,
        project.id,
        AssignDeveloperRequest {
            developer_id: DEVELOPER_ID,
            role: AssignmentRole::Developer,
            payout_amount: dec!(2500),
            internal_notes: Some("UI polish".to_string()),
        },
    )
    .await
    .unwrap();

    let listed = assignments::list_assignments(&db, project.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|a| a.developer_id == DEVELOPER_ID));

    let detail = project_service::get_student_project(&db, &directory, project.id)
        .await
        .unwrap();
    assert!(detail
        .assignments
        .iter()
        .all(|a| a.developer_name.as_deref() == Some("Ravi")));
}

#[tokio::test]
async fn test_status_moves_forward_one_step() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;

    let skipped =
        project_service::update_status(&db, &admin, project.id, StudentProjectStatus::Delivered).await;
    assert!(matches!(skipped, Err(AppError::Conflict(_))));

    let next = project_service::update_status(&db, &admin, project.id, StudentProjectStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(next.status, StudentProjectStatus::InProgress);
}

#[tokio::test]
async fn test_project_detail_lists_transactions_newest_first() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;

    ledger::record_payment(&db, &admin, project.id, payment(dec!(20000))).await.unwrap();
    ledger::record_payment(&db, &admin, project.id, payment(dec!(5000))).await.unwrap();

    let detail = project_service::get_student_project(&db, &directory, project.id)
        .await
        .unwrap();
    let amounts: Vec<_> = detail.transactions.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![dec!(5000), dec!(20000)]);
    assert_eq!(detail.milestones.len(), 5);
    assert_eq!(detail.payment.unwrap().pending_balance, dec!(25000));
    assert_eq!(detail.lead.unwrap().student_name, "Asha");
    assert_eq!(detail.project.closed_by_name.as_deref(), Some("Meera"));
}

#[tokio::test]
async fn test_invoice_reflects_the_live_ledger() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;
    let issuer = IssuerConfig::default();

    let first = ledger::record_payment(&db, &admin, project.id, payment(dec!(20000)))
        .await
        .unwrap();
    let before = invoice::assemble_invoice(&db, &issuer, project.id, first.transaction.id)
        .await
        .unwrap();
    assert_eq!(before.amount_paid, dec!(20000));
    assert_eq!(before.pending_balance, dec!(30000));
    assert_eq!(before.transaction.amount, dec!(20000));
    assert_eq!(before.history.len(), 1);

    let second = ledger::record_payment(&db, &admin, project.id, payment(dec!(30000)))
        .await
        .unwrap();
    let after = invoice::assemble_invoice(&db, &issuer, project.id, first.transaction.id)
        .await
        .unwrap();
    assert_eq!(after.amount_paid, dec!(50000));
    assert_eq!(after.pending_balance, dec!(0));
    assert_eq!(after.transaction.transaction_id, first.transaction.id);
    assert_eq!(after.transaction.amount, dec!(20000));
    let history: Vec<_> = after.history.iter().map(|l| l.transaction_id).collect();
    assert_eq!(history, vec![second.transaction.id, first.transaction.id]);
}

fn document_store(root: &Path) -> LocalFileStore {
    LocalFileStore::new(root, AppConfig::default().allowed_extensions)
}

fn srs_upload(name: &str) -> UploadedFile {
    UploadedFile {
        original_name: name.to_string(),
        bytes: b"requirements".to_vec(),
    }
}

fn stored_project_files(root: &Path) -> usize {
    std::fs::read_dir(root.join(FileCategory::Projects.dir_name()))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_document_upload_stores_row_and_file() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;
    let uploads = tempfile::tempdir().unwrap();
    let store = document_store(uploads.path());

    let document = documents::upload_document(
        &db,
        &store,
        &admin,
        project.id,
        DocumentType::Srs,
        srs_upload("srs.pdf"),
    )
    .await
    .unwrap();

    assert_eq!(document.project_id, project.id);
    assert_eq!(document.original_name.as_deref(), Some("srs.pdf"));
    assert_eq!(document.uploaded_by_id, Some(admin.id));
    assert!(document.file_path.ends_with(".pdf"));
    assert!(store.path_for(&document.file_path, FileCategory::Projects).exists());
    assert_eq!(project_documents::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_disallowed_document_type_writes_nothing() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;
    let uploads = tempfile::tempdir().unwrap();
    let store = document_store(uploads.path());

    let result = documents::upload_document(
        &db,
        &store,
        &admin,
        project.id,
        DocumentType::SourceCode,
        srs_upload("x.exe"),
    )
    .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(project_documents::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(stored_project_files(uploads.path()), 0);
}

#[tokio::test]
async fn test_document_for_unknown_project_stores_no_file() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let uploads = tempfile::tempdir().unwrap();
    let store = document_store(uploads.path());

    let result = documents::upload_document(
        &db,
        &store,
        &admin,
        999,
        DocumentType::Proposal,
        srs_upload("proposal.pdf"),
    )
    .await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
    assert_eq!(stored_project_files(uploads.path()), 0);
}

#[tokio::test]
async fn test_failed_document_insert_removes_the_stored_file() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = confirmed_asha(&db, &directory, &admin).await;
    let uploads = tempfile::tempdir().unwrap();
    let store = document_store(uploads.path());

    // The project still exists, so only the row insert fails
    db.execute_unprepared("DROP TABLE project_documents")
        .await
        .unwrap();

    let result = documents::upload_document(
        &db,
        &store,
        &admin,
        project.id,
        DocumentType::Srs,
        srs_upload("srs.pdf"),
    )
    .await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(stored_project_files(uploads.path()), 0);
}
