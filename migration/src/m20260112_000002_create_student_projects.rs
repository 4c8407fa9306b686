//! Confirmed student projects and everything they own: the payment ledger,
//! its transactions, attached documents and developer assignments.
//!
//! Money columns hold integer minor units (paise).

use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000001_create_users::Users;
use super::m20260112_000001_create_leads::Leads;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudentProjects::Table)
                    .if_not_exists()
                    .col(pk_auto(StudentProjects::Id))
                    .col(integer_null(StudentProjects::LeadId))
                    .col(integer_null(StudentProjects::ClosedById))
                    .col(integer_null(StudentProjects::ConfirmedById))
                    .col(string_len(StudentProjects::Title, 200))
                    .col(text_null(StudentProjects::Scope))
                    .col(json(StudentProjects::TechStack))
                    .col(integer_null(StudentProjects::TimelineWeeks))
                    .col(text_null(StudentProjects::AcademicRequirements))
                    .col(string_len(StudentProjects::Status, 30))
                    .col(timestamp_with_time_zone(StudentProjects::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(StudentProjects::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_projects_lead")
                            .from(StudentProjects::Table, StudentProjects::LeadId)
                            .to(Leads::Table, Leads::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_projects_closed_by")
                            .from(StudentProjects::Table, StudentProjects::ClosedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_projects_confirmed_by")
                            .from(StudentProjects::Table, StudentProjects::ConfirmedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // One confirmed project per lead
        manager
            .create_index(
                Index::create()
                    .name("uq_student_projects_lead")
                    .table(StudentProjects::Table)
                    .col(StudentProjects::LeadId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk_auto(Payments::Id))
                    .col(integer(Payments::ProjectId))
                    .col(big_integer(Payments::TotalCost))
                    .col(string_len_null(Payments::PaymentStructure, 100))
                    .col(big_integer(Payments::AmountPaid).default(0))
                    .col(big_integer(Payments::PendingBalance))
                    .col(string_len_null(Payments::PaymentMode, 50))
                    .col(string_len_null(Payments::InvoiceRef, 100))
                    .col(timestamp_with_time_zone(Payments::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Payments::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_project")
                            .from(Payments::Table, Payments::ProjectId)
                            .to(StudentProjects::Table, StudentProjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_payments_project")
                    .table(Payments::Table)
                    .col(Payments::ProjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentTransactions::Table)
                    .if_not_exists()
                    .col(pk_auto(PaymentTransactions::Id))
                    .col(integer(PaymentTransactions::PaymentId))
                    .col(big_integer(PaymentTransactions::Amount))
                    .col(string_len_null(PaymentTransactions::PaymentMode, 50))
                    .col(string_len_null(PaymentTransactions::InvoiceRef, 100))
                    .col(timestamp_with_time_zone(PaymentTransactions::TransactionDate).default(Expr::current_timestamp()))
                    .col(text_null(PaymentTransactions::Notes))
                    .col(integer_null(PaymentTransactions::RecordedById))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_transactions_payment")
                            .from(PaymentTransactions::Table, PaymentTransactions::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_transactions_recorded_by")
                            .from(PaymentTransactions::Table, PaymentTransactions::RecordedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_transactions_payment")
                    .table(PaymentTransactions::Table)
                    .col(PaymentTransactions::PaymentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProjectDocuments::Table)
                    .if_not_exists()
                    .col(pk_auto(ProjectDocuments::Id))
                    .col(integer(ProjectDocuments::ProjectId))
                    .col(string_len(ProjectDocuments::DocumentType, 30))
                    .col(string(ProjectDocuments::FilePath))
                    .col(string_null(ProjectDocuments::OriginalName))
                    .col(integer_null(ProjectDocuments::UploadedById))
                    .col(timestamp_with_time_zone(ProjectDocuments::UploadedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_documents_project")
                            .from(ProjectDocuments::Table, ProjectDocuments::ProjectId)
                            .to(StudentProjects::Table, StudentProjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_documents_uploaded_by")
                            .from(ProjectDocuments::Table, ProjectDocuments::UploadedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // No uniqueness on (project, developer): a developer may hold several roles
        manager
            .create_table(
                Table::create()
                    .table(DeveloperAssignments::Table)
                    .if_not_exists()
                    .col(pk_auto(DeveloperAssignments::Id))
                    .col(integer(DeveloperAssignments::ProjectId))
                    .col(integer(DeveloperAssignments::DeveloperId))
                    .col(string_len(DeveloperAssignments::Role, 40))
                    .col(big_integer(DeveloperAssignments::PayoutAmount).default(0))
                    .col(text_null(DeveloperAssignments::InternalNotes))
                    .col(timestamp_with_time_zone(DeveloperAssignments::AssignedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_developer_assignments_project")
                            .from(DeveloperAssignments::Table, DeveloperAssignments::ProjectId)
                            .to(StudentProjects::Table, StudentProjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_developer_assignments_developer")
                            .from(DeveloperAssignments::Table, DeveloperAssignments::DeveloperId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeveloperAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectDocuments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentProjects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum StudentProjects {
    Table,
    Id,
    LeadId,
    ClosedById,
    ConfirmedById,
    Title,
    Scope,
    TechStack,
    TimelineWeeks,
    AcademicRequirements,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    ProjectId,
    TotalCost,
    PaymentStructure,
    AmountPaid,
    PendingBalance,
    PaymentMode,
    InvoiceRef,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PaymentTransactions {
    Table,
    Id,
    PaymentId,
    Amount,
    PaymentMode,
    InvoiceRef,
    TransactionDate,
    Notes,
    RecordedById,
}

#[derive(DeriveIden)]
enum ProjectDocuments {
    Table,
    Id,
    ProjectId,
    DocumentType,
    FilePath,
    OriginalName,
    UploadedById,
    UploadedAt,
}

#[derive(DeriveIden)]
enum DeveloperAssignments {
    Table,
    Id,
    ProjectId,
    DeveloperId,
    Role,
    PayoutAmount,
    InternalNotes,
    AssignedAt,
}
