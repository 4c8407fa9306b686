//! Sales pipeline: leads and their follow-up history

use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(pk_auto(Leads::Id))
                    .col(string_len(Leads::StudentName, 100))
                    .col(string_len(Leads::Phone, 20))
                    .col(string_len_null(Leads::Email, 120))
                    .col(string_len_null(Leads::College, 200))
                    .col(string_len_null(Leads::Domain, 100))
                    .col(string_len_null(Leads::Source, 50))
                    .col(text_null(Leads::RequirementSummary))
                    .col(string_len(Leads::Status, 30))
                    .col(timestamp_with_time_zone(Leads::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Leads::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leads_status")
                    .table(Leads::Table)
                    .col(Leads::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeadFollowUps::Table)
                    .if_not_exists()
                    .col(pk_auto(LeadFollowUps::Id))
                    .col(integer(LeadFollowUps::LeadId))
                    .col(text(LeadFollowUps::InteractionNotes))
                    .col(timestamp_with_time_zone_null(LeadFollowUps::CallbackAt))
                    .col(string_len(LeadFollowUps::StatusAtTime, 30))
                    .col(integer_null(LeadFollowUps::RecordedById))
                    .col(timestamp_with_time_zone(LeadFollowUps::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lead_follow_ups_lead")
                            .from(LeadFollowUps::Table, LeadFollowUps::LeadId)
                            .to(Leads::Table, Leads::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lead_follow_ups_recorded_by")
                            .from(LeadFollowUps::Table, LeadFollowUps::RecordedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Dashboard reads upcoming callbacks ordered by time
        manager
            .create_index(
                Index::create()
                    .name("idx_lead_follow_ups_callback")
                    .table(LeadFollowUps::Table)
                    .col(LeadFollowUps::CallbackAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeadFollowUps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Leads {
    Table,
    Id,
    StudentName,
    Phone,
    Email,
    College,
    Domain,
    Source,
    RequirementSummary,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LeadFollowUps {
    Table,
    Id,
    LeadId,
    InteractionNotes,
    CallbackAt,
    StatusAtTime,
    RecordedById,
    CreatedAt,
}
