//! Client projects, delivery teams and developer appointments

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
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(pk_auto(Projects::Id))
                    .col(integer(Projects::ClientId))
                    .col(string_len(Projects::Title, 200))
                    .col(text(Projects::Description))
                    .col(text_null(Projects::Requirements))
                    .col(string_len_null(Projects::ProjectType, 50))
                    .col(json(Projects::Technologies))
                    .col(string_len_null(Projects::Domain, 100))
                    .col(big_integer_null(Projects::BudgetMin))
                    .col(big_integer_null(Projects::BudgetMax))
                    .col(string_len(Projects::Currency, 10))
                    .col(integer_null(Projects::TimelineWeeks))
                    .col(string_len(Projects::Status, 20))
                    .col(string_len(Projects::Priority, 20))
                    .col(text_null(Projects::AdminNotes))
                    .col(integer_null(Projects::ReviewedById))
                    .col(timestamp_with_time_zone_null(Projects::ReviewedAt))
                    .col(timestamp_with_time_zone_null(Projects::StartedAt))
                    .col(timestamp_with_time_zone_null(Projects::CompletedAt))
                    .col(timestamp_with_time_zone(Projects::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Projects::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_client")
                            .from(Projects::Table, Projects::ClientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_reviewer")
                            .from(Projects::Table, Projects::ReviewedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(pk_auto(Teams::Id))
                    .col(string_len(Teams::Name, 100))
                    .col(text_null(Teams::Description))
                    .col(integer_null(Teams::ProjectId).unique_key())
                    .col(integer(Teams::LeadDeveloperId))
                    .col(string_len(Teams::Status, 20))
                    .col(timestamp_with_time_zone_null(Teams::Deadline))
                    .col(timestamp_with_time_zone_null(Teams::StartedAt))
                    .col(timestamp_with_time_zone_null(Teams::CompletedAt))
                    .col(integer_null(Teams::CreatedById))
                    .col(timestamp_with_time_zone(Teams::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Teams::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_project")
                            .from(Teams::Table, Teams::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_lead_developer")
                            .from(Teams::Table, Teams::LeadDeveloperId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_created_by")
                            .from(Teams::Table, Teams::CreatedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(pk_auto(TeamMembers::Id))
                    .col(integer(TeamMembers::TeamId))
                    .col(integer(TeamMembers::DeveloperId))
                    .col(string_len(TeamMembers::Role, 50))
                    .col(text_null(TeamMembers::Responsibilities))
                    .col(string_len(TeamMembers::Status, 20))
                    .col(timestamp_with_time_zone(TeamMembers::JoinedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_team")
                            .from(TeamMembers::Table, TeamMembers::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_developer")
                            .from(TeamMembers::Table, TeamMembers::DeveloperId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A developer joins a given team at most once
        manager
            .create_index(
                Index::create()
                    .name("uq_team_members_team_developer")
                    .table(TeamMembers::Table)
                    .col(TeamMembers::TeamId)
                    .col(TeamMembers::DeveloperId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(pk_auto(Appointments::Id))
                    .col(integer(Appointments::ClientId))
                    .col(integer(Appointments::DeveloperId))
                    .col(string_len(Appointments::AppointmentType, 20))
                    .col(string_len(Appointments::Title, 200))
                    .col(text_null(Appointments::Description))
                    .col(timestamp_with_time_zone(Appointments::ScheduledAt))
                    .col(integer(Appointments::DurationMinutes).default(60))
                    .col(string_len(Appointments::Timezone, 50))
                    .col(string_null(Appointments::MeetingLink))
                    .col(string_len_null(Appointments::MeetingPlatform, 50))
                    .col(string_len(Appointments::Status, 20))
                    .col(big_integer_null(Appointments::Amount))
                    .col(text_null(Appointments::ClientNotes))
                    .col(text_null(Appointments::DeveloperNotes))
                    .col(text_null(Appointments::CancellationReason))
                    .col(integer_null(Appointments::CancelledById))
                    .col(timestamp_with_time_zone_null(Appointments::CancelledAt))
                    .col(timestamp_with_time_zone(Appointments::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Appointments::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_client")
                            .from(Appointments::Table, Appointments::ClientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_developer")
                            .from(Appointments::Table, Appointments::DeveloperId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_cancelled_by")
                            .from(Appointments::Table, Appointments::CancelledById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    ClientId,
    Title,
    Description,
    Requirements,
    ProjectType,
    Technologies,
    Domain,
    BudgetMin,
    BudgetMax,
    Currency,
    TimelineWeeks,
    Status,
    Priority,
    AdminNotes,
    ReviewedById,
    ReviewedAt,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
    Name,
    Description,
    ProjectId,
    LeadDeveloperId,
    Status,
    Deadline,
    StartedAt,
    CompletedAt,
    CreatedById,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeamMembers {
    Table,
    Id,
    TeamId,
    DeveloperId,
    Role,
    Responsibilities,
    Status,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Appointments {
    Table,
    Id,
    ClientId,
    DeveloperId,
    AppointmentType,
    Title,
    Description,
    ScheduledAt,
    DurationMinutes,
    Timezone,
    MeetingLink,
    MeetingPlatform,
    Status,
    Amount,
    ClientNotes,
    DeveloperNotes,
    CancellationReason,
    CancelledById,
    CancelledAt,
    CreatedAt,
    UpdatedAt,
}
