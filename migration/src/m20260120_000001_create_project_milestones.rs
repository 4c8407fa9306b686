//! Delivery checklist for confirmed student projects

use sea_orm_migration::{prelude::*, schema::*};

use super::m20260112_000002_create_student_projects::StudentProjects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectMilestones::Table)
                    .if_not_exists()
                    .col(pk_auto(ProjectMilestones::Id))
                    .col(integer(ProjectMilestones::ProjectId))
                    .col(small_integer(ProjectMilestones::Position))
                    .col(string_len(ProjectMilestones::Title, 100))
                    .col(string_len(ProjectMilestones::Status, 20))
                    .col(timestamp_with_time_zone_null(ProjectMilestones::CompletedAt))
                    .col(timestamp_with_time_zone(ProjectMilestones::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_milestones_project")
                            .from(ProjectMilestones::Table, ProjectMilestones::ProjectId)
                            .to(StudentProjects::Table, StudentProjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_project_milestones_project_position")
                    .table(ProjectMilestones::Table)
                    .col(ProjectMilestones::ProjectId)
                    .col(ProjectMilestones::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectMilestones::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProjectMilestones {
    Table,
    Id,
    ProjectId,
    Position,
    Title,
    Status,
    CompletedAt,
    CreatedAt,
}
