use sea_orm_migration::{prelude::*, schema::*};

use super::m20260112_000002_create_student_projects::StudentProjects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(StudentProjects::Table)
                    .add_column(string_len_null(RepositoryLink::RepositoryLink, 255))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(StudentProjects::Table)
                    .drop_column(RepositoryLink::RepositoryLink)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum RepositoryLink {
    RepositoryLink,
}
