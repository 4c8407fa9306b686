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
                    .table(Articles::Table)
                    .if_not_exists()
                    .col(pk_auto(Articles::Id))
                    .col(integer(Articles::AuthorId))
                    .col(string_len(Articles::Title, 200))
                    .col(string_len_uniq(Articles::Slug, 220))
                    .col(string_len_null(Articles::Excerpt, 500))
                    .col(text(Articles::Content))
                    .col(string_null(Articles::CoverImage))
                    .col(string_len(Articles::ArticleType, 30))
                    .col(json(Articles::Technologies))
                    .col(string_len_null(Articles::Domain, 100))
                    .col(string_len(Articles::Status, 20))
                    .col(text_null(Articles::RejectionReason))
                    .col(integer_null(Articles::ReviewedById))
                    .col(timestamp_with_time_zone_null(Articles::ReviewedAt))
                    .col(integer(Articles::ViewsCount).default(0))
                    .col(timestamp_with_time_zone_null(Articles::PublishedAt))
                    .col(timestamp_with_time_zone(Articles::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Articles::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_articles_author")
                            .from(Articles::Table, Articles::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_articles_reviewer")
                            .from(Articles::Table, Articles::ReviewedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Public listing filters on status and sorts on publication time
        manager
            .create_index(
                Index::create()
                    .name("idx_articles_status_published")
                    .table(Articles::Table)
                    .col(Articles::Status)
                    .col(Articles::PublishedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Articles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Articles {
    Table,
    Id,
    AuthorId,
    Title,
    Slug,
    Excerpt,
    Content,
    CoverImage,
    ArticleType,
    Technologies,
    Domain,
    Status,
    RejectionReason,
    ReviewedById,
    ReviewedAt,
    ViewsCount,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}
