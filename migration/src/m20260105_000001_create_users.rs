//! Users with their role profiles and developer identity documents

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len_uniq(Users::Email, 120))
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 20))
                    .col(string_len(Users::FullName, 100))
                    .col(string_len_null(Users::Phone, 20))
                    .col(string_null(Users::Avatar))
                    .col(string_len(Users::Status, 20))
                    .col(timestamp_with_time_zone(Users::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Users::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Users::LastLoginAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_role_status")
                    .table(Users::Table)
                    .col(Users::Role)
                    .col(Users::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeveloperProfiles::Table)
                    .if_not_exists()
                    .col(pk_auto(DeveloperProfiles::Id))
                    .col(integer_uniq(DeveloperProfiles::UserId))
                    .col(string_len_null(DeveloperProfiles::Tagline, 200))
                    .col(text_null(DeveloperProfiles::Bio))
                    .col(integer(DeveloperProfiles::ExperienceYears).default(0))
                    .col(json(DeveloperProfiles::Skills))
                    .col(json(DeveloperProfiles::Domains))
                    .col(string_len(DeveloperProfiles::Availability, 20))
                    .col(big_integer_null(DeveloperProfiles::HourlyRate))
                    .col(boolean(DeveloperProfiles::OffersClasses).default(false))
                    .col(boolean(DeveloperProfiles::OffersConsulting).default(false))
                    .col(boolean(DeveloperProfiles::OffersSupport).default(false))
                    .col(string_null(DeveloperProfiles::PortfolioUrl))
                    .col(string_null(DeveloperProfiles::LinkedinUrl))
                    .col(string_null(DeveloperProfiles::GithubUrl))
                    .col(integer(DeveloperProfiles::ArticlesCount).default(0))
                    .col(integer(DeveloperProfiles::ProjectsCompleted).default(0))
                    .col(timestamp_with_time_zone(DeveloperProfiles::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(DeveloperProfiles::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_developer_profiles_user")
                            .from(DeveloperProfiles::Table, DeveloperProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClientProfiles::Table)
                    .if_not_exists()
                    .col(pk_auto(ClientProfiles::Id))
                    .col(integer_uniq(ClientProfiles::UserId))
                    .col(string_len_null(ClientProfiles::CompanyName, 200))
                    .col(string_len_null(ClientProfiles::CompanySize, 50))
                    .col(string_len_null(ClientProfiles::Industry, 100))
                    .col(string_null(ClientProfiles::Website))
                    .col(string_len_null(ClientProfiles::ContactPosition, 100))
                    .col(integer(ClientProfiles::ProjectsSubmitted).default(0))
                    .col(integer(ClientProfiles::ProjectsCompleted).default(0))
                    .col(timestamp_with_time_zone(ClientProfiles::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(ClientProfiles::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_profiles_user")
                            .from(ClientProfiles::Table, ClientProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(KycDocuments::Table)
                    .if_not_exists()
                    .col(pk_auto(KycDocuments::Id))
                    .col(integer(KycDocuments::UserId))
                    .col(string_len(KycDocuments::DocumentType, 30))
                    .col(string_len(KycDocuments::DocumentNumberMasked, 20))
                    .col(string(KycDocuments::FileName))
                    .col(string_len(KycDocuments::Status, 20))
                    .col(text_null(KycDocuments::RejectionReason))
                    .col(integer_null(KycDocuments::ReviewedById))
                    .col(timestamp_with_time_zone_null(KycDocuments::ReviewedAt))
                    .col(timestamp_with_time_zone(KycDocuments::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kyc_documents_user")
                            .from(KycDocuments::Table, KycDocuments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kyc_documents_reviewer")
                            .from(KycDocuments::Table, KycDocuments::ReviewedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_kyc_documents_user")
                    .table(KycDocuments::Table)
                    .col(KycDocuments::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(KycDocuments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClientProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeveloperProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    FullName,
    Phone,
    Avatar,
    Status,
    CreatedAt,
    UpdatedAt,
    LastLoginAt,
}

#[derive(DeriveIden)]
enum DeveloperProfiles {
    Table,
    Id,
    UserId,
    Tagline,
    Bio,
    ExperienceYears,
    Skills,
    Domains,
    Availability,
    HourlyRate,
    OffersClasses,
    OffersConsulting,
    OffersSupport,
    PortfolioUrl,
    LinkedinUrl,
    GithubUrl,
    ArticlesCount,
    ProjectsCompleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClientProfiles {
    Table,
    Id,
    UserId,
    CompanyName,
    CompanySize,
    Industry,
    Website,
    ContactPosition,
    ProjectsSubmitted,
    ProjectsCompleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum KycDocuments {
    Table,
    Id,
    UserId,
    DocumentType,
    DocumentNumberMasked,
    FileName,
    Status,
    RejectionReason,
    ReviewedById,
    ReviewedAt,
    CreatedAt,
}
