#![allow(dead_code)]

use std::path::Path;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;

use devnest_backend::config::AppConfig;
use devnest_backend::entities::{
    client_profiles, developer_profiles,
    developer_profiles::Availability,
    string_list::StringList,
    users::{self, UserRole, UserStatus},
};
use devnest_backend::services::directory::Identity;
use devnest_backend::AppState;

pub const TEST_API_KEY: &str = "test-admin-key";
pub const DEVELOPER_ID: i32 = 7;

/// Fresh in-memory SQLite database with every migration applied.
///
/// A single pooled connection keeps the in-memory database alive and shared
/// across the whole test.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn test_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        admin_api_key: TEST_API_KEY.to_string(),
        upload_dir: upload_dir.to_path_buf(),
        ..AppConfig::default()
    }
}

pub fn test_state(db: DatabaseConnection, upload_dir: &Path) -> AppState {
    AppState::new(db, test_config(upload_dir))
}

async fn insert_user(
    db: &DatabaseConnection,
    id: Option<i32>,
    email: &str,
    full_name: &str,
    role: UserRole,
    status: UserStatus,
) -> users::Model {
    let now = Utc::now();
    let mut user = users::ActiveModel {
        email: Set(email.to_string()),
        // Seeded users never sign in with a password
        password_hash: Set("not-a-real-hash".to_string()),
        role: Set(role),
        full_name: Set(full_name.to_string()),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    if let Some(id) = id {
        user.id = Set(id);
    }
    user.insert(db).await.expect("Failed to seed user")
}

pub async fn seed_admin(db: &DatabaseConnection, email: &str, full_name: &str) -> Identity {
    insert_user(db, None, email, full_name, UserRole::Admin, UserStatus::Verified)
        .await
        .into()
}

pub async fn seed_developer(
    db: &DatabaseConnection,
    id: Option<i32>,
    email: &str,
    full_name: &str,
    status: UserStatus,
) -> Identity {
    let user = insert_user(db, id, email, full_name, UserRole::Developer, status).await;
    let now = Utc::now();
    developer_profiles::ActiveModel {
        user_id: Set(user.id),
        experience_years: Set(3),
        skills: Set(StringList::cleaned(["Rust"])),
        domains: Set(StringList::default()),
        availability: Set(Availability::Available),
        offers_classes: Set(false),
        offers_consulting: Set(false),
        offers_support: Set(false),
        articles_count: Set(0),
        projects_completed: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed developer profile");
    user.into()
}

/// Verified developer Ravi with the fixed id [`DEVELOPER_ID`].
pub async fn seed_ravi(db: &DatabaseConnection) -> Identity {
    seed_developer(db, Some(DEVELOPER_ID), "ravi@example.com", "Ravi", UserStatus::Verified).await
}

pub async fn seed_client(db: &DatabaseConnection, email: &str, full_name: &str) -> Identity {
    let user = insert_user(db, None, email, full_name, UserRole::Client, UserStatus::Verified).await;
    let now = Utc::now();
    client_profiles::ActiveModel {
        user_id: Set(user.id),
        company_name: Set(Some("Acme".to_string())),
        projects_submitted: Set(0),
        projects_completed: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed client profile");
    user.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        assert!(db.is_ok(), "Test database should migrate cleanly");
    }
}
