// src/lib.rs

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use config::AppConfig;
use services::{
    directory::{DbDirectory, IdentityDirectory},
    file_store::{FileStore, LocalFileStore},
    invoice::{InvoiceRenderer, PlainTextInvoiceRenderer},
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub directory: Arc<dyn IdentityDirectory>,
    pub file_store: Arc<dyn FileStore>,
    pub invoice_renderer: Arc<dyn InvoiceRenderer>,
}

impl AppState {
    /// Wires the database-backed directory, the local file store and the
    /// plain-text invoice renderer.
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let file_store = LocalFileStore::new(
            config.upload_dir.clone(),
            config.allowed_extensions.clone(),
        );
        Self {
            directory: Arc::new(DbDirectory::new(db.clone())),
            file_store: Arc::new(file_store),
            invoice_renderer: Arc::new(PlainTextInvoiceRenderer),
            config: Arc::new(config),
            db,
        }
    }
}

pub mod entities {
    pub mod string_list;
    pub mod users;
    pub mod developer_profiles;
    pub mod client_profiles;
    pub mod kyc_documents;
    pub mod articles;
    pub mod projects;
    pub mod teams;
    pub mod team_members;
    pub mod appointments;
    pub mod leads;
    pub mod lead_follow_ups;
    pub mod student_projects;
    pub mod payments;
    pub mod payment_transactions;
    pub mod project_documents;
    pub mod project_milestones;
    pub mod developer_assignments;
}

pub mod services {
    pub mod directory;
    pub mod password;
    pub mod input;
    pub mod file_store;
    pub mod identity;
    pub mod articles;
    pub mod marketplace;
    pub mod appointments;
    pub mod discovery;
    pub mod leads;
    pub mod confirmation;
    pub mod ledger;
    pub mod milestones;
    pub mod assignments;
    pub mod documents;
    pub mod student_projects;
    pub mod invoice;
    pub mod reporting;
}

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod money;
pub mod routes;
