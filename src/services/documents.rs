use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::{info, warn};

use crate::entities::project_documents::{self, DocumentType};
use crate::error::AppResult;
use crate::services::directory::Identity;
use crate::services::file_store::{FileCategory, FileStore, UploadedFile};
use crate::services::ledger::find_project;

/// Stores the file and attaches it to the project.
///
/// If the row cannot be written the stored file is removed again so the store
/// holds no unreferenced uploads.
pub async fn upload_document(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    actor: &Identity,
    project_id: i32,
    document_type: DocumentType,
    file: UploadedFile,
) -> AppResult<project_documents::Model> {
    find_project(db, project_id).await?;

    let stored_name = store.store(&file, FileCategory::Projects).await?;

    let inserted = project_documents::ActiveModel {
        project_id: Set(project_id),
        document_type: Set(document_type),
        file_path: Set(stored_name.clone()),
        original_name: Set(Some(file.original_name.clone())),
        uploaded_by_id: Set(Some(actor.id)),
        uploaded_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await;

    match inserted {
        Ok(document) => {
            info!(
                project_id,
                document_id = document.id,
                document_type = ?document.document_type,
                file = %stored_name,
                acting_user_id = actor.id,
                "Project document uploaded"
            );
            Ok(document)
        }
        Err(err) => {
            if let Err(cleanup) = store.delete(&stored_name, FileCategory::Projects).await {
                warn!(file = %stored_name, error = %cleanup, "Could not remove orphaned upload");
            }
            Err(err.into())
        }
    }
}
