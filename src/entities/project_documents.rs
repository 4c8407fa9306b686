//! `SeaORM` Entity for project_documents table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
pub enum DocumentType {
    #[sea_orm(string_value = "Proposal")]
    Proposal,
    #[sea_orm(string_value = "SRS")]
    #[serde(rename = "SRS")]
    Srs,
    #[sea_orm(string_value = "PPT")]
    #[serde(rename = "PPT")]
    Ppt,
    #[sea_orm(string_value = "Source Code")]
    #[serde(rename = "Source Code")]
    SourceCode,
    #[sea_orm(string_value = "Delivery")]
    Delivery,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub document_type: DocumentType,
    /// Stored name returned by the file store.
    pub file_path: String,
    pub original_name: Option<String>,
    pub uploaded_by_id: Option<i32>,
    pub uploaded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_projects::Entity",
        from = "Column::ProjectId",
        to = "super::student_projects::Column::Id",
        on_delete = "Cascade"
    )]
    Project,
}

impl Related<super::student_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
