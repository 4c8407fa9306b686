//! `SeaORM` Entity for student_projects table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::string_list::StringList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
pub enum StudentProjectStatus {
    #[sea_orm(string_value = "Confirmed")]
    Confirmed,
    #[sea_orm(string_value = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Delivered")]
    Delivered,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl StudentProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            StudentProjectStatus::Confirmed => "Confirmed",
            StudentProjectStatus::InProgress => "In Progress",
            StudentProjectStatus::Delivered => "Delivered",
            StudentProjectStatus::Completed => "Completed",
        }
    }

    /// Delivery only moves forward, one stage at a time.
    pub fn advance_to(self, next: StudentProjectStatus) -> Option<StudentProjectStatus> {
        use StudentProjectStatus::*;
        match (self, next) {
            (Confirmed, InProgress) | (InProgress, Delivered) | (Delivered, Completed) => Some(next),
            (Confirmed, Confirmed | Delivered | Completed)
            | (InProgress, Confirmed | InProgress | Completed)
            | (Delivered, Confirmed | InProgress | Delivered)
            | (Completed, _) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student_projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub lead_id: Option<i32>,
    /// Staff member who closed the sale.
    pub closed_by_id: Option<i32>,
    /// Staff member who performed the confirmation.
    pub confirmed_by_id: Option<i32>,
    pub title: String,
    pub scope: Option<String>,
    pub tech_stack: StringList,
    pub timeline_weeks: Option<i32>,
    pub academic_requirements: Option<String>,
    pub status: StudentProjectStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub repository_link: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::leads::Entity",
        from = "Column::LeadId",
        to = "super::leads::Column::Id",
        on_delete = "SetNull"
    )]
    Lead,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClosedById",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    ClosedBy,
    #[sea_orm(has_one = "super::payments::Entity")]
    Payment,
    #[sea_orm(has_many = "super::project_milestones::Entity")]
    Milestones,
    #[sea_orm(has_many = "super::project_documents::Entity")]
    Documents,
    #[sea_orm(has_many = "super::developer_assignments::Entity")]
    Assignments,
}

impl Related<super::leads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lead.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl Related<super::project_milestones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Milestones.def()
    }
}

impl Related<super::project_documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl Related<super::developer_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
