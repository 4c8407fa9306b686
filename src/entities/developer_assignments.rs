//! `SeaORM` Entity for developer_assignments table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(40))")]
pub enum AssignmentRole {
    #[sea_orm(string_value = "Developer")]
    Developer,
    #[sea_orm(string_value = "Mentor")]
    Mentor,
    #[sea_orm(string_value = "Lead Developer")]
    #[serde(rename = "Lead Developer")]
    LeadDeveloper,
    #[sea_orm(string_value = "Admin Builder")]
    #[serde(rename = "Admin Builder")]
    AdminBuilder,
    #[sea_orm(string_value = "Admin Builder (Assigned)")]
    #[serde(rename = "Admin Builder (Assigned)")]
    AdminBuilderAssigned,
}

impl AssignmentRole {
    pub fn label(self) -> &'static str {
        match self {
            AssignmentRole::Developer => "Developer",
            AssignmentRole::Mentor => "Mentor",
            AssignmentRole::LeadDeveloper => "Lead Developer",
            AssignmentRole::AdminBuilder => "Admin Builder",
            AssignmentRole::AdminBuilderAssigned => "Admin Builder (Assigned)",
        }
    }

    /// Roles held by internal staff rather than external developers.
    pub fn is_internal(self) -> bool {
        match self {
            AssignmentRole::AdminBuilder | AssignmentRole::AdminBuilderAssigned => true,
            AssignmentRole::Developer | AssignmentRole::Mentor | AssignmentRole::LeadDeveloper => {
                false
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "developer_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub developer_id: i32,
    pub role: AssignmentRole,
    /// Minor units.
    pub payout_amount: i64,
    pub internal_notes: Option<String>,
    pub assigned_at: DateTimeUtc,
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
