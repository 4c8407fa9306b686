//! `SeaORM` Entity for project_milestones table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Checklist created for every confirmed project, in delivery order.
pub const DEFAULT_MILESTONES: [&str; 5] = [
    "Project Confirmed & Advance Received",
    "Review 1",
    "Developer Assignment",
    "Review 2 Demo",
    "Delivery of the Projects",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum MilestoneStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl MilestoneStatus {
    pub fn toggled(self) -> MilestoneStatus {
        match self {
            MilestoneStatus::Pending => MilestoneStatus::Completed,
            MilestoneStatus::Completed => MilestoneStatus::Pending,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_milestones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    /// 1-based index into the checklist.
    pub position: i16,
    pub title: String,
    pub status: MilestoneStatus,
    pub completed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
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
