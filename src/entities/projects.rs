//! `SeaORM` Entity for projects table (client submissions to the marketplace)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::string_list::StringList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "reviewing")]
    Reviewing,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "team_forming")]
    TeamForming,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl ProjectStatus {
    pub fn can_transition_to(self, next: ProjectStatus) -> bool {
        use ProjectStatus::*;
        match (self, next) {
            (Submitted, Reviewing)
            | (Reviewing, Approved)
            | (Approved, TeamForming)
            | (TeamForming, InProgress)
            | (InProgress, Delivered)
            | (Delivered, Completed) => true,
            (Completed | Cancelled, _) => false,
            (_, Cancelled) => true,
            _ => false,
        }
    }

    /// A team may only be formed around a project nobody is building yet.
    pub fn accepts_team(self) -> bool {
        matches!(
            self,
            ProjectStatus::Submitted | ProjectStatus::Reviewing | ProjectStatus::Approved
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ProjectPriority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "normal")]
    Normal,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub client_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub requirements: Option<String>,
    pub project_type: Option<String>,
    pub technologies: StringList,
    pub domain: Option<String>,
    /// Minor units.
    pub budget_min: Option<i64>,
    /// Minor units.
    pub budget_max: Option<i64>,
    pub currency: String,
    pub timeline_weeks: Option<i32>,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub admin_notes: Option<String>,
    pub reviewed_by_id: Option<i32>,
    pub reviewed_at: Option<DateTimeUtc>,
    pub started_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Client,
    #[sea_orm(has_one = "super::teams::Entity")]
    Team,
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
