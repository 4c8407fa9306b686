//! `SeaORM` Entity for appointments table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    #[sea_orm(string_value = "class")]
    Class,
    #[sea_orm(string_value = "consulting")]
    Consulting,
    #[sea_orm(string_value = "support")]
    Support,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "no_show")]
    NoShow,
}

impl AppointmentStatus {
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        match (self, next) {
            (Pending, Confirmed) => true,
            (Confirmed, Completed) | (Confirmed, NoShow) => true,
            (Pending | Confirmed, Cancelled) => true,
            (Pending, Pending | Completed | NoShow)
            | (Confirmed, Pending | Confirmed)
            | (Completed | Cancelled | NoShow, _) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub client_id: i32,
    pub developer_id: i32,
    pub appointment_type: AppointmentType,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: DateTimeUtc,
    pub duration_minutes: i32,
    pub timezone: String,
    pub meeting_link: Option<String>,
    pub meeting_platform: Option<String>,
    pub status: AppointmentStatus,
    /// Minor units.
    pub amount: Option<i64>,
    pub client_notes: Option<String>,
    pub developer_notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_by_id: Option<i32>,
    pub cancelled_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
