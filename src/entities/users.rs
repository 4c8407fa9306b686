//! `SeaORM` Entity for users table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "developer")]
    Developer,
    #[sea_orm(string_value = "client")]
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "verified")]
    Verified,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

impl UserStatus {
    /// Moderation moves an account may make. Returns the new status or `None`
    /// when the move is not allowed from the current one.
    pub fn transition(self, next: UserStatus) -> Option<UserStatus> {
        use UserStatus::*;
        match (self, next) {
            (Pending, Verified) | (Pending, Rejected) => Some(next),
            (Rejected, Verified) => Some(next),
            (Verified, Suspended) => Some(next),
            (Suspended, Verified) => Some(next),
            (Pending, Pending | Suspended)
            | (Verified, Pending | Verified | Rejected)
            | (Rejected, Pending | Rejected | Suspended)
            | (Suspended, Pending | Rejected | Suspended) => None,
        }
    }

    pub fn can_sign_in(self) -> bool {
        matches!(self, UserStatus::Pending | UserStatus::Verified)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub last_login_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::developer_profiles::Entity")]
    DeveloperProfile,
    #[sea_orm(has_one = "super::client_profiles::Entity")]
    ClientProfile,
}

impl Related<super::developer_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeveloperProfile.def()
    }
}

impl Related<super::client_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
