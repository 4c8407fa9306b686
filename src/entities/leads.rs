//! `SeaORM` Entity for leads table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
pub enum LeadStatus {
    #[sea_orm(string_value = "New Lead")]
    #[serde(rename = "New Lead")]
    NewLead,
    #[sea_orm(string_value = "Follow-up")]
    #[serde(rename = "Follow-up")]
    FollowUp,
    #[sea_orm(string_value = "Interested")]
    Interested,
    #[sea_orm(string_value = "Confirmed")]
    Confirmed,
    #[sea_orm(string_value = "Dropped")]
    Dropped,
}

/// Why a lead status change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadTransitionError {
    /// `Confirmed` is only reachable through project confirmation.
    ConfirmationRequired,
    /// A confirmed lead owns a project and its status is frozen.
    AlreadyConfirmed,
}

impl LeadStatus {
    pub fn label(self) -> &'static str {
        match self {
            LeadStatus::NewLead => "New Lead",
            LeadStatus::FollowUp => "Follow-up",
            LeadStatus::Interested => "Interested",
            LeadStatus::Confirmed => "Confirmed",
            LeadStatus::Dropped => "Dropped",
        }
    }

    /// Leads still waiting on a call from the sales team.
    pub fn is_active_follow_up(self) -> bool {
        match self {
            LeadStatus::NewLead | LeadStatus::FollowUp => true,
            LeadStatus::Interested | LeadStatus::Confirmed | LeadStatus::Dropped => false,
        }
    }

    /// Status change requested by a follow-up interaction.
    pub fn follow_up_to(self, next: LeadStatus) -> Result<LeadStatus, LeadTransitionError> {
        use LeadStatus::*;
        match (self, next) {
            (Confirmed, _) => Err(LeadTransitionError::AlreadyConfirmed),
            (_, Confirmed) => Err(LeadTransitionError::ConfirmationRequired),
            (NewLead | FollowUp | Interested | Dropped, NewLead | FollowUp | Interested | Dropped) => {
                Ok(next)
            }
        }
    }

    /// Status change performed by converting the lead into a project.
    pub fn confirm(self) -> Result<LeadStatus, LeadTransitionError> {
        match self {
            LeadStatus::Confirmed => Err(LeadTransitionError::AlreadyConfirmed),
            LeadStatus::NewLead
            | LeadStatus::FollowUp
            | LeadStatus::Interested
            | LeadStatus::Dropped => Ok(LeadStatus::Confirmed),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub college: Option<String>,
    pub domain: Option<String>,
    pub source: Option<String>,
    pub requirement_summary: Option<String>,
    pub status: LeadStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lead_follow_ups::Entity")]
    FollowUps,
    #[sea_orm(has_one = "super::student_projects::Entity")]
    StudentProject,
}

impl Related<super::lead_follow_ups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FollowUps.def()
    }
}

impl Related<super::student_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentProject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_follow_up_moves_between_open_statuses() {
        use LeadStatus::*;
        assert_eq!(NewLead.follow_up_to(FollowUp), Ok(FollowUp));
        assert_eq!(FollowUp.follow_up_to(Interested), Ok(Interested));
        assert_eq!(Interested.follow_up_to(Dropped), Ok(Dropped));
        assert_eq!(Dropped.follow_up_to(FollowUp), Ok(FollowUp));
    }

    #[test]
    fn test_confirmed_only_through_confirmation() {
        use LeadStatus::*;
        assert_eq!(
            Interested.follow_up_to(Confirmed),
            Err(LeadTransitionError::ConfirmationRequired)
        );
        assert_eq!(
            Confirmed.follow_up_to(Dropped),
            Err(LeadTransitionError::AlreadyConfirmed)
        );
        assert_eq!(Interested.confirm(), Ok(Confirmed));
        assert_eq!(Confirmed.confirm(), Err(LeadTransitionError::AlreadyConfirmed));
    }

    #[test]
    fn test_status_labels_match_wire_format() {
        for status in LeadStatus::iter() {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::Value::String(status.label().to_string()));
            assert_eq!(status.to_value(), status.label());
        }
    }
}
