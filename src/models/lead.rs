//! Lead intake, follow-up and confirmation request/response models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{lead_follow_ups, leads, leads::LeadStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLeadRequest {
    pub student_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    /// AI, Web, IoT, ...
    #[serde(default)]
    pub domain: Option<String>,
    /// call, WhatsApp, referral, website, ...
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub requirement_summary: Option<String>,
}

/// Query parameters for the lead list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFollowUpRequest {
    pub notes: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub callback_date: Option<String>,
    /// `HH:MM`
    #[serde(default)]
    pub callback_time: Option<String>,
    pub status: LeadStatus,
    /// Staff member who made the call, when it was not the acting admin.
    #[serde(default)]
    pub interacted_by_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowUpView {
    #[serde(flatten)]
    pub follow_up: lead_follow_ups::Model,
    pub recorded_by_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadDetail {
    pub lead: leads::Model,
    /// In recording order.
    pub follow_ups: Vec<FollowUpView>,
    pub student_project_id: Option<i32>,
}

/// Who builds the project once the lead is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DeveloperSelection {
    /// An external developer becomes the lead developer.
    Developer { developer_id: i32 },
    /// The admin team builds it, optionally naming the admin responsible.
    AdminBuilt {
        #[serde(default)]
        assignee_id: Option<i32>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmLeadRequest {
    pub title: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub timeline_weeks: Option<i32>,
    #[serde(default)]
    pub academic_requirements: Option<String>,
    pub total_cost: Decimal,
    /// e.g. "50% Advance, 50% Delivery"
    #[serde(default)]
    pub payment_structure: Option<String>,
    pub developer: DeveloperSelection,
    #[serde(default)]
    pub payout_amount: Decimal,
    /// Staff member who closed the sale. Defaults to the confirming admin.
    #[serde(default)]
    pub closed_by_id: Option<i32>,
}
