//! Client projects, delivery teams and appointment models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{
    appointments::{self, AppointmentStatus, AppointmentType},
    projects::{self, ProjectPriority, ProjectStatus},
    team_members, teams,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitProjectRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub budget_min: Option<Decimal>,
    #[serde(default)]
    pub budget_max: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub timeline_weeks: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProjectStatusRequest {
    pub status: ProjectStatus,
    #[serde(default)]
    pub priority: Option<ProjectPriority>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_id: Option<i32>,
    pub lead_developer_id: i32,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddTeamMemberRequest {
    pub developer_id: i32,
    #[serde(default = "default_member_role")]
    pub role: String,
    #[serde(default)]
    pub responsibilities: Option<String>,
}

fn default_member_role() -> String {
    "Developer".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: teams::Model,
    pub project: Option<projects::Model>,
    pub members: Vec<team_members::Model>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub developer_id: i32,
    pub appointment_type: AppointmentType,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub client_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmAppointmentRequest {
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub meeting_platform: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub developer_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: appointments::Model,
    pub client_name: Option<String>,
    pub developer_name: Option<String>,
}
