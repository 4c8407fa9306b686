use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::entities::leads;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_leads: u64,
    /// Leads in New Lead or Follow-up.
    pub active_follow_ups: u64,
    /// Every student project, whatever its delivery stage.
    pub confirmed_projects: u64,
    pub ongoing_projects: u64,
    pub completed_projects: u64,
    pub pending_payments: Decimal,
    pub total_revenue: Decimal,
    pub total_payouts: Decimal,
    pub total_profit: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingCallback {
    pub follow_up_id: i32,
    pub lead_id: i32,
    pub student_name: Option<String>,
    pub phone: Option<String>,
    pub callback_at: DateTime<Utc>,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: i32,
    pub full_name: String,
    pub project_count: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_leads: Vec<leads::Model>,
    pub upcoming_callbacks: Vec<UpcomingCallback>,
    pub leaderboard: Vec<LeaderboardEntry>,
}
