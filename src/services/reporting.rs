//! Dashboard aggregates and the sales leaderboard.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::entities::{
    developer_assignments, lead_follow_ups,
    leads::{self, LeadStatus},
    payments,
    student_projects::{self, StudentProjectStatus},
    users,
};
use crate::error::AppResult;
use crate::models::dashboard::{Dashboard, DashboardStats, LeaderboardEntry, UpcomingCallback};
use crate::money::from_minor_units;

const RECENT_LIMIT: u64 = 5;

/// `CAST(SUM(col) AS BIGINT)`, so Postgres returns an integer rather than NUMERIC.
fn sum_as_bigint(col: SimpleExpr) -> SimpleExpr {
    Func::cast_as(Func::sum(col), Alias::new("BIGINT")).into()
}

async fn sum_minor_units<E, C>(conn: &C, col: SimpleExpr) -> AppResult<i64>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let total: Option<Option<i64>> = E::find()
        .select_only()
        .column_as(sum_as_bigint(col), "total")
        .into_tuple()
        .one(conn)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

pub async fn dashboard_stats<C: ConnectionTrait>(conn: &C) -> AppResult<DashboardStats> {
    let total_leads = leads::Entity::find().count(conn).await?;
    let active_follow_ups = leads::Entity::find()
        .filter(leads::Column::Status.is_in([LeadStatus::NewLead, LeadStatus::FollowUp]))
        .count(conn)
        .await?;

    let confirmed_projects = student_projects::Entity::find().count(conn).await?;
    let ongoing_projects = student_projects::Entity::find()
        .filter(student_projects::Column::Status.eq(StudentProjectStatus::InProgress))
        .count(conn)
        .await?;
    let completed_projects = student_projects::Entity::find()
        .filter(student_projects::Column::Status.eq(StudentProjectStatus::Completed))
        .count(conn)
        .await?;

    let pending = sum_minor_units::<payments::Entity, _>(
        conn,
        Expr::col(payments::Column::PendingBalance).into(),
    )
    .await?;
    let revenue = sum_minor_units::<payments::Entity, _>(
        conn,
        Expr::col(payments::Column::TotalCost).into(),
    )
    .await?;
    let payouts = sum_minor_units::<developer_assignments::Entity, _>(
        conn,
        Expr::col(developer_assignments::Column::PayoutAmount).into(),
    )
    .await?;

    Ok(DashboardStats {
        total_leads,
        active_follow_ups,
        confirmed_projects,
        ongoing_projects,
        completed_projects,
        pending_payments: from_minor_units(pending),
        total_revenue: from_minor_units(revenue),
        total_payouts: from_minor_units(payouts),
        total_profit: from_minor_units(revenue - payouts),
    })
}

pub async fn recent_leads<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<leads::Model>> {
    Ok(leads::Entity::find()
        .order_by_desc(leads::Column::CreatedAt)
        .order_by_desc(leads::Column::Id)
        .limit(RECENT_LIMIT)
        .all(conn)
        .await?)
}

/// Callbacks scheduled at or after `now`, soonest first.
pub async fn upcoming_callbacks<C: ConnectionTrait>(
    conn: &C,
    now: DateTime<Utc>,
) -> AppResult<Vec<UpcomingCallback>> {
    let rows = lead_follow_ups::Entity::find()
        .find_also_related(leads::Entity)
        .filter(lead_follow_ups::Column::CallbackAt.gte(now))
        .order_by_asc(lead_follow_ups::Column::CallbackAt)
        .limit(RECENT_LIMIT)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(follow_up, lead)| {
            let callback_at = follow_up.callback_at?;
            Some(UpcomingCallback {
                follow_up_id: follow_up.id,
                lead_id: follow_up.lead_id,
                student_name: lead.as_ref().map(|l| l.student_name.clone()),
                phone: lead.map(|l| l.phone),
                callback_at,
                notes: follow_up.interaction_notes,
            })
        })
        .collect())
}

#[derive(Debug, FromQueryResult)]
struct LeaderboardRow {
    closed_by_id: i32,
    full_name: String,
    project_count: i64,
    revenue: Option<i64>,
}

/// Projects grouped by the staff member who closed them, highest revenue first.
///
/// Inner joins on both the closer and the payment ledger: a project without a
/// payment row does not count here, although the dashboard still counts it.
pub async fn sales_leaderboard<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<LeaderboardEntry>> {
    let rows = student_projects::Entity::find()
        .select_only()
        .column(student_projects::Column::ClosedById)
        .column(users::Column::FullName)
        .column_as(student_projects::Column::Id.count(), "project_count")
        .column_as(
            sum_as_bigint(Expr::col((payments::Entity, payments::Column::TotalCost)).into()),
            "revenue",
        )
        .join(JoinType::InnerJoin, student_projects::Relation::ClosedBy.def())
        .join(JoinType::InnerJoin, student_projects::Relation::Payment.def())
        .group_by(student_projects::Column::ClosedById)
        .group_by(users::Column::FullName)
        .order_by_desc(Expr::cust("revenue"))
        .order_by_asc(student_projects::Column::ClosedById)
        .into_model::<LeaderboardRow>()
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| LeaderboardEntry {
            user_id: row.closed_by_id,
            full_name: row.full_name,
            project_count: row.project_count,
            revenue: from_minor_units(row.revenue.unwrap_or(0)),
        })
        .collect())
}

pub async fn dashboard<C: ConnectionTrait>(conn: &C, now: DateTime<Utc>) -> AppResult<Dashboard> {
    Ok(Dashboard {
        stats: dashboard_stats(conn).await?,
        recent_leads: recent_leads(conn).await?,
        upcoming_callbacks: upcoming_callbacks(conn, now).await?,
        leaderboard: sales_leaderboard(conn).await?,
    })
}
