//! Payment ledger updates.
//!
//! `amount_paid` and `pending_balance` are rewritten by a single UPDATE that
//! reads the current row values, and the matching transaction row is inserted
//! in the same database transaction. The ledger therefore always satisfies
//! `pending_balance = total_cost - amount_paid` and
//! `amount_paid = sum(transactions.amount)`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{payment_transactions, payments, student_projects};
use crate::error::{AppError, AppResult};
use crate::models::student_project::{RecordPaymentRequest, RecordedPayment};
use crate::money::to_minor_units;
use crate::services::directory::Identity;
use crate::services::input::optional_text;

/// Automatic note stamped on every transaction.
pub fn recorded_note(at: DateTime<Utc>) -> String {
    format!("Recorded on {}", at.format("%Y-%m-%d %H:%M"))
}

pub async fn find_project<C: ConnectionTrait>(
    conn: &C,
    project_id: i32,
) -> AppResult<student_projects::Model> {
    student_projects::Entity::find_by_id(project_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("StudentProject", project_id))
}

pub async fn find_payment<C: ConnectionTrait>(
    conn: &C,
    project_id: i32,
) -> AppResult<payments::Model> {
    payments::Entity::find()
        .filter(payments::Column::ProjectId.eq(project_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Payment for project", project_id))
}

/// Records an incremental payment. Overpayment is accepted and shows up as a
/// negative pending balance (customer credit).
pub async fn record_payment(
    db: &DatabaseConnection,
    actor: &Identity,
    project_id: i32,
    req: RecordPaymentRequest,
) -> AppResult<RecordedPayment> {
    if req.amount <= Decimal::ZERO {
        return Err(AppError::validation("Payment amount must be greater than zero"));
    }
    let amount = to_minor_units(req.amount)?;
    let payment_mode = optional_text(req.payment_mode);
    let invoice_ref = optional_text(req.invoice_ref);
    let now = Utc::now();
    let notes = match optional_text(req.notes) {
        Some(extra) => format!("{}\n{extra}", recorded_note(now)),
        None => recorded_note(now),
    };

    let txn = db.begin().await?;

    find_project(&txn, project_id).await?;
    let payment = find_payment(&txn, project_id).await?;

    payments::Entity::update_many()
        .col_expr(
            payments::Column::AmountPaid,
            Expr::col(payments::Column::AmountPaid).add(amount),
        )
        .col_expr(
            payments::Column::PendingBalance,
            Expr::col(payments::Column::TotalCost)
                .sub(Expr::col(payments::Column::AmountPaid))
                .sub(amount),
        )
        .col_expr(payments::Column::PaymentMode, Expr::value(payment_mode.clone()))
        .col_expr(payments::Column::InvoiceRef, Expr::value(invoice_ref.clone()))
        .col_expr(payments::Column::UpdatedAt, Expr::value(now))
        .filter(payments::Column::Id.eq(payment.id))
        .exec(&txn)
        .await?;

    let transaction = payment_transactions::ActiveModel {
        payment_id: Set(payment.id),
        amount: Set(amount),
        payment_mode: Set(payment_mode),
        invoice_ref: Set(invoice_ref),
        transaction_date: Set(now),
        notes: Set(Some(notes)),
        recorded_by_id: Set(Some(actor.id)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let payment = find_payment(&txn, project_id).await?;
    txn.commit().await?;

    info!(
        project_id,
        payment_id = payment.id,
        transaction_id = transaction.id,
        amount,
        amount_paid = payment.amount_paid,
        pending_balance = payment.pending_balance,
        acting_user_id = actor.id,
        "Payment recorded"
    );
    if payment.pending_balance < 0 {
        info!(
            project_id,
            credit = -payment.pending_balance,
            "Payment exceeds total cost, balance is now a credit"
        );
    }

    Ok(RecordedPayment {
        payment,
        transaction,
    })
}

/// Transactions of a ledger, newest first.
pub async fn list_transactions<C: ConnectionTrait>(
    conn: &C,
    payment_id: i32,
) -> AppResult<Vec<payment_transactions::Model>> {
    Ok(payment_transactions::Entity::find()
        .filter(payment_transactions::Column::PaymentId.eq(payment_id))
        .order_by_desc(payment_transactions::Column::TransactionDate)
        .order_by_desc(payment_transactions::Column::Id)
        .all(conn)
        .await?)
}
