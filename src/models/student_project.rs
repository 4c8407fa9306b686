//! Student project, ledger and delivery models
//!
//! Money leaves the API as `Decimal` strings with two fractional digits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{
    developer_assignments::{self, AssignmentRole},
    leads, payment_transactions, payments, project_documents, project_milestones,
    student_projects::{self, StudentProjectStatus},
};
use crate::money::from_minor_units;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub invoice_ref: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignDeveloperRequest {
    pub developer_id: i32,
    #[serde(default = "default_assignment_role")]
    pub role: AssignmentRole,
    #[serde(default)]
    pub payout_amount: Decimal,
    #[serde(default)]
    pub internal_notes: Option<String>,
}

fn default_assignment_role() -> AssignmentRole {
    AssignmentRole::Developer
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRepositoryRequest {
    /// `None` clears the link.
    #[serde(default)]
    pub repository_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStudentProjectStatusRequest {
    pub status: StudentProjectStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceQuery {
    /// Serve inline instead of as an attachment.
    #[serde(default)]
    pub view: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentView {
    pub id: i32,
    pub project_id: i32,
    pub total_cost: Decimal,
    pub payment_structure: Option<String>,
    pub amount_paid: Decimal,
    pub pending_balance: Decimal,
    pub payment_mode: Option<String>,
    pub invoice_ref: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<payments::Model> for PaymentView {
    fn from(p: payments::Model) -> Self {
        Self {
            id: p.id,
            project_id: p.project_id,
            total_cost: from_minor_units(p.total_cost),
            payment_structure: p.payment_structure,
            amount_paid: from_minor_units(p.amount_paid),
            pending_balance: from_minor_units(p.pending_balance),
            payment_mode: p.payment_mode,
            invoice_ref: p.invoice_ref,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub id: i32,
    pub payment_id: i32,
    pub amount: Decimal,
    pub payment_mode: Option<String>,
    pub invoice_ref: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub recorded_by_id: Option<i32>,
    pub recorded_by_name: Option<String>,
}

impl TransactionView {
    pub fn new(t: payment_transactions::Model, recorded_by_name: Option<String>) -> Self {
        Self {
            id: t.id,
            payment_id: t.payment_id,
            amount: from_minor_units(t.amount),
            payment_mode: t.payment_mode,
            invoice_ref: t.invoice_ref,
            transaction_date: t.transaction_date,
            notes: t.notes,
            recorded_by_id: t.recorded_by_id,
            recorded_by_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentView {
    pub id: i32,
    pub project_id: i32,
    pub developer_id: i32,
    pub developer_name: Option<String>,
    pub role: AssignmentRole,
    pub payout_amount: Decimal,
    pub internal_notes: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

impl AssignmentView {
    pub fn new(a: developer_assignments::Model, developer_name: Option<String>) -> Self {
        Self {
            id: a.id,
            project_id: a.project_id,
            developer_id: a.developer_id,
            developer_name,
            role: a.role,
            payout_amount: from_minor_units(a.payout_amount),
            internal_notes: a.internal_notes,
            assigned_at: a.assigned_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentProjectView {
    #[serde(flatten)]
    pub project: student_projects::Model,
    pub closed_by_name: Option<String>,
    pub confirmed_by_name: Option<String>,
}

/// Everything shown on a project's admin page.
#[derive(Debug, Clone, Serialize)]
pub struct StudentProjectDetail {
    pub project: StudentProjectView,
    pub lead: Option<leads::Model>,
    pub payment: Option<PaymentView>,
    /// Newest first.
    pub transactions: Vec<TransactionView>,
    /// Checklist order.
    pub milestones: Vec<project_milestones::Model>,
    pub documents: Vec<project_documents::Model>,
    pub assignments: Vec<AssignmentView>,
}

/// Rows written by a lead confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmedProject {
    pub project: student_projects::Model,
    pub payment: payments::Model,
    pub assignment: developer_assignments::Model,
    pub milestones: Vec<project_milestones::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmedProjectResponse {
    pub project: student_projects::Model,
    pub payment: PaymentView,
    pub assignment: AssignmentView,
    pub milestones: Vec<project_milestones::Model>,
}

impl From<ConfirmedProject> for ConfirmedProjectResponse {
    fn from(c: ConfirmedProject) -> Self {
        Self {
            project: c.project,
            payment: c.payment.into(),
            assignment: AssignmentView::new(c.assignment, None),
            milestones: c.milestones,
        }
    }
}

/// Ledger state right after a payment was recorded.
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    pub payment: payments::Model,
    pub transaction: payment_transactions::Model,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordedPaymentResponse {
    pub payment: PaymentView,
    pub transaction: TransactionView,
}

impl From<RecordedPayment> for RecordedPaymentResponse {
    fn from(r: RecordedPayment) -> Self {
        Self {
            payment: r.payment.into(),
            transaction: TransactionView::new(r.transaction, None),
        }
    }
}
