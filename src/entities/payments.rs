//! `SeaORM` Entity for payments table
//!
//! One ledger per student project. `pending_balance` is always written as
//! `total_cost - amount_paid` in the same statement that changes `amount_paid`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub project_id: i32,
    /// Minor units.
    pub total_cost: i64,
    pub payment_structure: Option<String>,
    /// Minor units.
    pub amount_paid: i64,
    /// Minor units. Negative once more than the total has been paid.
    pub pending_balance: i64,
    pub payment_mode: Option<String>,
    pub invoice_ref: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_projects::Entity",
        from = "Column::ProjectId",
        to = "super::student_projects::Column::Id",
        on_delete = "Cascade"
    )]
    Project,
    #[sea_orm(has_many = "super::payment_transactions::Entity")]
    Transactions,
}

impl Related<super::student_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::payment_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
