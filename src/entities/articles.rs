//! `SeaORM` Entity for articles table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::string_list::StringList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
#[serde(rename_all = "snake_case")]
pub enum ArticleType {
    #[sea_orm(string_value = "case_study")]
    CaseStudy,
    #[sea_orm(string_value = "research")]
    Research,
    #[sea_orm(string_value = "tutorial")]
    Tutorial,
    #[sea_orm(string_value = "insight")]
    Insight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "hidden")]
    Hidden,
}

/// Moderation actions on an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleAction {
    Submit,
    Approve,
    Reject,
    Hide,
    Restore,
}

impl ArticleStatus {
    pub fn apply(self, action: ArticleAction) -> Option<ArticleStatus> {
        use ArticleAction::*;
        use ArticleStatus::*;
        match (self, action) {
            (Draft | Rejected, Submit) => Some(Pending),
            (Pending, Approve) => Some(Approved),
            (Pending, Reject) => Some(Rejected),
            (Approved, Hide) => Some(Hidden),
            (Hidden, Restore) => Some(Approved),
            (Pending | Approved | Hidden, Submit)
            | (Draft | Approved | Rejected | Hidden, Approve)
            | (Draft | Approved | Rejected | Hidden, Reject)
            | (Draft | Pending | Rejected | Hidden, Hide)
            | (Draft | Pending | Approved | Rejected, Restore) => None,
        }
    }

    /// Authors may edit until the article is public.
    pub fn is_editable(self) -> bool {
        matches!(self, ArticleStatus::Draft | ArticleStatus::Rejected | ArticleStatus::Pending)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub excerpt: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub cover_image: Option<String>,
    pub article_type: ArticleType,
    pub technologies: StringList,
    pub domain: Option<String>,
    pub status: ArticleStatus,
    pub rejection_reason: Option<String>,
    pub reviewed_by_id: Option<i32>,
    pub reviewed_at: Option<DateTimeUtc>,
    pub views_count: i32,
    pub published_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
