use serde::{Deserialize, Serialize};

use crate::entities::articles::{self, ArticleStatus, ArticleType};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub article_type: ArticleType,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub domain: Option<String>,
    /// Submit for review right away instead of saving a draft.
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub article_type: Option<ArticleType>,
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectArticleRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishedArticleFilter {
    pub domain: Option<String>,
    pub article_type: Option<ArticleType>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminArticleFilter {
    pub status: Option<ArticleStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: articles::Model,
    pub author_name: Option<String>,
}
