//! Public discovery: developer directory, search and platform counters

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::developer_profiles::{self, Availability};
use crate::entities::users;
use crate::money::from_minor_units;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeveloperDirectoryQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub skill: Option<String>,
    pub domain: Option<String>,
}

/// A verified developer as shown to visitors. Contact details stay private;
/// `id` is the user id that appointments are booked against.
#[derive(Debug, Clone, Serialize)]
pub struct PublicDeveloper {
    pub id: i32,
    pub full_name: String,
    pub avatar: Option<String>,
    pub tagline: Option<String>,
    pub bio: Option<String>,
    pub experience_years: i32,
    pub skills: Vec<String>,
    pub domains: Vec<String>,
    pub availability: Availability,
    pub hourly_rate: Option<Decimal>,
    pub offers_classes: bool,
    pub offers_consulting: bool,
    pub offers_support: bool,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub articles_count: i32,
    pub projects_completed: i32,
}

impl PublicDeveloper {
    pub fn new(user: users::Model, profile: developer_profiles::Model) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            avatar: user.avatar,
            tagline: profile.tagline,
            bio: profile.bio,
            experience_years: profile.experience_years,
            skills: profile.skills.0,
            domains: profile.domains.0,
            availability: profile.availability,
            hourly_rate: profile.hourly_rate.map(from_minor_units),
            offers_classes: profile.offers_classes,
            offers_consulting: profile.offers_consulting,
            offers_support: profile.offers_support,
            portfolio_url: profile.portfolio_url,
            linkedin_url: profile.linkedin_url,
            github_url: profile.github_url,
            articles_count: profile.articles_count,
            projects_completed: profile.projects_completed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeveloperPage {
    pub developers: Vec<PublicDeveloper>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    All,
    Developers,
    Articles,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(default, rename = "type")]
    pub scope: SearchScope,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeveloperHit {
    pub id: i32,
    pub name: String,
    pub tagline: Option<String>,
    /// First three skills.
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleHit {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub developers: Vec<DeveloperHit>,
    pub articles: Vec<ArticleHit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformStats {
    pub verified_developers: u64,
    pub published_articles: u64,
    pub total_clients: u64,
    pub projects_completed: u64,
}
