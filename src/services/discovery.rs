//! Read-only views for visitors: the verified developer directory, site search
//! and platform counters.
//!
//! Skills, domains and technologies live in JSON columns, so text matching on
//! them happens after the rows are loaded. Matching is a case-insensitive
//! substring test on every backend.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::debug;

use crate::entities::{
    articles::{self, ArticleStatus},
    developer_profiles,
    projects::{self, ProjectStatus},
    users::{self, UserRole, UserStatus},
};
use crate::error::AppResult;
use crate::models::discovery::{
    ArticleHit, DeveloperDirectoryQuery, DeveloperHit, DeveloperPage, PlatformStats,
    PublicDeveloper, SearchQuery, SearchResults, SearchScope,
};
use crate::services::input::optional_text;

const DEFAULT_PER_PAGE: u64 = 10;
const MAX_PER_PAGE: u64 = 50;
const SEARCH_LIMIT: usize = 5;
const EXCERPT_CHARS: usize = 100;

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn any_contains_ci(items: &[String], needle_lower: &str) -> bool {
    items.iter().any(|item| contains_ci(item, needle_lower))
}

/// Verified developers with their profiles, ordered by name.
async fn verified_developers(db: &DatabaseConnection) -> AppResult<Vec<PublicDeveloper>> {
    let rows = developer_profiles::Entity::find()
        .find_also_related(users::Entity)
        .filter(users::Column::Role.eq(UserRole::Developer))
        .filter(users::Column::Status.eq(UserStatus::Verified))
        .order_by_asc(users::Column::FullName)
        .order_by_asc(users::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(profile, user)| user.map(|user| PublicDeveloper::new(user, profile)))
        .collect())
}

/// One page of the public developer directory, optionally narrowed by skill or domain.
pub async fn list_public_developers(
    db: &DatabaseConnection,
    query: DeveloperDirectoryQuery,
) -> AppResult<DeveloperPage> {
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let page = query.page.unwrap_or(1).max(1);
    let skill = optional_text(query.skill).map(|s| s.to_lowercase());
    let domain = optional_text(query.domain).map(|d| d.to_lowercase());

    let matching: Vec<PublicDeveloper> = verified_developers(db)
        .await?
        .into_iter()
        .filter(|d| skill.as_deref().is_none_or(|s| any_contains_ci(&d.skills, s)))
        .filter(|d| domain.as_deref().is_none_or(|s| any_contains_ci(&d.domains, s)))
        .collect();

    let total = matching.len() as u64;
    let developers = matching
        .into_iter()
        .skip(((page - 1) * per_page) as usize)
        .take(per_page as usize)
        .collect();

    Ok(DeveloperPage {
        developers,
        total,
        pages: total.div_ceil(per_page),
        current_page: page,
    })
}

/// Searches verified developers by name, skill or domain and published
/// articles by title or technology. A blank query returns nothing.
pub async fn search(db: &DatabaseConnection, query: SearchQuery) -> AppResult<SearchResults> {
    let Some(term) = optional_text(query.q) else {
        return Ok(SearchResults::default());
    };
    let needle = term.to_lowercase();
    let mut results = SearchResults::default();

    if matches!(query.scope, SearchScope::All | SearchScope::Developers) {
        results.developers = verified_developers(db)
            .await?
            .into_iter()
            .filter(|d| {
                contains_ci(&d.full_name, &needle)
                    || any_contains_ci(&d.skills, &needle)
                    || any_contains_ci(&d.domains, &needle)
            })
            .take(SEARCH_LIMIT)
            .map(|d| DeveloperHit {
                id: d.id,
                name: d.full_name,
                tagline: d.tagline,
                skills: d.skills.into_iter().take(3).collect(),
            })
            .collect();
    }

    if matches!(query.scope, SearchScope::All | SearchScope::Articles) {
        results.articles = articles::Entity::find()
            .filter(articles::Column::Status.eq(ArticleStatus::Approved))
            .order_by_desc(articles::Column::PublishedAt)
            .order_by_desc(articles::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .filter(|a| contains_ci(&a.title, &needle) || any_contains_ci(a.technologies.as_slice(), &needle))
            .take(SEARCH_LIMIT)
            .map(|a| ArticleHit {
                id: a.id,
                title: a.title,
                slug: a.slug,
                excerpt: a
                    .excerpt
                    .map(|e| e.chars().take(EXCERPT_CHARS).collect())
                    .unwrap_or_default(),
            })
            .collect();
    }

    debug!(
        term = %term,
        developers = results.developers.len(),
        articles = results.articles.len(),
        "Search served"
    );
    Ok(results)
}

pub async fn platform_stats(db: &DatabaseConnection) -> AppResult<PlatformStats> {
    let verified_developers = users::Entity::find()
        .filter(users::Column::Role.eq(UserRole::Developer))
        .filter(users::Column::Status.eq(UserStatus::Verified))
        .count(db)
        .await?;
    let published_articles = articles::Entity::find()
        .filter(articles::Column::Status.eq(ArticleStatus::Approved))
        .count(db)
        .await?;
    let total_clients = users::Entity::find()
        .filter(users::Column::Role.eq(UserRole::Client))
        .count(db)
        .await?;
    let projects_completed = projects::Entity::find()
        .filter(projects::Column::Status.eq(ProjectStatus::Completed))
        .count(db)
        .await?;

    Ok(PlatformStats {
        verified_developers,
        published_articles,
        total_clients,
        projects_completed,
    })
}
