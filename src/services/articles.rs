//! Developer articles and their moderation.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};

use crate::entities::{
    articles::{self, ArticleAction, ArticleStatus},
    developer_profiles,
    string_list::StringList,
    users::UserRole,
};
use crate::error::{AppError, AppResult};
use crate::models::article::{
    AdminArticleFilter, ArticleView, CreateArticleRequest, PublishedArticleFilter,
    UpdateArticleRequest,
};
use crate::services::directory::{collect_ids, Identity, IdentityDirectory};
use crate::services::file_store::{FileCategory, FileStore, UploadedFile};
use crate::services::input::{optional_text, required_text};

/// Lowercase ASCII words joined by `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("article");
    }
    slug
}

/// First free slug among `base`, `base-1`, `base-2`, ...
async fn unique_slug(db: &DatabaseConnection, title: &str, except_id: Option<i32>) -> AppResult<String> {
    let base = slugify(title);
    let mut candidate = base.clone();
    let mut n = 0;
    loop {
        let mut query = articles::Entity::find().filter(articles::Column::Slug.eq(&candidate));
        if let Some(id) = except_id {
            query = query.filter(articles::Column::Id.ne(id));
        }
        if query.count(db).await? == 0 {
            return Ok(candidate);
        }
        n += 1;
        candidate = format!("{base}-{n}");
    }
}

pub async fn find_article(db: &DatabaseConnection, article_id: i32) -> AppResult<articles::Model> {
    articles::Entity::find_by_id(article_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Article", article_id))
}

fn owned_by(article: &articles::Model, actor: &Identity) -> AppResult<()> {
    if article.author_id != actor.id {
        return Err(AppError::forbidden(format!(
            "Article {} belongs to another author",
            article.id
        )));
    }
    Ok(())
}

fn transition(article: &articles::Model, action: ArticleAction) -> AppResult<ArticleStatus> {
    article.status.apply(action).ok_or_else(|| {
        AppError::conflict(format!(
            "Article {} does not allow {action:?} while {:?}",
            article.id, article.status
        ))
    })
}

pub async fn create_article(
    db: &DatabaseConnection,
    actor: &Identity,
    req: CreateArticleRequest,
) -> AppResult<articles::Model> {
    actor.require_role(UserRole::Developer)?;
    actor.require_verified()?;
    let title = required_text(&req.title, "Title")?;
    let content = required_text(&req.content, "Content")?;
    let slug = unique_slug(db, &title, None).await?;
    let now = Utc::now();
    let status = if req.publish {
        ArticleStatus::Pending
    } else {
        ArticleStatus::Draft
    };

    let article = articles::ActiveModel {
        author_id: Set(actor.id),
        title: Set(title),
        slug: Set(slug),
        excerpt: Set(optional_text(req.excerpt)),
        content: Set(content),
        article_type: Set(req.article_type),
        technologies: Set(StringList::cleaned(req.technologies)),
        domain: Set(optional_text(req.domain)),
        status: Set(status),
        views_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(article_id = article.id, slug = %article.slug, status = ?article.status, author_id = actor.id, "Article created");
    Ok(article)
}

pub async fn update_article(
    db: &DatabaseConnection,
    actor: &Identity,
    article_id: i32,
    req: UpdateArticleRequest,
) -> AppResult<articles::Model> {
    let article = find_article(db, article_id).await?;
    owned_by(&article, actor)?;
    if !article.status.is_editable() {
        return Err(AppError::conflict(format!(
            "Article {article_id} is {:?} and can no longer be edited",
            article.status
        )));
    }
    let title = required_text(&req.title, "Title")?;
    let content = required_text(&req.content, "Content")?;
    let slug = if title != article.title {
        Some(unique_slug(db, &title, Some(article_id)).await?)
    } else {
        None
    };

    let mut active: articles::ActiveModel = article.into();
    active.title = Set(title);
    if let Some(slug) = slug {
        active.slug = Set(slug);
    }
    active.content = Set(content);
    active.excerpt = Set(optional_text(req.excerpt));
    if let Some(article_type) = req.article_type {
        active.article_type = Set(article_type);
    }
    if let Some(technologies) = req.technologies {
        active.technologies = Set(StringList::cleaned(technologies));
    }
    active.domain = Set(optional_text(req.domain));
    active.updated_at = Set(Utc::now());
    let article = active.update(db).await?;

    info!(article_id, author_id = actor.id, "Article updated");
    Ok(article)
}

/// Uploads a cover image and drops the previous one.
pub async fn set_cover_image(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    actor: &Identity,
    article_id: i32,
    file: UploadedFile,
) -> AppResult<articles::Model> {
    let article = find_article(db, article_id).await?;
    owned_by(&article, actor)?;
    let stored = store.store(&file, FileCategory::Articles).await?;
    let previous = article.cover_image.clone();

    let mut active: articles::ActiveModel = article.into();
    active.cover_image = Set(Some(stored.clone()));
    active.updated_at = Set(Utc::now());
    let article = match active.update(db).await {
        Ok(article) => article,
        Err(err) => {
            if let Err(cleanup) = store.delete(&stored, FileCategory::Articles).await {
                warn!(file = %stored, error = %cleanup, "Could not remove orphaned cover image");
            }
            return Err(err.into());
        }
    };
    if let Some(previous) = previous {
        if let Err(err) = store.delete(&previous, FileCategory::Articles).await {
            warn!(file = %previous, error = %err, "Could not remove previous cover image");
        }
    }
    Ok(article)
}

pub async fn submit_article(
    db: &DatabaseConnection,
    actor: &Identity,
    article_id: i32,
) -> AppResult<articles::Model> {
    let article = find_article(db, article_id).await?;
    owned_by(&article, actor)?;
    let next = transition(&article, ArticleAction::Submit)?;

    let mut active: articles::ActiveModel = article.into();
    active.status = Set(next);
    active.rejection_reason = Set(None);
    active.updated_at = Set(Utc::now());
    let article = active.update(db).await?;

    info!(article_id, author_id = actor.id, "Article submitted for review");
    Ok(article)
}

/// Recomputes the author's published article count from approved rows.
async fn refresh_articles_count<C: sea_orm::ConnectionTrait>(conn: &C, author_id: i32) -> AppResult<()> {
    let approved = articles::Entity::find()
        .filter(articles::Column::AuthorId.eq(author_id))
        .filter(articles::Column::Status.eq(ArticleStatus::Approved))
        .count(conn)
        .await?;
    let approved = i32::try_from(approved)
        .map_err(|_| AppError::Internal(format!("article count overflow for author {author_id}")))?;

    developer_profiles::Entity::update_many()
        .col_expr(
            developer_profiles::Column::ArticlesCount,
            sea_orm::sea_query::Expr::value(approved),
        )
        .filter(developer_profiles::Column::UserId.eq(author_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Applies an admin moderation action and keeps the author's count in step.
async fn moderate(
    db: &DatabaseConnection,
    actor: &Identity,
    article_id: i32,
    action: ArticleAction,
    reason: Option<String>,
) -> AppResult<articles::Model> {
    let article = find_article(db, article_id).await?;
    let next = transition(&article, action)?;
    let first_publication = next == ArticleStatus::Approved && article.published_at.is_none();
    let now = Utc::now();

    let txn = db.begin().await?;
    let mut active: articles::ActiveModel = article.into();
    active.status = Set(next);
    match action {
        ArticleAction::Approve | ArticleAction::Reject => {
            active.reviewed_by_id = Set(Some(actor.id));
            active.reviewed_at = Set(Some(now));
            active.rejection_reason = Set(reason);
        }
        ArticleAction::Submit | ArticleAction::Hide | ArticleAction::Restore => {}
    }
    if first_publication {
        active.published_at = Set(Some(now));
    }
    active.updated_at = Set(now);
    let article = active.update(&txn).await?;
    refresh_articles_count(&txn, article.author_id).await?;
    txn.commit().await?;

    info!(article_id, action = ?action, status = ?article.status, acting_user_id = actor.id, "Article moderated");
    Ok(article)
}

pub async fn approve_article(db: &DatabaseConnection, actor: &Identity, article_id: i32) -> AppResult<articles::Model> {
    moderate(db, actor, article_id, ArticleAction::Approve, None).await
}

pub async fn reject_article(
    db: &DatabaseConnection,
    actor: &Identity,
    article_id: i32,
    reason: &str,
) -> AppResult<articles::Model> {
    let reason = required_text(reason, "Rejection reason")?;
    moderate(db, actor, article_id, ArticleAction::Reject, Some(reason)).await
}

pub async fn hide_article(db: &DatabaseConnection, actor: &Identity, article_id: i32) -> AppResult<articles::Model> {
    moderate(db, actor, article_id, ArticleAction::Hide, None).await
}

pub async fn restore_article(db: &DatabaseConnection, actor: &Identity, article_id: i32) -> AppResult<articles::Model> {
    moderate(db, actor, article_id, ArticleAction::Restore, None).await
}

/// Admins may delete any article, authors only their own.
pub async fn delete_article(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    actor: &Identity,
    article_id: i32,
) -> AppResult<()> {
    let article = find_article(db, article_id).await?;
    if !actor.is_admin() {
        owned_by(&article, actor)?;
    }
    let author_id = article.author_id;
    let cover = article.cover_image.clone();

    let txn = db.begin().await?;
    articles::Entity::delete_by_id(article_id).exec(&txn).await?;
    refresh_articles_count(&txn, author_id).await?;
    txn.commit().await?;

    if let Some(cover) = cover {
        if let Err(err) = store.delete(&cover, FileCategory::Articles).await {
            warn!(article_id, file = %cover, error = %err, "Could not remove cover image");
        }
    }
    info!(article_id, acting_user_id = actor.id, "Article deleted");
    Ok(())
}

async fn with_author_names(
    directory: &dyn IdentityDirectory,
    rows: Vec<articles::Model>,
) -> AppResult<Vec<ArticleView>> {
    let names = directory
        .display_names(&collect_ids(rows.iter().map(|a| Some(a.author_id))))
        .await?;
    Ok(rows
        .into_iter()
        .map(|article| ArticleView {
            author_name: names.get(&article.author_id).cloned(),
            article,
        })
        .collect())
}

/// Approved articles, most recently published first.
pub async fn list_published(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    filter: PublishedArticleFilter,
) -> AppResult<Vec<ArticleView>> {
    let mut query = articles::Entity::find().filter(articles::Column::Status.eq(ArticleStatus::Approved));
    if let Some(domain) = optional_text(filter.domain) {
        query = query.filter(articles::Column::Domain.eq(domain));
    }
    if let Some(article_type) = filter.article_type {
        query = query.filter(articles::Column::ArticleType.eq(article_type));
    }
    if let Some(search) = optional_text(filter.search) {
        query = query.filter(
            Condition::any()
                .add(articles::Column::Title.contains(&search))
                .add(articles::Column::Excerpt.contains(&search)),
        );
    }
    let rows = query
        .order_by_desc(articles::Column::PublishedAt)
        .order_by_desc(articles::Column::Id)
        .all(db)
        .await?;
    with_author_names(directory, rows).await
}

/// Public read of an approved article; counts the view.
pub async fn view_article(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    slug: &str,
) -> AppResult<ArticleView> {
    let article = articles::Entity::find()
        .filter(articles::Column::Slug.eq(slug))
        .filter(articles::Column::Status.eq(ArticleStatus::Approved))
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Article", slug))?;

    articles::Entity::update_many()
        .col_expr(
            articles::Column::ViewsCount,
            sea_orm::sea_query::Expr::col(articles::Column::ViewsCount).add(1),
        )
        .filter(articles::Column::Id.eq(article.id))
        .exec(db)
        .await?;
    let article = find_article(db, article.id).await?;

    let mut views = with_author_names(directory, vec![article]).await?;
    views
        .pop()
        .ok_or_else(|| AppError::Internal("article vanished while being read".into()))
}

pub async fn list_own_articles(db: &DatabaseConnection, actor: &Identity) -> AppResult<Vec<articles::Model>> {
    Ok(articles::Entity::find()
        .filter(articles::Column::AuthorId.eq(actor.id))
        .order_by_desc(articles::Column::UpdatedAt)
        .all(db)
        .await?)
}

pub async fn list_articles_admin(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    filter: AdminArticleFilter,
) -> AppResult<Vec<ArticleView>> {
    let mut query = articles::Entity::find();
    if let Some(status) = filter.status {
        query = query.filter(articles::Column::Status.eq(status));
    }
    let rows = query
        .order_by_desc(articles::Column::CreatedAt)
        .order_by_desc(articles::Column::Id)
        .all(db)
        .await?;
    with_author_names(directory, rows).await
}
