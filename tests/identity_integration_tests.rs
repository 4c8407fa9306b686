mod common;

use sea_orm::EntityTrait;

use devnest_backend::entities::{
    articles::{ArticleStatus, ArticleType},
    developer_profiles,
    kyc_documents::{KycDocumentType, KycStatus},
    users::{self, UserRole, UserStatus},
};
use devnest_backend::error::AppError;
use devnest_backend::models::article::{CreateArticleRequest, PublishedArticleFilter, UpdateArticleRequest};
use devnest_backend::models::identity::{CreateAdminRequest, RegisterRequest, SubmitKycRequest};
use devnest_backend::services::directory::{DbDirectory, Identity};
use devnest_backend::services::file_store::{FileCategory, LocalFileStore, UploadedFile};
use devnest_backend::services::{articles, identity};

use crate::common::{seed_admin, seed_developer, seed_ravi, setup_test_db};

fn store(dir: &tempfile::TempDir) -> LocalFileStore {
    LocalFileStore::new(dir.path(), vec!["pdf".to_string(), "png".to_string()])
}

fn scan(name: &str) -> UploadedFile {
    UploadedFile {
        original_name: name.to_string(),
        bytes: b"%PDF-1.4 test".to_vec(),
    }
}

fn article_request(title: &str, publish: bool) -> CreateArticleRequest {
    CreateArticleRequest {
        title: title.to_string(),
        content: "Body text".to_string(),
        excerpt: None,
        article_type: ArticleType::Tutorial,
        technologies: vec!["Rust".to_string()],
        domain: Some("Web".to_string()),
        publish,
    }
}

#[tokio::test]
async fn test_register_and_sign_in() {
    let db = setup_test_db().await.unwrap();

    let user = identity::register(
        &db,
        RegisterRequest {
            email: " Kiran@Example.com ".to_string(),
            password: "Correct horse 9".to_string(),
            full_name: "Kiran".to_string(),
            phone: None,
            role: UserRole::Developer,
            company_name: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(user.email, "kiran@example.com");
    assert_eq!(user.status, UserStatus::Pending);
    assert!(identity::developer_profile_of(&db, user.id).await.is_ok());

    let wrong = identity::authenticate(&db, "kiran@example.com", "Wrong password 9").await;
    assert!(matches!(wrong, Err(AppError::Unauthorized(_))));

    let signed_in = identity::authenticate(&db, "kiran@example.com", "Correct horse 9")
        .await
        .unwrap();
    assert!(signed_in.last_login_at.is_some());
}

#[tokio::test]
async fn test_self_registration_cannot_create_admins() {
    let db = setup_test_db().await.unwrap();

    let result = identity::register(
        &db,
        RegisterRequest {
            email: "boss@example.com".to_string(),
            password: "Correct horse 9".to_string(),
            full_name: "Boss".to_string(),
            phone: None,
            role: UserRole::Admin,
            company_name: None,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(users::Entity::find().all(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_admin_is_idempotent() {
    let db = setup_test_db().await.unwrap();
    let req = CreateAdminRequest {
        email: "admin@example.com".to_string(),
        password: "Long enough 1".to_string(),
        full_name: "Meera".to_string(),
    };

    let (first, created) = identity::create_admin(&db, req.clone()).await.unwrap();
    assert!(created);
    assert_eq!(first.role, UserRole::Admin);

    let (second, created) = identity::create_admin(&db, req).await.unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);
}

#[tokio::test]
async fn test_developer_moderation_transitions() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let dev = seed_developer(&db, None, "dev@example.com", "Kiran", UserStatus::Pending).await;

    let verified = identity::moderate_developer(&db, &admin, dev.id, UserStatus::Verified)
        .await
        .unwrap();
    assert_eq!(verified.status, UserStatus::Verified);

    let rejected = identity::moderate_developer(&db, &admin, dev.id, UserStatus::Rejected).await;
    assert!(matches!(rejected, Err(AppError::Conflict(_))));

    let suspended = identity::moderate_developer(&db, &admin, dev.id, UserStatus::Suspended)
        .await
        .unwrap();
    assert_eq!(suspended.status, UserStatus::Suspended);
}

#[tokio::test]
async fn test_kyc_approval_verifies_the_developer() {
    let db = setup_test_db().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let files = store(&dir);
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let dev = seed_developer(&db, None, "dev@example.com", "Kiran", UserStatus::Pending).await;

    let document = identity::submit_kyc(
        &db,
        &files,
        &dev,
        SubmitKycRequest {
            document_type: KycDocumentType::Aadhaar,
            document_number: "1234 5678 9012".to_string(),
        },
        scan("aadhaar.pdf"),
    )
    .await
    .unwrap();
    assert_eq!(document.document_number_masked, "XXXXXXXX9012");
    assert!(files.path_for(&document.file_name, FileCategory::Kyc).exists());

    let approved = identity::approve_kyc(&db, &admin, document.id).await.unwrap();
    assert_eq!(approved.status, KycStatus::Approved);
    assert_eq!(approved.reviewed_by_id, Some(admin.id));

    let user = identity::find_user(&db, dev.id).await.unwrap();
    assert_eq!(user.status, UserStatus::Verified);

    let twice = identity::approve_kyc(&db, &admin, document.id).await;
    assert!(matches!(twice, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_kyc_rejects_disallowed_files_without_writing() {
    let db = setup_test_db().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let files = store(&dir);
    let dev = seed_developer(&db, None, "dev@example.com", "Kiran", UserStatus::Pending).await;

    let result = identity::submit_kyc(
        &db,
        &files,
        &dev,
        SubmitKycRequest {
            document_type: KycDocumentType::Pan,
            document_number: "ABCDE1234F".to_string(),
        },
        scan("payload.exe"),
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(identity::list_own_kyc(&db, &dev).await.unwrap().is_empty());
}

#[test]
fn test_short_document_numbers_are_rejected() {
    assert!(identity::mask_document_number("12-3").is_err());
}

#[tokio::test]
async fn test_article_moderation_publishes_and_counts() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let ravi = seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());

    let article = articles::create_article(&db, &ravi, article_request("Async Rust in Practice", true))
        .await
        .unwrap();
    assert_eq!(article.status, ArticleStatus::Pending);
    assert_eq!(article.slug, "async-rust-in-practice");

    let approved = articles::approve_article(&db, &admin, article.id).await.unwrap();
    assert_eq!(approved.status, ArticleStatus::Approved);
    assert!(approved.published_at.is_some());

    let profile = developer_profiles::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.articles_count, 1);

    let viewed = articles::view_article(&db, &directory, "async-rust-in-practice")
        .await
        .unwrap();
    assert_eq!(viewed.article.views_count, 1);
    assert_eq!(viewed.author_name.as_deref(), Some("Ravi"));

    articles::hide_article(&db, &admin, article.id).await.unwrap();
    let published = articles::list_published(&db, &directory, PublishedArticleFilter::default())
        .await
        .unwrap();
    assert!(published.is_empty());
    let profile = developer_profiles::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.articles_count, 0);
}

#[tokio::test]
async fn test_duplicate_titles_get_distinct_slugs() {
    let db = setup_test_db().await.unwrap();
    let ravi = seed_ravi(&db).await;

    let first = articles::create_article(&db, &ravi, article_request("Hello, World!", false))
        .await
        .unwrap();
    let second = articles::create_article(&db, &ravi, article_request("Hello World", false))
        .await
        .unwrap();
    assert_eq!(first.slug, "hello-world");
    assert_eq!(second.slug, "hello-world-1");
    assert_eq!(first.status, ArticleStatus::Draft);
}

#[tokio::test]
async fn test_unverified_developer_cannot_write() {
    let db = setup_test_db().await.unwrap();
    let dev = seed_developer(&db, None, "dev@example.com", "Kiran", UserStatus::Pending).await;

    let result = articles::create_article(&db, &dev, article_request("Draft", false)).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_only_the_author_edits() {
    let db = setup_test_db().await.unwrap();
    let ravi = seed_ravi(&db).await;
    let other: Identity =
        seed_developer(&db, None, "dev2@example.com", "Kiran", UserStatus::Verified).await;

    let article = articles::create_article(&db, &ravi, article_request("Mine", false))
        .await
        .unwrap();
    let result = articles::update_article(
        &db,
        &other,
        article.id,
        UpdateArticleRequest {
            title: "Theirs".to_string(),
            content: "Rewritten".to_string(),
            excerpt: None,
            article_type: None,
            technologies: None,
            domain: None,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}
