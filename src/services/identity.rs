//! Accounts, role profiles, developer moderation and KYC review.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};

use crate::entities::{
    client_profiles, developer_profiles,
    developer_profiles::Availability,
    kyc_documents::{self, KycStatus},
    string_list::StringList,
    users::{self, UserRole, UserStatus},
};
use crate::error::{AppError, AppResult};
use crate::models::identity::{
    CreateAdminRequest, KycFilter, RegisterRequest, SubmitKycRequest, UpdateClientProfileRequest,
    UpdateDeveloperProfileRequest, UserFilter, UserView,
};
use crate::money::non_negative_minor_units;
use crate::services::directory::Identity;
use crate::services::file_store::{FileCategory, FileStore, UploadedFile};
use crate::services::input::{normalize_url, optional_text, required_text, validate_email, validate_phone};
use crate::services::password::{hash_password, validate_password_strength, verify_password};

async fn email_taken(db: &DatabaseConnection, email: &str) -> AppResult<Option<users::Model>> {
    Ok(users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn find_user(db: &DatabaseConnection, user_id: i32) -> AppResult<users::Model> {
    users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("User", user_id))
}

/// Self-service sign-up for developers and clients.
///
/// Developers start `pending` until an admin verifies them; clients start
/// `verified`. The role profile is written in the same transaction as the user.
pub async fn register(db: &DatabaseConnection, req: RegisterRequest) -> AppResult<users::Model> {
    let status = match req.role {
        UserRole::Developer => UserStatus::Pending,
        UserRole::Client => UserStatus::Verified,
        UserRole::Admin => {
            return Err(AppError::validation("Role must be developer or client"));
        }
    };
    let email = validate_email(&req.email)?;
    let full_name = required_text(&req.full_name, "Full name")?;
    let phone = match optional_text(req.phone) {
        Some(phone) => Some(validate_phone(&phone)?),
        None => None,
    };
    validate_password_strength(&req.password)?;
    if email_taken(db, &email).await?.is_some() {
        return Err(AppError::conflict(format!("{email} is already registered")));
    }
    let password_hash = hash_password(&req.password)?;
    let now = Utc::now();

    let txn = db.begin().await?;

    let user = users::ActiveModel {
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(req.role),
        full_name: Set(full_name),
        phone: Set(phone),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    match req.role {
        UserRole::Developer => {
            developer_profiles::ActiveModel {
                user_id: Set(user.id),
                experience_years: Set(0),
                skills: Set(StringList::default()),
                domains: Set(StringList::default()),
                availability: Set(Availability::Available),
                offers_classes: Set(false),
                offers_consulting: Set(false),
                offers_support: Set(false),
                articles_count: Set(0),
                projects_completed: Set(0),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        UserRole::Client => {
            client_profiles::ActiveModel {
                user_id: Set(user.id),
                company_name: Set(optional_text(req.company_name)),
                projects_submitted: Set(0),
                projects_completed: Set(0),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        UserRole::Admin => {}
    }

    txn.commit().await?;

    info!(user_id = user.id, role = ?user.role, status = ?user.status, "User registered");
    Ok(user)
}

/// Creates a verified admin. Returns the existing admin (and `false`) when the
/// email is already registered to one.
pub async fn create_admin(
    db: &DatabaseConnection,
    req: CreateAdminRequest,
) -> AppResult<(users::Model, bool)> {
    let email = validate_email(&req.email)?;
    let full_name = required_text(&req.full_name, "Full name")?;

    if let Some(existing) = email_taken(db, &email).await? {
        if existing.role == UserRole::Admin {
            info!(user_id = existing.id, "Admin already exists");
            return Ok((existing, false));
        }
        return Err(AppError::conflict(format!(
            "{email} is already registered to a non-admin account"
        )));
    }

    validate_password_strength(&req.password)?;
    let now = Utc::now();
    let admin = users::ActiveModel {
        email: Set(email),
        password_hash: Set(hash_password(&req.password)?),
        role: Set(UserRole::Admin),
        full_name: Set(full_name),
        status: Set(UserStatus::Verified),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(user_id = admin.id, "Admin created");
    Ok((admin, true))
}

/// Checks credentials and stamps `last_login_at`.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> AppResult<users::Model> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());
    let email = email.trim().to_lowercase();
    let user = email_taken(db, &email).await?.ok_or_else(invalid)?;
    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "Failed sign-in");
        return Err(invalid());
    }
    if !user.status.can_sign_in() {
        return Err(AppError::forbidden("This account is not allowed to sign in"));
    }

    let mut active: users::ActiveModel = user.into();
    active.last_login_at = Set(Some(Utc::now()));
    let user = active.update(db).await?;
    info!(user_id = user.id, "User signed in");
    Ok(user)
}

/// Verifies, rejects, suspends or reinstates a developer account.
pub async fn moderate_developer(
    db: &DatabaseConnection,
    actor: &Identity,
    user_id: i32,
    next: UserStatus,
) -> AppResult<users::Model> {
    let user = find_user(db, user_id).await?;
    if user.role != UserRole::Developer {
        return Err(AppError::validation(format!("User {user_id} is not a developer")));
    }
    let current = user.status;
    let next = current.transition(next).ok_or_else(|| {
        AppError::conflict(format!("Developer {user_id} cannot move from {current:?} to {next:?}"))
    })?;

    let mut active: users::ActiveModel = user.into();
    active.status = Set(next);
    active.updated_at = Set(Utc::now());
    let user = active.update(db).await?;

    info!(user_id, from = ?current, to = ?next, acting_user_id = actor.id, "Developer status changed");
    Ok(user)
}

pub async fn list_users(db: &DatabaseConnection, filter: UserFilter) -> AppResult<Vec<users::Model>> {
    let mut query = users::Entity::find();
    if let Some(role) = filter.role {
        query = query.filter(users::Column::Role.eq(role));
    }
    if let Some(status) = filter.status {
        query = query.filter(users::Column::Status.eq(status));
    }
    if let Some(search) = optional_text(filter.search) {
        query = query.filter(
            Condition::any()
                .add(users::Column::FullName.contains(&search))
                .add(users::Column::Email.contains(&search.to_lowercase())),
        );
    }
    Ok(query
        .order_by_desc(users::Column::CreatedAt)
        .order_by_desc(users::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_user(db: &DatabaseConnection, user_id: i32) -> AppResult<UserView> {
    let user = find_user(db, user_id).await?;
    let developer_profile = developer_profiles::Entity::find()
        .filter(developer_profiles::Column::UserId.eq(user_id))
        .one(db)
        .await?;
    let client_profile = client_profiles::Entity::find()
        .filter(client_profiles::Column::UserId.eq(user_id))
        .one(db)
        .await?;
    Ok(UserView {
        user,
        developer_profile,
        client_profile,
    })
}

pub async fn developer_profile_of(
    db: &DatabaseConnection,
    user_id: i32,
) -> AppResult<developer_profiles::Model> {
    developer_profiles::Entity::find()
        .filter(developer_profiles::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("DeveloperProfile for user", user_id))
}

pub async fn client_profile_of(
    db: &DatabaseConnection,
    user_id: i32,
) -> AppResult<client_profiles::Model> {
    client_profiles::Entity::find()
        .filter(client_profiles::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("ClientProfile for user", user_id))
}

/// Applies the name and phone shared by both profile kinds.
async fn update_contact(
    txn: &sea_orm::DatabaseTransaction,
    user_id: i32,
    full_name: Option<String>,
    phone: Option<String>,
) -> AppResult<()> {
    if full_name.is_none() && phone.is_none() {
        return Ok(());
    }
    let user = users::Entity::find_by_id(user_id)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::not_found("User", user_id))?;
    let mut active: users::ActiveModel = user.into();
    if let Some(name) = full_name {
        active.full_name = Set(required_text(&name, "Full name")?);
    }
    if let Some(phone) = phone {
        active.phone = Set(match optional_text(Some(phone)) {
            Some(p) => Some(validate_phone(&p)?),
            None => None,
        });
    }
    active.updated_at = Set(Utc::now());
    active.update(txn).await?;
    Ok(())
}

fn optional_link(value: Option<String>) -> AppResult<Option<String>> {
    match optional_text(value) {
        Some(url) => Ok(Some(normalize_url(&url)?)),
        None => Ok(None),
    }
}

pub async fn update_developer_profile(
    db: &DatabaseConnection,
    actor: &Identity,
    req: UpdateDeveloperProfileRequest,
) -> AppResult<developer_profiles::Model> {
    actor.require_role(UserRole::Developer)?;
    let profile = developer_profile_of(db, actor.id).await?;

    let mut active: developer_profiles::ActiveModel = profile.into();
    if let Some(tagline) = req.tagline {
        active.tagline = Set(optional_text(Some(tagline)));
    }
    if let Some(bio) = req.bio {
        active.bio = Set(optional_text(Some(bio)));
    }
    if let Some(years) = req.experience_years {
        if years < 0 {
            return Err(AppError::validation("Experience cannot be negative"));
        }
        active.experience_years = Set(years);
    }
    if let Some(skills) = req.skills {
        active.skills = Set(StringList::cleaned(skills));
    }
    if let Some(domains) = req.domains {
        active.domains = Set(StringList::cleaned(domains));
    }
    if let Some(availability) = req.availability {
        active.availability = Set(availability);
    }
    if let Some(rate) = req.hourly_rate {
        active.hourly_rate = Set(if rate == Decimal::ZERO {
            None
        } else {
            Some(non_negative_minor_units(rate, "Hourly rate")?)
        });
    }
    if let Some(flag) = req.offers_classes {
        active.offers_classes = Set(flag);
    }
    if let Some(flag) = req.offers_consulting {
        active.offers_consulting = Set(flag);
    }
    if let Some(flag) = req.offers_support {
        active.offers_support = Set(flag);
    }
    if req.portfolio_url.is_some() {
        active.portfolio_url = Set(optional_link(req.portfolio_url)?);
    }
    if req.linkedin_url.is_some() {
        active.linkedin_url = Set(optional_link(req.linkedin_url)?);
    }
    if req.github_url.is_some() {
        active.github_url = Set(optional_link(req.github_url)?);
    }
    active.updated_at = Set(Utc::now());

    let txn = db.begin().await?;
    update_contact(&txn, actor.id, req.full_name, req.phone).await?;
    let profile = active.update(&txn).await?;
    txn.commit().await?;

    info!(user_id = actor.id, profile_id = profile.id, "Developer profile updated");
    Ok(profile)
}

pub async fn update_client_profile(
    db: &DatabaseConnection,
    actor: &Identity,
    req: UpdateClientProfileRequest,
) -> AppResult<client_profiles::Model> {
    actor.require_role(UserRole::Client)?;
    let profile = client_profile_of(db, actor.id).await?;

    let mut active: client_profiles::ActiveModel = profile.into();
    if let Some(name) = req.company_name {
        active.company_name = Set(optional_text(Some(name)));
    }
    if let Some(size) = req.company_size {
        active.company_size = Set(optional_text(Some(size)));
    }
    if let Some(industry) = req.industry {
        active.industry = Set(optional_text(Some(industry)));
    }
    if req.website.is_some() {
        active.website = Set(optional_link(req.website)?);
    }
    if let Some(position) = req.contact_position {
        active.contact_position = Set(optional_text(Some(position)));
    }
    active.updated_at = Set(Utc::now());

    let txn = db.begin().await?;
    update_contact(&txn, actor.id, req.full_name, req.phone).await?;
    let profile = active.update(&txn).await?;
    txn.commit().await?;

    info!(user_id = actor.id, profile_id = profile.id, "Client profile updated");
    Ok(profile)
}

/// Replaces the user's avatar; the previous file is removed from the store.
pub async fn update_avatar(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    actor: &Identity,
    file: UploadedFile,
) -> AppResult<users::Model> {
    let user = find_user(db, actor.id).await?;
    let stored = store.store(&file, FileCategory::Avatars).await?;
    let previous = user.avatar.clone();

    let mut active: users::ActiveModel = user.into();
    active.avatar = Set(Some(stored.clone()));
    active.updated_at = Set(Utc::now());
    let user = match active.update(db).await {
        Ok(user) => user,
        Err(err) => {
            if let Err(cleanup) = store.delete(&stored, FileCategory::Avatars).await {
                warn!(file = %stored, error = %cleanup, "Could not remove orphaned avatar");
            }
            return Err(err.into());
        }
    };

    if let Some(previous) = previous {
        if let Err(err) = store.delete(&previous, FileCategory::Avatars).await {
            warn!(file = %previous, error = %err, "Could not remove previous avatar");
        }
    }
    info!(user_id = user.id, "Avatar updated");
    Ok(user)
}

/// Keeps only the last four characters of an identity document number.
pub fn mask_document_number(number: &str) -> AppResult<String> {
    let cleaned: Vec<char> = number
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if cleaned.len() < 4 {
        return Err(AppError::validation("Document number is too short"));
    }
    let visible: String = cleaned[cleaned.len() - 4..].iter().collect();
    Ok(format!("{}{}", "X".repeat(cleaned.len() - 4), visible))
}

pub async fn submit_kyc(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    actor: &Identity,
    req: SubmitKycRequest,
    file: UploadedFile,
) -> AppResult<kyc_documents::Model> {
    actor.require_role(UserRole::Developer)?;
    let masked = mask_document_number(&req.document_number)?;
    let stored = store.store(&file, FileCategory::Kyc).await?;

    let inserted = kyc_documents::ActiveModel {
        user_id: Set(actor.id),
        document_type: Set(req.document_type),
        document_number_masked: Set(masked),
        file_name: Set(stored.clone()),
        status: Set(KycStatus::Pending),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await;

    match inserted {
        Ok(document) => {
            info!(
                user_id = actor.id,
                kyc_id = document.id,
                document_type = ?document.document_type,
                "KYC document submitted"
            );
            Ok(document)
        }
        Err(err) => {
            if let Err(cleanup) = store.delete(&stored, FileCategory::Kyc).await {
                warn!(file = %stored, error = %cleanup, "Could not remove orphaned KYC upload");
            }
            Err(err.into())
        }
    }
}

async fn find_pending_kyc(
    txn: &sea_orm::DatabaseTransaction,
    kyc_id: i32,
) -> AppResult<kyc_documents::Model> {
    let document = kyc_documents::Entity::find_by_id(kyc_id)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::not_found("KycDocument", kyc_id))?;
    if document.status != KycStatus::Pending {
        return Err(AppError::conflict(format!("KYC document {kyc_id} was already reviewed")));
    }
    Ok(document)
}

/// Approves a document and verifies its owner once every document they
/// submitted is approved.
pub async fn approve_kyc(
    db: &DatabaseConnection,
    actor: &Identity,
    kyc_id: i32,
) -> AppResult<kyc_documents::Model> {
    let now = Utc::now();
    let txn = db.begin().await?;

    let document = find_pending_kyc(&txn, kyc_id).await?;
    let user_id = document.user_id;
    let mut active: kyc_documents::ActiveModel = document.into();
    active.status = Set(KycStatus::Approved);
    active.rejection_reason = Set(None);
    active.reviewed_by_id = Set(Some(actor.id));
    active.reviewed_at = Set(Some(now));
    let document = active.update(&txn).await?;

    let outstanding = kyc_documents::Entity::find()
        .filter(kyc_documents::Column::UserId.eq(user_id))
        .filter(kyc_documents::Column::Status.ne(KycStatus::Approved))
        .one(&txn)
        .await?;
    let mut verified = false;
    if outstanding.is_none() {
        let user = users::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("User", user_id))?;
        // Suspension is lifted by an admin, not by paperwork.
        if matches!(user.status, UserStatus::Pending | UserStatus::Rejected) {
            let mut user: users::ActiveModel = user.into();
            user.status = Set(UserStatus::Verified);
            user.updated_at = Set(now);
            user.update(&txn).await?;
            verified = true;
        }
    }

    txn.commit().await?;

    info!(kyc_id, user_id, verified, acting_user_id = actor.id, "KYC document approved");
    Ok(document)
}

pub async fn reject_kyc(
    db: &DatabaseConnection,
    actor: &Identity,
    kyc_id: i32,
    reason: &str,
) -> AppResult<kyc_documents::Model> {
    let reason = required_text(reason, "Rejection reason")?;
    let txn = db.begin().await?;

    let document = find_pending_kyc(&txn, kyc_id).await?;
    let mut active: kyc_documents::ActiveModel = document.into();
    active.status = Set(KycStatus::Rejected);
    active.rejection_reason = Set(Some(reason));
    active.reviewed_by_id = Set(Some(actor.id));
    active.reviewed_at = Set(Some(Utc::now()));
    let document = active.update(&txn).await?;

    txn.commit().await?;

    info!(kyc_id, user_id = document.user_id, acting_user_id = actor.id, "KYC document rejected");
    Ok(document)
}

/// Newest submissions first.
pub async fn list_kyc(
    db: &DatabaseConnection,
    filter: KycFilter,
) -> AppResult<Vec<kyc_documents::Model>> {
    let mut query = kyc_documents::Entity::find();
    if let Some(status) = filter.status {
        query = query.filter(kyc_documents::Column::Status.eq(status));
    }
    Ok(query
        .order_by_desc(kyc_documents::Column::CreatedAt)
        .order_by_desc(kyc_documents::Column::Id)
        .all(db)
        .await?)
}

pub async fn list_own_kyc(
    db: &DatabaseConnection,
    actor: &Identity,
) -> AppResult<Vec<kyc_documents::Model>> {
    Ok(kyc_documents::Entity::find()
        .filter(kyc_documents::Column::UserId.eq(actor.id))
        .order_by_desc(kyc_documents::Column::CreatedAt)
        .all(db)
        .await?)
}
