//! Registration, profile and KYC request models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{
    client_profiles, developer_profiles,
    developer_profiles::Availability,
    kyc_documents::{KycDocumentType, KycStatus},
    users::{self, UserRole, UserStatus},
};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdminRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    /// Matches name or email.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModerationRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Fields a developer may edit on their own profile. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDeveloperProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub tagline: Option<String>,
    pub bio: Option<String>,
    pub experience_years: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub domains: Option<Vec<String>>,
    pub availability: Option<Availability>,
    pub hourly_rate: Option<Decimal>,
    pub offers_classes: Option<bool>,
    pub offers_consulting: Option<bool>,
    pub offers_support: Option<bool>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClientProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub company_size: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub contact_position: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SubmitKycRequest {
    pub document_type: KycDocumentType,
    pub document_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectKycRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KycFilter {
    pub status: Option<KycStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    #[serde(flatten)]
    pub user: users::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_profile: Option<developer_profiles::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_profile: Option<client_profiles::Model>,
}
