//! Application router shared by `main.rs` and the integration tests.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{ACTING_USER_HEADER, API_KEY_HEADER};
use crate::handlers::{appointments, articles, discovery, identity, leads_management, marketplace};
use crate::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn leads_management_routes() -> Router<AppState> {
    use leads_management::*;

    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/leads", get(list_leads).post(create_lead))
        .route("/leads/export", get(export_leads))
        .route("/leads/{id}", get(get_lead))
        .route("/leads/{id}/follow-ups", post(record_follow_up))
        .route("/leads/{id}/confirm", post(confirm_lead))
        .route("/projects", get(list_projects))
        .route("/projects/{id}", get(get_project))
        .route("/projects/{id}/payments", post(record_payment))
        .route(
            "/projects/{id}/invoice/{transaction_id}",
            get(download_invoice),
        )
        .route(
            "/projects/{id}/milestones/{milestone_id}/toggle",
            post(toggle_milestone),
        )
        .route("/projects/{id}/documents", post(upload_document))
        .route(
            "/projects/{id}/assignments",
            get(list_assignments).post(add_assignment),
        )
        .route("/projects/{id}/repository", put(update_repository))
        .route("/projects/{id}/status", put(update_status))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .nest("/leads-management", leads_management_routes())
        .route("/admins", post(identity::create_admin))
        .route("/users", get(identity::list_users))
        .route("/users/{id}", get(identity::get_user))
        .route("/developers/{id}/verify", post(identity::verify_developer))
        .route("/developers/{id}/reject", post(identity::reject_developer))
        .route("/developers/{id}/suspend", post(identity::suspend_developer))
        .route("/kyc", get(identity::list_kyc))
        .route("/kyc/{id}/approve", post(identity::approve_kyc))
        .route("/kyc/{id}/reject", post(identity::reject_kyc))
        .route("/articles", get(articles::list_admin))
        .route("/articles/{id}", delete(articles::delete_admin))
        .route("/articles/{id}/approve", post(articles::approve))
        .route("/articles/{id}/reject", post(articles::reject))
        .route("/articles/{id}/hide", post(articles::hide))
        .route("/articles/{id}/restore", post(articles::restore))
        .route("/projects", get(marketplace::list_projects))
        .route("/projects/{id}/status", put(marketplace::update_project_status))
        .route("/teams", get(marketplace::list_teams).post(marketplace::create_team))
        .route("/teams/{id}", get(marketplace::get_team))
        .route("/teams/{id}/members", post(marketplace::add_member))
        .route(
            "/teams/{id}/members/{member_id}",
            delete(marketplace::remove_member),
        )
        .route("/teams/{id}/start", post(marketplace::start_team))
        .route("/teams/{id}/complete", post(marketplace::complete_team))
        .route("/appointments", get(appointments::list_all))
}

fn developer_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", put(identity::update_developer_profile))
        .route("/kyc", get(identity::list_own_kyc).post(identity::submit_kyc))
        .route(
            "/articles",
            get(articles::list_own).post(articles::create_article),
        )
        .route(
            "/articles/{id}",
            put(articles::update_article).delete(articles::delete_own),
        )
        .route("/articles/{id}/submit", post(articles::submit_article))
        .route("/articles/{id}/cover", put(articles::set_cover))
        .route("/appointments", get(appointments::list_for_developer))
        .route("/appointments/{id}/confirm", post(appointments::confirm))
        .route("/appointments/{id}/complete", post(appointments::complete))
        .route("/appointments/{id}/no-show", post(appointments::no_show))
}

fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", put(identity::update_client_profile))
        .route(
            "/projects",
            get(marketplace::list_client_projects).post(marketplace::submit_project),
        )
        .route(
            "/appointments",
            get(appointments::list_for_client).post(appointments::book),
        )
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(identity::register))
        .route("/auth/login", post(identity::login))
        .route("/me", get(identity::me))
        .route("/me/avatar", put(identity::update_avatar))
        .route("/articles", get(articles::list_published))
        .route("/articles/{slug}", get(articles::view_article))
        .route("/developers", get(discovery::list_developers))
        .route("/search", get(discovery::search))
        .route("/stats", get(discovery::stats))
        .route("/appointments/{id}/cancel", post(appointments::cancel))
        .nest("/admin", admin_routes())
        .nest("/developer", developer_routes())
        .nest("/client", client_routes())
}

/// Origins that fail to parse are skipped with a warning.
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(e) => {
                tracing::warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(API_KEY_HEADER),
            HeaderName::from_static(ACTING_USER_HEADER),
        ])
        .max_age(Duration::from_secs(3600))
}

pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors_origins);
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
