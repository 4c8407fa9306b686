mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use http_body_util::BodyExt;
use tower::ServiceExt;

use devnest_backend::models::lead::{ConfirmLeadRequest, CreateLeadRequest, DeveloperSelection};
use devnest_backend::models::student_project::RecordPaymentRequest;
use devnest_backend::routes::build_router;
use devnest_backend::services::directory::{DbDirectory, Identity};
use devnest_backend::services::{confirmation, leads as lead_service, ledger};

use crate::common::{seed_admin, seed_client, seed_ravi, setup_test_db, test_state, TEST_API_KEY, DEVELOPER_ID};

struct TestApp {
    router: Router,
    db: sea_orm::DatabaseConnection,
    admin: Identity,
    _uploads: tempfile::TempDir,
}

async fn build_test_app() -> TestApp {
    let db = setup_test_db().await.expect("Failed to set up test DB");
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let uploads = tempfile::tempdir().unwrap();
    let router = build_router(test_state(db.clone(), uploads.path()));
    TestApp {
        router,
        db,
        admin,
        _uploads: uploads,
    }
}

fn admin_request(method: &str, uri: &str, acting_user: i32, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-api-key", TEST_API_KEY)
        .header("x-acting-user-id", acting_user.to_string());
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = build_test_app().await;

    let response = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_admin_routes_require_the_api_key() {
    let app = build_test_app().await;

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/api/admin/leads-management/leads")
                .header("x-acting-user-id", app.admin.id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_wrong_api_key_is_refused() {
    let app = build_test_app().await;

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/api/admin/leads-management/leads")
                .header("x-api-key", "guess")
                .header("x-acting-user-id", app.admin.id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_acting_user_is_forbidden() {
    let app = build_test_app().await;
    let ravi = seed_ravi(&app.db).await;

    let response = app
        .router
        .oneshot(admin_request("GET", "/api/admin/leads-management/leads", ravi.id, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_developer_routes_reject_other_roles() {
    let app = build_test_app().await;
    let client = seed_client(&app.db, "client@example.com", "Priya").await;

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/api/developer/articles")
                .header("x-acting-user-id", client.id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_and_list_leads() {
    let app = build_test_app().await;

    let created = app
        .router
        .clone()
        .oneshot(admin_request(
            "POST",
            "/api/admin/leads-management/leads",
            app.admin.id,
            Some(json!({
                "student_name": "Asha",
                "phone": "9990001111",
                "domain": "AI"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let lead = json_body(created).await;
    assert_eq!(lead["status"], "New Lead");

    let listed = app
        .router
        .oneshot(admin_request(
            "GET",
            "/api/admin/leads-management/leads?status=New%20Lead",
            app.admin.id,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
    let leads = json_body(listed).await;
    assert_eq!(leads.as_array().unwrap().len(), 1);
    assert_eq!(leads[0]["student_name"], "Asha");
}

#[tokio::test]
async fn test_blank_student_name_is_a_validation_error() {
    let app = build_test_app().await;

    let response = app
        .router
        .oneshot(admin_request(
            "POST",
            "/api/admin/leads-management/leads",
            app.admin.id,
            Some(json!({ "student_name": "  ", "phone": "9990001111" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_lead_is_not_found() {
    let app = build_test_app().await;

    let response = app
        .router
        .oneshot(admin_request(
            "GET",
            "/api/admin/leads-management/leads/404",
            app.admin.id,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Creates a lead and confirms it with Ravi as lead developer.
async fn confirmed_project(app: &TestApp, student_name: &str, phone: &str) -> i32 {
    let directory = DbDirectory::new(app.db.clone());
    let lead = lead_service::create_lead(
        &app.db,
        &app.admin,
        CreateLeadRequest {
            student_name: student_name.to_string(),
            phone: phone.to_string(),
            email: Some(format!("{}@example.com", student_name.to_lowercase())),
            college: None,
            domain: None,
            source: None,
            requirement_summary: None,
        },
    )
    .await
    .unwrap();
    confirmation::confirm_lead(
        &app.db,
        &directory,
        &app.admin,
        lead.id,
        ConfirmLeadRequest {
            title: format!("{student_name} Capstone"),
            scope: None,
            tech_stack: Vec::new(),
            timeline_weeks: None,
            academic_requirements: None,
            total_cost: dec!(50000),
            payment_structure: None,
            developer: DeveloperSelection::Developer {
                developer_id: DEVELOPER_ID,
            },
            payout_amount: dec!(10000),
            closed_by_id: None,
        },
    )
    .await
    .unwrap()
    .project
    .id
}

#[tokio::test]
async fn test_invoice_download() {
    let app = build_test_app().await;
    seed_ravi(&app.db).await;

    let project_id = confirmed_project(&app, "Asha", "9990001111").await;
    let recorded = ledger::record_payment(
        &app.db,
        &app.admin,
        project_id,
        RecordPaymentRequest {
            amount: dec!(20000),
            payment_mode: Some("UPI".to_string()),
            invoice_ref: Some("INV-001".to_string()),
            notes: None,
        },
    )
    .await
    .unwrap();

    let uri = format!(
        "/api/admin/leads-management/projects/{}/invoice/{}",
        project_id, recorded.transaction.id
    );
    let response = app
        .router
        .clone()
        .oneshot(admin_request("GET", &uri, app.admin.id, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Invoice_INV-001.txt\""
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("Asha"));
    assert!(text.contains("INV-001"));
}

#[tokio::test]
async fn test_invoice_for_another_projects_transaction_is_forbidden() {
    let app = build_test_app().await;
    seed_ravi(&app.db).await;

    let asha_project = confirmed_project(&app, "Asha", "9990001111").await;
    let karthik_project = confirmed_project(&app, "Karthik", "9990002222").await;
    let recorded = ledger::record_payment(
        &app.db,
        &app.admin,
        asha_project,
        RecordPaymentRequest {
            amount: dec!(20000),
            payment_mode: None,
            invoice_ref: None,
            notes: None,
        },
    )
    .await
    .unwrap();

    let uri = format!(
        "/api/admin/leads-management/projects/{}/invoice/{}",
        karthik_project, recorded.transaction.id
    );
    let response = app
        .router
        .oneshot(admin_request("GET", &uri, app.admin.id, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["code"], "ACCESS_DENIED");
}

#[tokio::test]
async fn test_leads_export_is_csv() {
    let app = build_test_app().await;

    let response = app
        .router
        .oneshot(admin_request(
            "GET",
            "/api/admin/leads-management/leads/export",
            app.admin.id,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("ID,Student Name,Phone"));
}
