mod common;

use rust_decimal_macros::dec;
use sea_orm::{DatabaseConnection, EntityTrait};

use devnest_backend::entities::{
    appointments::{AppointmentStatus, AppointmentType},
    client_profiles,
    projects::{self, ProjectStatus},
    teams::TeamStatus,
    users::UserStatus,
};
use devnest_backend::error::AppError;
use devnest_backend::models::marketplace::{
    AddTeamMemberRequest, AppointmentFilter, BookAppointmentRequest, ConfirmAppointmentRequest,
    CreateTeamRequest, SubmitProjectRequest, UpdateProjectStatusRequest,
};
use devnest_backend::services::directory::{DbDirectory, Identity};
use devnest_backend::services::marketplace::TEAM_LEAD_ROLE;
use devnest_backend::services::{appointments, marketplace};

use crate::common::{seed_admin, seed_client, seed_developer, seed_ravi, setup_test_db, DEVELOPER_ID};

fn project_request(title: &str) -> SubmitProjectRequest {
    SubmitProjectRequest {
        title: title.to_string(),
        description: "Inventory tracking for a small shop".to_string(),
        requirements: None,
        project_type: Some("web".to_string()),
        technologies: vec!["React".to_string(), "Postgres".to_string()],
        domain: None,
        budget_min: Some(dec!(20000)),
        budget_max: Some(dec!(40000)),
        currency: None,
        timeline_weeks: Some(8),
    }
}

async fn submitted_project(db: &DatabaseConnection, client: &Identity) -> projects::Model {
    marketplace::submit_project(db, client, project_request("Shop inventory"))
        .await
        .unwrap()
}

fn team_request(project_id: Option<i32>) -> CreateTeamRequest {
    CreateTeamRequest {
        name: "Inventory squad".to_string(),
        description: None,
        project_id,
        lead_developer_id: DEVELOPER_ID,
        deadline: Some("2030-03-31".to_string()),
    }
}

fn member_request(developer_id: i32) -> AddTeamMemberRequest {
    AddTeamMemberRequest {
        developer_id,
        role: "Developer".to_string(),
        responsibilities: Some("Frontend".to_string()),
    }
}

#[tokio::test]
async fn test_submitting_a_project_counts_against_the_client() {
    let db = setup_test_db().await.unwrap();
    let client = seed_client(&db, "client@example.com", "Priya").await;

    let project = submitted_project(&db, &client).await;
    assert_eq!(project.status, ProjectStatus::Submitted);
    assert_eq!(project.currency, "INR");
    assert_eq!(project.client_id, client.id);

    let profile = client_profiles::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.projects_submitted, 1);

    let own = marketplace::list_client_projects(&db, &client).await.unwrap();
    assert_eq!(own.len(), 1);
}

#[tokio::test]
async fn test_inverted_budget_is_rejected() {
    let db = setup_test_db().await.unwrap();
    let client = seed_client(&db, "client@example.com", "Priya").await;

    let mut req = project_request("Backwards budget");
    req.budget_min = Some(dec!(50000));
    req.budget_max = Some(dec!(10000));
    let result = marketplace::submit_project(&db, &client, req).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(projects::Entity::find().all(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_project_review_follows_the_lifecycle() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let client = seed_client(&db, "client@example.com", "Priya").await;
    let project = submitted_project(&db, &client).await;

    let skipped = marketplace::update_project_status(
        &db,
        &admin,
        project.id,
        UpdateProjectStatusRequest {
            status: ProjectStatus::InProgress,
            priority: None,
            admin_notes: None,
        },
    )
    .await;
    assert!(matches!(skipped, Err(AppError::Conflict(_))));

    let reviewing = marketplace::update_project_status(
        &db,
        &admin,
        project.id,
        UpdateProjectStatusRequest {
            status: ProjectStatus::Reviewing,
            priority: None,
            admin_notes: Some("Looks feasible".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(reviewing.status, ProjectStatus::Reviewing);
    assert_eq!(reviewing.reviewed_by_id, Some(admin.id));
    assert_eq!(reviewing.admin_notes.as_deref(), Some("Looks feasible"));
}

#[tokio::test]
async fn test_team_lifecycle_drives_the_project() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let client = seed_client(&db, "client@example.com", "Priya").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = submitted_project(&db, &client).await;

    let created = marketplace::create_team(&db, &directory, &admin, team_request(Some(project.id)))
        .await
        .unwrap();
    assert_eq!(created.team.status, TeamStatus::Forming);
    assert_eq!(created.members.len(), 1);
    assert_eq!(created.members[0].role, TEAM_LEAD_ROLE);
    assert_eq!(created.project.unwrap().status, ProjectStatus::TeamForming);

    let started = marketplace::start_team(&db, &admin, created.team.id).await.unwrap();
    assert_eq!(started.team.status, TeamStatus::Active);
    assert!(started.team.started_at.is_some());
    assert_eq!(started.project.unwrap().status, ProjectStatus::InProgress);

    let finished = marketplace::complete_team(&db, &admin, created.team.id).await.unwrap();
    assert_eq!(finished.team.status, TeamStatus::Completed);
    assert_eq!(finished.project.unwrap().status, ProjectStatus::Delivered);

    let again = marketplace::start_team(&db, &admin, created.team.id).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_project_takes_only_one_team() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let client = seed_client(&db, "client@example.com", "Priya").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());
    let project = submitted_project(&db, &client).await;

    marketplace::create_team(&db, &directory, &admin, team_request(Some(project.id)))
        .await
        .unwrap();
    let second = marketplace::create_team(&db, &directory, &admin, team_request(Some(project.id))).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(marketplace::list_teams(&db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_team_members_are_unique() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let other = seed_developer(&db, None, "dev2@example.com", "Kiran", UserStatus::Verified).await;
    let directory = DbDirectory::new(db.clone());

    let team = marketplace::create_team(&db, &directory, &admin, team_request(None))
        .await
        .unwrap()
        .team;

    let member = marketplace::add_team_member(&db, &directory, &admin, team.id, member_request(other.id))
        .await
        .unwrap();
    assert_eq!(member.developer_id, other.id);

    let duplicate =
        marketplace::add_team_member(&db, &directory, &admin, team.id, member_request(other.id)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    // The lead is already a member too
    let lead_again =
        marketplace::add_team_member(&db, &directory, &admin, team.id, member_request(DEVELOPER_ID)).await;
    assert!(matches!(lead_again, Err(AppError::Conflict(_))));

    let detail = marketplace::get_team(&db, team.id).await.unwrap();
    assert_eq!(detail.members.len(), 2);
}

#[tokio::test]
async fn test_member_of_another_team_cannot_be_removed() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());

    let first = marketplace::create_team(&db, &directory, &admin, team_request(None))
        .await
        .unwrap();
    let second = marketplace::create_team(&db, &directory, &admin, team_request(None))
        .await
        .unwrap();

    let result = marketplace::remove_team_member(
        &db,
        &admin,
        first.team.id,
        second.members[0].id,
    )
    .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(marketplace::get_team(&db, second.team.id).await.unwrap().members.len(), 1);
}

#[tokio::test]
async fn test_pending_developer_cannot_lead_a_team() {
    let db = setup_test_db().await.unwrap();
    let admin = seed_admin(&db, "admin@example.com", "Meera").await;
    let pending = seed_developer(&db, None, "new@example.com", "Kiran", UserStatus::Pending).await;
    let directory = DbDirectory::new(db.clone());

    let mut req = team_request(None);
    req.lead_developer_id = pending.id;
    let result = marketplace::create_team(&db, &directory, &admin, req).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

fn booking(developer_id: i32) -> BookAppointmentRequest {
    BookAppointmentRequest {
        developer_id,
        appointment_type: AppointmentType::Consulting,
        title: "Architecture review".to_string(),
        description: None,
        date: "2030-02-10".to_string(),
        time: "15:30".to_string(),
        duration_minutes: None,
        timezone: None,
        client_notes: Some("Bring diagrams".to_string()),
    }
}

#[tokio::test]
async fn test_appointment_booking_and_confirmation() {
    let db = setup_test_db().await.unwrap();
    let client = seed_client(&db, "client@example.com", "Priya").await;
    let ravi = seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());

    let booked = appointments::book_appointment(&db, &directory, &client, booking(DEVELOPER_ID))
        .await
        .unwrap();
    assert_eq!(booked.status, AppointmentStatus::Pending);
    assert_eq!(booked.duration_minutes, appointments::DEFAULT_DURATION_MINUTES);
    assert_eq!(booked.timezone, appointments::DEFAULT_TIMEZONE);

    let confirmed = appointments::confirm_appointment(
        &db,
        &ravi,
        booked.id,
        ConfirmAppointmentRequest {
            meeting_link: Some("meet.example.com/abc".to_string()),
            meeting_platform: Some("Meet".to_string()),
            amount: Some(dec!(1500)),
            developer_notes: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
    assert_eq!(
        confirmed.meeting_link.as_deref(),
        Some("https://meet.example.com/abc")
    );

    let listed = appointments::list_appointments(&db, &directory, &client, AppointmentFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].developer_name.as_deref(), Some("Ravi"));
    assert_eq!(listed[0].client_name.as_deref(), Some("Priya"));

    let done = appointments::complete_appointment(&db, &ravi, booked.id).await.unwrap();
    assert_eq!(done.status, AppointmentStatus::Completed);
}

#[tokio::test]
async fn test_only_the_booked_developer_confirms() {
    let db = setup_test_db().await.unwrap();
    let client = seed_client(&db, "client@example.com", "Priya").await;
    seed_ravi(&db).await;
    let other = seed_developer(&db, None, "dev2@example.com", "Kiran", UserStatus::Verified).await;
    let directory = DbDirectory::new(db.clone());

    let booked = appointments::book_appointment(&db, &directory, &client, booking(DEVELOPER_ID))
        .await
        .unwrap();
    let result = appointments::confirm_appointment(
        &db,
        &other,
        booked.id,
        ConfirmAppointmentRequest::default(),
    )
    .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_cancelled_appointment_is_final() {
    let db = setup_test_db().await.unwrap();
    let client = seed_client(&db, "client@example.com", "Priya").await;
    let ravi = seed_ravi(&db).await;
    let directory = DbDirectory::new(db.clone());

    let booked = appointments::book_appointment(&db, &directory, &client, booking(DEVELOPER_ID))
        .await
        .unwrap();

    let blank = appointments::cancel_appointment(&db, &client, booked.id, "  ").await;
    assert!(matches!(blank, Err(AppError::Validation(_))));

    let cancelled = appointments::cancel_appointment(&db, &client, booked.id, "Exams moved")
        .await
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by_id, Some(client.id));

    let late = appointments::complete_appointment(&db, &ravi, booked.id).await;
    assert!(matches!(late, Err(AppError::Conflict(_))));
}
