//! HTTP-level integration tests: routing, sessions, role gates, and the
//! rejection/resubmission workflow end to end.
//!
//! Each test builds a full app with the cookie-session middleware and an
//! in-memory database. Object storage is left unconfigured, so the only
//! proposal-creation path exercised over HTTP is the validation that runs
//! before any upload or database write.

mod common;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::{App, test, web};
use sqlx::SqlitePool;

use pms::models::proposal::types::ProposalStatus;
use pms::models::{proposal, user};
use pms::storage::ObjectStore;

use common::{
    TEST_PASSWORD, create_test_admin, create_test_user, sample_documents, sample_input,
    setup_test_db,
};

macro_rules! test_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_name("token".to_string())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new(ObjectStore::new(None)))
                .service(web::scope("/api/v1").configure(pms::handlers::configure)),
        )
        .await
    };
}

fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("token="))
        .and_then(|v| Cookie::parse_encoded(v.to_string()).ok())
        .map(Cookie::into_owned)
        .expect("No session cookie in response")
}

async fn body_json<B>(res: ServiceResponse<B>) -> serde_json::Value
where
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    test::read_body_json(res).await
}

/// Sign in through the user namespace and return the session cookie.
macro_rules! user_cookie {
    ($app:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/user/sign-in")
            .set_json(serde_json::json!({ "email": $email, "password": TEST_PASSWORD }))
            .to_request();
        let res = test::call_service(&$app, req).await;
        assert_eq!(res.status(), 202);
        session_cookie(&res)
    }};
}

macro_rules! admin_cookie {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/admin/sign-in")
            .set_json(serde_json::json!({ "username": $username, "password": TEST_PASSWORD }))
            .to_request();
        let res = test::call_service(&$app, req).await;
        assert_eq!(res.status(), 202);
        session_cookie(&res)
    }};
}

async fn seed_proposal(pool: &SqlitePool, user_id: i64, title: &str) -> i64 {
    proposal::create(pool, user_id, &sample_input(title), &sample_documents())
        .await
        .unwrap()
        .id
}

#[actix_rt::test]
async fn test_sign_up_sets_cookie_and_sanitizes_user() {
    let pool = setup_test_db().await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/user/sign-up")
        .set_json(serde_json::json!({
            "name": "New User",
            "email": "new@test.com",
            "number": "9000000001",
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 201);
    let cookie = session_cookie(&res);
    assert_eq!(cookie.name(), "token");

    let body = body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "new@test.com");
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["user"].get("password").is_none());

    assert!(user::find_by_email(&pool, "new@test.com").await.unwrap().is_some());

    println!("[PASS] test_sign_up_sets_cookie_and_sanitizes_user");
}

#[actix_rt::test]
async fn test_sign_up_invalid_email_writes_nothing() {
    let pool = setup_test_db().await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/user/sign-up")
        .set_json(serde_json::json!({
            "name": "Bad Email",
            "email": "not-an-email",
            "number": "9000000001",
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 400);
    let body = body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Please enter a valid email");

    assert_eq!(user::count(&pool).await.unwrap(), 0);

    println!("[PASS] test_sign_up_invalid_email_writes_nothing");
}

#[actix_rt::test]
async fn test_sign_up_duplicate_rejected() {
    let pool = setup_test_db().await;
    create_test_user(&pool, "dup@test.com", "9000000001").await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/user/sign-up")
        .set_json(serde_json::json!({
            "name": "Dup",
            "email": "dup@test.com",
            "number": "9999999999",
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 400);
    let body = body_json(res).await;
    assert_eq!(body["message"], "User already exists");
    assert_eq!(user::count(&pool).await.unwrap(), 1);

    println!("[PASS] test_sign_up_duplicate_rejected");
}

#[actix_rt::test]
async fn test_sign_in_and_verify_round_trip() {
    let pool = setup_test_db().await;
    let created = create_test_user(&pool, "u1@test.com", "9000000001").await;
    let app = test_app!(pool);

    let cookie = user_cookie!(app, "u1@test.com");

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/verify")
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 200);
    let body = body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["id"], created.id);
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["user"].get("password").is_none());

    println!("[PASS] test_sign_in_and_verify_round_trip");
}

#[actix_rt::test]
async fn test_sign_in_wrong_password() {
    let pool = setup_test_db().await;
    create_test_user(&pool, "u1@test.com", "9000000001").await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/user/sign-in")
        .set_json(serde_json::json!({ "email": "u1@test.com", "password": "wrong-pass" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 401);
    let body = body_json(res).await;
    assert_eq!(body["message"], "Invalid email or password");

    println!("[PASS] test_sign_in_wrong_password");
}

#[actix_rt::test]
async fn test_admin_sign_up_and_sign_in() {
    let pool = setup_test_db().await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/admin/sign-up")
        .set_json(serde_json::json!({
            "name": "Reviewer",
            "username": "reviewer",
            "email": "reviewer@test.com",
            "number": "9000000009",
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 201);
    let body = body_json(res).await;
    assert_eq!(body["user"]["username"], "reviewer");
    assert!(body["user"].get("password").is_none());

    // Duplicate username
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/admin/sign-up")
        .set_json(serde_json::json!({
            "name": "Reviewer Two",
            "username": "reviewer",
            "email": "other@test.com",
            "number": "9000000010",
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 400);
    assert_eq!(body_json(res).await["message"], "Username already exists");

    // Wrong password
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/admin/sign-in")
        .set_json(serde_json::json!({ "username": "reviewer", "password": "wrong-pass" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 401);
    assert_eq!(body_json(res).await["message"], "Invalid username or password");

    let cookie = admin_cookie!(app, "reviewer");
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/verify")
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    assert_eq!(body_json(res).await["user"]["username"], "reviewer");

    println!("[PASS] test_admin_sign_up_and_sign_in");
}

#[actix_rt::test]
async fn test_unauthenticated_requests_rejected() {
    let pool = setup_test_db().await;
    let app = test_app!(pool);

    for uri in [
        "/api/v1/proposal",
        "/api/v1/admin/dashboard",
        "/api/v1/user/dashboard",
        "/api/v1/auth/verify",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 401, "expected 401 for {uri}");
    }

    println!("[PASS] test_unauthenticated_requests_rejected");
}

#[actix_rt::test]
async fn test_role_gates_both_directions() {
    let pool = setup_test_db().await;
    create_test_user(&pool, "u1@test.com", "9000000001").await;
    create_test_admin(&pool, "reviewer").await;
    let app = test_app!(pool);

    let user_cookie = user_cookie!(app, "u1@test.com");
    let admin_cookie = admin_cookie!(app, "reviewer");

    // User hitting admin surfaces
    for uri in ["/api/v1/proposal/all", "/api/v1/admin/dashboard", "/api/v1/users"] {
        let req = test::TestRequest::get().uri(uri).cookie(user_cookie.clone()).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 403, "expected 403 for {uri}");
    }

    // Admin hitting user surfaces
    for uri in ["/api/v1/proposal", "/api/v1/user/dashboard"] {
        let req = test::TestRequest::get().uri(uri).cookie(admin_cookie.clone()).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 403, "expected 403 for {uri}");
    }

    println!("[PASS] test_role_gates_both_directions");
}

#[actix_rt::test]
async fn test_reject_resubmit_approve_flow() {
    let pool = setup_test_db().await;
    let owner = create_test_user(&pool, "u1@test.com", "9000000001").await;
    create_test_admin(&pool, "reviewer").await;
    let proposal_id = seed_proposal(&pool, owner.id, "Community Center").await;
    let app = test_app!(pool);

    let user_cookie = user_cookie!(app, "u1@test.com");
    let admin_cookie = admin_cookie!(app, "reviewer");

    // Admin rejects with flagged fields
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/proposal/{proposal_id}"))
        .cookie(admin_cookie.clone())
        .set_json(serde_json::json!({
            "status": "REJECTED",
            "rejectedFields": ["title", "budget"],
            "remarks": "Budget unclear",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body = body_json(res).await;
    assert_eq!(body["message"], "Proposal Status Updated");
    assert_eq!(body["proposal"]["status"], "REJECTED");

    // Owner sees the flags and an enabled edit
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/proposal/{proposal_id}"))
        .cookie(user_cookie.clone())
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body = body_json(res).await;
    assert_eq!(body["proposal"]["editEnable"], true);
    assert_eq!(body["proposal"]["deleteEnable"], true);
    assert_eq!(
        body["proposal"]["highlightedFields"],
        serde_json::json!(["title", "budget"])
    );
    assert_eq!(body["proposal"]["remarks"], "Budget unclear");

    // Owner resubmits; flags clear, status stays REJECTED for re-review
    let mut revised = sample_input("Community Center, Revised");
    revised.budget = "450000".to_string();
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/proposal/{proposal_id}"))
        .cookie(user_cookie.clone())
        .set_json(serde_json::to_value(&revised).unwrap())
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body = body_json(res).await;
    assert_eq!(body["message"], "Proposal Updated");
    assert_eq!(body["proposal"]["title"], "Community Center, Revised");
    assert_eq!(body["proposal"]["highlightedFields"], serde_json::json!([]));
    assert_eq!(body["proposal"]["status"], "REJECTED");

    // Admin approves
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/proposal/{proposal_id}"))
        .cookie(admin_cookie.clone())
        .set_json(serde_json::json!({ "status": "APPROVED" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);

    // Approval is terminal for both sides
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/proposal/{proposal_id}"))
        .cookie(user_cookie.clone())
        .to_request();
    let body = body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["proposal"]["status"], "APPROVED");
    assert_eq!(body["proposal"]["editEnable"], false);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/proposal/{proposal_id}"))
        .cookie(admin_cookie)
        .set_json(serde_json::json!({ "status": "REJECTED", "rejectedFields": ["title"] }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 403);
    assert_eq!(
        body_json(res).await["message"],
        "Approved proposals can no longer be reviewed"
    );

    println!("[PASS] test_reject_resubmit_approve_flow");
}

#[actix_rt::test]
async fn test_edit_blocked_while_pending() {
    let pool = setup_test_db().await;
    let owner = create_test_user(&pool, "u1@test.com", "9000000001").await;
    let proposal_id = seed_proposal(&pool, owner.id, "Still Pending").await;
    let app = test_app!(pool);

    let cookie = user_cookie!(app, "u1@test.com");
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/proposal/{proposal_id}"))
        .cookie(cookie)
        .set_json(serde_json::to_value(sample_input("Sneaky Edit")).unwrap())
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 403);
    assert_eq!(
        body_json(res).await["message"],
        "Proposal can only be edited after rejection"
    );

    let reloaded = proposal::find_by_id(&pool, proposal_id).await.unwrap().unwrap();
    assert_eq!(reloaded.title, "Still Pending");

    println!("[PASS] test_edit_blocked_while_pending");
}

#[actix_rt::test]
async fn test_foreign_proposal_is_a_404() {
    let pool = setup_test_db().await;
    let owner = create_test_user(&pool, "u1@test.com", "9000000001").await;
    create_test_user(&pool, "u2@test.com", "9000000002").await;
    let proposal_id = seed_proposal(&pool, owner.id, "Private").await;
    let app = test_app!(pool);

    let intruder_cookie = user_cookie!(app, "u2@test.com");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/proposal/{proposal_id}"))
        .cookie(intruder_cookie.clone())
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 404);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/proposal/{proposal_id}"))
        .cookie(intruder_cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 404);
    assert_eq!(body_json(res).await["message"], "Proposal not found");

    assert!(proposal::find_by_id(&pool, proposal_id).await.unwrap().is_some());

    println!("[PASS] test_foreign_proposal_is_a_404");
}

#[actix_rt::test]
async fn test_owner_can_delete() {
    let pool = setup_test_db().await;
    let owner = create_test_user(&pool, "u1@test.com", "9000000001").await;
    let proposal_id = seed_proposal(&pool, owner.id, "To Delete").await;
    let app = test_app!(pool);

    let cookie = user_cookie!(app, "u1@test.com");
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/proposal/{proposal_id}"))
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 200);
    assert_eq!(body_json(res).await["message"], "Proposal Deleted");
    assert!(proposal::find_by_id(&pool, proposal_id).await.unwrap().is_none());

    println!("[PASS] test_owner_can_delete");
}

#[actix_rt::test]
async fn test_reject_with_empty_field_list_accepted() {
    let pool = setup_test_db().await;
    let owner = create_test_user(&pool, "u1@test.com", "9000000001").await;
    create_test_admin(&pool, "reviewer").await;
    let proposal_id = seed_proposal(&pool, owner.id, "Vague Rejection").await;
    let app = test_app!(pool);

    let cookie = admin_cookie!(app, "reviewer");
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/proposal/{proposal_id}"))
        .cookie(cookie)
        .set_json(serde_json::json!({ "status": "REJECTED", "remarks": "Resubmit everything" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 200);
    let reloaded = proposal::find_by_id(&pool, proposal_id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, ProposalStatus::Rejected);
    assert!(reloaded.highlighted_fields.is_empty());
    assert_eq!(reloaded.remarks, "Resubmit everything");

    println!("[PASS] test_reject_with_empty_field_list_accepted");
}

fn multipart_body(boundary: &str, file_count: usize) -> Vec<u8> {
    let fields = [
        ("title", "Multipart Proposal"),
        ("description", "desc"),
        ("objective", "obj"),
        ("duration", "6 months"),
        ("budget", "100000"),
        ("state", "West Bengal"),
        ("district", "Nadia"),
        ("pincode", "741101"),
        ("postOffice", "Krishnanagar"),
        ("policeStation", "Kotwali"),
        ("address", "12 Station Road"),
        ("bankName", "State Bank"),
        ("ifsc", "SBIN0000123"),
        ("accountNumber", "12345678901"),
        ("bankBranch", "Krishnanagar"),
        ("incomeSource", "Agriculture"),
        ("incomeAmount", "120000"),
        ("ownerName", "Land Owner"),
        ("ownerNumber", "9000000000"),
        ("ownerEmail", "owner@example.com"),
        ("landLocation", "Plot 7"),
        ("landArea", "2 acres"),
        ("landType", "Agricultural"),
        ("usage", "Community center"),
        ("ownershipStatus", "Owned"),
        ("landDescription", "Flat land"),
    ];

    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for i in 0..file_count {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"files\"; \
                 filename=\"doc{i}.png\"\r\nContent-Type: image/png\r\n\r\nfakebytes\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

#[actix_rt::test]
async fn test_create_proposal_requires_three_files() {
    let pool = setup_test_db().await;
    create_test_user(&pool, "u1@test.com", "9000000001").await;
    let app = test_app!(pool);

    let cookie = user_cookie!(app, "u1@test.com");

    let boundary = "----pmsTestBoundary7349";
    let req = test::TestRequest::post()
        .uri("/api/v1/proposal")
        .cookie(cookie)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(multipart_body(boundary, 2))
        .to_request();
    let res = test::call_service(&app, req).await;

    // Fails on the file-count check, before any upload or insert
    assert_eq!(res.status(), 400);
    assert_eq!(proposal::find_all(&pool).await.unwrap().len(), 0);

    println!("[PASS] test_create_proposal_requires_three_files");
}

#[actix_rt::test]
async fn test_dashboards() {
    let pool = setup_test_db().await;
    let alice = create_test_user(&pool, "alice@test.com", "9000000001").await;
    let bob = create_test_user(&pool, "bob@test.com", "9000000002").await;
    create_test_admin(&pool, "reviewer").await;

    let p1 = seed_proposal(&pool, alice.id, "Alice Pending").await;
    let p2 = seed_proposal(&pool, alice.id, "Alice Approved").await;
    let p3 = seed_proposal(&pool, bob.id, "Bob Rejected").await;
    proposal::update_status(&pool, p2, ProposalStatus::Approved, &[], "ok").await.unwrap();
    proposal::update_status(&pool, p3, ProposalStatus::Rejected, &["budget".to_string()], "fix")
        .await
        .unwrap();

    let app = test_app!(pool);
    let admin_cookie = admin_cookie!(app, "reviewer");
    let alice_cookie = user_cookie!(app, "alice@test.com");

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/dashboard")
        .cookie(admin_cookie.clone())
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body = body_json(res).await;
    assert_eq!(body["totalUsers"], 2);
    assert_eq!(body["totalProposals"], 3);
    assert_eq!(body["pendingProposals"].as_array().unwrap().len(), 1);
    assert_eq!(body["approvedProposals"].as_array().unwrap().len(), 1);
    assert_eq!(body["rejectedProposals"].as_array().unwrap().len(), 1);
    assert_eq!(body["pendingProposals"][0]["id"], p1);

    let req = test::TestRequest::get()
        .uri("/api/v1/user/dashboard")
        .cookie(alice_cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body = body_json(res).await;
    assert_eq!(body["totalProposals"], 2);
    assert_eq!(body["pendingProposals"], 1);
    assert_eq!(body["approvedProposals"], 1);
    assert_eq!(body["rejectedProposals"], 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/users")
        .cookie(admin_cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body = body_json(res).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password").is_none()));

    println!("[PASS] test_dashboards");
}

#[actix_rt::test]
async fn test_logout_clears_cookie() {
    let pool = setup_test_db().await;
    create_test_user(&pool, "u1@test.com", "9000000001").await;
    let app = test_app!(pool);

    let cookie = user_cookie!(app, "u1@test.com");
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/logout")
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 200);
    let cleared = session_cookie(&res);
    assert!(cleared.value().is_empty());

    println!("[PASS] test_logout_clears_cookie");
}
