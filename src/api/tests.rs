//! HTTP-level tests for the full router

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Duration;
use serde_json::{json, Value};

use super::{build_router, build_state};
use crate::config::AuthConfig;
use crate::db::{create_test_pool, migrations, DynDatabasePool};
use crate::models::{BlogPost, User};
use crate::services::TokenService;

const SECRET: &str = "api-test-secret";

struct TestApp {
    server: TestServer,
    pool: DynDatabasePool,
    _static_dir: tempfile::TempDir,
}

async fn setup() -> TestApp {
    let pool = create_test_pool().await.expect("Failed to create test pool");
    migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let static_dir = tempfile::tempdir().expect("Failed to create static dir");
    std::fs::write(static_dir.path().join("index.html"), "<html>CloudApex</html>").unwrap();
    std::fs::write(static_dir.path().join("app.js"), "console.log('hi')").unwrap();

    let auth = AuthConfig {
        jwt_secret: SECRET.to_string(),
        token_ttl_hours: 1,
        admin_email: "admin@cloudapex.com".to_string(),
    };
    let state = build_state(pool.clone(), &auth, static_dir.path().to_path_buf());
    let server = TestServer::new(build_router(state, "*")).expect("Failed to start test server");

    TestApp {
        server,
        pool,
        _static_dir: static_dir,
    }
}

async fn signup(app: &TestApp, name: &str, email: &str, password: &str) -> (String, User) {
    let response = app
        .server
        .post("/api/auth/signup")
        .json(&json!({ "name": name, "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: Value = response.json();
    let token = body["token"].as_str().expect("token missing").to_string();
    let user: User = serde_json::from_value(body["user"].clone()).expect("user missing");
    (token, user)
}

async fn blog_count(pool: &DynDatabasePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM blogs")
        .fetch_one(pool.sqlite())
        .await
        .unwrap()
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn signup_then_login_returns_token_for_same_user() {
    let app = setup().await;
    let (_, user) = signup(&app, "Alex", "alex@x.com", "secret123").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "alex@x.com", "password": "secret123" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let token = body["token"].as_str().unwrap();
    let claims = TokenService::new(SECRET, Duration::hours(1))
        .verify(token)
        .expect("Token should verify");

    assert_eq!(claims.sub, user.id);
    assert_eq!(body["user"]["id"], json!(user.id));
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn signup_response_shape() {
    let app = setup().await;

    let response = app
        .server
        .post("/api/auth/signup")
        .json(&json!({ "name": "Alex Chen", "email": "alex@x.com", "password": "secret123" }))
        .await;
    let body: Value = response.json();

    assert_eq!(body["user"]["role"], "Student");
    assert_eq!(body["user"]["level"], 1);
    assert_eq!(body["user"]["xp"], 0);
    assert_eq!(body["user"]["totalXp"], 1000);
    assert_eq!(body["user"]["location"], "Remote");
    assert_eq!(
        body["user"]["avatar"],
        "https://ui-avatars.com/api/?name=Alex%20Chen&background=random"
    );
}

#[tokio::test]
async fn wrongly_typed_body_is_validation_error() {
    let app = setup().await;

    let response = app
        .server
        .post("/api/auth/signup")
        .json(&json!({ "name": 5, "email": "alex@x.com", "password": "secret123" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
}

#[tokio::test]
async fn non_json_body_is_validation_error() {
    let app = setup().await;

    let response = app.server.post("/api/contact").text("hello").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn duplicate_signup_is_conflict() {
    let app = setup().await;
    signup(&app, "Alex", "alex@x.com", "secret123").await;

    let response = app
        .server
        .post("/api/auth/signup")
        .json(&json!({ "name": "Alex", "email": "alex@x.com", "password": "secret123" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn signup_missing_fields_is_validation_error() {
    let app = setup().await;

    let response = app
        .server
        .post("/api/auth/signup")
        .json(&json!({ "email": "alex@x.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn login_errors() {
    let app = setup().await;
    signup(&app, "Alex", "alex@x.com", "secret123").await;

    let unknown = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "ghost@x.com", "password": "secret123" }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(unknown.json::<Value>()["error"], "User not found");

    let wrong = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "alex@x.com", "password": "nope" }))
        .await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json::<Value>()["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn me_requires_valid_token() {
    let app = setup().await;
    let (token, user) = signup(&app, "Alex", "alex@x.com", "secret123").await;

    let missing = app.server.get("/api/auth/me").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(missing.json::<Value>()["code"], "UNAUTHORIZED");

    let garbage = app
        .server
        .get("/api/auth/me")
        .authorization_bearer("garbage")
        .await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);

    let ok = app.server.get("/api/auth/me").authorization_bearer(&token).await;
    assert_eq!(ok.status_code(), StatusCode::OK);
    assert_eq!(ok.json::<User>().id, user.id);
}

// ============================================================================
// Profile and password
// ============================================================================

#[tokio::test]
async fn profile_update_is_partial_and_idempotent() {
    let app = setup().await;
    let (token, _) = signup(&app, "Alex", "alex@x.com", "secret123").await;
    let update = json!({ "bio": "Terraform fan", "location": "Porto" });

    let first: User = app
        .server
        .put("/api/user/profile")
        .authorization_bearer(&token)
        .json(&update)
        .await
        .json();
    let second: User = app
        .server
        .put("/api/user/profile")
        .authorization_bearer(&token)
        .json(&update)
        .await
        .json();

    assert_eq!(first.name, "Alex");
    assert_eq!(first.bio, "Terraform fan");
    assert_eq!(first.location, "Porto");
    assert_eq!(
        (first.name, first.bio, first.location, first.avatar),
        (second.name, second.bio, second.location, second.avatar)
    );
}

#[tokio::test]
async fn change_password_flow() {
    let app = setup().await;
    let (token, _) = signup(&app, "Alex", "alex@x.com", "secret123").await;

    let wrong = app
        .server
        .post("/api/user/change-password")
        .authorization_bearer(&token)
        .json(&json!({ "currentPassword": "nope", "newPassword": "rotated456" }))
        .await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

    let ok = app
        .server
        .post("/api/user/change-password")
        .authorization_bearer(&token)
        .json(&json!({ "currentPassword": "secret123", "newPassword": "rotated456" }))
        .await;
    assert_eq!(ok.status_code(), StatusCode::OK);
    assert!(ok.json::<Value>()["message"].is_string());

    let login = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "alex@x.com", "password": "rotated456" }))
        .await;
    assert_eq!(login.status_code(), StatusCode::OK);
}

// ============================================================================
// Blogs
// ============================================================================

#[tokio::test]
async fn student_cannot_create_blog() {
    let app = setup().await;
    let (token, _) = signup(&app, "Alex", "alex@x.com", "secret123").await;

    let response = app
        .server
        .post("/api/blogs")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Hi", "content": "Body" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["code"], "FORBIDDEN");
    assert_eq!(blog_count(&app.pool).await, 0);
}

#[tokio::test]
async fn create_blog_requires_token() {
    let app = setup().await;

    let response = app
        .server
        .post("/api/blogs")
        .json(&json!({ "title": "Hi", "content": "Body" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(blog_count(&app.pool).await, 0);
}

#[tokio::test]
async fn admin_blog_lifecycle() {
    let app = setup().await;
    let (admin, _) = signup(&app, "Dana", "admin@cloudapex.com", "secret123").await;
    let (student, _) = signup(&app, "Sam", "sam@x.com", "secret123").await;

    let created = app
        .server
        .post("/api/blogs")
        .authorization_bearer(&admin)
        .json(&json!({ "title": "Kubernetes 101", "content": "Pods first." }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let post: BlogPost = created.json();
    assert_eq!(post.author, "Dana");
    assert_eq!(post.category, "Insights");

    let second: BlogPost = app
        .server
        .post("/api/blogs")
        .authorization_bearer(&admin)
        .json(&json!({ "title": "Terraform", "content": "State files.", "category": "Cloud" }))
        .await
        .json();

    let listed: Vec<BlogPost> = app.server.get("/api/blogs").await.json();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, post.id);

    let forbidden = app
        .server
        .delete(&format!("/api/blogs/{}", post.id))
        .authorization_bearer(&student)
        .await;
    assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(blog_count(&app.pool).await, 2);

    let deleted = app
        .server
        .delete(&format!("/api/blogs/{}", post.id))
        .authorization_bearer(&admin)
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let missing = app
        .server
        .delete("/api/blogs/does-not-exist")
        .authorization_bearer(&admin)
        .await;
    assert_eq!(missing.status_code(), StatusCode::OK);
    assert_eq!(blog_count(&app.pool).await, 1);
}

// ============================================================================
// Forms
// ============================================================================

#[tokio::test]
async fn contact_form_accepted() {
    let app = setup().await;

    let response = app
        .server
        .post("/api/contact")
        .json(&json!({
            "name": "Sam",
            "email": "sam@x.com",
            "subject": "Scholarships",
            "message": "Do you offer any?"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert!(response.json::<Value>()["message"].is_string());
}

#[tokio::test]
async fn enrollment_validation() {
    let app = setup().await;

    let ok = app
        .server
        .post("/api/enrollments")
        .json(&json!({
            "fullName": "Priya Patel",
            "email": "priya@x.com",
            "phone": "555-0100",
            "track": "cloud-arch",
            "experience": "beginner",
            "motivation": "Career change"
        }))
        .await;
    assert_eq!(ok.status_code(), StatusCode::CREATED);

    let missing_name = app
        .server
        .post("/api/enrollments")
        .json(&json!({ "email": "priya@x.com" }))
        .await;
    assert_eq!(missing_name.status_code(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Frontend
// ============================================================================

#[tokio::test]
async fn static_files_and_spa_fallback() {
    let app = setup().await;

    let asset = app.server.get("/app.js").await;
    assert_eq!(asset.status_code(), StatusCode::OK);
    assert_eq!(asset.text(), "console.log('hi')");

    let route = app.server.get("/dashboard/profile").await;
    assert_eq!(route.status_code(), StatusCode::OK);
    assert_eq!(route.text(), "<html>CloudApex</html>");

    let unknown_api = app.server.get("/api/nothing-here").await;
    assert_eq!(unknown_api.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(unknown_api.json::<Value>()["code"], "NOT_FOUND");
}
