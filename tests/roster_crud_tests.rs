use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use student_portal::db::PortalStorage;
use student_portal::router::{PortalState, portal_router};
use student_portal::service::sessions_actor;

async fn spawn_app(tag: &str) -> (Router, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "portal-roster-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let storage = PortalStorage::connect(&database_url)
        .await
        .expect("storage connect failed");
    let handle = sessions_actor::spawn(storage.clone()).await;
    let app = portal_router(PortalState::new(handle, storage));
    (app, temp_path)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Sign up an account and return `(token, user_id)`.
async fn signup(app: &Router, name: &str, email: &str, role: &str) -> (String, i64) {
    let (status, body) = request(
        app,
        "POST",
        "/signup",
        None,
        Some(json!({"name": name, "email": email, "password": "secret1", "role": role})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    (
        body["token"].as_str().expect("token").to_string(),
        body["user"]["id"].as_i64().expect("user id"),
    )
}

fn record_body(name: &str, email: &str, course: &str, owner: i64) -> Value {
    json!({
        "name": name,
        "email": email,
        "course": course,
        "enrollmentDate": "2024-01-15",
        "ownerUserId": owner
    })
}

#[tokio::test]
async fn created_record_appears_exactly_once_in_list() {
    let (app, temp_path) = spawn_app("create-list").await;
    let (admin, _) = signup(&app, "Admin", "admin@x.com", "admin").await;

    let (status, created) = request(
        &app,
        "POST",
        "/students",
        Some(&admin),
        Some(record_body("John Student", "john@example.com", "MERN Bootcamp", 42)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["course"], "MERN Bootcamp");
    let id = created["id"].as_i64().expect("record id");

    let (status, list) = request(&app, "GET", "/students", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let matches = list
        .as_array()
        .expect("list is an array")
        .iter()
        .filter(|r| r["id"].as_i64() == Some(id))
        .count();
    assert_eq!(matches, 1);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn patch_updates_course_and_preserves_other_fields() {
    let (app, temp_path) = spawn_app("patch").await;
    let (admin, _) = signup(&app, "Admin", "admin@x.com", "admin").await;

    let (_, created) = request(
        &app,
        "POST",
        "/students",
        Some(&admin),
        Some(record_body("Jane Smith", "jane@example.com", "Full Stack Development", 3)),
    )
    .await;
    let id = created["id"].as_i64().expect("record id");

    let (status, patched) = request(
        &app,
        "PATCH",
        &format!("/students/{id}"),
        Some(&admin),
        Some(json!({"course": "Rust Systems"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["course"], "Rust Systems");

    let (status, fetched) = request(&app, "GET", "/students/owner/3", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["course"], "Rust Systems");
    assert_eq!(fetched["name"], "Jane Smith");
    assert_eq!(fetched["email"], "jane@example.com");
    assert_eq!(fetched["enrollmentDate"], "2024-01-15");
    assert_eq!(fetched["ownerUserId"], 3);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn delete_with_unknown_id_is_not_found_and_leaves_roster_unchanged() {
    let (app, temp_path) = spawn_app("delete-missing").await;
    let (admin, _) = signup(&app, "Admin", "admin@x.com", "admin").await;

    request(
        &app,
        "POST",
        "/students",
        Some(&admin),
        Some(record_body("John Student", "john@example.com", "MERN Bootcamp", 42)),
    )
    .await;

    let (status, body) = request(&app, "DELETE", "/students/999999", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (_, list) = request(&app, "GET", "/students", Some(&admin), None).await;
    assert_eq!(list.as_array().expect("list is an array").len(), 1);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn delete_removes_the_record() {
    let (app, temp_path) = spawn_app("delete").await;
    let (admin, _) = signup(&app, "Admin", "admin@x.com", "admin").await;

    let (_, created) = request(
        &app,
        "POST",
        "/students",
        Some(&admin),
        Some(record_body("John Student", "john@example.com", "MERN Bootcamp", 42)),
    )
    .await;
    let id = created["id"].as_i64().expect("record id");

    let (status, _) = request(&app, "DELETE", &format!("/students/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = request(&app, "GET", "/students", Some(&admin), None).await;
    assert!(list.as_array().expect("list is an array").is_empty());

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn owner_lookup_without_a_record_is_not_found() {
    let (app, temp_path) = spawn_app("owner-missing").await;
    let (admin, _) = signup(&app, "Admin", "admin@x.com", "admin").await;

    let (status, body) = request(&app, "GET", "/students/owner/9999", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn signing_up_a_student_creates_their_roster_record() {
    let (app, temp_path) = spawn_app("signup-record").await;
    let (token, user_id) = signup(&app, "Jane", "jane@x.com", "student").await;

    let (status, record) = request(
        &app,
        "GET",
        &format!("/students/owner/{user_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["course"], "Not Assigned");
    assert_eq!(record["email"], "jane@x.com");
    assert_eq!(record["ownerUserId"], user_id);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn student_role_cannot_read_or_mutate_the_roster() {
    let (app, temp_path) = spawn_app("student-forbidden").await;
    let (admin, _) = signup(&app, "Admin", "admin@x.com", "admin").await;
    let (student, student_id) = signup(&app, "Jane", "jane@x.com", "student").await;

    let (status, _) = request(&app, "GET", "/students", Some(&student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        "POST",
        "/students",
        Some(&student),
        Some(record_body("X", "x@example.com", "C", 0)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A student may not read someone else's record either.
    let (_, created) = request(
        &app,
        "POST",
        "/students",
        Some(&admin),
        Some(record_body("Bob", "bob@example.com", "React Masterclass", 77)),
    )
    .await;
    let other_id = created["id"].as_i64().expect("record id");

    let (status, _) = request(&app, "GET", "/students/owner/77", Some(&student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/students/{other_id}"),
        Some(&student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        "PATCH",
        &format!("/students/{other_id}"),
        Some(&student),
        Some(json!({"course": "Hijacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // But they may edit the record they own.
    let (_, own) = request(
        &app,
        "GET",
        &format!("/students/owner/{student_id}"),
        Some(&student),
        None,
    )
    .await;
    let own_id = own["id"].as_i64().expect("own record id");

    let (status, patched) = request(
        &app,
        "PATCH",
        &format!("/students/{own_id}"),
        Some(&student),
        Some(json!({"course": "Self-Paced Rust"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["course"], "Self-Paced Rust");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn roster_requires_a_session() {
    let (app, temp_path) = spawn_app("no-session").await;

    let (status, body) = request(&app, "GET", "/students", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let _ = fs::remove_file(&temp_path);
}
