mod common;

use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

/// Sign up a user-role principal and return the parsed response body.
async fn signup(
    app: &TestApp,
    username: &str,
    email: &str,
    password: &str,
) -> serde_json::Value {
    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

/// Log in and return the raw response.
async fn login(app: &TestApp, email: &str, password: &str) -> reqwest::Response {
    app.post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn test_signup_success() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "alice", "a@x.com", "secret1").await;

    assert!(body["_id"].is_string());
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["role"], "user");
    assert!(!body["token"].as_str().unwrap().is_empty());

    // No credential-derived field ever leaves the service
    assert!(body.get("password").is_none());
    assert!(body.get("credentialHash").is_none());
    assert!(body.get("credential_hash").is_none());
}

#[tokio::test]
async fn test_signup_normalizes_email() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "alice", "Alice@EXAMPLE.Com", "secret1").await;

    assert_eq!(body["email"], "alice@example.com");
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = TestApp::spawn().await;

    signup(&app, "alice", "alice@example.com", "secret1").await;

    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "username": "alice2",
            "email": "alice@example.com",
            "password": "secret2"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("already exists"));
    assert!(body.get("token").is_none());

    // No second record was created
    let rejected = login(&app, "alice@example.com", "secret2").await;
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let app = TestApp::spawn().await;

    signup(&app, "alice", "alice@example.com", "secret1").await;

    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "secret2"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_validation_failures() {
    let app = TestApp::spawn().await;

    // Short username
    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "username": "al",
            "email": "a@x.com",
            "password": "secret1"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Invalid email
    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "username": "alice",
            "email": "not-an-email",
            "password": "secret1"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Short password
    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "username": "alice",
            "email": "a@x.com",
            "password": "five5"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown role
    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "username": "alice",
            "email": "a@x.com",
            "password": "secret1",
            "role": "superuser"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;

    signup(&app, "alice", "a@x.com", "secret1").await;

    let response = login(&app, "a@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "alice");
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = TestApp::spawn().await;

    signup(&app, "alice", "alice@example.com", "secret1").await;

    let wrong_password = login(&app, "alice@example.com", "wrong_password").await;
    let unknown_email = login(&app, "nobody@example.com", "secret1").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    // Identical body for both failure modes: nothing reveals which factor
    // failed
    let wrong_password_body: serde_json::Value =
        wrong_password.json().await.expect("Failed to parse response");
    let unknown_email_body: serde_json::Value =
        unknown_email.json().await.expect("Failed to parse response");
    assert_eq!(wrong_password_body, unknown_email_body);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "alice", "a@x.com", "secret1").await;
    let id = body["_id"].as_str().unwrap();

    // No Authorization header
    let response = app
        .get(&format!("/api/principals/{}", id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong scheme
    let response = app
        .get(&format!("/api/principals/{}", id))
        .header("Authorization", "Basic abc123")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Scheme marker is case-sensitive
    let token = body["token"].as_str().unwrap();
    let response = app
        .get(&format!("/api/principals/{}", id))
        .header("Authorization", format!("bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "alice", "a@x.com", "secret1").await;
    let id = body["_id"].as_str().unwrap();

    let response = app
        .get_authenticated(&format!("/api/principals/{}", id), "invalid.token.here")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "alice", "a@x.com", "secret1").await;
    let id = body["_id"].as_str().unwrap();
    let token = body["token"].as_str().unwrap();

    // Flip the last character of the signature
    let mut tampered = token.to_string();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let response = app
        .get_authenticated(&format!("/api/principals/{}", id), &tampered)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "alice", "a@x.com", "secret1").await;
    let id = body["_id"].as_str().unwrap();

    let expired = app
        .token_service
        .issue_at(id, Utc::now() - Duration::days(31))
        .expect("Failed to issue token");

    let response = app
        .get_authenticated(&format!("/api/principals/{}", id), &expired)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("expired"));
}

#[tokio::test]
async fn test_valid_token_for_deleted_principal_rejected() {
    let app = TestApp::spawn().await;

    app.seed_admin("root_admin", "admin@example.com", "admin_password")
        .await;
    let admin_login = login(&app, "admin@example.com", "admin_password").await;
    let admin_body: serde_json::Value =
        admin_login.json().await.expect("Failed to parse response");
    let admin_token = admin_body["token"].as_str().unwrap();

    let alice = signup(&app, "alice", "a@x.com", "secret1").await;
    let alice_id = alice["_id"].as_str().unwrap();
    let alice_token = alice["token"].as_str().unwrap();

    // Admin deletes alice; her still-valid signature must no longer grant
    // access
    let response = app
        .delete_authenticated(&format!("/api/principals/{}", alice_id), admin_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get_authenticated(&format!("/api/principals/{}", alice_id), alice_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("principal not found"));
}

#[tokio::test]
async fn test_delete_is_admin_only() {
    let app = TestApp::spawn().await;

    let alice = signup(&app, "alice", "a@x.com", "secret1").await;
    let bob = signup(&app, "bob", "b@x.com", "secret2").await;
    let alice_token = alice["token"].as_str().unwrap();
    let bob_id = bob["_id"].as_str().unwrap();

    // A user-role token is authenticated but not authorized
    let response = app
        .delete_authenticated(&format!("/api/principals/{}", bob_id), alice_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Without any token the authentication gate rejects first
    let response = app
        .api_client
        .delete(format!("{}/api/principals/{}", app.address, bob_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_signup_requires_admin_caller() {
    let app = TestApp::spawn().await;

    // Anonymous callers cannot self-assign admin
    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "username": "mallory",
            "email": "mallory@example.com",
            "password": "secret1",
            "role": "admin"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Neither can a user-role caller
    let alice = signup(&app, "alice", "a@x.com", "secret1").await;
    let alice_token = alice["token"].as_str().unwrap();
    let response = app
        .post("/api/auth/signup")
        .bearer_auth(alice_token)
        .json(&json!({
            "username": "mallory",
            "email": "mallory@example.com",
            "password": "secret1",
            "role": "admin"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An admin can grant the role
    app.seed_admin("root_admin", "admin@example.com", "admin_password")
        .await;
    let admin_login = login(&app, "admin@example.com", "admin_password").await;
    let admin_body: serde_json::Value =
        admin_login.json().await.expect("Failed to parse response");
    let admin_token = admin_body["token"].as_str().unwrap();

    let response = app
        .post("/api/auth/signup")
        .bearer_auth(admin_token)
        .json(&json!({
            "username": "second_admin",
            "email": "second@example.com",
            "password": "secret1",
            "role": "admin"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn test_get_principal() {
    let app = TestApp::spawn().await;

    let alice = signup(&app, "alice", "a@x.com", "secret1").await;
    let id = alice["_id"].as_str().unwrap();
    let token = alice["token"].as_str().unwrap();

    let response = app
        .get_authenticated(&format!("/api/principals/{}", id), token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["_id"], id);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "user");
    assert!(body["createdAt"].is_string());
    assert!(body.get("password").is_none());

    // Unknown but well-formed id
    let response = app
        .get_authenticated(
            &format!("/api/principals/{}", uuid::Uuid::new_v4()),
            token,
        )
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Malformed id
    let response = app
        .get_authenticated("/api/principals/not-a-uuid", token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_self() {
    let app = TestApp::spawn().await;

    let alice = signup(&app, "alice", "a@x.com", "secret1").await;
    let id = alice["_id"].as_str().unwrap();
    let token = alice["token"].as_str().unwrap();

    let response = app
        .patch_authenticated(&format!("/api/principals/{}", id), token)
        .json(&json!({ "username": "alice_renamed" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "alice_renamed");
}

#[tokio::test]
async fn test_update_password_rotates_credential() {
    let app = TestApp::spawn().await;

    let alice = signup(&app, "alice", "a@x.com", "secret1").await;
    let id = alice["_id"].as_str().unwrap();
    let token = alice["token"].as_str().unwrap();

    let response = app
        .patch_authenticated(&format!("/api/principals/{}", id), token)
        .json(&json!({ "password": "new_secret" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    // Old credential no longer works, new one does
    assert_eq!(
        login(&app, "a@x.com", "secret1").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        login(&app, "a@x.com", "new_secret").await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_update_other_is_admin_only() {
    let app = TestApp::spawn().await;

    let alice = signup(&app, "alice", "a@x.com", "secret1").await;
    let bob = signup(&app, "bob", "b@x.com", "secret2").await;
    let alice_token = alice["token"].as_str().unwrap();
    let bob_id = bob["_id"].as_str().unwrap();

    let response = app
        .patch_authenticated(&format!("/api/principals/{}", bob_id), alice_token)
        .json(&json!({ "username": "bob_renamed" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An admin may update anyone
    app.seed_admin("root_admin", "admin@example.com", "admin_password")
        .await;
    let admin_login = login(&app, "admin@example.com", "admin_password").await;
    let admin_body: serde_json::Value =
        admin_login.json().await.expect("Failed to parse response");
    let admin_token = admin_body["token"].as_str().unwrap();

    let response = app
        .patch_authenticated(&format!("/api/principals/{}", bob_id), admin_token)
        .json(&json!({ "username": "bob_renamed" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_workflow() {
    let app = TestApp::spawn().await;

    // 1. Signup
    let alice = signup(&app, "alice", "a@x.com", "secret1").await;
    let id = alice["_id"].as_str().unwrap().to_string();
    assert!(!alice["token"].as_str().unwrap().is_empty());

    // 2. Login with the same credentials
    let response = login(&app, "a@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().unwrap().to_string();

    // 3. Access a protected endpoint
    let response = app
        .get_authenticated(&format!("/api/principals/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    // 4. An admin-only operation with a user token fails with 403
    let response = app
        .delete_authenticated(&format!("/api/principals/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // 5. An invalid token fails with 401
    let response = app
        .get_authenticated(&format!("/api/principals/{}", id), "invalid")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
