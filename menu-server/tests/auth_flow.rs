mod common;

use common::{PASSWORD, TestApp};
use http::{Method, StatusCode};
use serde_json::json;
use shared::ErrorCode;
use shared::models::Role;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let reply = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["status"], "ok");
    assert!(reply.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_sign_up_sign_in_and_session() {
    let app = TestApp::new().await;

    let reply = app
        .call(
            Method::POST,
            "/api/auth/sign-up",
            None,
            Some(json!({"email": "Cook@Example.com", "password": "long-enough-pw"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());
    let session = reply.json();
    assert_eq!(session["profile"]["role"], "staff");
    assert_eq!(session["profile"]["email"], "cook@example.com");

    let reply = app
        .call(
            Method::POST,
            "/api/auth/sign-up",
            None,
            Some(json!({"email": "other@example.com", "password": "short"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.error_code(), Some(ErrorCode::ValidationFailed.code() as u64));

    let reply = app
        .call(
            Method::POST,
            "/api/auth/sign-in",
            None,
            Some(json!({"email": "cook@example.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        reply.error_code(),
        Some(ErrorCode::InvalidCredentials.code() as u64)
    );

    let reply = app
        .call(
            Method::POST,
            "/api/auth/sign-in",
            None,
            Some(json!({"email": "cook@example.com", "password": "long-enough-pw"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let token = reply.json()["accessToken"].as_str().unwrap().to_string();

    let reply = app.get("/api/auth/session", &token).await;
    assert_eq!(reply.json()["email"], "cook@example.com");
    assert_eq!(reply.json()["role"], "staff");
}

#[tokio::test]
async fn test_refresh_rotation_and_sign_out() {
    let app = TestApp::new().await;
    let session = app.account("cook@example.com", Role::Staff).await;

    let refresh = |token: String| {
        app.call(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({"refreshToken": token})),
        )
    };

    let reply = refresh(session.refresh_token.clone()).await;
    assert_eq!(reply.status, StatusCode::OK);
    let rotated = reply.json()["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, session.refresh_token);

    // The previous token is revoked by rotation
    let reply = refresh(session.refresh_token.clone()).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        reply.error_code(),
        Some(ErrorCode::RefreshTokenInvalid.code() as u64)
    );

    let reply = app
        .post("/api/auth/sign-out", &session.access_token, json!({}))
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = refresh(rotated).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_reject_bad_tokens() {
    let app = TestApp::new().await;

    let reply = app.call(Method::GET, "/api/auth/session", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.error_code(), Some(ErrorCode::NotAuthenticated.code() as u64));

    let reply = app.get("/api/auth/session", "garbage").await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.error_code(), Some(ErrorCode::TokenInvalid.code() as u64));
}

#[tokio::test]
async fn test_admin_password_reset() {
    let app = TestApp::new().await;
    let admin = app.account("boss@example.com", Role::Admin).await;
    let staff = app.account("cook@example.com", Role::Staff).await;

    let reply = app
        .post(
            &format!("/api/admin/profiles/{}/password-reset", staff.profile.id),
            &staff.access_token,
            json!({}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = app
        .post(
            &format!("/api/admin/profiles/{}/password-reset", staff.profile.id),
            &admin.access_token,
            json!({}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["email"], "cook@example.com");
    let code = app.mailer.last_code().unwrap();
    assert_eq!(code.len(), 6);

    let reset = |code: &str| {
        app.call(
            Method::POST,
            "/api/auth/reset-password",
            None,
            Some(json!({
                "email": "cook@example.com",
                "code": code,
                "newPassword": "brand-new-password"
            })),
        )
    };

    let wrong = if code == "000000" { "111111" } else { "000000" };
    let reply = reset(wrong).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.error_code(), Some(ErrorCode::ResetCodeInvalid.code() as u64));

    let reply = reset(&code).await;
    assert_eq!(reply.status, StatusCode::OK);

    // Old password no longer works, refresh tokens were revoked
    let reply = app
        .call(
            Method::POST,
            "/api/auth/sign-in",
            None,
            Some(json!({"email": "cook@example.com", "password": PASSWORD})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    let reply = app
        .call(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({"refreshToken": staff.refresh_token})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = app
        .call(
            Method::POST,
            "/api/auth/sign-in",
            None,
            Some(json!({"email": "cook@example.com", "password": "brand-new-password"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_profiles_and_roles() {
    let app = TestApp::new().await;
    let admin = app.account("boss@example.com", Role::Admin).await;
    let staff = app.account("anna@example.com", Role::Staff).await;

    let reply = app.get("/api/admin/profiles", &admin.access_token).await;
    let emails: Vec<String> = reply
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["email"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(emails, vec!["anna@example.com", "boss@example.com"]);

    let reply = app.get("/api/admin/profiles", &staff.access_token).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = app
        .call(
            Method::PUT,
            &format!("/api/admin/profiles/{}/role", staff.profile.id),
            Some(&admin.access_token),
            Some(json!({"role": "admin"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["role"], "admin");

    // The promoted user's old token now passes admin checks
    let reply = app.get("/api/admin/profiles", &staff.access_token).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app
        .call(
            Method::PUT,
            "/api/admin/profiles/missing/role",
            Some(&admin.access_token),
            Some(json!({"role": "staff"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_banner_override_is_used_by_generation() {
    let app = TestApp::new().await;
    let admin = app.account("boss@example.com", Role::Admin).await;

    let reply = app
        .call(
            Method::PUT,
            "/api/admin/banners/Thai",
            Some(&admin.access_token),
            Some(json!({"imageUrl": "not a url"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .call(
            Method::PUT,
            "/api/admin/banners/Thai",
            Some(&admin.access_token),
            Some(json!({"imageUrl": "https://cdn.example.com/thai.jpg"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app
        .post(
            "/api/menus/generate",
            &admin.access_token,
            json!({"eventType": "Dinner", "guestCount": 10, "cuisines": ["Thai"]}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.json()["menu"]["bannerUrl"],
        "https://cdn.example.com/thai.jpg"
    );
    // Empty library: no sections, still a valid menu
    assert_eq!(reply.json()["menu"]["sections"], json!([]));
}
