//! Accounts, sessions and password resets

use shared::client::{AuthSession, PasswordResetIssued, ResetPasswordRequest};
use shared::error::{AppError, ErrorCode};
use shared::models::{Profile, Role};
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::auth::{generate_code, hash_password, verify_password};
use crate::db::{self, RepoError};
use crate::error::{ServiceError, ServiceResult};
use crate::security_log;
use crate::state::AppState;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const RESET_CODE_TTL_MINUTES: i64 = 15;
pub const MAX_RESET_ATTEMPTS: i64 = 3;

fn hash(password: &str) -> ServiceResult<String> {
    hash_password(password).map_err(|e| ServiceError::Db(e.to_string().into()))
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create an account with its profile
pub async fn register(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    role: Role,
) -> ServiceResult<Profile> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort).into());
    }
    let hashed = hash(password)?;
    match db::users::create_with_profile(pool, &normalize_email(email), &hashed, role).await {
        Ok(profile) => {
            tracing::info!(user_id = %profile.id, role = %profile.role, "Account created");
            Ok(profile)
        }
        Err(RepoError::Duplicate(msg)) => {
            Err(AppError::with_message(ErrorCode::EmailAlreadyRegistered, msg).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Make sure `email` can administer the system
///
/// An existing account is promoted and keeps its password; otherwise an
/// admin account is created with `password`.
pub async fn bootstrap_admin(pool: &SqlitePool, email: &str, password: &str) -> ServiceResult<Profile> {
    let email = normalize_email(email);
    if let Some(user) = db::users::find_by_email(pool, &email).await? {
        let profile = db::profiles::set_role(pool, &user.id, Role::Admin)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
        security_log!(INFO, "admin_bootstrap", user_id = profile.id.as_str(), created = false);
        return Ok(profile);
    }

    let profile = register(pool, &email, password, Role::Admin).await?;
    security_log!(INFO, "admin_bootstrap", user_id = profile.id.as_str(), created = true);
    Ok(profile)
}

/// Stored profile; an account without one reads as staff
pub async fn profile_of(pool: &SqlitePool, user_id: &str, email: &str) -> ServiceResult<Profile> {
    Ok(db::profiles::find_by_id(pool, user_id)
        .await?
        .unwrap_or_else(|| Profile {
            id: user_id.to_string(),
            email: email.to_string(),
            role: Role::Staff,
        }))
}

/// Access token for an existing refresh token
pub async fn issue_access(
    state: &AppState,
    user_id: &str,
    email: &str,
    refresh_token: String,
) -> ServiceResult<AuthSession> {
    let profile = profile_of(&state.pool, user_id, email).await?;
    let issued = state
        .jwt
        .generate_token(user_id, email, profile.role)
        .map_err(|e| ServiceError::Db(e.to_string().into()))?;

    Ok(AuthSession {
        access_token: issued.token,
        refresh_token,
        expires_at: issued.expires_at,
        profile,
    })
}

/// New access and refresh token pair
pub async fn issue_session(state: &AppState, user_id: &str, email: &str) -> ServiceResult<AuthSession> {
    let refresh =
        db::refresh_tokens::create(&state.pool, user_id, state.config.refresh_token_days).await?;
    issue_access(state, user_id, email, refresh).await
}

/// Verify credentials; unknown email and wrong password are indistinguishable
pub async fn sign_in(state: &AppState, email: &str, password: &str) -> ServiceResult<AuthSession> {
    let email = normalize_email(email);
    let user = db::users::find_by_email(&state.pool, &email).await?;

    let Some(user) = user.filter(|u| verify_password(password, &u.password_hash)) else {
        security_log!(WARN, "sign_in_failed", email = email.as_str());
        return Err(AppError::invalid_credentials().into());
    };

    security_log!(INFO, "sign_in", user_id = user.id.as_str());
    issue_session(state, &user.id, &user.email).await
}

/// Rotate a refresh token
pub async fn refresh(state: &AppState, refresh_token: &str) -> ServiceResult<AuthSession> {
    let invalid = || ServiceError::App(AppError::new(ErrorCode::RefreshTokenInvalid));

    let (user_id, rotated) =
        db::refresh_tokens::rotate(&state.pool, refresh_token, state.config.refresh_token_days)
            .await?
            .ok_or_else(invalid)?;
    let user = db::users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or_else(invalid)?;

    issue_access(state, &user.id, &user.email, rotated).await
}

/// Issue a reset code for a user and hand it to the mailer
pub async fn issue_password_reset(state: &AppState, user_id: &str) -> ServiceResult<PasswordResetIssued> {
    let user = db::users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let code = generate_code();
    let expires_at = now_millis() + RESET_CODE_TTL_MINUTES * 60 * 1000;
    db::password_resets::upsert(&state.pool, &user.email, &hash(&code)?, expires_at).await?;

    if let Err(e) = state
        .mailer
        .send_password_reset_code(&user.email, &code, RESET_CODE_TTL_MINUTES)
        .await
    {
        tracing::error!(email = %user.email, error = %e, "Password reset delivery failed");
        return Err(AppError::new(ErrorCode::MailDeliveryFailed).into());
    }

    Ok(PasswordResetIssued {
        email: user.email,
        expires_at,
    })
}

/// Consume a reset code and set the new password
///
/// At most [`MAX_RESET_ATTEMPTS`] verifications per issued code. Success
/// revokes every refresh token of the account.
pub async fn reset_password(pool: &SqlitePool, req: &ResetPasswordRequest) -> ServiceResult<()> {
    let email = normalize_email(&req.email);

    if req.new_password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort).into());
    }

    let record = db::password_resets::find(pool, &email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ResetCodeInvalid))?;

    if now_millis() > record.expires_at {
        return Err(AppError::new(ErrorCode::ResetCodeExpired).into());
    }
    if record.attempts >= MAX_RESET_ATTEMPTS {
        security_log!(WARN, "reset_attempts_exceeded", email = email.as_str());
        return Err(AppError::new(ErrorCode::TooManyAttempts).into());
    }

    db::password_resets::increment_attempts(pool, &email).await?;

    if !verify_password(&req.code, &record.code_hash) {
        security_log!(WARN, "reset_code_invalid", email = email.as_str());
        return Err(AppError::new(ErrorCode::ResetCodeInvalid).into());
    }

    let user = db::users::find_by_email(pool, &email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    db::users::update_password(pool, &user.id, &hash(&req.new_password)?).await?;
    db::password_resets::delete(pool, &email).await?;
    db::refresh_tokens::revoke_all(pool, &user.id).await?;

    security_log!(INFO, "password_reset", user_id = user.id.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::mail::Mailer;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingMailer {
        codes: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_password_reset_code(
            &self,
            to: &str,
            code: &str,
            _valid_minutes: i64,
        ) -> Result<(), crate::BoxError> {
            self.codes
                .lock()
                .unwrap()
                .push((to.to_string(), code.to_string()));
            Ok(())
        }
    }

    async fn state(mailer: Arc<RecordingMailer>) -> AppState {
        let pool = crate::db::test_pool().await;
        AppState::new(pool, Config::for_tests(), mailer)
    }

    #[tokio::test]
    async fn test_register_sign_in_and_refresh() {
        let state = state(Arc::default()).await;
        let profile = register(&state.pool, " Chef@Example.com ", "password1", Role::Staff)
            .await
            .unwrap();
        assert_eq!(profile.email, "chef@example.com");

        let err: AppError = register(&state.pool, "chef@example.com", "password2", Role::Staff)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::EmailAlreadyRegistered);

        let session = sign_in(&state, "CHEF@example.com", "password1").await.unwrap();
        assert_eq!(session.profile.role, Role::Staff);
        assert!(state.jwt.validate_token(&session.access_token).is_ok());

        let err: AppError = sign_in(&state, "chef@example.com", "wrong-password")
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);

        let rotated = refresh(&state, &session.refresh_token).await.unwrap();
        assert_ne!(rotated.refresh_token, session.refresh_token);
        let err: AppError = refresh(&state, &session.refresh_token).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::RefreshTokenInvalid);
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let mailer = Arc::new(RecordingMailer::default());
        let state = state(mailer.clone()).await;
        let profile = register(&state.pool, "staff@example.com", "password1", Role::Staff)
            .await
            .unwrap();
        let session = issue_session(&state, &profile.id, &profile.email).await.unwrap();

        let issued = issue_password_reset(&state, &profile.id).await.unwrap();
        assert_eq!(issued.email, "staff@example.com");
        let (to, code) = mailer.codes.lock().unwrap()[0].clone();
        assert_eq!(to, "staff@example.com");

        let wrong = ResetPasswordRequest {
            email: "staff@example.com".to_string(),
            code: if code == "123456" { "654321" } else { "123456" }.to_string(),
            new_password: "new-password".to_string(),
        };
        let err: AppError = reset_password(&state.pool, &wrong).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::ResetCodeInvalid);

        let right = ResetPasswordRequest {
            code,
            ..wrong.clone()
        };
        reset_password(&state.pool, &right).await.unwrap();

        assert!(sign_in(&state, "staff@example.com", "new-password").await.is_ok());
        assert!(refresh(&state, &session.refresh_token).await.is_err());
        // Code is single-use
        assert!(reset_password(&state.pool, &right).await.is_err());
    }

    #[tokio::test]
    async fn test_reset_attempts_are_limited() {
        let mailer = Arc::new(RecordingMailer::default());
        let state = state(mailer.clone()).await;
        let profile = register(&state.pool, "staff@example.com", "password1", Role::Staff)
            .await
            .unwrap();
        issue_password_reset(&state, &profile.id).await.unwrap();
        let code = mailer.codes.lock().unwrap()[0].1.clone();

        let wrong = ResetPasswordRequest {
            email: "staff@example.com".to_string(),
            code: if code == "123456" { "654321" } else { "123456" }.to_string(),
            new_password: "new-password".to_string(),
        };
        for _ in 0..MAX_RESET_ATTEMPTS {
            assert!(reset_password(&state.pool, &wrong).await.is_err());
        }
        let right = ResetPasswordRequest { code, ..wrong };
        let err: AppError = reset_password(&state.pool, &right).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::TooManyAttempts);
    }

    #[tokio::test]
    async fn test_bootstrap_admin_creates_or_promotes() {
        let state = state(Arc::default()).await;

        let created = bootstrap_admin(&state.pool, "Owner@Example.com", "password1")
            .await
            .unwrap();
        assert_eq!(created.email, "owner@example.com");
        assert_eq!(created.role, Role::Admin);
        sign_in(&state, "owner@example.com", "password1").await.unwrap();

        // Running again is harmless and keeps the account
        let again = bootstrap_admin(&state.pool, "owner@example.com", "other-password")
            .await
            .unwrap();
        assert_eq!(again.id, created.id);
        sign_in(&state, "owner@example.com", "password1").await.unwrap();

        let staff = register(&state.pool, "cook@example.com", "password1", Role::Staff)
            .await
            .unwrap();
        let promoted = bootstrap_admin(&state.pool, "cook@example.com", "ignored1")
            .await
            .unwrap();
        assert_eq!(promoted.id, staff.id);
        assert_eq!(promoted.role, Role::Admin);

        let err: AppError = bootstrap_admin(&state.pool, "new@example.com", "short")
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::PasswordTooShort);
    }

    #[tokio::test]
    async fn test_reset_for_unknown_user() {
        let state = state(Arc::default()).await;
        let err: AppError = issue_password_reset(&state, "nobody").await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }
}
