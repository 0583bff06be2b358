//! Session lifecycle
//!
//! An [`AuthContext`] is acquired by signing in, passed explicitly to every
//! authenticated call, refreshed when its access token is about to expire
//! and consumed by [`AuthContext::sign_out`].

use shared::client::{AuthSession, Credentials, RefreshRequest, SuccessResponse};
use shared::models::Profile;

use crate::{ClientResult, HttpClient};

#[derive(Debug, Clone)]
pub struct AuthContext {
    session: AuthSession,
    leeway_secs: i64,
}

impl AuthContext {
    /// Wrap a session returned by sign-in or sign-up
    pub fn new(session: AuthSession, leeway_secs: i64) -> Self {
        Self {
            session,
            leeway_secs,
        }
    }

    pub async fn sign_in(
        http: &HttpClient,
        email: &str,
        password: &str,
        leeway_secs: i64,
    ) -> ClientResult<Self> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session: AuthSession = http.post("/api/auth/sign-in", None, &credentials).await?;
        tracing::info!(user_id = %session.profile.id, "Signed in");
        Ok(Self::new(session, leeway_secs))
    }

    pub fn profile(&self) -> &Profile {
        &self.session.profile
    }

    pub fn user_id(&self) -> &str {
        &self.session.profile.id
    }

    pub fn expires_at(&self) -> i64 {
        self.session.expires_at
    }

    /// Whether the access token expires within the leeway at `now` (unix seconds)
    pub fn needs_refresh(&self, now: i64) -> bool {
        self.session.expires_at - now <= self.leeway_secs
    }

    /// Rotate the refresh token and take the new access token
    pub async fn refresh(&mut self, http: &HttpClient) -> ClientResult<()> {
        let request = RefreshRequest {
            refresh_token: self.session.refresh_token.clone(),
        };
        self.session = http.post("/api/auth/refresh", None, &request).await?;
        tracing::debug!(expires_at = self.session.expires_at, "Access token refreshed");
        Ok(())
    }

    /// Current access token, refreshed first when close to expiry
    pub async fn access_token(&mut self, http: &HttpClient) -> ClientResult<String> {
        if self.needs_refresh(chrono::Utc::now().timestamp()) {
            self.refresh(http).await?;
        }
        Ok(self.session.access_token.clone())
    }

    /// Revoke every refresh token of the account and end the session
    pub async fn sign_out(mut self, http: &HttpClient) -> ClientResult<()> {
        let token = self.access_token(http).await?;
        let _: SuccessResponse = http.post_empty("/api/auth/sign-out", Some(&token)).await?;
        tracing::info!(user_id = %self.session.profile.id, "Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;

    fn context(expires_at: i64) -> AuthContext {
        AuthContext::new(
            AuthSession {
                access_token: "access".to_string(),
                refresh_token: "refresh".to_string(),
                expires_at,
                profile: Profile {
                    id: "u-1".to_string(),
                    email: "cook@example.com".to_string(),
                    role: Role::Staff,
                },
            },
            60,
        )
    }

    #[test]
    fn test_refresh_window() {
        let ctx = context(1_000);
        assert!(!ctx.needs_refresh(900));
        assert!(ctx.needs_refresh(940));
        assert!(ctx.needs_refresh(2_000));
        assert_eq!(ctx.user_id(), "u-1");
    }
}
