//! Outgoing mail
//!
//! Password reset codes are delivered through [`Mailer`]. The default
//! [`LogMailer`] writes the delivery to the log instead of sending it.

use async_trait::async_trait;

use crate::BoxError;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset_code(
        &self,
        to: &str,
        code: &str,
        valid_minutes: i64,
    ) -> Result<(), BoxError>;
}

/// Logs deliveries; used when no mail transport is configured
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset_code(
        &self,
        to: &str,
        code: &str,
        valid_minutes: i64,
    ) -> Result<(), BoxError> {
        let body = format!(
            "Your password reset code is: {code}\nValid for {valid_minutes} minutes."
        );
        tracing::info!(to = to, body = %body, "Password reset code sent");
        Ok(())
    }
}
