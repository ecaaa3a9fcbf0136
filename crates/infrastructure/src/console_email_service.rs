//! Development email service that prints messages to the log instead of
//! delivering them.

use async_trait::async_trait;
use tracing::info;

use anteroom_application::EmailService;
use anteroom_core::AppResult;

/// Email service that logs outgoing messages. Default for local development.
#[derive(Clone, Default)]
pub struct ConsoleEmailService;

impl ConsoleEmailService {
    /// Creates a console email service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailService for ConsoleEmailService {
    async fn send_email(&self, to: &str, subject: &str, text_body: &str) -> AppResult<()> {
        info!(%to, %subject, "console email service delivery");
        info!("{text_body}");
        Ok(())
    }
}
