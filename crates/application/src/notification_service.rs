//! Approver notification for newly submitted access requests.
//!
//! The email carries the one-click action links that form the out-of-band
//! approval channel: links target the frontend action page, which posts the
//! decision to the unauthenticated action endpoints.

use std::sync::Arc;

use async_trait::async_trait;

use anteroom_core::AppResult;
use anteroom_domain::AccessRequest;

/// Port for outbound email delivery.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends a plain-text email.
    async fn send_email(&self, to: &str, subject: &str, text_body: &str) -> AppResult<()>;
}

/// Port for notifying the approver about workflow events.
#[async_trait]
pub trait AccessNotifier: Send + Sync {
    /// Notifies the approver that a new request awaits a decision.
    async fn notify_request_submitted(&self, request: &AccessRequest) -> AppResult<()>;
}

/// Email-backed approver notification service.
#[derive(Clone)]
pub struct AccessNotificationService {
    email_service: Arc<dyn EmailService>,
    approver_email: String,
    frontend_url: String,
}

impl AccessNotificationService {
    /// Creates a notification service from required dependencies.
    #[must_use]
    pub fn new(
        email_service: Arc<dyn EmailService>,
        approver_email: impl Into<String>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            email_service,
            approver_email: approver_email.into(),
            frontend_url: frontend_url.into(),
        }
    }

    fn action_link(&self, request: &AccessRequest, action: &str, access_type: Option<&str>) -> String {
        let mut link = format!(
            "{}/access/action?request_id={}&action={action}",
            self.frontend_url, request.id
        );
        if let Some(access_type) = access_type {
            link.push_str("&access_type=");
            link.push_str(access_type);
        }
        link
    }
}

#[async_trait]
impl AccessNotifier for AccessNotificationService {
    async fn notify_request_submitted(&self, request: &AccessRequest) -> AppResult<()> {
        let subject = format!("New access request from {}", request.name);

        let reason = request.reason.as_deref().unwrap_or("not specified");
        let approve_permanent = self.action_link(request, "approve", Some("permanent"));
        let approve_temporary = self.action_link(request, "approve", Some("temporary"));
        let deny = self.action_link(request, "deny", None);

        let text_body = format!(
            "A new visitor is asking for access to the application.\n\n\
             Name:   {}\n\
             Email:  {}\n\
             Reason: {reason}\n\n\
             Choose an action (applied immediately):\n\n\
             Grant permanent access:\n{approve_permanent}\n\n\
             Grant temporary access:\n{approve_temporary}\n\n\
             Deny the request:\n{deny}\n",
            request.name, request.email
        );

        self.email_service
            .send_email(&self.approver_email, &subject, &text_body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;

    use anteroom_core::AppResult;
    use anteroom_domain::{AccessRequest, RequestId, RequestStatus};

    use super::{AccessNotificationService, AccessNotifier, EmailService};

    #[derive(Default)]
    struct CapturingEmailService {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl EmailService for CapturingEmailService {
        async fn send_email(&self, to: &str, subject: &str, text_body: &str) -> AppResult<()> {
            self.sent.lock().await.push((
                to.to_owned(),
                subject.to_owned(),
                text_body.to_owned(),
            ));
            Ok(())
        }
    }

    fn request() -> AccessRequest {
        AccessRequest {
            id: RequestId::new(),
            name: "Visitor".to_owned(),
            email: "visitor@example.com".to_owned(),
            reason: Some("demo".to_owned()),
            status: RequestStatus::Pending,
            access_type: None,
            ip_address: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn notification_goes_to_the_approver() {
        let email_service = Arc::new(CapturingEmailService::default());
        let notifier = AccessNotificationService::new(
            email_service.clone(),
            "approver@example.com",
            "https://app.example.com",
        );

        let result = notifier.notify_request_submitted(&request()).await;
        assert!(result.is_ok());

        let sent = email_service.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "approver@example.com");
    }

    #[tokio::test]
    async fn notification_carries_all_three_action_links() {
        let email_service = Arc::new(CapturingEmailService::default());
        let notifier = AccessNotificationService::new(
            email_service.clone(),
            "approver@example.com",
            "https://app.example.com",
        );

        let request = request();
        let result = notifier.notify_request_submitted(&request).await;
        assert!(result.is_ok());

        let sent = email_service.sent.lock().await;
        let body = sent.first().map(|(_, _, body)| body.clone()).unwrap_or_default();
        let base = format!(
            "https://app.example.com/access/action?request_id={}",
            request.id
        );
        assert!(body.contains(&format!("{base}&action=approve&access_type=permanent")));
        assert!(body.contains(&format!("{base}&action=approve&access_type=temporary")));
        assert!(body.contains(&format!("{base}&action=deny")));
    }
}
