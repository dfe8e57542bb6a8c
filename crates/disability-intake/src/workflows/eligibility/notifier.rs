use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tracing::{error, info, instrument, warn};

use super::domain::LeadSubmission;
use crate::config::NotificationConfig;

/// Outbound hook that hands a captured lead to the people doing follow-up.
#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn notify(&self, submission: &LeadSubmission) -> Result<(), NotifyError>;
}

/// Lead delivery error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("lead notification transport unavailable: {0}")]
    Transport(String),
    #[error("lead notification rejected with HTTP {status}")]
    Rejected { status: u16 },
}

/// Posts the lead payload as JSON to a webhook (Make, Zapier, or similar).
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LeadNotifier for WebhookNotifier {
    #[instrument(level = "info", skip_all, fields(path = submission.result.path.as_str()))]
    async fn notify(&self, submission: &LeadSubmission) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .header(USER_AGENT, concat!("disability-intake/", env!("CARGO_PKG_VERSION")))
            .header(CONTENT_TYPE, "application/json")
            .json(submission)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "lead webhook request failed");
                NotifyError::Transport(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "lead webhook rejected payload");
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }

        info!(status = status.as_u16(), "lead webhook delivered");
        Ok(())
    }
}

/// Accepts every lead without delivering it; used when no webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl LeadNotifier for DisabledNotifier {
    async fn notify(&self, submission: &LeadSubmission) -> Result<(), NotifyError> {
        warn!(
            path = submission.result.path.as_str(),
            "LEAD_WEBHOOK_URL is not set; lead was not forwarded"
        );
        Ok(())
    }
}

/// Notifier selected from configuration at startup.
#[derive(Debug, Clone)]
pub enum ConfiguredNotifier {
    Webhook(WebhookNotifier),
    Disabled(DisabledNotifier),
}

impl ConfiguredNotifier {
    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotifyError> {
        match &config.webhook_url {
            Some(url) => {
                let notifier = WebhookNotifier::new(url.clone(), config.timeout)?;
                info!(timeout_secs = config.timeout.as_secs(), "lead webhook enabled");
                Ok(Self::Webhook(notifier))
            }
            None => {
                error!("LEAD_WEBHOOK_URL is not set; leads will be acknowledged but not delivered");
                Ok(Self::Disabled(DisabledNotifier))
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Webhook(_))
    }
}

#[async_trait]
impl LeadNotifier for ConfiguredNotifier {
    async fn notify(&self, submission: &LeadSubmission) -> Result<(), NotifyError> {
        match self {
            Self::Webhook(notifier) => notifier.notify(submission).await,
            Self::Disabled(notifier) => notifier.notify(submission).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_webhook_url_selects_disabled_notifier() {
        let notifier =
            ConfiguredNotifier::from_config(&NotificationConfig::default()).expect("builds");
        assert!(!notifier.is_enabled());
    }

    #[test]
    fn configured_webhook_url_selects_webhook_notifier() {
        let config = NotificationConfig {
            webhook_url: Some("https://hooks.example.com/leads".to_string()),
            timeout: Duration::from_secs(2),
        };

        match ConfiguredNotifier::from_config(&config).expect("builds") {
            ConfiguredNotifier::Webhook(notifier) => {
                assert_eq!(notifier.url(), "https://hooks.example.com/leads")
            }
            other => panic!("expected webhook notifier, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_webhook_reports_transport_error() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/leads", Duration::from_secs(2))
            .expect("client builds");
        let submission = crate::workflows::eligibility::tests::common::submission();

        match notifier.notify(&submission).await {
            Err(NotifyError::Transport(_)) => {}
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
