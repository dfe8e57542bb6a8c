use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tracing::{info, instrument, warn};

use super::domain::{ClassificationResult, LeadReceipt, LeadSubmission};
use super::flow::{Advance, ClassificationRequest, LeadSubmitBlocked, QuizSession};
use super::notifier::LeadNotifier;
use super::service::{EligibilityIntakeService, LeadServiceError};

/// Collaborators a quiz session talks to once answers or a lead are ready.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, QuizBackendError>;

    async fn submit_lead(&self, submission: &LeadSubmission)
        -> Result<LeadReceipt, QuizBackendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum QuizBackendError {
    #[error(transparent)]
    Intake(#[from] LeadServiceError),
    #[error("intake API unavailable: {0}")]
    Transport(String),
    #[error("intake API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Backend that calls an intake service living in the same process.
pub struct InProcessBackend<N> {
    service: Arc<EligibilityIntakeService<N>>,
}

impl<N> InProcessBackend<N>
where
    N: LeadNotifier + 'static,
{
    pub fn new(service: Arc<EligibilityIntakeService<N>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<N> QuizBackend for InProcessBackend<N>
where
    N: LeadNotifier + 'static,
{
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, QuizBackendError> {
        Ok(self.service.classify(&request.answers))
    }

    async fn submit_lead(
        &self,
        submission: &LeadSubmission,
    ) -> Result<LeadReceipt, QuizBackendError> {
        Ok(self.service.submit_lead(submission.clone()).await?)
    }
}

/// Backend that talks to a running intake API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpQuizBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuizBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, QuizBackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| QuizBackendError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, QuizBackendError>
    where
        B: serde::Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, concat!("disability-intake/", env!("CARGO_PKG_VERSION")))
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| QuizBackendError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuizBackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| QuizBackendError::Transport(err.to_string()))
    }
}

#[async_trait]
impl QuizBackend for HttpQuizBackend {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, QuizBackendError> {
        self.post_json("/api/v1/classify", request).await
    }

    async fn submit_lead(
        &self,
        submission: &LeadSubmission,
    ) -> Result<LeadReceipt, QuizBackendError> {
        self.post_json("/api/v1/leads", submission).await
    }
}

/// Result of driving a step of the flow against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    Blocked,
    Moved { step: usize },
    Classified(ClassificationResult),
}

/// Outcome of a lead submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadOutcome {
    Captured(LeadReceipt),
    Blocked(LeadSubmitBlocked),
}

/// A quiz session bound to the collaborators that resolve its requests.
pub struct QuizFlow<B> {
    session: QuizSession,
    backend: B,
}

impl<B> QuizFlow<B>
where
    B: QuizBackend,
{
    pub fn new(backend: B) -> Self {
        Self::with_session(QuizSession::new(), backend)
    }

    pub fn with_session(session: QuizSession, backend: B) -> Self {
        Self { session, backend }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut QuizSession {
        &mut self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[instrument(level = "debug", skip(self), fields(step = self.session.step()))]
    pub async fn advance(&mut self) -> Result<FlowStep, QuizBackendError> {
        match self.session.advance() {
            Advance::Blocked => Ok(FlowStep::Blocked),
            Advance::Moved { step } => Ok(FlowStep::Moved { step }),
            Advance::Classify(request) => {
                let outcome = self.backend.classify(&request).await;
                if let Err(err) = &outcome {
                    warn!(error = %err, "classification failed; user may retry");
                }
                self.session.complete_classification(outcome)?;
                match self.session.result() {
                    Some(result) => Ok(FlowStep::Classified(result.clone())),
                    None => Ok(FlowStep::Blocked),
                }
            }
        }
    }

    pub fn retreat(&mut self) -> bool {
        self.session.retreat()
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn submit_lead(&mut self) -> Result<LeadOutcome, QuizBackendError> {
        let submission = match self.session.begin_lead_submission() {
            Ok(submission) => submission,
            Err(blocked) => return Ok(LeadOutcome::Blocked(blocked)),
        };

        let outcome = self.backend.submit_lead(&submission).await;
        if let Err(err) = &outcome {
            warn!(error = %err, "lead submission failed; user may retry");
        }
        let receipt = self.session.complete_lead_submission(outcome)?;
        info!(lead_id = %receipt.lead_id.0, "lead captured");
        Ok(LeadOutcome::Captured(receipt))
    }
}
