use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::domain::{ClassificationResult, LeadId, LeadReceipt, LeadSubmission};
use super::evaluation::{EligibilityAssessment, EligibilityScorer};
use super::notifier::{LeadNotifier, NotifyError};
use super::questionnaire::{self, AnswerSet, Question};
use super::validation::{LeadGuard, LeadViolation};

/// Service composing the scorer, the lead guard, and the notification hook.
pub struct EligibilityIntakeService<N> {
    scorer: EligibilityScorer,
    guard: Arc<LeadGuard>,
    notifier: Arc<N>,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

impl<N> EligibilityIntakeService<N>
where
    N: LeadNotifier + 'static,
{
    pub fn new(notifier: Arc<N>) -> Self {
        Self::with_guard(LeadGuard::default(), notifier)
    }

    pub fn with_guard(guard: LeadGuard, notifier: Arc<N>) -> Self {
        Self {
            scorer: EligibilityScorer::new(),
            guard: Arc::new(guard),
            notifier,
        }
    }

    pub fn guard(&self) -> &LeadGuard {
        &self.guard
    }

    pub fn questions(&self) -> &'static [Question] {
        questionnaire::questions()
    }

    /// Score an answer set. Incomplete sets are scored as-is.
    #[instrument(level = "debug", skip_all, fields(answered = answers.len()))]
    pub fn classify(&self, answers: &AnswerSet) -> ClassificationResult {
        self.assess(answers).result
    }

    pub fn assess(&self, answers: &AnswerSet) -> EligibilityAssessment {
        let assessment = self.scorer.assess(answers);
        debug!(
            path = assessment.result.path.as_str(),
            total_score = assessment.total_score,
            "answers classified"
        );
        assessment
    }

    /// Validate a lead and hand it to the notifier.
    #[instrument(level = "info", skip_all, fields(path = submission.result.path.as_str()))]
    pub async fn submit_lead(
        &self,
        submission: LeadSubmission,
    ) -> Result<LeadReceipt, LeadServiceError> {
        self.guard.validate(&submission.lead)?;

        if !submission.answers.covers(questionnaire::questions()) {
            warn!(
                answered = submission.answers.len(),
                "lead submitted with an incomplete answer set"
            );
        }

        let rescored = self.scorer.classify(&submission.answers);
        if rescored.path != submission.result.path {
            warn!(
                submitted = submission.result.path.as_str(),
                rescored = rescored.path.as_str(),
                "submitted result does not match the answers"
            );
        }

        let lead_id = next_lead_id();
        info!(
            lead_id = %lead_id.0,
            answered = submission.answers.len(),
            best_time = %submission.lead.best_time,
            "lead.created"
        );

        self.notifier.notify(&submission).await?;

        Ok(LeadReceipt {
            ok: true,
            lead_id,
            received_at: Utc::now(),
        })
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Validation(#[from] LeadViolation),
    #[error(transparent)]
    Notification(#[from] NotifyError),
}
