//! Intake quiz: questionnaire, eligibility scoring, lead validation, and delivery.
//!
//! A [`QuizSession`] walks the person through the fixed questionnaire, the
//! [`EligibilityScorer`] classifies the completed answers, and the
//! [`EligibilityIntakeService`] validates the captured lead before handing it to a
//! [`LeadNotifier`].

pub mod backend;
pub mod domain;
pub mod evaluation;
pub mod flow;
pub mod notifier;
pub mod questionnaire;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use backend::{
    FlowStep, HttpQuizBackend, InProcessBackend, LeadOutcome, QuizBackend, QuizBackendError,
    QuizFlow,
};
pub use domain::{
    ClassificationResult, ClassificationTag, Lead, LeadId, LeadReceipt, LeadSubmission,
    BEST_TIME_OPTIONS, DEFAULT_BEST_TIME,
};
pub use evaluation::{EligibilityAssessment, EligibilityFactor, EligibilityScorer, ScoreComponent};
pub use flow::{
    Advance, AnswerError, ClassificationRequest, LeadSubmitBlocked, QuizPhase, QuizSession,
};
pub use notifier::{ConfiguredNotifier, DisabledNotifier, LeadNotifier, NotifyError, WebhookNotifier};
pub use questionnaire::{find_question, questions, AnswerSet, Question, QuestionKind, QuestionView};
pub use router::eligibility_router;
pub use service::{EligibilityIntakeService, LeadServiceError};
pub use validation::{LeadGuard, LeadPolicy, LeadViolation};
