//! Per-session quiz state machine.
//!
//! Collaborator calls (classification, lead delivery) are split into a `begin_*`/`advance`
//! step that hands back the request payload and a `complete_*` step that applies the response.
//! The in-flight flag rejects any other transition while a request is outstanding.

use super::domain::{ClassificationResult, Lead, LeadReceipt, LeadSubmission};
use super::questionnaire::{self, AnswerSet, Question};
use super::validation::{LeadGuard, LeadViolation};
use serde::{Deserialize, Deserializer, Serialize};

/// Where a session currently sits in the funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Answering { step: usize },
    Reviewing,
    LeadCaptured,
}

/// Body of a classification request. A missing or null answer set is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    #[serde(default, deserialize_with = "deserialize_optional_answers")]
    pub answers: AnswerSet,
}

fn deserialize_optional_answers<'de, D>(deserializer: D) -> Result<AnswerSet, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<AnswerSet>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of an `advance` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Current answer missing, a request is in flight, or the session is past answering.
    Blocked,
    Moved { step: usize },
    /// Last question answered; the caller must resolve the request and report back.
    Classify(ClassificationRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("answers can only be changed while questions are being answered")]
    NotAnswering,
    #[error("a request is already in flight")]
    InFlight,
    #[error("'{value}' is not an option for question {question}")]
    UnknownOption {
        question: &'static str,
        value: String,
    },
}

/// Reasons a lead submission did not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadSubmitBlocked {
    #[error("no classification result to attach the lead to")]
    NotReviewing,
    #[error("a submission is already in flight")]
    InFlight,
    #[error("lead was already submitted")]
    AlreadySubmitted,
    #[error(transparent)]
    Invalid(#[from] LeadViolation),
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: &'static [Question],
    step: usize,
    answers: AnswerSet,
    result: Option<ClassificationResult>,
    lead: Lead,
    guard: LeadGuard,
    submission_in_flight: bool,
    lead_submitted: bool,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self::with_guard(LeadGuard::default())
    }

    pub fn with_guard(guard: LeadGuard) -> Self {
        Self {
            questions: questionnaire::questions(),
            step: 0,
            answers: AnswerSet::new(),
            result: None,
            lead: Lead::default(),
            guard,
            submission_in_flight: false,
            lead_submitted: false,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        if self.lead_submitted {
            QuizPhase::LeadCaptured
        } else if self.result.is_some() {
            QuizPhase::Reviewing
        } else {
            QuizPhase::Answering { step: self.step }
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        self.questions.len()
    }

    /// Share of steps already behind the user, rounded to whole percent.
    pub fn progress_pct(&self) -> u8 {
        if self.result.is_some() {
            return 100;
        }
        ((self.step as f64 / self.questions.len() as f64) * 100.0).round() as u8
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        match self.phase() {
            QuizPhase::Answering { step } => self.questions.get(step),
            QuizPhase::Reviewing | QuizPhase::LeadCaptured => None,
        }
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.current_question()
            .and_then(|question| self.answers.get(question.id))
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        self.result.as_ref()
    }

    pub fn lead(&self) -> &Lead {
        &self.lead
    }

    /// Mutable lead fields; `None` once submitted or while a submission is in flight.
    pub fn lead_mut(&mut self) -> Option<&mut Lead> {
        if self.lead_submitted || self.submission_in_flight {
            None
        } else {
            Some(&mut self.lead)
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.submission_in_flight
    }

    pub fn is_lead_submitted(&self) -> bool {
        self.lead_submitted
    }

    /// Record the answer for the current question. Blank input clears it.
    pub fn select(&mut self, value: &str) -> Result<(), AnswerError> {
        if self.submission_in_flight {
            return Err(AnswerError::InFlight);
        }

        let question = self.current_question().ok_or(AnswerError::NotAnswering)?;

        if !value.trim().is_empty() && !question.accepts(value) {
            return Err(AnswerError::UnknownOption {
                question: question.id,
                value: value.to_string(),
            });
        }

        self.answers.record(question.id, value);
        Ok(())
    }

    pub fn can_advance(&self) -> bool {
        !self.submission_in_flight
            && self
                .current_question()
                .map(|question| self.answers.is_answered(question.id))
                .unwrap_or(false)
    }

    pub fn advance(&mut self) -> Advance {
        if !self.can_advance() {
            return Advance::Blocked;
        }

        if self.step + 1 < self.questions.len() {
            self.step += 1;
            return Advance::Moved { step: self.step };
        }

        self.submission_in_flight = true;
        Advance::Classify(ClassificationRequest {
            answers: self.answers.clone(),
        })
    }

    /// Apply the response to an outstanding classification request.
    ///
    /// Ignored when no request is outstanding. The guard is released on failure so the
    /// user can retry from the last question.
    pub fn complete_classification<E>(
        &mut self,
        outcome: Result<ClassificationResult, E>,
    ) -> Result<(), E> {
        if !self.submission_in_flight || self.result.is_some() {
            return outcome.map(|_| ());
        }

        self.submission_in_flight = false;
        let result = outcome?;
        self.result = Some(result);
        Ok(())
    }

    /// Step back one question, keeping every recorded answer.
    pub fn retreat(&mut self) -> bool {
        if self.submission_in_flight || self.result.is_some() || self.step == 0 {
            return false;
        }

        self.step -= 1;
        true
    }

    pub fn begin_lead_submission(&mut self) -> Result<LeadSubmission, LeadSubmitBlocked> {
        if self.lead_submitted {
            return Err(LeadSubmitBlocked::AlreadySubmitted);
        }
        if self.submission_in_flight {
            return Err(LeadSubmitBlocked::InFlight);
        }

        let result = self.result.clone().ok_or(LeadSubmitBlocked::NotReviewing)?;
        self.guard.validate(&self.lead)?;

        self.submission_in_flight = true;
        Ok(LeadSubmission {
            answers: self.answers.clone(),
            result,
            lead: self.lead.clone(),
        })
    }

    /// Apply the response to an outstanding lead submission.
    ///
    /// The guard is released either way; only success moves the session to `LeadCaptured`.
    pub fn complete_lead_submission<E>(
        &mut self,
        outcome: Result<LeadReceipt, E>,
    ) -> Result<LeadReceipt, E> {
        if !self.submission_in_flight || self.result.is_none() || self.lead_submitted {
            return outcome;
        }

        self.submission_in_flight = false;
        let receipt = outcome?;
        self.lead_submitted = true;
        Ok(receipt)
    }
}
