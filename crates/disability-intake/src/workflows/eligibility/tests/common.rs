use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::eligibility::backend::{QuizBackend, QuizBackendError};
use crate::workflows::eligibility::domain::{
    ClassificationResult, Lead, LeadId, LeadReceipt, LeadSubmission,
};
use crate::workflows::eligibility::evaluation::EligibilityScorer;
use crate::workflows::eligibility::flow::ClassificationRequest;
use crate::workflows::eligibility::notifier::{LeadNotifier, NotifyError};
use crate::workflows::eligibility::questionnaire::{ids, AnswerSet, NO, YES};
use crate::workflows::eligibility::{eligibility_router, EligibilityIntakeService};

/// Stopped, long-term, cannot work, 55–59, has credits: scores 14.
pub(crate) fn likely_ssdi_answers() -> AnswerSet {
    [
        (ids::STOPPED_WORKING, YES),
        (ids::DURATION_12_MONTHS, YES),
        (ids::LIMITATION, "No puedo trabajar"),
        (ids::AGE_BAND, "55–59"),
        (ids::WORK_CREDITS, YES),
    ]
    .into_iter()
    .collect()
}

pub(crate) fn possible_ssi_answers() -> AnswerSet {
    [
        (ids::STOPPED_WORKING, YES),
        (ids::DURATION_12_MONTHS, YES),
        (ids::LIMITATION, "Ninguna"),
        (ids::AGE_BAND, "18–29"),
        (ids::WORK_CREDITS, NO),
    ]
    .into_iter()
    .collect()
}

/// Scores 7 but is still working, so it falls through to the prior-application rule.
pub(crate) fn appeals_answers() -> AnswerSet {
    [
        (ids::STOPPED_WORKING, NO),
        (ids::DURATION_12_MONTHS, YES),
        (ids::LIMITATION, "Faltas frecuentes"),
        (ids::AGE_BAND, "50–54"),
        (ids::WORK_CREDITS, YES),
        (ids::PRIOR_APPLICATION, "Denegado en inicial"),
    ]
    .into_iter()
    .collect()
}

/// Every question answered, in catalogue order.
pub(crate) fn full_quiz_answers() -> Vec<(&'static str, &'static str)> {
    vec![
        (ids::STOPPED_WORKING, YES),
        (ids::DURATION_12_MONTHS, YES),
        (ids::LIMITATION, "No puedo trabajar"),
        (ids::AGE_BAND, "55–59"),
        (ids::WORK_CREDITS, YES),
        (ids::PRIOR_APPLICATION, NO),
        (ids::ZIP, "33101"),
    ]
}

pub(crate) fn valid_lead() -> Lead {
    Lead {
        first_name: "Ana".to_string(),
        last_name: "Pérez".to_string(),
        email: "ana.perez@example.com".to_string(),
        phone: "305-555-0199".to_string(),
        best_time: "Tarde".to_string(),
        consent: true,
    }
}

pub(crate) fn submission() -> LeadSubmission {
    let answers = likely_ssdi_answers();
    LeadSubmission {
        result: EligibilityScorer::new().classify(&answers),
        answers,
        lead: valid_lead(),
    }
}

pub(crate) fn receipt(sequence: u64) -> LeadReceipt {
    LeadReceipt {
        ok: true,
        lead_id: LeadId(format!("lead-{sequence:06}")),
        received_at: Utc
            .with_ymd_and_hms(2025, 3, 14, 15, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryNotifier {
    delivered: Arc<Mutex<Vec<LeadSubmission>>>,
}

impl MemoryNotifier {
    pub(crate) fn delivered(&self) -> Vec<LeadSubmission> {
        self.delivered.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl LeadNotifier for MemoryNotifier {
    async fn notify(&self, submission: &LeadSubmission) -> Result<(), NotifyError> {
        self.delivered
            .lock()
            .expect("notifier mutex poisoned")
            .push(submission.clone());
        Ok(())
    }
}

pub(crate) struct FailingNotifier;

#[async_trait]
impl LeadNotifier for FailingNotifier {
    async fn notify(&self, _submission: &LeadSubmission) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected { status: 500 })
    }
}

pub(crate) fn build_service() -> (
    EligibilityIntakeService<MemoryNotifier>,
    Arc<MemoryNotifier>,
) {
    let notifier = Arc::new(MemoryNotifier::default());
    let service = EligibilityIntakeService::new(notifier.clone());
    (service, notifier)
}

pub(crate) fn router_with_service(
    service: EligibilityIntakeService<MemoryNotifier>,
) -> axum::Router {
    eligibility_router(Arc::new(service))
}

/// Backend fake that classifies for real and replays scripted lead responses.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    classify_failures: Mutex<usize>,
    lead_responses: Mutex<VecDeque<Result<LeadReceipt, QuizBackendError>>>,
    classify_calls: AtomicUsize,
    lead_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub(crate) fn failing_classification_once() -> Self {
        let backend = Self::default();
        *backend.classify_failures.lock().expect("script mutex poisoned") = 1;
        backend
    }

    pub(crate) fn with_lead_responses(
        responses: Vec<Result<LeadReceipt, QuizBackendError>>,
    ) -> Self {
        let backend = Self::default();
        *backend.lead_responses.lock().expect("script mutex poisoned") = responses.into();
        backend
    }

    pub(crate) fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn lead_calls(&self) -> usize {
        self.lead_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuizBackend for ScriptedBackend {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, QuizBackendError> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        let mut failures = self.classify_failures.lock().expect("script mutex poisoned");
        if *failures > 0 {
            *failures -= 1;
            return Err(QuizBackendError::Transport("connection reset".to_string()));
        }
        Ok(EligibilityScorer::new().classify(&request.answers))
    }

    async fn submit_lead(
        &self,
        _submission: &LeadSubmission,
    ) -> Result<LeadReceipt, QuizBackendError> {
        let call = self.lead_calls.fetch_add(1, Ordering::SeqCst) as u64;
        self.lead_responses
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(receipt(call + 1)))
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
