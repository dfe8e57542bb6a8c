use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use super::domain::{ClassificationResult, LeadReceipt, LeadSubmission};
use super::flow::ClassificationRequest;
use super::notifier::LeadNotifier;
use super::questionnaire::QuestionView;
use super::service::EligibilityIntakeService;
use crate::error::AppError;

/// Router builder exposing the questionnaire, classification, and lead intake endpoints.
pub fn eligibility_router<N>(service: Arc<EligibilityIntakeService<N>>) -> Router
where
    N: LeadNotifier + 'static,
{
    Router::new()
        .route("/api/v1/questions", get(questions_handler::<N>))
        .route("/api/v1/classify", post(classify_handler::<N>))
        .route("/api/v1/leads", post(lead_handler::<N>))
        .with_state(service)
}

pub(crate) async fn questions_handler<N>(
    State(service): State<Arc<EligibilityIntakeService<N>>>,
) -> Json<Vec<QuestionView>>
where
    N: LeadNotifier + 'static,
{
    Json(
        service
            .questions()
            .iter()
            .map(|question| question.view())
            .collect(),
    )
}

pub(crate) async fn classify_handler<N>(
    State(service): State<Arc<EligibilityIntakeService<N>>>,
    Json(request): Json<ClassificationRequest>,
) -> Json<ClassificationResult>
where
    N: LeadNotifier + 'static,
{
    Json(service.classify(&request.answers))
}

pub(crate) async fn lead_handler<N>(
    State(service): State<Arc<EligibilityIntakeService<N>>>,
    Json(submission): Json<LeadSubmission>,
) -> Result<(StatusCode, Json<LeadReceipt>), AppError>
where
    N: LeadNotifier + 'static,
{
    let receipt = service.submit_lead(submission).await?;
    Ok((StatusCode::ACCEPTED, Json(receipt)))
}
