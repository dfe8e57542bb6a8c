use super::common::*;
use crate::workflows::eligibility::domain::ClassificationTag;
use crate::workflows::eligibility::notifier::NotifyError;
use crate::workflows::eligibility::questionnaire::ids;
use crate::workflows::eligibility::service::{EligibilityIntakeService, LeadServiceError};
use crate::workflows::eligibility::validation::LeadViolation;
use std::sync::Arc;

#[test]
fn classify_matches_the_scorer() {
    let (service, _) = build_service();

    assert_eq!(
        service.classify(&possible_ssi_answers()).path,
        ClassificationTag::PossibleSsi
    );
    let assessment = service.assess(&appeals_answers());
    assert_eq!(assessment.result.path, ClassificationTag::Appeals);
    assert_eq!(assessment.total_score, 7);
}

#[test]
fn questions_expose_the_fixed_catalogue() {
    let (service, _) = build_service();

    let questions = service.questions();
    assert_eq!(questions.len(), 7);
    assert_eq!(questions[0].id, ids::STOPPED_WORKING);
    assert_eq!(questions[6].id, ids::ZIP);
}

#[tokio::test]
async fn submit_lead_delivers_and_issues_receipt() {
    let (service, notifier) = build_service();

    let receipt = service
        .submit_lead(submission())
        .await
        .expect("lead accepted");

    assert!(receipt.ok);
    assert!(receipt.lead_id.0.starts_with("lead-"));
    assert_eq!(receipt.lead_id.0.len(), "lead-".len() + 6);
    let delivered = notifier.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0], submission());
}

#[tokio::test]
async fn lead_ids_are_unique_per_submission() {
    let (service, _) = build_service();

    let first = service.submit_lead(submission()).await.expect("first");
    let second = service.submit_lead(submission()).await.expect("second");

    assert_ne!(first.lead_id, second.lead_id);
}

#[tokio::test]
async fn submit_lead_rejects_invalid_lead_without_notifying() {
    let (service, notifier) = build_service();
    let mut payload = submission();
    payload.lead.consent = false;

    match service.submit_lead(payload).await {
        Err(LeadServiceError::Validation(LeadViolation::ConsentRequired)) => {}
        other => panic!("expected consent violation, got {other:?}"),
    }
    assert!(notifier.delivered().is_empty());
}

#[tokio::test]
async fn submit_lead_surfaces_notifier_failure() {
    let service = EligibilityIntakeService::new(Arc::new(FailingNotifier));

    match service.submit_lead(submission()).await {
        Err(LeadServiceError::Notification(NotifyError::Rejected { status })) => {
            assert_eq!(status, 500)
        }
        other => panic!("expected notification failure, got {other:?}"),
    }
}

#[tokio::test]
async fn mismatched_result_is_still_accepted() {
    let (service, notifier) = build_service();
    let mut payload = submission();
    payload.result = service.classify(&possible_ssi_answers());

    service
        .submit_lead(payload.clone())
        .await
        .expect("client result is kept");

    assert_eq!(notifier.delivered()[0].result, payload.result);
}
