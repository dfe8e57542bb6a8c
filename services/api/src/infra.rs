use disability_intake::config::{IntakeConfig, NotificationConfig};
use disability_intake::error::AppError;
use disability_intake::workflows::eligibility::{
    ConfiguredNotifier, EligibilityIntakeService, LeadGuard, LeadPolicy,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn build_intake_service(
    notifications: &NotificationConfig,
    intake: &IntakeConfig,
) -> Result<Arc<EligibilityIntakeService<ConfiguredNotifier>>, AppError> {
    let notifier = ConfiguredNotifier::from_config(notifications)?;
    let guard = LeadGuard::with_policy(LeadPolicy::new(intake.min_phone_length));
    Ok(Arc::new(EligibilityIntakeService::with_guard(
        guard,
        Arc::new(notifier),
    )))
}

/// Parse `id=value` pairs passed on the command line.
pub(crate) fn parse_answer_pair(raw: &str) -> Result<(String, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{raw}'"))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing question id in '{raw}'"));
    }

    Ok((id.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_pair_splits_on_first_equals() {
        assert_eq!(
            parse_answer_pair(" zip = 33101 "),
            Ok(("zip".to_string(), "33101".to_string()))
        );
        assert_eq!(
            parse_answer_pair("note=a=b"),
            Ok(("note".to_string(), "a=b".to_string()))
        );
    }

    #[test]
    fn intake_service_uses_configured_phone_length() {
        let service = build_intake_service(
            &NotificationConfig::default(),
            &IntakeConfig {
                min_phone_length: 10,
            },
        )
        .expect("service builds");

        assert_eq!(service.guard().policy().min_phone_length(), 10);
    }

    #[test]
    fn answer_pair_requires_an_id() {
        assert!(parse_answer_pair("=Sí").is_err());
        assert!(parse_answer_pair("stoppedWorking").is_err());
    }
}
