use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use disability_intake::workflows::eligibility::{
    eligibility_router, EligibilityIntakeService, LeadNotifier,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_intake_routes<N>(service: Arc<EligibilityIntakeService<N>>) -> axum::Router
where
    N: LeadNotifier + 'static,
{
    eligibility_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use disability_intake::workflows::eligibility::DisabledNotifier;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn app(state: AppState) -> axum::Router {
        let service = Arc::new(EligibilityIntakeService::new(Arc::new(DisabledNotifier)));
        with_intake_routes(service).layer(Extension(state))
    }

    async fn status_of(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        let payload = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, payload)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, payload) = status_of(app(app_state(false)), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let state = app_state(false);
        let (status, payload) = status_of(app(state.clone()), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], "initializing");

        state.readiness.store(true, Ordering::Release);
        let (status, payload) = status_of(app(state), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ready");
    }

    #[tokio::test]
    async fn metrics_render_as_prometheus_text() {
        let response = app(app_state(true))
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn intake_routes_are_mounted() {
        let (status, payload) = status_of(app(app_state(true)), "/api/v1/questions").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.as_array().map(Vec::len), Some(7));
    }

    #[tokio::test]
    async fn disabled_notifier_still_acknowledges_leads() {
        let submission = json!({
            "answers": { "stoppedWorking": "Sí", "duration12mo": "No" },
            "result": {
                "path": "not_likely",
                "summary": ["El SSA requiere que la condición dure al menos 12 meses."]
            },
            "lead": {
                "firstName": "Ana",
                "lastName": "Pérez",
                "email": "ana@example.com",
                "phone": "3055550199",
                "bestTime": "Mañana",
                "consent": true
            }
        });

        let response = app(app_state(true))
            .oneshot(
                Request::post("/api/v1/leads")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(submission.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
