//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use minibridge_app::ports::{CapabilitySink, CommandSender};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the API routes under `/api` and adds a `/health` check.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<S, C>(state: AppState<S, C>) -> Router
where
    S: CapabilitySink + 'static,
    C: CommandSender + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use minibridge_app::event_bus::InProcessCapabilityBus;
    use minibridge_app::services::bridge_service::Bridge;
    use minibridge_domain::accessory::{AccessoryConfig, HeaterCoolerConfig, LightConfig};
    use minibridge_domain::id::InstanceId;
    use minibridge_domain::message::Message;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<String>>,
    }

    impl CommandSender for RecordingSender {
        fn send(&self, message: &Message) {
            self.sent.lock().unwrap().push(message.encode());
        }
    }

    type TestState = AppState<Arc<InProcessCapabilityBus>, Arc<RecordingSender>>;

    fn test_state() -> (TestState, Arc<RecordingSender>) {
        let bus = Arc::new(InProcessCapabilityBus::new(16));
        let sender = Arc::new(RecordingSender::default());
        let configs = [
            AccessoryConfig::DimLightBulb(LightConfig {
                id: InstanceId::new(1),
                name: "Hall".to_string(),
            }),
            AccessoryConfig::HeaterCooler(HeaterCoolerConfig {
                id: InstanceId::new(12),
                name: "AC".to_string(),
                mode_selection: 10,
                min_temperature: 16.0,
                max_temperature: 30.0,
                temperature_display_units: 0,
            }),
        ];
        let bridge =
            Bridge::from_configs(&configs, Arc::clone(&bus), Arc::clone(&sender)).unwrap();
        (AppState::new(Arc::new(bridge), bus), sender)
    }

    async fn call(state: TestState, request: Request<Body>) -> Response {
        build(state).oneshot(request).await.unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn put(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let (state, _) = test_state();

        let response = call(state, get("/health")).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_list_every_configured_accessory() {
        let (state, _) = test_state();

        let response = call(state, get("/api/accessories")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_return_not_found_when_accessory_is_unknown() {
        let (state, _) = test_state();

        let response = call(state, get("/api/accessories/Television/3")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_not_found_when_kind_is_unknown() {
        let (state, _) = test_state();

        let response = call(state, get("/api/accessories/Fan/1")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_id_is_not_a_number() {
        let (state, _) = test_state();

        let response = call(state, get("/api/accessories/DimLightBulb/one")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_read_cached_value_and_query_controller() {
        let (state, sender) = test_state();

        let response = call(
            state,
            get("/api/accessories/DimLightBulb/1/characteristics/Brightness"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["value"], 100);
        assert_eq!(
            *sender.sent.lock().unwrap(),
            ["DimLightBulb:1:getLightBrightness:*"]
        );
    }

    #[tokio::test]
    async fn should_send_command_when_characteristic_written() {
        let (state, sender) = test_state();

        let response = call(
            state.clone(),
            put(
                "/api/accessories/DimLightBulb/1/characteristics/Brightness",
                r#"{"value":55}"#,
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["sent"][0], "DimLightBulb:1:setLightBrightness:55:*");
        assert_eq!(sender.sent.lock().unwrap().len(), 1);

        let snapshot = json(call(state, get("/api/accessories/DimLightBulb/1")).await).await;
        assert_eq!(snapshot["name"], "Hall");
    }

    #[tokio::test]
    async fn should_send_temperature_in_tenths() {
        let (state, sender) = test_state();

        let response = call(
            state,
            put(
                "/api/accessories/HeaterCooler/12/characteristics/CoolingThresholdTemperature",
                r#"{"value":21.5}"#,
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            sender
                .sent
                .lock()
                .unwrap()
                .contains(&"HeaterCooler:12:setTargetTemperature:215:*".to_string())
        );
    }

    #[tokio::test]
    async fn should_reject_out_of_range_write_without_sending() {
        let (state, sender) = test_state();

        let response = call(
            state,
            put(
                "/api/accessories/DimLightBulb/1/characteristics/Brightness",
                r#"{"value":101}"#,
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reject_characteristic_the_device_does_not_expose() {
        let (state, _) = test_state();

        let response = call(
            state,
            get("/api/accessories/DimLightBulb/1/characteristics/Mute"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_report_counters_in_stats() {
        let (state, _) = test_state();
        state.bridge.handle_line("garbage");

        let body = json(call(state, get("/api/stats")).await).await;

        assert_eq!(body["accessories"], 2);
        assert_eq!(body["malformed"], 1);
    }
}
