use crate::handlers;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use trademind_core::{AppConfig, SimulationLimits};

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub limits: SimulationLimits,
}

pub struct ApiServer {
    state: Arc<AppState>,
    allowed_origins: Vec<String>,
}

impl ApiServer {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            state: Arc::new(AppState {
                limits: config.simulation,
            }),
            allowed_origins: config.cors.allowed_origins.clone(),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::status))
            .route("/api/simulate", post(handlers::run_simulation))
            .route("/api/profile", post(handlers::strategy_profile))
            .layer(self.cors_layer())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    fn cors_layer(&self) -> CorsLayer {
        let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        if origins.is_empty() {
            cors.allow_origin(Any)
        } else {
            cors.allow_origin(origins)
        }
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Web API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::IntoResponse,
    };
    use trademind_backtest::EngineError;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    // ============================================================
    // Test Helpers
    // ============================================================

    fn router() -> Router {
        ApiServer::new(&AppConfig::default()).router()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn simulation_body() -> Value {
        json!({
            "starting_equity": 10000,
            "win_rate": 45,
            "avg_win": 200,
            "avg_loss": 100,
            "risk_per_trade": 2,
            "num_simulations": 200,
            "num_trades": 30,
            "seed": 42
        })
    }

    // ============================================================
    // Status
    // ============================================================

    #[tokio::test]
    async fn root_reports_online() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let (status, body) = send(router(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "TradeMind Quant Engine Online");
    }

    // ============================================================
    // Simulation
    // ============================================================

    #[tokio::test]
    async fn simulate_returns_metrics_and_chart_data() {
        let (status, body) = send(router(), post_json("/api/simulate", &simulation_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metrics"]["starting_equity"].as_f64(), Some(10000.0));
        assert!(body["metrics"]["risk_of_ruin"].is_number());
        for key in ["worst_case", "median_case", "best_case"] {
            assert_eq!(body["chart_data"][key].as_array().unwrap().len(), 31);
        }
    }

    #[tokio::test]
    async fn seeded_requests_are_reproducible() {
        let (_, first) = send(router(), post_json("/api/simulate", &simulation_body())).await;
        let (_, second) = send(router(), post_json("/api/simulate", &simulation_body())).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn omitted_counts_use_defaults() {
        let body = json!({
            "starting_equity": 1000,
            "win_rate": 50,
            "avg_win": 100,
            "avg_loss": 100,
            "risk_per_trade": 1
        });

        let (status, body) = send(router(), post_json("/api/simulate", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chart_data"]["median_case"].as_array().unwrap().len(), 51);
    }

    #[tokio::test]
    async fn non_positive_starting_equity_is_defaulted() {
        let mut body = simulation_body();
        body["starting_equity"] = json!(-5);

        let (status, body) = send(router(), post_json("/api/simulate", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metrics"]["starting_equity"].as_f64(), Some(1000.0));
    }

    #[tokio::test]
    async fn invalid_win_rate_is_bad_request() {
        let mut body = simulation_body();
        body["win_rate"] = json!(150);

        let (status, body) = send(router(), post_json("/api/simulate", &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("win_probability"));
    }

    #[tokio::test]
    async fn negative_trades_is_bad_request() {
        let mut body = simulation_body();
        body["num_trades"] = json!(-1);

        let (status, body) = send(router(), post_json("/api/simulate", &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("num_trades"));
    }

    #[tokio::test]
    async fn oversized_request_is_rejected() {
        let mut config = AppConfig::default();
        config.simulation.max_paths = 100;
        let app = ApiServer::new(&config).router();

        let (status, body) = send(app, post_json("/api/simulate", &simulation_body())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("exceeds"));
    }

    #[tokio::test]
    async fn missing_field_is_rejected_by_extractor() {
        let body = json!({ "starting_equity": 1000 });

        let (status, _) = send(router(), post_json("/api/simulate", &body)).await;

        assert!(status.is_client_error());
    }

    // ============================================================
    // Profile
    // ============================================================

    #[tokio::test]
    async fn profile_returns_expectancy() {
        let body = json!({ "win_rate": 50, "avg_win": 200, "avg_loss": 100 });

        let (status, body) = send(router(), post_json("/api/profile", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["expectancy"].as_f64(), Some(50.0));
        assert_eq!(body["reward_risk_ratio"].as_f64(), Some(2.0));
        assert_eq!(body["capital_units"], 20);
    }

    #[tokio::test]
    async fn profile_rejects_bad_win_rate() {
        let body = json!({ "win_rate": -10, "avg_win": 200, "avg_loss": 100 });

        let (status, _) = send(router(), post_json("/api/profile", &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ============================================================
    // Error Mapping
    // ============================================================

    async fn error_response(err: EngineError) -> (StatusCode, Value) {
        let response = crate::error::ApiError::from(err).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn input_error_maps_to_bad_request() {
        let (status, body) = error_response(EngineError::RiskFractionOutOfRange {
            field: "risk_fraction",
            value: 2.0,
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("risk_fraction"));
    }

    #[tokio::test]
    async fn shape_mismatch_maps_to_internal_error() {
        let (status, body) = error_response(EngineError::ShapeMismatch {
            expected_paths: 2,
            expected_steps: 2,
            actual_paths: 1,
            actual_steps: 2,
        })
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Simulation failed");
    }

    // ============================================================
    // Simulation Size
    // ============================================================

    #[tokio::test]
    async fn long_compounding_request_succeeds() {
        let body = json!({
            "starting_equity": 10000,
            "win_rate": 60,
            "avg_win": 300,
            "avg_loss": 100,
            "risk_per_trade": 5,
            "num_simulations": 200,
            "num_trades": 1000,
            "seed": 1
        });

        let (status, body) = send(router(), post_json("/api/simulate", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["metrics"]["max_equity"].as_f64().unwrap() > 1e29);
        assert_eq!(body["chart_data"]["best_case"].as_array().unwrap().len(), 1001);
    }

    // ============================================================
    // CORS
    // ============================================================

    #[tokio::test]
    async fn allowed_origin_is_echoed() {
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn unknown_origin_gets_no_cors_header() {
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "http://evil.example")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
