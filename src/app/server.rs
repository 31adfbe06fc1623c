//! HTTP API
//!
//! `POST /api/v1/altitude-temp` is the only business endpoint. `/health` and
//! the dataset reload are operational helpers.

use crate::adapters::http::{build_http_client, NominatimGeocoder, OpenElevationClient};
use crate::adapters::storage::LocalStorage;
use crate::adapters::store::ReferenceStore;
use crate::app::loader::{DatasetLoader, LoadSummary};
use crate::core::altitude::AltitudeResolver;
use crate::core::temperature::TemperatureResolver;
use crate::domain::model::{AddressRequest, ErrorResponse, TemperatureReading};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AppError, ErrorCategory, Result};
use crate::utils::messages::MessageCatalog;
use crate::utils::validation::Validate;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<TemperatureResolver>,
    pub store: Arc<ReferenceStore>,
    pub loader: Arc<DatasetLoader<LocalStorage>>,
    pub messages: Arc<MessageCatalog>,
}

impl AppState {
    /// Wires the HTTP lookups, the resolvers and the dataset loader around `store`.
    /// Does not load any data.
    pub fn from_config<C: ConfigProvider>(config: &C, store: Arc<ReferenceStore>) -> Result<Self> {
        let client = build_http_client(config.user_agent(), config.request_timeout())?;
        let geocoder = Arc::new(NominatimGeocoder::from_config(client.clone(), config));
        let elevation = Arc::new(OpenElevationClient::from_config(client, config));
        let altitude = Arc::new(AltitudeResolver::new(geocoder, elevation));

        let resolver = Arc::new(TemperatureResolver::new(store.clone(), altitude));
        let loader = DatasetLoader::from_config(LocalStorage::new(config.dataset_root()), config);

        Ok(Self {
            resolver,
            store,
            loader: Arc::new(loader),
            messages: Arc::new(config.messages().clone()),
        })
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn from_app_error(err: AppError, messages: &MessageCatalog) -> Self {
        let status = match err.category() {
            ErrorCategory::Validation => {
                tracing::warn!("Validation error: {}", err);
                StatusCode::BAD_REQUEST
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!("Unexpected error: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            body: messages.error_response(&err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub postal_codes: usize,
    pub altitude_ranges: usize,
}

/// POST /api/v1/altitude-temp
///
/// Body rejections (bad JSON, wrong content type, wrong field types) are
/// answered with the same `{error, message}` body as any validation failure.
async fn altitude_temperature(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddressRequest>, JsonRejection>,
) -> std::result::Result<Json<TemperatureReading>, ApiError> {
    let fail = |err: AppError| ApiError::from_app_error(err, &state.messages);

    let Json(request) = payload.map_err(|rejection| {
        fail(AppError::InvalidRequest {
            reason: rejection.body_text(),
        })
    })?;
    request.validate().map_err(fail)?;

    let reading = state
        .resolver
        .resolve(request.postal_code.as_deref(), request.address.as_deref())
        .await
        .map_err(fail)?;

    Ok(Json(reading))
}

/// POST /api/v1/datasets/reload
async fn reload_datasets(
    State(state): State<AppState>,
) -> std::result::Result<Json<LoadSummary>, ApiError> {
    let summary = state
        .loader
        .load_into(&state.store)
        .await
        .map_err(|err| ApiError::from_app_error(err, &state.messages))?;
    Ok(Json(summary))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        postal_codes: state.store.postal_code_count(),
        altitude_ranges: state.store.range_count(),
    })
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/altitude-temp", post(altitude_temperature))
        .route("/api/v1/datasets/reload", post(reload_datasets))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(state: AppState, bind: &str) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("🚀 HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AltitudeOffsetRange, PostalTemperature};
    use crate::domain::ports::AltitudeProvider;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    struct FixedAltitude(i32);

    #[async_trait]
    impl AltitudeProvider for FixedAltitude {
        async fn altitude_meters(&self, address: Option<&str>) -> Result<i32> {
            match address {
                Some(a) if !a.trim().is_empty() => Ok(self.0),
                _ => Ok(0),
            }
        }
    }

    fn test_state(altitude: i32) -> AppState {
        let store = Arc::new(ReferenceStore::with_data(
            vec![
                PostalTemperature::new("75", -5.0),
                PostalTemperature::new("38", -10.0),
            ],
            vec![
                AltitudeOffsetRange::new(-10000, -1, 2.0),
                AltitudeOffsetRange::new(0, 199, 0.0),
                AltitudeOffsetRange::new(200, 399, -1.0),
                AltitudeOffsetRange::new(1000, 1200, -5.0),
            ],
        ));
        let resolver = Arc::new(TemperatureResolver::new(
            store.clone(),
            Arc::new(FixedAltitude(altitude)),
        ));

        AppState {
            resolver,
            store,
            loader: Arc::new(DatasetLoader::new(
                LocalStorage::new("/nonexistent"),
                "temperatures.json",
                "offsets.json",
            )),
            messages: Arc::new(MessageCatalog::default()),
        }
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_altitude_temp_success() {
        let app = create_router(test_state(350));
        let (status, body) = post_json(
            app,
            "/api/v1/altitude-temp",
            serde_json::json!({"address": "Grenoble area", "postalCode": "38"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["altitude"], 350);
        assert_eq!(body["standardMinTemperature"], -11.0);
    }

    async fn post_raw(app: Router, content_type: &str, body: &'static str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/altitude-temp")
                    .header("content-type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_numeric_postal_code_is_accepted() {
        let app = create_router(test_state(350));
        let (status, body) = post_json(
            app,
            "/api/v1/altitude-temp",
            serde_json::json!({"address": "Grenoble area", "postalCode": 38000}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["standardMinTemperature"], -11.0);
    }

    #[tokio::test]
    async fn test_malformed_json_gets_structured_error() {
        let app = create_router(test_state(100));
        let (status, body) = post_raw(app, "application/json", "not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Malformed request body: "));
    }

    #[tokio::test]
    async fn test_wrong_field_type_gets_structured_error() {
        let app = create_router(test_state(100));
        let (status, body) = post_raw(app, "application/json", r#"{"postalCode": [75]}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation error");
    }

    #[tokio::test]
    async fn test_wrong_content_type_gets_structured_error() {
        let app = create_router(test_state(100));
        let (status, body) = post_raw(app, "text/plain", "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation error");
        assert!(body["message"].as_str().unwrap().contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_missing_inputs_is_bad_request() {
        let app = create_router(test_state(100));
        let (status, body) = post_json(
            app,
            "/api/v1/altitude-temp",
            serde_json::json!({"address": "", "postalCode": ""}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "address or postalCode must be provided");
    }

    #[tokio::test]
    async fn test_altitude_above_range_is_bad_request() {
        let app = create_router(test_state(1300));
        let (status, body) = post_json(
            app,
            "/api/v1/altitude-temp",
            serde_json::json!({"address": "Mont Blanc", "postalCode": "75"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation error");
        assert!(body["message"].as_str().unwrap().contains("1200"));
    }

    #[tokio::test]
    async fn test_reload_failure_is_internal_error_without_detail() {
        let app = create_router(test_state(100));
        let (status, body) = post_json(app, "/api/v1/datasets/reload", serde_json::json!({})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(!body["message"].as_str().unwrap().contains("nonexistent"));
    }

    #[tokio::test]
    async fn test_health_reports_counts() {
        let app = create_router(test_state(100));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["postalCodes"], 2);
        assert_eq!(body["altitudeRanges"], 4);
        assert!(body["timestamp"].is_string());
    }
}
