//! Carrier Locator API Server
//!
//! HTTP API for locating the carriers closest to an address.
//! Every query outcome maps to a status code and a JSON body; the rendered
//! map is served as HTML.

use crate::application::{CarrierLocatorService, LocateOutcome, LocateReport};
use crate::domain::entities::MapModel;
use crate::domain::value_objects::GeoPoint;
use crate::infrastructure::shutdown_signal;
use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Query string of the locate endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocateQuery {
    #[serde(default)]
    pub address: String,
    /// Number of carriers to return; the service default when absent
    #[serde(default)]
    pub n: Option<usize>,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub carriers: usize,
}

/// Dataset summary response.
#[derive(Debug, Serialize)]
pub struct CarriersResponse {
    pub total: usize,
}

/// One carrier in a locate response.
#[derive(Debug, Serialize)]
pub struct CarrierView {
    pub name: String,
    pub state: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// `None` when the distance could not be computed
    pub distance_km: Option<f64>,
}

/// Successful locate response.
#[derive(Debug, Serialize)]
pub struct NearestResponse {
    pub address: String,
    pub location: GeoPoint,
    pub carriers: Vec<CarrierView>,
    pub map: MapModel,
}

impl From<&LocateReport> for NearestResponse {
    fn from(report: &LocateReport) -> Self {
        let carriers = report
            .carriers
            .iter()
            .map(|ranked| CarrierView {
                name: ranked.carrier.name.clone(),
                state: ranked.carrier.state.clone(),
                address: ranked.carrier.address.clone(),
                latitude: ranked.carrier.location.map(|p| p.latitude()),
                longitude: ranked.carrier.location.map(|p| p.longitude()),
                distance_km: ranked.is_reachable().then_some(ranked.distance_km),
            })
            .collect();

        Self {
            address: report.address.clone(),
            location: report.location,
            carriers,
            map: report.map.clone(),
        }
    }
}

/// Failed locate response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub outcome: String,
    pub error: String,
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<CarrierLocatorService>,
}

impl ApiState {
    pub fn new(service: Arc<CarrierLocatorService>) -> Self {
        Self { service }
    }
}

/// API Server for carrier lookups.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, service: Arc<CarrierLocatorService>) -> Self {
        Self {
            listen_addr,
            state: ApiState::new(service),
        }
    }

    /// Build the router with all endpoints.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Run the API server until a shutdown signal arrives.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(&self) -> anyhow::Result<()> {
        let app = self
            .router()
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("carrier locator API listening on {}", self.listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

/// Routes shared by the server and the handler tests.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        // Health endpoint
        .route("/health", get(health_handler))
        // Dataset size
        .route("/api/v1/carriers", get(carriers_handler))
        // Closest carriers as JSON
        .route("/api/v1/nearest", get(nearest_handler))
        // Closest carriers as a rendered map
        .route("/api/v1/map", get(map_handler))
        .layer(cors)
        .with_state(state)
}

/// HTTP status for a locate outcome.
pub fn status_for(outcome: &LocateOutcome) -> StatusCode {
    match outcome {
        LocateOutcome::Located(_) => StatusCode::OK,
        LocateOutcome::EmptyAddress => StatusCode::BAD_REQUEST,
        LocateOutcome::AddressUnresolved { .. } | LocateOutcome::NoCarriersFound { .. } => {
            StatusCode::NOT_FOUND
        }
        LocateOutcome::NoDataAvailable => StatusCode::SERVICE_UNAVAILABLE,
        LocateOutcome::GeocodingFailed { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(status: StatusCode, outcome: &str, error: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            outcome: outcome.to_string(),
            error,
        }),
    )
        .into_response()
}

fn outcome_error(outcome: &LocateOutcome) -> Response {
    error_response(status_for(outcome), outcome.kind(), outcome.message())
}

async fn locate(state: &ApiState, query: &LocateQuery) -> Result<LocateOutcome, Response> {
    let n = match query.n {
        Some(0) => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                "n must be at least 1".to_string(),
            ))
        }
        Some(n) => n,
        None => state.service.result_count(),
    };
    Ok(state.service.locate_top(&query.address, n).await)
}

// Handler functions

async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        carriers: state.service.dataset_size().await,
    };
    Json(response)
}

async fn carriers_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(CarriersResponse {
        total: state.service.dataset_size().await,
    })
}

async fn nearest_handler(
    State(state): State<ApiState>,
    Query(query): Query<LocateQuery>,
) -> Response {
    let outcome = match locate(&state, &query).await {
        Ok(outcome) => outcome,
        Err(response) => return response,
    };

    match outcome.report() {
        Some(report) => (StatusCode::OK, Json(NearestResponse::from(report))).into_response(),
        None => outcome_error(&outcome),
    }
}

async fn map_handler(State(state): State<ApiState>, Query(query): Query<LocateQuery>) -> Response {
    let Some(renderer) = state.service.renderer().cloned() else {
        return error_response(
            StatusCode::NOT_IMPLEMENTED,
            "render_unavailable",
            "no map renderer configured".to_string(),
        );
    };

    let outcome = match locate(&state, &query).await {
        Ok(outcome) => outcome,
        Err(response) => return response,
    };

    let Some(report) = outcome.report() else {
        return outcome_error(&outcome);
    };

    match (&report.rendered_map, &report.render_error) {
        (Some(document), _) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, renderer.content_type())],
            document.clone(),
        )
            .into_response(),
        (None, error) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "render_failed",
            error.clone().unwrap_or_else(|| "map was not rendered".to_string()),
        ),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::adapters::outbound::{InMemoryCarrierRepository, LeafletMapRenderer};
    use crate::domain::entities::Carrier;
    use crate::domain::ports::{GeocodeError, Geocoder, MapRenderer};
    use crate::domain::services::MapModelBuilder;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    // ===== Test Doubles =====

    struct FixtureGeocoder;

    #[async_trait]
    impl Geocoder for FixtureGeocoder {
        async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
            match address {
                "Origin" => Ok(Some(GeoPoint::new(0.0, 0.0).unwrap())),
                "Broken" => Err(GeocodeError::HttpStatus(503)),
                _ => Ok(None),
            }
        }

        fn name(&self) -> &'static str {
            "fixture"
        }
    }

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn sample_carriers() -> Vec<Carrier> {
        vec![
            Carrier::new("A", "S1", "a street", Some(point(0.0, 0.0))),
            Carrier::new("B", "S2", "b street", Some(point(0.0, 1.0))),
            Carrier::new("C", "S3", "c street", Some(point(10.0, 10.0))),
            Carrier::new("D", "S4", "d street", None),
        ]
    }

    fn create_test_app_with(carriers: Vec<Carrier>, with_renderer: bool) -> Router {
        let renderer: Option<Arc<dyn MapRenderer>> = if with_renderer {
            Some(Arc::new(LeafletMapRenderer::default()))
        } else {
            None
        };
        let service = CarrierLocatorService::new(
            Arc::new(InMemoryCarrierRepository::new(carriers)),
            Arc::new(FixtureGeocoder),
            renderer,
            MapModelBuilder::default(),
            3,
        );
        build_router(ApiState::new(Arc::new(service)))
    }

    fn create_test_app() -> Router {
        create_test_app_with(sample_carriers(), true)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    // ===== Endpoint Tests =====

    #[tokio::test]
    async fn test_health_handler() {
        let (status, json) = get_json(create_test_app(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["carriers"], 4);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_carriers_handler() {
        let (status, json) = get_json(create_test_app(), "/api/v1/carriers").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 4);
    }

    #[tokio::test]
    async fn test_nearest_success() {
        let (status, json) = get_json(create_test_app(), "/api/v1/nearest?address=Origin").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["address"], "Origin");
        assert_eq!(json["location"]["latitude"], 0.0);

        let carriers = json["carriers"].as_array().unwrap();
        assert_eq!(carriers.len(), 3);
        assert_eq!(carriers[0]["name"], "A");
        assert_eq!(carriers[0]["distance_km"], 0.0);
        assert_eq!(carriers[1]["name"], "B");
        assert_eq!(carriers[2]["name"], "C");

        assert_eq!(json["map"]["coverage_radius_meters"], 5000.0);
        assert_eq!(json["map"]["carrier_markers"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_nearest_with_count() {
        let (status, json) =
            get_json(create_test_app(), "/api/v1/nearest?address=Origin&n=4").await;

        assert_eq!(status, StatusCode::OK);
        let carriers = json["carriers"].as_array().unwrap();
        assert_eq!(carriers.len(), 4);
        // carrier without a location ranks last with no distance
        assert_eq!(carriers[3]["name"], "D");
        assert!(carriers[3]["distance_km"].is_null());
        assert!(carriers[3]["latitude"].is_null());
    }

    #[tokio::test]
    async fn test_nearest_zero_count_rejected() {
        let (status, json) =
            get_json(create_test_app(), "/api/v1/nearest?address=Origin&n=0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["outcome"], "invalid_request");
    }

    #[tokio::test]
    async fn test_nearest_missing_address() {
        let (status, json) = get_json(create_test_app(), "/api/v1/nearest").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["outcome"], "empty_address");
    }

    #[tokio::test]
    async fn test_nearest_unresolved_address() {
        let (status, json) =
            get_json(create_test_app(), "/api/v1/nearest?address=asdkjasd123").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["outcome"], "address_unresolved");
        assert_eq!(json["error"], "Could not geocode the provided address.");
    }

    #[tokio::test]
    async fn test_nearest_geocoder_failure() {
        let (status, json) = get_json(create_test_app(), "/api/v1/nearest?address=Broken").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["outcome"], "geocoding_failed");
    }

    #[tokio::test]
    async fn test_nearest_no_data() {
        let app = create_test_app_with(vec![], true);
        let (status, json) = get_json(app, "/api/v1/nearest?address=Origin").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"], "No carrier data available.");
    }

    #[tokio::test]
    async fn test_nearest_no_carriers_found() {
        let app = create_test_app_with(vec![Carrier::new("X", "S", "x", None)], true);
        let (status, json) = get_json(app, "/api/v1/nearest?address=Origin").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["outcome"], "no_carriers_found");
    }

    #[tokio::test]
    async fn test_map_handler_returns_html() {
        let request = Request::builder()
            .uri("/api/v1/map?address=Origin")
            .body(Body::empty())
            .unwrap();
        let response = create_test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Your Location"));
    }

    #[tokio::test]
    async fn test_map_handler_propagates_outcome() {
        let (status, json) = get_json(create_test_app(), "/api/v1/map?address=nowhere").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["outcome"], "address_unresolved");
    }

    #[tokio::test]
    async fn test_map_handler_without_renderer() {
        let app = create_test_app_with(sample_carriers(), false);
        let (status, json) = get_json(app, "/api/v1/map?address=Origin").await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(json["outcome"], "render_unavailable");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = get(create_test_app(), "/api/v1/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ===== Status Mapping Tests =====

    #[test]
    fn test_status_for_outcomes() {
        let cases = vec![
            (LocateOutcome::EmptyAddress, StatusCode::BAD_REQUEST),
            (LocateOutcome::NoDataAvailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                LocateOutcome::AddressUnresolved {
                    address: "x".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                LocateOutcome::GeocodingFailed {
                    address: "x".to_string(),
                    reason: "timeout".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                LocateOutcome::NoCarriersFound {
                    address: "x".to_string(),
                    location: point(0.0, 0.0),
                },
                StatusCode::NOT_FOUND,
            ),
        ];

        for (outcome, expected) in cases {
            assert_eq!(status_for(&outcome), expected, "Failed for {:?}", outcome);
        }
    }
}
