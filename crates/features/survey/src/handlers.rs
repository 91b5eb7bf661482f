use crate::{Survey, Sweep, SweepError};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ogmap_derive::{api_handler, api_model};
use ogmap_kernel::domain::constants::INFRASTRUCTURE_TAG;
use ogmap_kernel::domain::facility::Facility;
use ogmap_kernel::server::ApiState;
use tracing::error;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const KEY_MISSING: &str = "Google Maps API key not configured. \
                           Please set GOOGLE_MAPS_API_KEY in your environment variables.";
const FETCH_FAILED: &str = "Failed to fetch infrastructure data";

#[api_model]
/// Deduplicated facilities of one sweep
pub struct InfrastructureResponse {
    pub success: bool,
    /// Number of facilities in `data`
    pub count: usize,
    #[cfg_attr(feature = "server", schema(value_type = Vec<Object>))]
    pub data: Vec<Facility>,
}

impl From<Sweep> for InfrastructureResponse {
    fn from(sweep: Sweep) -> Self {
        let data = sweep.into_facilities();
        Self { success: true, count: data.len(), data }
    }
}

#[api_model]
/// Failure envelope
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self { success: false, error: error.into(), details }
    }
}

#[api_model]
/// Browser key for the map front-end
pub struct ConfigResponse {
    pub google_maps_api_key: String,
}

impl IntoResponse for SweepError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Configuration { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(KEY_MISSING, None))
            }
            Self::Cancelled { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new("Sweep cancelled: server is shutting down", Some(self.to_string())),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(FETCH_FAILED, Some(self.to_string())),
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[api_handler(
    get,
    path = "/api/infrastructure",
    responses(
        (status = OK, description = "Sweep finished (possibly with skipped calls)", body = InfrastructureResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Key missing or sweep failed", body = ErrorResponse),
        (status = SERVICE_UNAVAILABLE, description = "Server shutting down", body = ErrorResponse),
    ),
    tag = INFRASTRUCTURE_TAG,
)]
pub(crate) async fn infrastructure_handler(State(state): State<ApiState>) -> Response {
    let survey = match state.try_get_slice::<Survey>() {
        Ok(survey) => survey.clone(),
        Err(err) => {
            error!(error = %err, "Survey slice missing");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(FETCH_FAILED, Some(err.to_string()))),
            )
                .into_response();
        }
    };

    match survey.aggregator.aggregate_detached(state.shutdown_signal()).await {
        Ok(sweep) => Json(InfrastructureResponse::from(sweep)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[api_handler(
    get,
    path = "/api/config",
    responses(
        (status = OK, description = "Key for the map script", body = ConfigResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Key missing", body = ErrorResponse),
    ),
    tag = INFRASTRUCTURE_TAG,
)]
pub(crate) async fn config_handler(State(state): State<ApiState>) -> Response {
    let key = state
        .get_slice::<Survey>()
        .and_then(|survey| survey.aggregator.credentials().api_key());

    match key {
        Some(key) => {
            Json(ConfigResponse { google_maps_api_key: key.expose().to_owned() }).into_response()
        }
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Google Maps API key not configured", None)),
        )
            .into_response(),
    }
}

/// `/api/infrastructure` and `/api/config`.
pub fn survey_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(infrastructure_handler)).routes(routes!(config_handler))
}
