use axum::Router;
use ogmap::domain::constants::{INFRASTRUCTURE_TAG, SYSTEM_TAG};
use ogmap::kernel::prelude::ApiState;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(title = "OGMap", description = "Oil and gas infrastructure survey for Nigeria"),
    tags(
        (name = SYSTEM_TAG, description = "Service health"),
        (name = INFRASTRUCTURE_TAG, description = "Facility sweeps and map configuration"),
    )
)]
struct ApiDoc;

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let static_dir = state.config.storage.static_dir.clone();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(ogmap::server::router::system_router())
        .merge(ogmap::server::router::survey_router())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/docs", api_doc);

    // Anything that is not an API route is served from the front-end directory
    Router::new()
        .merge(openapi_routes)
        .merge(scalar_routes)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
