use super::{ApiState, health};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Routes every deployment exposes regardless of enabled slices.
pub fn system_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(health::health_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use ogmap_domain::config::ApiConfig;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_reports_up_and_disables_caching() -> Result<(), Box<dyn std::error::Error>> {
        let state = ApiState::builder().config(ApiConfig::default()).build()?;
        let (router, _) = system_router().with_state(state).split_for_parts();

        let response =
            router.oneshot(Request::builder().uri("/health").body(Body::empty())?).await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("cache-control").and_then(|v| v.to_str().ok()),
            Some("no-store, no-cache, must-revalidate")
        );

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(json["status"], "up");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}
