use crate::controller::{health_check_controller, upload_controller, ErrorResponse, StatusResponse};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use log::*;
use service::config::Config;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI document. To be a part
// of the rendered document, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Meeting Summarizer API"
        ),
        paths(
            health_check_controller::index,
            health_check_controller::health_check,
            upload_controller::upload,
        ),
        components(
            schemas(
                domain::pipeline::PipelineResult,
                domain::Summary,
                domain::StructuredSummary,
                domain::RawSummary,
                ErrorResponse,
                StatusResponse,
            )
        ),
        tags(
            (name = "meeting_summarizer", description = "Meeting recording transcription and summarization API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config);

    Router::new()
        .merge(health_routes())
        .merge(upload_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .layer(cors)
}

fn health_routes() -> Router {
    Router::new()
        .route("/", get(health_check_controller::index))
        .route("/health", get(health_check_controller::health_check))
}

fn upload_routes(app_state: AppState) -> Router {
    let max_upload_bytes = app_state.config.max_upload_bytes;

    Router::new()
        .route("/upload", post(upload_controller::upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(app_state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_state(args: &[&str]) -> AppState {
        let mut argv = vec!["meeting_summarizer_rs"];
        argv.extend_from_slice(args);
        AppState::new(Config::from_args(argv).set_openai_api_key(None))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/upload")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let response = define_routes(app_state(&["--allowed-origins", "*"]))
            .oneshot(preflight("https://notes.example.com"))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("*"))
        );
    }

    #[tokio::test]
    async fn test_cors_restricts_to_configured_origins() {
        let app = define_routes(app_state(&[
            "--allowed-origins",
            "https://app.example.com",
        ]));

        let allowed = app
            .clone()
            .oneshot(preflight("https://app.example.com"))
            .await
            .unwrap();
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("https://app.example.com"))
        );

        let denied = app.oneshot(preflight("https://evil.example.com")).await.unwrap();
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_openapi_document_lists_routes() {
        let response = define_routes(app_state(&[]))
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document: Value = serde_json::from_slice(&body).unwrap();
        for path in ["/", "/health", "/upload"] {
            assert!(document["paths"].get(path).is_some(), "missing {path}");
        }
    }
}
