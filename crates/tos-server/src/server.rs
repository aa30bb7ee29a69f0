use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use tos_engine::{Pipeline, PipelineError};
use tos_sources::{InputForm, SourceError, Upload};

pub struct AnalysisServer;

#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
    max_upload_bytes: usize,
}

impl AnalysisServer {
    pub async fn serve(
        pipeline: Arc<Pipeline>,
        host: &str,
        port: u16,
        max_upload_bytes: usize,
    ) -> anyhow::Result<()> {
        let app = router(pipeline, max_upload_bytes);

        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr).await?;

        info!("Analysis server listening on {}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

pub fn router(pipeline: Arc<Pipeline>, max_upload_bytes: usize) -> Router {
    // Allow browser form posts from any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_info))
        .route("/api/summary", post(api_summary))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .with_state(AppState {
            pipeline,
            max_upload_bytes,
        })
}

/// GET /health - server info/health check
async fn handle_info() -> Json<serde_json::Value> {
    Json(json!({
        "name": "tos-digest",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok"
    }))
}

/// POST /api/summary - Analyze one document
async fn api_summary(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // Empty or non-multipart bodies carry no usable input
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected request body");
            return error_body(StatusCode::BAD_REQUEST, SourceError::NoInput.to_string());
        }
    };

    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => return form_error_response(&e, state.max_upload_bytes),
    };

    let document = match form.into_document() {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(error = %e, "rejected input");
            return error_body(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match state.pipeline.process(&document).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => pipeline_error_response(&e),
    }
}

async fn read_form(mut multipart: Multipart) -> Result<InputForm, MultipartError> {
    let mut form = InputForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" | "url" => {
                let value = field.text().await?;
                if name == "text" {
                    form.text = Some(value);
                } else {
                    form.url = Some(value);
                }
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.file = Some(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn form_error_response(err: &MultipartError, max_upload_bytes: usize) -> Response {
    let status = err.status();
    tracing::warn!(status = status.as_u16(), error = %err, "invalid form data");

    if status == StatusCode::PAYLOAD_TOO_LARGE {
        error_body(
            status,
            format!("Upload exceeds the {} byte limit.", max_upload_bytes),
        )
    } else {
        error_body(status, format!("Invalid form data: {}", err.body_text()))
    }
}

fn pipeline_error_response(err: &PipelineError) -> Response {
    match err {
        PipelineError::Source(e) if e.is_input_error() => {
            error_body(StatusCode::BAD_REQUEST, e.to_string())
        }
        PipelineError::Source(e @ SourceError::Extraction(_)) => {
            tracing::warn!(error = %e, "document processing failed");
            error_body(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        PipelineError::Source(e) => {
            tracing::warn!(error = %e, "document fetch failed");
            error_body(StatusCode::BAD_GATEWAY, e.to_string())
        }
        PipelineError::Completion { .. } => {
            tracing::error!(error = %err, "analysis failed");
            error_body(StatusCode::BAD_GATEWAY, "Failed to analyze document.".to_string())
        }
        PipelineError::Options(_) => {
            tracing::error!(error = %err, "pipeline misconfigured");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal error.".to_string())
        }
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tos_analyzer::{ChunkAnalyzer, CompletionClient, CompletionError};
    use tos_engine::PipelineOptions;
    use tos_sources::{FetchOptions, SourceHandlerRegistry};
    use tower::ServiceExt;

    const BOUNDARY: &str = "tos-test-boundary";

    struct StaticClient {
        fail: bool,
    }

    #[async_trait]
    impl CompletionClient for StaticClient {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
            if self.fail {
                return Err(CompletionError::Timeout);
            }
            Ok(r#"{"summary":"Looks standard.","red_flags":["Arbitration"],"financial_clauses":[],"recommendations":[]}"#.to_string())
        }
    }

    fn app(fail: bool) -> Router {
        app_with_limit(fail, 1024 * 1024)
    }

    fn app_with_limit(fail: bool, max_upload_bytes: usize) -> Router {
        let sources = SourceHandlerRegistry::new(FetchOptions::default()).unwrap();
        let analyzer = ChunkAnalyzer::new(Arc::new(StaticClient { fail }));
        let pipeline = Pipeline::new(sources, analyzer, PipelineOptions::default()).unwrap();
        router(Arc::new(pipeline), max_upload_bytes)
    }

    fn multipart(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, filename, value) in parts {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            match filename {
                Some(filename) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    name, filename
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                )),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));

        Request::builder()
            .method("POST")
            .uri("/api/summary")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_text_submission() {
        let response = app(false)
            .oneshot(multipart(&[("text", None, "Email me at a@b.com. You waive class actions.")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["analysis"]["summary"], "Looks standard.");
        assert_eq!(body["analysis"]["red_flags"], json!(["Arbitration"]));
        assert_eq!(body["redacted"], json!(["a@b.com"]));
        assert_eq!(body["truncated"], false);
    }

    #[tokio::test]
    async fn test_file_submission() {
        let response = app(false)
            .oneshot(multipart(&[("file", Some("terms.txt"), "Fees are non-refundable.")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_no_input_is_client_error() {
        let response = app(false)
            .oneshot(multipart(&[("text", None, "   ")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No valid input provided.");
    }

    #[tokio::test]
    async fn test_two_inputs_is_client_error() {
        let response = app(false)
            .oneshot(multipart(&[
                ("text", None, "Some terms."),
                ("url", None, "https://example.com/tos"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_completion_failure_is_generic_gateway_error() {
        let response = app(true)
            .oneshot(multipart(&[("text", None, "Some terms.")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to analyze document.");
    }

    #[tokio::test]
    async fn test_unreadable_file_is_unprocessable() {
        let response = app(false)
            .oneshot(multipart(&[("file", Some("terms.docx"), "not a zip archive")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_empty_body_is_json_client_error() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/summary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No valid input provided.");
    }

    #[tokio::test]
    async fn test_urlencoded_body_is_json_client_error() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/summary")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("text=Some+terms."))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No valid input provided.");
    }

    #[tokio::test]
    async fn test_oversized_upload_names_the_limit() {
        let large = "x".repeat(4096);
        let response = app_with_limit(false, 512)
            .oneshot(multipart(&[("file", Some("terms.txt"), large.as_str())]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Upload exceeds the 512 byte limit.");
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }
}
