//! HTTP surface for the spam detector.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /predict` – Multipart upload with a `file` field holding a PDF. Returns
//!   `{ "prediction", "label", "text_length", "preview" }`, or `{ "error" }` when the first page
//!   has no usable text. A missing `file` field yields `400`; unreadable PDFs yield `500`.
//! - `GET /metrics` – Prediction counters.
//! - `GET /health` – Liveness plus a description of the loaded model.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools.

use crate::processing::{PredictionApi, PredictionError, PredictionResult};
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
use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Multipart field carrying the uploaded document.
pub const FILE_FIELD: &str = "file";

/// Build the HTTP router exposing the prediction API surface.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: PredictionApi + 'static,
{
    Router::new()
        .route("/predict", post(predict_document::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/health", get(get_health::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(service)
}

/// Classify an uploaded PDF.
///
/// Bodies that are not multipart, or that lack a `file` field, are rejected before any
/// processing. Empty first pages are reported with `200` and an `error` payload so clients can
/// tell "nothing to classify" apart from "could not parse".
async fn predict_document<S>(
    State(service): State<Arc<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictionResult>, AppError>
where
    S: PredictionApi,
{
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "Rejected non-multipart upload");
        AppError::NoFile
    })?;
    let document = read_file_field(multipart)
        .await
        .map_err(|err| AppError::Read(err.to_string()))?
        .ok_or(AppError::NoFile)?;

    match service.classify_document(document).await {
        Ok(prediction) => Ok(Json(PredictionResult::Success(prediction))),
        Err(PredictionError::EmptyContent) => Ok(Json(PredictionResult::failure(
            PredictionError::EmptyContent,
        ))),
        Err(err) => Err(AppError::Prediction(err)),
    }
}

async fn read_file_field(mut multipart: Multipart) -> Result<Option<Bytes>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            return field.bytes().await.map(Some);
        }
    }
    Ok(None)
}

/// Return prediction counters accumulated since startup.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<crate::metrics::MetricsSnapshot>
where
    S: PredictionApi,
{
    Json(service.metrics_snapshot())
}

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(flatten)]
    model: crate::processing::ModelSummary,
}

async fn get_health<S>(State(service): State<Arc<S>>) -> Json<HealthResponse>
where
    S: PredictionApi,
{
    Json(HealthResponse {
        status: "ok",
        model: service.model_summary(),
    })
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery by hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "predict",
                method: "POST",
                path: "/predict",
                description: "Upload a PDF as multipart field `file`; classifies its first page as SPAM or HAM and returns { \"prediction\", \"label\", \"text_length\", \"preview\" }.",
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return prediction counters useful for observability dashboards.",
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Report liveness and the vectorizer/classifier currently loaded.",
            },
        ],
    })
}

enum AppError {
    NoFile,
    Read(String),
    Prediction(PredictionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NoFile => (StatusCode::BAD_REQUEST, "No file provided".to_string()),
            Self::Read(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read PDF: {details}"),
            ),
            Self::Prediction(err @ PredictionError::Extraction(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            Self::Prediction(err) => {
                tracing::error!(error = %err, "Prediction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to read PDF: {err}"),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::{create_router, get_commands};
    use crate::extraction::ExtractionError;
    use crate::metrics::MetricsSnapshot;
    use crate::processing::{
        Label, ModelSummary, Prediction, PredictionApi, PredictionError,
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use bytes::Bytes;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const BOUNDARY: &str = "X-SPAM-DETECTOR-BOUNDARY";

    #[derive(Clone, Copy)]
    enum Outcome {
        Spam,
        Empty,
        Corrupt,
    }

    struct StubPredictionService {
        outcome: Outcome,
        uploads: Mutex<Vec<Bytes>>,
    }

    impl StubPredictionService {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                uploads: Mutex::new(Vec::new()),
            }
        }

        async fn uploads(&self) -> Vec<Bytes> {
            self.uploads.lock().await.clone()
        }
    }

    #[async_trait]
    impl PredictionApi for StubPredictionService {
        async fn classify_document(
            &self,
            document: Bytes,
        ) -> Result<Prediction, PredictionError> {
            self.uploads.lock().await.push(document);
            match self.outcome {
                Outcome::Spam => Ok(Prediction::new(Label::Spam, "buy now win free")),
                Outcome::Empty => Err(PredictionError::EmptyContent),
                Outcome::Corrupt => Err(ExtractionError::Parse("invalid file header".into()).into()),
            }
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                documents_received: 3,
                spam_detected: 2,
                ham_detected: 1,
                extraction_failures: 0,
                empty_documents: 0,
            }
        }

        fn model_summary(&self) -> ModelSummary {
            ModelSummary {
                vectorizer: "tfidf",
                classifier: "multinomial_nb",
                features: 42,
            }
        }
    }

    fn multipart_body(field: &str, contents: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"doc.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload(field: &str, contents: &[u8]) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/predict")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(field, contents)))
            .expect("request")
    }

    async fn send(
        service: Arc<StubPredictionService>,
        request: Request<Body>,
    ) -> (StatusCode, serde_json::Value) {
        let response = create_router(service, 1024 * 1024)
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json body");
        (status, json)
    }

    #[tokio::test]
    async fn predict_returns_success_shape() {
        let service = Arc::new(StubPredictionService::new(Outcome::Spam));
        let (status, json) = send(service.clone(), upload("file", b"%PDF-1.5 fake")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["label"], "SPAM");
        assert_eq!(json["prediction"], 1);
        assert_eq!(json["text_length"], 16);
        assert_eq!(json["preview"], "buy now win free");
        assert!(json.get("error").is_none());

        let uploads = service.uploads().await;
        assert_eq!(uploads.len(), 1);
        assert_eq!(&uploads[0][..], b"%PDF-1.5 fake");
    }

    #[tokio::test]
    async fn missing_file_field_is_a_bad_request() {
        let service = Arc::new(StubPredictionService::new(Outcome::Spam));
        let (status, json) = send(service.clone(), upload("attachment", b"%PDF")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({ "error": "No file provided" }));
        assert!(service.uploads().await.is_empty());
    }

    #[tokio::test]
    async fn non_multipart_body_is_a_bad_request() {
        let service = Arc::new(StubPredictionService::new(Outcome::Spam));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/predict")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .expect("request");
        let (status, json) = send(service, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No file provided");
    }

    #[tokio::test]
    async fn empty_page_is_reported_with_ok_status() {
        let service = Arc::new(StubPredictionService::new(Outcome::Empty));
        let (status, json) = send(service, upload("file", b"%PDF")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({ "error": "No valid text extracted from PDF" })
        );
    }

    #[tokio::test]
    async fn unreadable_pdf_is_a_server_error() {
        let service = Arc::new(StubPredictionService::new(Outcome::Corrupt));
        let (status, json) = send(service, upload("file", b"garbage")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Failed to read PDF: invalid file header");
    }

    #[tokio::test]
    async fn metrics_and_health_describe_service() {
        let service = Arc::new(StubPredictionService::new(Outcome::Spam));
        let metrics = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .expect("request");
        let (status, json) = send(service.clone(), metrics).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["documents_received"], 3);
        assert_eq!(json["spam_detected"], 2);

        let health = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request");
        let (status, json) = send(service, health).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["vectorizer"], "tfidf");
        assert_eq!(json["features"], 42);
    }

    #[tokio::test]
    async fn commands_catalog_exposes_predict_endpoint() {
        let response = get_commands().await;
        let commands = response.0.commands;
        let predict = commands
            .iter()
            .find(|cmd| cmd.name == "predict")
            .expect("predict command present");

        assert_eq!(predict.method, "POST");
        assert_eq!(predict.path, "/predict");
        assert!(predict.description.contains("file"));
        assert!(commands.len() >= 3);
    }
}
