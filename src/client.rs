use crate::api::FILE_FIELD;
use crate::processing::{Prediction, PredictionResult};
use reqwest::{
    Client, StatusCode,
    multipart::{Form, Part},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default server address used by the command-line client.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Errors surfaced to users of [`PredictionClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The local file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The server could not be reached or the request could not be built.
    #[error("Failed to connect to server: {0}")]
    Connect(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("Server error: {body}")]
    Server {
        /// HTTP status returned.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },
    /// The server processed the upload but reported an error payload.
    #[error("{0}")]
    Rejected(String),
}

/// Thin HTTP client for `POST /predict`.
pub struct PredictionClient {
    client: Client,
    base_url: String,
}

impl PredictionClient {
    /// Build a client targeting `base_url` (for example `http://127.0.0.1:5000`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(concat!("spam-check/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload the PDF at `path` and return the server's prediction.
    pub async fn predict_file(&self, path: &Path) -> Result<Prediction, ClientError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());
        self.predict_bytes(file_name, bytes).await
    }

    /// Upload raw PDF bytes under `file_name` and return the server's prediction.
    pub async fn predict_bytes(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<Prediction, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = Form::new().part(FILE_FIELD, part);

        tracing::debug!(url = %self.base_url, "Uploading document");
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Server { status, body });
        }

        match response.json::<PredictionResult>().await? {
            PredictionResult::Success(prediction) => Ok(prediction),
            PredictionResult::Failure { error } => Err(ClientError::Rejected(error)),
        }
    }
}
