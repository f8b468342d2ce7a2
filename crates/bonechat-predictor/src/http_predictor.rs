//! HTTP client for the radiograph predictor service.
//!
//! Sends the image as a multipart upload to `{base_url}/predict` and expects
//! `{"prediction": ..., "body_part": ...}` back.

use std::time::Duration;

use async_trait::async_trait;
use bonechat_core::config::PredictorConfig;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::{AnalysisError, Classification, ImageAnalyzer};

/// Multipart field name the predictor reads the upload from.
const FILE_FIELD: &str = "file";

/// Upload file name, unique per request. The predictor stages uploads on
/// disk under this name, so concurrent sessions must never share one.
fn upload_file_name() -> String {
    format!("{}.img", uuid::Uuid::new_v4())
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: Option<String>,
    body_part: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Predictor client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpPredictor {
    /// Create a client for the predictor at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Create a client from the `[predictor]` config section.
    pub fn from_config(config: &PredictorConfig) -> Result<Self, AnalysisError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    fn endpoint(&self) -> String {
        format!("{}/predict", self.base_url)
    }

    fn transport_error(&self, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            AnalysisError::Timeout(self.timeout)
        } else if err.is_decode() {
            AnalysisError::Malformed(err.to_string())
        } else {
            AnalysisError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl ImageAnalyzer for HttpPredictor {
    async fn classify(&self, image: &[u8]) -> Result<Classification, AnalysisError> {
        if image.is_empty() {
            return Err(AnalysisError::EmptyImage);
        }

        let part = Part::bytes(image.to_vec()).file_name(upload_file_name());
        let form = Form::new().part(FILE_FIELD, part);

        tracing::debug!(url = %self.endpoint(), bytes = image.len(), "Sending image to predictor");

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(AnalysisError::Unavailable(format!(
                "predictor returned {}: {}",
                status, detail
            )));
        }

        let body: PredictResponse = response.json().await.map_err(|e| self.transport_error(e))?;
        parse_classification(body)
    }
}

/// Both fields are required. A "normal, no fracture detected" answer carries
/// no `body_part`, so healthy scans come back as `Malformed` and the user
/// sees the analysis apology instead of a follow-up offer.
fn parse_classification(body: PredictResponse) -> Result<Classification, AnalysisError> {
    let label = body
        .prediction
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AnalysisError::Malformed("missing `prediction`".to_string()))?;
    let subject = body
        .body_part
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AnalysisError::Malformed("missing `body_part`".to_string()))?;
    Ok(Classification { label, subject })
}
