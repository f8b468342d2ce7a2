//! Image analysis client.
//!
//! Provides the `ImageAnalyzer` trait for classifying a radiograph, an
//! `HttpPredictor` that talks to the predictor service over HTTP, and a
//! `MockImageAnalyzer` for testing.

pub mod error;
pub mod http_predictor;

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::AnalysisError;
pub use http_predictor::HttpPredictor;

/// Result of classifying one radiograph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Classification label, e.g. "fractured".
    pub label: String,
    /// Affected body region, e.g. "Elbow".
    pub subject: String,
}

impl Classification {
    pub fn new(label: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            subject: subject.into(),
        }
    }
}

/// Service that classifies radiograph images.
///
/// Implementations perform exactly one attempt per call; retry policy is
/// the caller's business.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Classify raw image bytes.
    ///
    /// The payload must be non-empty; format and size checks belong to the
    /// remote service.
    async fn classify(&self, image: &[u8]) -> Result<Classification, AnalysisError>;
}

/// Mock analyzer for testing.
///
/// Returns a fixed outcome for every call and records the size of each
/// payload it was handed.
#[derive(Debug)]
pub struct MockImageAnalyzer {
    outcome: Result<Classification, AnalysisError>,
    calls: Mutex<Vec<usize>>,
}

impl MockImageAnalyzer {
    /// A mock that always succeeds with the given label and subject.
    pub fn with_result(label: &str, subject: &str) -> Self {
        Self {
            outcome: Ok(Classification::new(label, subject)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A mock that always fails with the given error.
    pub fn failing(err: AnalysisError) -> Self {
        Self {
            outcome: Err(err),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of times `classify` was invoked.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Payload sizes seen so far, in call order.
    pub fn payload_sizes(&self) -> Vec<usize> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Default for MockImageAnalyzer {
    fn default() -> Self {
        Self::with_result("fractured", "Elbow")
    }
}

#[async_trait]
impl ImageAnalyzer for MockImageAnalyzer {
    async fn classify(&self, image: &[u8]) -> Result<Classification, AnalysisError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(image.len());
        }
        if image.is_empty() {
            return Err(AnalysisError::EmptyImage);
        }
        self.outcome.clone()
    }
}
