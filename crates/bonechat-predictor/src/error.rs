//! Error types for the image analysis client.

use std::time::Duration;

use bonechat_core::error::BonechatError;

/// Errors from classifying a radiograph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("image payload is empty")]
    EmptyImage,
    #[error("predictor unavailable: {0}")]
    Unavailable(String),
    #[error("malformed predictor response: {0}")]
    Malformed(String),
    #[error("predictor timed out after {0:?}")]
    Timeout(Duration),
}

impl From<AnalysisError> for BonechatError {
    fn from(err: AnalysisError) -> Self {
        BonechatError::Analysis(err.to_string())
    }
}
