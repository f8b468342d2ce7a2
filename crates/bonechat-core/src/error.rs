use thiserror::Error;

/// Top-level error type for the bonechat system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for BonechatError` so that the `?` operator works
/// across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BonechatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Image analysis error: {0}")]
    Analysis(String),

    #[error("Dialogue error: {0}")]
    Dialogue(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for BonechatError {
    fn from(err: toml::de::Error) -> Self {
        BonechatError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BonechatError {
    fn from(err: toml::ser::Error) -> Self {
        BonechatError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BonechatError {
    fn from(err: serde_json::Error) -> Self {
        BonechatError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for bonechat operations.
pub type Result<T> = std::result::Result<T, BonechatError>;
