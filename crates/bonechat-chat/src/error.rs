//! Error types for the conversation engine.
//!
//! Only input-validation failures surface as errors. Downstream service
//! failures are absorbed by the orchestrator and become transcript entries.

use bonechat_core::error::BonechatError;

/// Errors from the chat engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("no image selected")]
    NoImageSelected,
    #[error("an image is already being analyzed")]
    AlreadyBusy,
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
}

impl From<ChatError> for BonechatError {
    fn from(err: ChatError) -> Self {
        BonechatError::Chat(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::NoImageSelected.to_string(), "no image selected");
        assert_eq!(
            ChatError::AlreadyBusy.to_string(),
            "an image is already being analyzed"
        );
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            ChatError::SessionNotFound(id).to_string(),
            "session not found: 550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_into_bonechat_error() {
        let err: BonechatError = ChatError::AlreadyBusy.into();
        assert!(matches!(err, BonechatError::Chat(_)));
        assert!(err.to_string().contains("already being analyzed"));
    }
}
