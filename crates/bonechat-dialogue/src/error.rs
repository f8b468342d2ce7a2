//! Error types for the dialogue client.

use std::time::Duration;

use bonechat_core::error::BonechatError;

/// Errors from one conversational turn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogueError {
    #[error("prompt cannot be empty")]
    EmptyPrompt,
    #[error("dialogue service unavailable: {0}")]
    Unavailable(String),
    #[error("malformed dialogue response: {0}")]
    Malformed(String),
    #[error("dialogue service timed out after {0:?}")]
    Timeout(Duration),
}

impl From<DialogueError> for BonechatError {
    fn from(err: DialogueError) -> Self {
        BonechatError::Dialogue(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialogue_error_display() {
        assert_eq!(DialogueError::EmptyPrompt.to_string(), "prompt cannot be empty");
        assert_eq!(
            DialogueError::Unavailable("503".to_string()).to_string(),
            "dialogue service unavailable: 503"
        );
        assert_eq!(
            DialogueError::Malformed("no text".to_string()).to_string(),
            "malformed dialogue response: no text"
        );
        assert_eq!(
            DialogueError::Timeout(Duration::from_millis(1500)).to_string(),
            "dialogue service timed out after 1.5s"
        );
    }

    #[test]
    fn test_into_bonechat_error() {
        let err: BonechatError = DialogueError::EmptyPrompt.into();
        assert!(matches!(err, BonechatError::Dialogue(_)));
    }
}
