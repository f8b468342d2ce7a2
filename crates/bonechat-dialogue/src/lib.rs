//! Dialogue client.
//!
//! Provides the `DialogueService` trait for one-shot conversational turns,
//! an `HttpDialogue` client for the chat service, and a
//! `MockDialogueService` for testing.

pub mod error;
pub mod http_dialogue;

use std::sync::Mutex;

use async_trait::async_trait;

pub use error::DialogueError;
pub use http_dialogue::HttpDialogue;

/// Service that answers a single free-text prompt.
///
/// Stateless from the caller's side: no prior turns are forwarded.
#[async_trait]
pub trait DialogueService: Send + Sync {
    /// Send one prompt and return the reply text.
    async fn converse(&self, prompt: &str) -> Result<String, DialogueError>;
}

/// Mock dialogue service for testing.
///
/// Records every prompt. Replies with a fixed outcome, or echoes the prompt
/// when built with `echo()`.
#[derive(Debug)]
pub struct MockDialogueService {
    reply: Option<Result<String, DialogueError>>,
    prompts: Mutex<Vec<String>>,
}

impl MockDialogueService {
    /// A mock that replies `"Echo: {prompt}"`.
    pub fn echo() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A mock that always replies with the given text.
    pub fn with_reply(text: &str) -> Self {
        Self {
            reply: Some(Ok(text.to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A mock that always fails with the given error.
    pub fn failing(err: DialogueError) -> Self {
        Self {
            reply: Some(Err(err)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl Default for MockDialogueService {
    fn default() -> Self {
        Self::echo()
    }
}

#[async_trait]
impl DialogueService for MockDialogueService {
    async fn converse(&self, prompt: &str) -> Result<String, DialogueError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if prompt.trim().is_empty() {
            return Err(DialogueError::EmptyPrompt);
        }
        match &self.reply {
            Some(reply) => reply.clone(),
            None => Ok(format!("Echo: {}", prompt)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echo() {
        let service = MockDialogueService::echo();
        assert_eq!(service.converse("hello").await.unwrap(), "Echo: hello");
    }

    #[tokio::test]
    async fn test_mock_fixed_reply() {
        let service = MockDialogueService::with_reply("Wrist fractures often happen from falls.");
        let reply = service.converse("wrist?").await.unwrap();
        assert_eq!(reply, "Wrist fractures often happen from falls.");
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let service = MockDialogueService::failing(DialogueError::Unavailable("down".into()));
        let err = service.converse("hi").await.unwrap_err();
        assert_eq!(err, DialogueError::Unavailable("down".into()));
    }

    #[tokio::test]
    async fn test_mock_empty_prompt() {
        let service = MockDialogueService::echo();
        assert_eq!(
            service.converse("  ").await.unwrap_err(),
            DialogueError::EmptyPrompt
        );
    }

    #[tokio::test]
    async fn test_mock_records_prompts() {
        let service = MockDialogueService::echo();
        service.converse("one").await.unwrap();
        service.converse("two").await.unwrap();
        assert_eq!(service.prompts(), vec!["one".to_string(), "two".to_string()]);
        assert_eq!(service.call_count(), 2);
    }
}
