//! HTTP client for the conversational service.
//!
//! Posts `{"message": prompt}` to `{base_url}/chat` and reads the reply from
//! `{"response": ...}`.

use std::time::Duration;

use async_trait::async_trait;
use bonechat_core::config::DialogueConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{DialogueError, DialogueService};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Dialogue client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpDialogue {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpDialogue {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DialogueError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DialogueError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Create a client from the `[dialogue]` config section.
    pub fn from_config(config: &DialogueConfig) -> Result<Self, DialogueError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    fn transport_error(&self, err: reqwest::Error) -> DialogueError {
        if err.is_timeout() {
            DialogueError::Timeout(self.timeout)
        } else if err.is_decode() {
            DialogueError::Malformed(err.to_string())
        } else {
            DialogueError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl DialogueService for HttpDialogue {
    async fn converse(&self, prompt: &str) -> Result<String, DialogueError> {
        if prompt.trim().is_empty() {
            return Err(DialogueError::EmptyPrompt);
        }

        tracing::debug!(url = %self.endpoint(), prompt_len = prompt.len(), "Sending prompt");

        let response = self
            .client
            .post(self.endpoint())
            .json(&ChatRequest { message: prompt })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(DialogueError::Unavailable(format!(
                "dialogue service returned {}: {}",
                status, detail
            )));
        }

        let reply: ChatReply = response.json().await.map_err(|e| self.transport_error(e))?;
        reply
            .response
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| DialogueError::Malformed("missing `response` text".to_string()))
    }
}
