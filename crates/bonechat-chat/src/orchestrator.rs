//! Chat orchestrator: owns one conversation and routes user actions.
//!
//! Image submissions go to the predictor, text submissions to the dialogue
//! service or the fixed follow-up replies. Service failures never escape;
//! they become a single apology entry in the transcript.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bonechat_core::config::ChatConfig;
use bonechat_core::types::ChatEntry;
use bonechat_dialogue::{DialogueError, DialogueService};
use bonechat_predictor::{AnalysisError, Classification, ImageAnalyzer};

use crate::error::ChatError;
use crate::state::{normalize, ConversationSnapshot, ConversationState, Route};
use crate::transcript::Transcript;

/// Placeholder posted as soon as an image is accepted.
pub const ANALYZING_PLACEHOLDER: &str = "Analyzing the X-ray image...";
/// Yes/no question posed after every successful classification.
pub const FOLLOW_UP_PROMPT: &str =
    "Would you like more information about the fracture in the body part?";
/// Reply to a "no" while a follow-up is pending.
pub const CLOSING_REMARK: &str = "If you have any other questions, feel free to ask!";
pub const ANALYSIS_APOLOGY: &str = "Sorry, there was an issue processing the image.";
pub const DIALOGUE_APOLOGY: &str = "Sorry, I couldn't retrieve the details. Please try again later.";

/// Prompt sent to the dialogue service when the user accepts the follow-up.
pub fn follow_up_details_prompt(subject: &str) -> String {
    format!("tell me more about the fracture in my {}", subject)
}

/// Entries reporting a classification, in display order.
fn classification_entries(classification: &Classification) -> [ChatEntry; 3] {
    [
        ChatEntry::system(format!("Prediction: {}", classification.label)),
        ChatEntry::system(format!("Body part affected: {}", classification.subject)),
        ChatEntry::system(FOLLOW_UP_PROMPT),
    ]
}

/// Coordinates one conversation between the user and the two services.
///
/// All methods take `&self`; the state lock is never held across an await,
/// so a second action can arrive while a call is in flight. Image
/// submissions are guarded by the busy flag, text submissions are not.
pub struct ChatOrchestrator {
    analyzer: Arc<dyn ImageAnalyzer>,
    dialogue: Arc<dyn DialogueService>,
    state: Mutex<ConversationState>,
    analysis_timeout: Duration,
    dialogue_timeout: Duration,
}

impl ChatOrchestrator {
    pub fn new(
        analyzer: Arc<dyn ImageAnalyzer>,
        dialogue: Arc<dyn DialogueService>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            analyzer,
            dialogue,
            state: Mutex::new(ConversationState::new()),
            analysis_timeout: Duration::from_secs(config.analysis_timeout_secs),
            dialogue_timeout: Duration::from_secs(config.dialogue_timeout_secs),
        }
    }

    /// Override the per-call timeouts.
    pub fn with_timeouts(mut self, analysis: Duration, dialogue: Duration) -> Self {
        self.analysis_timeout = analysis;
        self.dialogue_timeout = dialogue;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        // Nothing panics while holding the lock, so a poisoned state is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit an image for classification.
    ///
    /// Returns the entries this action appended, in order. An empty payload
    /// is rejected with `NoImageSelected` and a submission while another
    /// image is in flight with `AlreadyBusy`; neither touches the transcript.
    pub async fn submit_image(&self, image: &[u8]) -> Result<Vec<ChatEntry>, ChatError> {
        if image.is_empty() {
            return Err(ChatError::NoImageSelected);
        }

        let placeholder = ChatEntry::user(ANALYZING_PLACEHOLDER);
        let epoch = {
            let mut state = self.lock();
            if state.is_busy() {
                tracing::debug!("Image rejected, analysis already in flight");
                return Err(ChatError::AlreadyBusy);
            }
            state.set_busy(true);
            state.append(placeholder.clone());
            state.epoch()
        };
        let mut in_flight = InFlight::new(&self.state, epoch);

        tracing::info!(bytes = image.len(), "Classifying image");
        let outcome = match tokio::time::timeout(self.analysis_timeout, self.analyzer.classify(image))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout(self.analysis_timeout)),
        };

        let mut state = self.lock();
        in_flight.disarm();
        if state.epoch() != epoch {
            tracing::debug!("Session restarted during analysis, discarding result");
            return Ok(Vec::new());
        }
        state.set_busy(false);

        let mut appended = vec![placeholder];
        match outcome {
            Ok(classification) => {
                tracing::info!(
                    label = %classification.label,
                    subject = %classification.subject,
                    "Classification reported"
                );
                for entry in classification_entries(&classification) {
                    state.append(entry.clone());
                    appended.push(entry);
                }
                state.await_follow_up(classification.subject);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Image analysis failed");
                let apology = ChatEntry::system(ANALYSIS_APOLOGY);
                state.append(apology.clone());
                appended.push(apology);
                state.settle();
            }
        }
        Ok(appended)
    }

    /// Submit a line of free text.
    ///
    /// The text is trimmed and lowercased, recorded as a user entry, then
    /// routed: "yes"/"no" resolve a pending follow-up, anything else (or any
    /// text while idle) goes to the dialogue service as-is. Returns the
    /// entries this action appended.
    pub async fn submit_text(&self, raw: &str) -> Vec<ChatEntry> {
        let text = normalize(raw);
        let user_entry = ChatEntry::user(text.clone());

        let (route, epoch) = {
            let mut state = self.lock();
            state.append(user_entry.clone());
            (state.take_route(&text), state.epoch())
        };
        tracing::debug!(route = ?route, "Text routed");

        let reply = match route {
            Route::Close => ChatEntry::system(CLOSING_REMARK),
            Route::FollowUpDetails { subject } => {
                self.converse(&follow_up_details_prompt(&subject)).await
            }
            Route::Converse => self.converse(&text).await,
        };

        let mut state = self.lock();
        if state.epoch() != epoch {
            tracing::debug!("Session restarted during dialogue, discarding reply");
            return Vec::new();
        }
        state.append(reply.clone());
        vec![user_entry, reply]
    }

    async fn converse(&self, prompt: &str) -> ChatEntry {
        let outcome = match tokio::time::timeout(self.dialogue_timeout, self.dialogue.converse(prompt))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(DialogueError::Timeout(self.dialogue_timeout)),
        };

        match outcome {
            Ok(text) => ChatEntry::system(text),
            Err(e) => {
                tracing::warn!(error = %e, "Dialogue call failed");
                ChatEntry::system(DIALOGUE_APOLOGY)
            }
        }
    }

    /// Start over: empty transcript, no pending follow-up, not busy.
    ///
    /// Calls still in flight finish, but their results are dropped.
    pub fn restart(&self) {
        self.lock().restart();
        tracing::info!("Conversation restarted");
    }

    /// Read-only copy of the transcript.
    pub fn transcript(&self) -> Transcript {
        self.lock().transcript().clone()
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        self.lock().snapshot()
    }
}

/// Clears the busy flag if an analysis future is dropped before completing.
struct InFlight<'a> {
    state: &'a Mutex<ConversationState>,
    epoch: u64,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<ConversationState>, epoch: u64) -> Self {
        Self {
            state,
            epoch,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.epoch() == self.epoch {
            state.set_busy(false);
        }
    }
}
