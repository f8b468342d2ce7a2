//! Conversation state and the follow-up dispatch table.
//!
//! Two phases:
//! Idle -> AwaitingFollowUp (classification reported)
//! AwaitingFollowUp -> Idle (any text reply, or a failed classification)

use bonechat_core::types::ChatEntry;
use serde::{Deserialize, Serialize};

use crate::transcript::Transcript;

/// Whether a yes/no follow-up question is outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePhase {
    #[default]
    Idle,
    AwaitingFollowUp,
}

/// Interpretation of a normalized text submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Affirm,
    Decline,
    Other,
}

impl Reply {
    /// Classify already-normalized text. Only exact "yes"/"no" count.
    pub fn interpret(normalized: &str) -> Self {
        match normalized {
            "yes" => Reply::Affirm,
            "no" => Reply::Decline,
            _ => Reply::Other,
        }
    }
}

/// Where a text submission goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Ask the dialogue service about the pending subject.
    FollowUpDetails { subject: String },
    /// Close the follow-up without any downstream call.
    Close,
    /// Forward the user's own text to the dialogue service.
    Converse,
}

/// Subject used when a follow-up is pending without a recorded subject.
pub const UNKNOWN_SUBJECT: &str = "unknown body part";

/// Resolve a reply against the current phase.
///
/// Every pairing is listed; free text is the explicit default.
pub fn dispatch(phase: DialoguePhase, reply: Reply, pending_subject: Option<&str>) -> Route {
    match (phase, reply) {
        (DialoguePhase::AwaitingFollowUp, Reply::Affirm) => Route::FollowUpDetails {
            subject: pending_subject.unwrap_or(UNKNOWN_SUBJECT).to_string(),
        },
        (DialoguePhase::AwaitingFollowUp, Reply::Decline) => Route::Close,
        (DialoguePhase::AwaitingFollowUp, Reply::Other) => Route::Converse,
        (DialoguePhase::Idle, _) => Route::Converse,
    }
}

/// Trim and lowercase raw user input.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// State of one conversation.
///
/// Exclusively owned by a `ChatOrchestrator`; display consumers only see
/// `ConversationSnapshot`s.
#[derive(Debug, Default)]
pub struct ConversationState {
    transcript: Transcript,
    pending_subject: Option<String>,
    phase: DialoguePhase,
    busy: bool,
    /// Bumped on restart so results of calls started earlier are dropped.
    epoch: u64,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn pending_subject(&self) -> Option<&str> {
        self.pending_subject.as_deref()
    }

    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn append(&mut self, entry: ChatEntry) {
        self.transcript.append(entry);
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// A classification was reported and the follow-up question posed.
    pub(crate) fn await_follow_up(&mut self, subject: String) {
        self.pending_subject = Some(subject);
        self.phase = DialoguePhase::AwaitingFollowUp;
    }

    /// Drop back to Idle. The pending subject is kept until overwritten.
    pub(crate) fn settle(&mut self) {
        self.phase = DialoguePhase::Idle;
    }

    /// Route a normalized text reply and leave the follow-up phase.
    ///
    /// The phase is consumed here, before any downstream call is awaited,
    /// so two overlapping replies cannot both resolve the same follow-up.
    pub(crate) fn take_route(&mut self, normalized: &str) -> Route {
        let route = dispatch(
            self.phase,
            Reply::interpret(normalized),
            self.pending_subject.as_deref(),
        );
        self.settle();
        route
    }

    /// Forget everything and start a new epoch.
    pub(crate) fn restart(&mut self) {
        *self = Self {
            epoch: self.epoch.wrapping_add(1),
            ..Self::default()
        };
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            phase: self.phase,
            pending_subject: self.pending_subject.clone(),
            busy: self.busy,
            transcript: self.transcript.all(),
        }
    }
}

/// Serializable read-only projection of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    pub phase: DialoguePhase,
    pub pending_subject: Option<String>,
    pub busy: bool,
    pub transcript: Vec<ChatEntry>,
}
