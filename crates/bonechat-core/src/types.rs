//! Shared domain types: transcript entries and their roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Something the user did or typed.
    User,
    /// Anything the assistant reports back.
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::System => write!(f, "system"),
        }
    }
}

/// One unit of transcript.
///
/// `content` may carry lightweight markup from the dialogue service; the
/// chat engine treats it as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: Role,
    pub content: String,
}

impl ChatEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_role() {
        assert_eq!(ChatEntry::user("hi").role, Role::User);
        assert_eq!(ChatEntry::system("hello").role, Role::System);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::System.to_string(), "system");
    }

    #[test]
    fn test_entry_serializes_lowercase_role() {
        let json = serde_json::to_value(ChatEntry::system("Prediction: fractured")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "Prediction: fractured");
    }
}
