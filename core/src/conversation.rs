//! Prior conversation turns used as synthesis context.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "human")]
    User,
    #[serde(alias = "ai")]
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
            Self::System => "System",
        };
        f.write_str(label)
    }
}

/// One message of prior chat context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Render as a single `Role: content` line.
    pub fn render(&self) -> String {
        format!("{}: {}", self.role, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_turn() {
        assert_eq!(ConversationTurn::user("hi").render(), "User: hi");
        assert_eq!(
            ConversationTurn::assistant("hello").render(),
            "Assistant: hello"
        );
    }

    #[test]
    fn test_role_aliases() {
        let turn: ConversationTurn =
            serde_json::from_str(r#"{"role": "human", "content": "q"}"#).unwrap();
        assert_eq!(turn.role, Role::User);
    }
}
