use super::tool::ToolCall;
use serde::{Deserialize, Serialize};

/// Provider-agnostic chat message, tagged by role on the wire.
///
/// The optional `name` attributes a message to a specific speaker when
/// several agents share one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// Instructions for the model
    System {
        content: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    /// Message shown to the model as user input
    #[serde(rename = "user")]
    Human {
        content: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    /// Model output, possibly carrying tool calls
    #[serde(rename = "assistant")]
    AI {
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,

        #[serde(skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCall>>,

        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    /// Result of one tool call
    Tool {
        tool_call_id: String,
        content: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
            name: None,
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
            name: None,
        }
    }

    /// User-role message attributed to a named speaker
    pub fn human_from(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
            name: Some(name.into()),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::AI {
            content: Some(content.into()),
            tool_calls: None,
            name: None,
        }
    }

    /// Assistant-role message attributed to a named speaker
    pub fn ai_from(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::AI {
            content: Some(content.into()),
            tool_calls: None,
            name: Some(name.into()),
        }
    }

    /// Assistant message carrying tool calls (and any text produced with them)
    pub fn ai_with_tools(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::AI {
            content,
            tool_calls: Some(tool_calls),
            name: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    pub fn role(&self) -> &str {
        match self {
            Self::System { .. } => "system",
            Self::Human { .. } => "user",
            Self::AI { .. } => "assistant",
            Self::Tool { .. } => "tool",
        }
    }
}
