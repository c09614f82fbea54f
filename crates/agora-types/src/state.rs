use serde::{Deserialize, Serialize};

/// Reserved source for messages typed by the human user.
pub const USER_SOURCE: &str = "user";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub source: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(USER_SOURCE, content)
    }

    pub fn is_from_user(&self) -> bool {
        self.source == USER_SOURCE
    }
}

/// The accumulating message sequence of one run.
///
/// The turn counter of a run is implicit: it is always `len()`, recomputed
/// wherever it is needed, never stored separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_task(task: ChatMessage) -> Self {
        Self {
            messages: vec![task],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// One `source: content` line per message, e.g. for selection prompts.
    pub fn render(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.source, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_tracks_length_and_last() {
        let mut transcript = Transcript::from_task(ChatMessage::user("hello"));
        assert_eq!(transcript.len(), 1);
        assert!(transcript.last().is_some_and(|m| m.is_from_user()));

        transcript.push(ChatMessage::new("Analyst", "looking into it"));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last().map(|m| m.source.as_str()), Some("Analyst"));
    }

    #[test]
    fn render_is_one_line_per_message() {
        let mut transcript = Transcript::from_task(ChatMessage::user("plan a trip"));
        transcript.push(ChatMessage::new("PlanAgent", "1. pick dates"));

        let rendered = transcript.render();
        assert_eq!(rendered, "user: plan a trip\nPlanAgent: 1. pick dates");
    }
}
