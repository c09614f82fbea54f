use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Suggested opening message offered to new sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Starter {
    pub label: String,
    pub message: String,
}

impl Starter {
    pub fn new(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            message: message.into(),
        }
    }
}

/// Event pushed to the connected UI while a message is being handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Streamed fragment of a reply being written
    Token { text: String },
    /// A completed reply
    Message { text: String },
    ToolCall { name: String, arguments: String },
    ToolResult { result: String },
    Error { message: String },
    /// Terminal event, always sent last
    Done,
}

/// Sending half of the UI stream handed to [`ChatApp::on_message`].
#[derive(Clone)]
pub struct UiSink {
    tx: mpsc::Sender<UiEvent>,
}

impl UiSink {
    pub fn new(tx: mpsc::Sender<UiEvent>) -> Self {
        Self { tx }
    }

    /// Errors when the client has disconnected.
    pub async fn send(&self, event: UiEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| anyhow!("UI stream closed"))
    }

    pub async fn token(&self, text: impl Into<String>) -> Result<()> {
        self.send(UiEvent::Token { text: text.into() }).await
    }

    pub async fn message(&self, text: impl Into<String>) -> Result<()> {
        self.send(UiEvent::Message { text: text.into() }).await
    }

    pub async fn tool_call(
        &self,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Result<()> {
        self.send(UiEvent::ToolCall {
            name: name.into(),
            arguments: arguments.into(),
        })
        .await
    }

    pub async fn tool_result(&self, result: impl Into<String>) -> Result<()> {
        self.send(UiEvent::ToolResult {
            result: result.into(),
        })
        .await
    }

    pub async fn error(&self, message: impl Into<String>) -> Result<()> {
        self.send(UiEvent::Error {
            message: message.into(),
        })
        .await
    }
}

/// A chat application hosted by the HTTP server.
///
/// The server owns the session lifecycle; the app decides what a
/// session holds and how one user message is answered. `on_message`
/// runs under the session's lock, so a session handles one message at
/// a time.
#[async_trait]
pub trait ChatApp: Send + Sync {
    type Session: Send + 'static;

    /// Short name used in logs and the health endpoint.
    fn name(&self) -> &str;

    /// Conversation starters offered to new sessions.
    fn starters(&self) -> Vec<Starter> {
        Vec::new()
    }

    /// Build the state for a new session.
    async fn on_session_start(&self) -> Result<Self::Session>;

    /// Handle one user message, pushing UI events as work progresses.
    ///
    /// The server emits the terminal [`UiEvent::Done`] itself; a
    /// returned error is forwarded as [`UiEvent::Error`] first.
    async fn on_message(
        &self,
        session: &mut Self::Session,
        content: &str,
        ui: &UiSink,
    ) -> Result<()>;
}
