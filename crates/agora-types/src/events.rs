use serde::{Deserialize, Serialize};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The flow reached a node with no matching outgoing edge, or a
    /// single-agent run finished its turn.
    Completed,
    /// The group chat consumed its per-run turn budget.
    MaxTurns,
    /// The graph flow hit its total message cap.
    MaxMessages,
}

/// Event stream emitted by every run (single agent, group chat, or graph).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TeamEvent {
    /// Run accepted; first event on every stream
    RunStarted {
        run_id: String,
        task: String,
        timestamp: i64,
    },

    /// An agent was selected and is about to produce a message
    TurnStarted {
        agent: String,
        turn: usize,
    },

    /// Streamed response chunk from the speaking agent
    Token {
        agent: String,
        content: String,
    },

    /// The speaking agent requested a tool invocation
    ToolCall {
        agent: String,
        id: String,
        name: String,
        arguments: String,
    },

    /// Tool invocation finished
    ToolResult {
        agent: String,
        tool_call_id: String,
        result: String,
        is_error: bool,
        duration_ms: u64,
    },

    /// The speaking agent completed its turn with this message
    Message {
        agent: String,
        content: String,
    },

    /// Fatal error; the stream ends after this
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        agent: Option<String>,
    },

    /// Run finished; last event on every successful stream
    RunFinished {
        reason: StopReason,
        messages: usize,
        total_duration_ms: u64,
    },
}

impl TeamEvent {
    /// Envelope head of a new run: fresh id, wall-clock start.
    pub fn run_started(task: impl Into<String>) -> Self {
        TeamEvent::RunStarted {
            run_id: uuid::Uuid::new_v4().to_string(),
            task: task.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
