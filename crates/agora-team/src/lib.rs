//! # Agora Team
//!
//! Multi-agent orchestration on top of `agora-llm`.
//!
//! Two team shapes are provided:
//!
//! - [`GroupChat`]: a shared transcript where a [`SpeakerSelector`]
//!   (with a model-driven default policy) decides who speaks each turn.
//! - [`Graph`]: agents as nodes with conditional edges; the text of
//!   each turn routes the flow to the next node.
//!
//! Both stream [`TeamEvent`]s over an mpsc channel while they run.

pub mod agent;
pub mod graph;
pub mod group;
pub mod router;
pub mod selector;
pub mod tools;

pub use agent::{Agent, AgentBuilder, EventSender};
pub use graph::{Graph, GraphBuilder};
pub use group::{GroupChat, GroupChatBuilder};
pub use router::{Edge, EdgeCondition};
pub use selector::{BookendSelector, DeferAll, Selection, SpeakerSelector};
pub use tools::{FunctionToolbox, ToolExecutor};

// Re-export key types from agora-types
pub use agora_types::{
    ChatMessage, GraphConfig, StopReason, TeamConfig, TeamEvent, Transcript, USER_SOURCE,
};
