//! # Agora - Multi-Agent Teams for Rust
//!
//! Agora is a framework for building streaming multi-agent LLM
//! applications in Rust with:
//! - 🗣️ **Group chats** (a speaker selector steers a shared transcript)
//! - 🔀 **Agent graphs** (conditional edges route on message content)
//! - 🚀 **Real-time streaming** (token-by-token events over channels/SSE)
//! - 🛠️ **Function tools** (async Rust functions exposed to the model)
//! - ⚡ **Async/await** (built on Tokio for scalability)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agora::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let model = ModelClient::from_yaml_file("model_config.yaml")?;
//!
//!     let poet = Agent::builder("Poet")
//!         .instructions("You write short poems.")
//!         .model(model.clone())
//!         .build()?;
//!     let critic = Agent::builder("Critic")
//!         .instructions("You critique the latest poem in one sentence.")
//!         .model(model.clone())
//!         .build()?;
//!
//!     let team = GroupChat::builder()
//!         .participant(poet)
//!         .participant(critic)
//!         .model(model)
//!         .build()?;
//!
//!     let mut events = team.spawn_run("Write a poem about the sea.");
//!     while let Some(event) = events.recv().await {
//!         println!("{:?}", event);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Agora consists of several composable crates:
//!
//! - **agora-types**: Core types (TeamEvent, Transcript, configs)
//! - **agora-team**: Orchestration (Agent, GroupChat, Graph, selectors)
//! - **agora-llm**: Chat clients (OpenAI and Azure OpenAI, with streaming)
//! - **agora-api**: HTTP host for chat apps (sessions + SSE), shipped as
//!   a binary crate in this repository
//!
//! ## Examples
//!
//! ### Pinning the first and last speakers
//!
//! ```rust,no_run
//! use agora::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let model = ModelClient::from_yaml_file("model_config.yaml")?;
//!
//!     let opener = Agent::builder("Opener")
//!         .instructions("Restate the task in one sentence.")
//!         .model(model.clone())
//!         .build()?;
//!     let expert = Agent::builder("Expert")
//!         .instructions("Work on the task.")
//!         .model(model.clone())
//!         .build()?;
//!     let closer = Agent::builder("Closer")
//!         .instructions("Summarize the conversation.")
//!         .model(model.clone())
//!         .build()?;
//!
//!     // the opener always speaks first and the closer always last;
//!     // the default policy fills the middle turns
//!     let team = GroupChat::builder()
//!         .participant(opener)
//!         .participant(expert)
//!         .participant(closer)
//!         .selector(BookendSelector::new("Opener", "Closer", 6))
//!         .model(model)
//!         .config(TeamConfig::new().with_max_turns(6))
//!         .build()?;
//!
//!     let mut events = team.spawn_run("Compare two sorting algorithms.");
//!     while let Some(event) = events.recv().await {
//!         if let TeamEvent::Message { agent, content } = &event {
//!             println!("[{}] {}", agent, content);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Review loop as a graph
//!
//! ```rust,no_run
//! use agora::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let model = ModelClient::from_yaml_file("model_config.yaml")?;
//!
//!     let writer = Agent::builder("Writer")
//!         .instructions("Draft the text.")
//!         .model(model.clone())
//!         .build()?;
//!     let reviewer = Agent::builder("Reviewer")
//!         .instructions("Review the draft. Say 'APPROVE' when satisfied.")
//!         .model(model.clone())
//!         .build()?;
//!
//!     let graph = Graph::builder()
//!         .node(writer)
//!         .node(reviewer)
//!         .edge("Writer", "Reviewer")
//!         .edge_when("Reviewer", "Writer", EdgeCondition::not_contains("APPROVE"))
//!         .entry("Writer")
//!         .build()?;
//!
//!     let mut events = graph.spawn_run("Draft a release note.");
//!     while let Some(event) = events.recv().await {
//!         println!("{:?}", event);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Serving chat apps over HTTP
//!
//! For a complete REST API with SSE streaming, see the `agora-api`
//! crate in the repository: it hosts any `ChatApp` implementation
//! behind session and message-streaming endpoints.

// Re-export all public APIs
pub use agora_llm as llm;
pub use agora_team as team;
pub use agora_types as types;

// Re-export commonly used types
pub use agora_llm::{ChatClient, ModelClient, ModelConfig, OpenAIClient};
pub use agora_team::{
    Agent, BookendSelector, EdgeCondition, Graph, GroupChat, Selection, SpeakerSelector,
};
pub use agora_types::{StopReason, TeamEvent, Transcript};

/// Convenient prelude with commonly used types
pub mod prelude {
    pub use crate::llm::{ChatClient, ModelClient, ModelConfig};
    pub use crate::team::{
        Agent, BookendSelector, EdgeCondition, FunctionToolbox, Graph, GroupChat, Selection,
        SpeakerSelector, ToolExecutor,
    };
    pub use crate::types::{
        ChatMessage, GraphConfig, StopReason, TeamConfig, TeamEvent, Transcript,
    };
    pub use anyhow::Result;
}
