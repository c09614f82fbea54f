//! Shared types for the Agora agent runtime.
//!
//! Everything a run produces or consumes that is not provider-specific lives
//! here: the conversation transcript, the streaming event vocabulary, and the
//! run budget configuration. The runtime crates depend on these types; the
//! provider layer does not.

pub mod config;
pub mod events;
pub mod state;

pub use config::{GraphConfig, TeamConfig};
pub use events::{StopReason, TeamEvent};
pub use state::{ChatMessage, Transcript, USER_SOURCE};
