pub mod message;
pub mod tool;

pub use message::Message;
pub use tool::{FunctionCall, FunctionDefinition, Tool, ToolCall, ToolChoice, ToolChoiceFunction};
