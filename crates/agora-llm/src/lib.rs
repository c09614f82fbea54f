pub mod buffering;
pub mod config;
pub mod streaming;
pub mod traits;
pub mod types;

pub mod azure_openai;
pub mod openai;

mod wire;

pub use traits::{
    ChatClient,
    ChatRequest, ChatResponse, ChatOptions,
    TokenUsage,
};

pub use buffering::TokenBatcher;
pub use config::{ClientFactory, ModelClient, ModelConfig, ProviderDetails};
pub use streaming::{parse_chat_sse_stream, StreamEvent};

pub use azure_openai::AzureOpenAIClient;
pub use openai::OpenAIClient;
pub use types::{Message, Tool, ToolCall, ToolChoice};
