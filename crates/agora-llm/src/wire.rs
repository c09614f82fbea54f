// OpenAI-compatible wire format, shared by both provider clients.

use crate::traits::{ChatOptions, ChatResponse, TokenUsage};
use crate::types::{Message, ToolCall};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Build a chat-completions request body.
pub(crate) fn chat_payload(
    model: &str,
    messages: Vec<Message>,
    options: &ChatOptions,
    stream: bool,
) -> Result<Value> {
    let wire_messages: Vec<Value> = messages.into_iter().map(convert_message).collect();

    let mut request = serde_json::json!({
        "model": model,
        "messages": wire_messages,
        "stream": stream,
    });

    let obj = request.as_object_mut().unwrap();

    // o1-style models reject temperature and rename the token cap
    let is_reasoning_model = model.starts_with("o1") || model.starts_with("gpt-5");

    if let Some(temp) = options.temperature {
        if !is_reasoning_model {
            obj.insert("temperature".to_string(), serde_json::json!(temp));
        }
    }
    if let Some(max_tokens) = options.max_tokens {
        let token_field = if is_reasoning_model {
            "max_completion_tokens"
        } else {
            "max_tokens"
        };
        obj.insert(token_field.to_string(), serde_json::json!(max_tokens));
    }
    if let Some(tools) = &options.tools {
        obj.insert("tools".to_string(), serde_json::to_value(tools)?);
    }
    if let Some(tool_choice) = &options.tool_choice {
        obj.insert("tool_choice".to_string(), serde_json::to_value(tool_choice)?);
    }

    Ok(request)
}

fn convert_message(message: Message) -> Value {
    match message {
        Message::System { content, name } => {
            let mut obj = serde_json::json!({
                "role": "system",
                "content": content,
            });
            if let Some(name) = name {
                obj.as_object_mut().unwrap().insert("name".to_string(), serde_json::json!(name));
            }
            obj
        }
        Message::Human { content, name } => {
            let mut obj = serde_json::json!({
                "role": "user",
                "content": content,
            });
            if let Some(name) = name {
                obj.as_object_mut().unwrap().insert("name".to_string(), serde_json::json!(name));
            }
            obj
        }
        Message::AI { content, tool_calls, name } => {
            let mut obj = serde_json::json!({
                "role": "assistant",
            });

            let map = obj.as_object_mut().unwrap();

            if let Some(content) = content {
                map.insert("content".to_string(), serde_json::json!(content));
            }
            if let Some(tool_calls) = tool_calls {
                if let Ok(value) = serde_json::to_value(tool_calls) {
                    map.insert("tool_calls".to_string(), value);
                }
            }
            if let Some(name) = name {
                map.insert("name".to_string(), serde_json::json!(name));
            }

            obj
        }
        Message::Tool { tool_call_id, content } => {
            serde_json::json!({
                "role": "tool",
                "tool_call_id": tool_call_id,
                "content": content,
            })
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireChatResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<WireChoice>,
    pub usage: WireUsage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireChoice {
    pub index: u32,
    pub message: WireMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireMessage {
    pub role: String,
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Convert a raw completion into the provider-agnostic response.
pub(crate) fn into_chat_response(raw: WireChatResponse) -> Result<ChatResponse> {
    let raw_value = serde_json::to_value(&raw)?;

    let usage = TokenUsage {
        input_tokens: raw.usage.prompt_tokens,
        output_tokens: raw.usage.completion_tokens,
        total_tokens: raw.usage.total_tokens,
    };
    let choice = raw.choices.into_iter().next();

    Ok(ChatResponse {
        content: choice.as_ref().and_then(|c| c.message.content.clone()),
        tool_calls: choice.as_ref().and_then(|c| c.message.tool_calls.clone()),
        usage: Some(usage),
        finish_reason: choice.and_then(|c| c.finish_reason),
        raw: raw_value,
    })
}
