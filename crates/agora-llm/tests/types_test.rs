use agora_llm::{Message, Tool, ToolCall, ToolChoice};
use serde_json::json;

#[test]
fn test_message_system() {
    let msg = Message::system("You are helpful");
    assert_eq!(msg.role(), "system");
}

#[test]
fn test_message_human() {
    let msg = Message::human("Hello");
    assert_eq!(msg.role(), "user");
}

#[test]
fn test_message_ai() {
    let msg = Message::ai("Hi there!");
    assert_eq!(msg.role(), "assistant");
}

#[test]
fn test_message_tool_result() {
    let msg = Message::tool_result("call_123", "42");
    assert_eq!(msg.role(), "tool");
}

#[test]
fn test_message_serialization_human() {
    let msg = Message::human("Hello");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"role\":\"user\""));
    assert!(json.contains("Hello"));
}

#[test]
fn test_named_human_carries_speaker() {
    let msg = Message::human_from("Analyst", "The data looks clean");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"role\":\"user\""));
    assert!(json.contains("\"name\":\"Analyst\""));
}

#[test]
fn test_unnamed_human_omits_name() {
    let msg = Message::human("Hello");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(!json.contains("\"name\""));
}

#[test]
fn test_message_deserialization() {
    let json = r#"{"role":"user","content":"Test"}"#;
    let msg: Message = serde_json::from_str(json).unwrap();
    assert_eq!(msg.role(), "user");
}

#[test]
fn test_message_ai_with_tools() {
    let calls = vec![ToolCall::new("call_1", "search_web", "{}")];
    let msg = Message::ai_with_tools(None, calls);
    assert_eq!(msg.role(), "assistant");

    match msg {
        Message::AI { content, tool_calls, .. } => {
            assert!(content.is_none());
            assert_eq!(tool_calls.unwrap().len(), 1);
        }
        _ => panic!("Expected AI variant"),
    }
}

#[test]
fn test_tool_creation() {
    let tool = Tool::new(
        "search_web",
        "Search the web for a query",
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"}
            },
            "required": ["query"]
        }),
    );

    assert_eq!(tool.function.name, "search_web");
    assert!(tool.function.description.is_some());
    assert_eq!(tool.tool_type, "function");
}

#[test]
fn test_tool_choice_auto() {
    let choice = ToolChoice::auto();
    let json = serde_json::to_value(&choice).unwrap();
    assert_eq!(json, "auto");
}

#[test]
fn test_tool_choice_none() {
    let choice = ToolChoice::none();
    let json = serde_json::to_value(&choice).unwrap();
    assert_eq!(json, "none");
}

#[test]
fn test_tool_choice_required() {
    let choice = ToolChoice::required();
    let json = serde_json::to_value(&choice).unwrap();
    assert_eq!(json, "required");
}

#[test]
fn test_tool_choice_force() {
    let choice = ToolChoice::force("query_train_ticket");
    match choice {
        ToolChoice::Specific { tool_type, function } => {
            assert_eq!(tool_type, "function");
            assert_eq!(function.name, "query_train_ticket");
        }
        _ => panic!("Expected Specific variant"),
    }
}

#[test]
fn test_tool_call_parse_arguments() {
    let tool_call = ToolCall::new(
        "call_123",
        "query_train_ticket",
        r#"{"date":"2025-03-01","origin":"Hangzhou","destination":"Ningbo"}"#,
    );

    #[derive(serde::Deserialize)]
    struct TicketArgs {
        date: String,
        origin: String,
        destination: String,
    }

    let args: TicketArgs = tool_call.parse_arguments().unwrap();
    assert_eq!(args.date, "2025-03-01");
    assert_eq!(args.origin, "Hangzhou");
    assert_eq!(args.destination, "Ningbo");
}

#[test]
fn test_tool_call_arguments_value() {
    let tool_call = ToolCall::new("call_123", "analyze_data", r#"{"data":"sales"}"#);

    let value = tool_call.arguments_value().unwrap();
    assert_eq!(value["data"], "sales");
}
