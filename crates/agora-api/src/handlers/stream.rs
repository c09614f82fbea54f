use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

use agora_llm::TokenBatcher;

use crate::{
    app::{ChatApp, UiEvent, UiSink},
    error::{ApiError, ApiResult},
    routes::sessions::parse_session_id,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Send a message to a session and stream the response using
/// Server-Sent Events.
///
/// The app runs in a background task while this stream relays its UI
/// events; token events are batched on a short timer so the client is
/// not flooded one token at a time.
pub async fn send_message_stream<A: ChatApp + 'static>(
    State(state): State<AppState<A>>,
    Path(session_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let session_id = parse_session_id(&session_id)?;

    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Message content must not be empty".to_string(),
        ));
    }

    let session = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| ApiError::SessionNotFound(session_id.to_string()))?;

    let (tx, rx) = tokio::sync::mpsc::channel::<UiEvent>(256);
    let app = Arc::clone(&state.app);
    let content = req.content.clone();

    tokio::spawn(async move {
        let ui = UiSink::new(tx.clone());
        // one message at a time per session
        let mut session = session.lock().await;

        if let Err(e) = app.on_message(&mut session, &content, &ui).await {
            tracing::error!(%session_id, error = %e, "message handling failed");
            let _ = tx
                .send(UiEvent::Error {
                    message: e.to_string(),
                })
                .await;
        }

        let _ = tx.send(UiEvent::Done).await;
    });

    Ok(Sse::new(ui_event_stream(
        rx,
        state.config.chat.token_batch_ms,
    )))
}

/// Relay UI events as SSE, collapsing bursts of tokens into one event
/// per batch window. Non-token events flush the pending batch first so
/// ordering is preserved.
fn ui_event_stream(
    mut rx: tokio::sync::mpsc::Receiver<UiEvent>,
    batch_window_ms: u64,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let mut batcher = TokenBatcher::new(batch_window_ms);

        loop {
            tokio::select! {
                maybe_event = rx.recv() => {
                    match maybe_event {
                        Some(UiEvent::Token { text }) => batcher.push(&text),
                        Some(event) => {
                            if !batcher.is_empty() {
                                yield Ok(token_event(batcher.take()));
                            }
                            let done = matches!(event, UiEvent::Done);
                            yield Ok(to_sse_event(event));
                            if done {
                                break;
                            }
                        }
                        None => {
                            if !batcher.is_empty() {
                                yield Ok(token_event(batcher.take()));
                            }
                            break;
                        }
                    }
                }
                _ = batcher.ticker().tick() => {
                    if !batcher.is_empty() {
                        yield Ok(token_event(batcher.take()));
                    }
                }
            }
        }
    }
}

fn token_event(text: String) -> Event {
    Event::default()
        .event("token")
        .json_data(serde_json::json!({ "content": text }))
        .unwrap()
}

fn to_sse_event(event: UiEvent) -> Event {
    match event {
        UiEvent::Token { text } => token_event(text),
        UiEvent::Message { text } => Event::default()
            .event("message")
            .json_data(serde_json::json!({ "content": text }))
            .unwrap(),
        UiEvent::ToolCall { name, arguments } => Event::default()
            .event("tool_call")
            .json_data(serde_json::json!({ "name": name, "arguments": arguments }))
            .unwrap(),
        UiEvent::ToolResult { result } => Event::default()
            .event("tool_result")
            .json_data(serde_json::json!({ "result": result }))
            .unwrap(),
        UiEvent::Error { message } => Event::default()
            .event("error")
            .json_data(serde_json::json!({ "error": message }))
            .unwrap(),
        UiEvent::Done => Event::default()
            .event("done")
            .json_data(serde_json::json!({ "status": "completed" }))
            .unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_tokens_batch_and_flush_before_message() {
        let (tx, rx) = tokio::sync::mpsc::channel(16);

        // a long window, so the flush must come from the message event
        let mut stream = Box::pin(ui_event_stream(rx, 10_000));

        tx.send(UiEvent::Token {
            text: "Hel".to_string(),
        })
        .await
        .unwrap();
        tx.send(UiEvent::Token {
            text: "lo".to_string(),
        })
        .await
        .unwrap();
        tx.send(UiEvent::Message {
            text: "Hello".to_string(),
        })
        .await
        .unwrap();
        tx.send(UiEvent::Done).await.unwrap();
        drop(tx);

        let events: Vec<String> = stream
            .by_ref()
            .map(|e| format!("{:?}", e.unwrap()))
            .collect()
            .await;

        assert_eq!(events.len(), 3);
        assert!(events[0].contains("token"));
        assert!(events[0].contains("Hello"));
        assert!(events[1].contains("message"));
        assert!(events[2].contains("done"));
    }

    #[tokio::test]
    async fn test_stream_ends_when_sender_drops_mid_run() {
        let (tx, rx) = tokio::sync::mpsc::channel(16);
        let stream = Box::pin(ui_event_stream(rx, 10_000));

        tx.send(UiEvent::Token {
            text: "partial".to_string(),
        })
        .await
        .unwrap();
        drop(tx);

        let events: Vec<_> = stream.collect().await;
        // pending tokens still flush on disconnect
        assert_eq!(events.len(), 1);
        assert!(format!("{:?}", events[0]).contains("partial"));
    }
}
