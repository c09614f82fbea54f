use agora_llm::{ChatClient, ChatRequest, ChatResponse, ModelClient, StreamEvent};
use agora_team::{Agent, EdgeCondition, Graph, GraphConfig, StopReason, TeamEvent};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use futures::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Streams scripted texts in call order, one per `chat_stream` call.
struct ScriptedClient {
    replies: Mutex<VecDeque<&'static str>>,
}

impl ScriptedClient {
    fn new(replies: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
        })
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse> {
        bail!("graph runs never use non-streaming chat")
    }

    async fn chat_stream(
        &self,
        _request: ChatRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>> {
        let text = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("script exhausted"))?;

        let mid = (0..=text.len() / 2)
            .rev()
            .find(|i| text.is_char_boundary(*i))
            .unwrap_or(0);
        let (head, tail) = text.split_at(mid);

        Ok(Box::pin(futures::stream::iter(vec![
            Ok(StreamEvent::Message {
                content: head.to_string(),
            }),
            Ok(StreamEvent::Message {
                content: tail.to_string(),
            }),
            Ok(StreamEvent::Done {
                finish_reason: Some("stop".to_string()),
            }),
        ])))
    }
}

fn agent(name: &str, instructions: &str, model: &ModelClient) -> Agent {
    Agent::builder(name)
        .instructions(instructions)
        .model(model.clone())
        .build()
        .unwrap()
}

/// Writer -> reviewer -> translator flow with a revision loop on rejection.
fn review_graph(model: &ModelClient, max_messages: usize) -> Graph {
    Graph::builder()
        .node(agent("A", "You are a helpful assistant.", model))
        .node(
            agent(
                "B",
                "Provide feedback. If your feedback has been addressed, say 'APPROVE'.",
                model,
            ),
        )
        .node(agent("C", "Translate the final product to Korean.", model))
        .edge("A", "B")
        .edge_when("B", "C", EdgeCondition::contains("APPROVE"))
        .edge_when("B", "A", EdgeCondition::not_contains("APPROVE"))
        .entry("A")
        .config(GraphConfig::new().with_max_messages(max_messages))
        .build()
        .unwrap()
}

async fn collect(mut rx: mpsc::Receiver<TeamEvent>) -> Vec<TeamEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn speakers(events: &[TeamEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            TeamEvent::TurnStarted { agent, .. } => Some(agent.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_rejection_loops_back_until_approval() {
    let model = ModelClient::new(
        ScriptedClient::new(vec![
            "Circuits hum a quiet song.",                     // A
            "The meter stumbles. Please revise line two.",    // B -> back to A
            "Circuits hum a measured song.",                  // A
            "APPROVE",                                        // B -> C
            "회로가 조용히 노래한다.",                        // C, no outgoing edge
        ]),
        "scripted-model",
    );

    let graph = review_graph(&model, 20);
    let events = collect(graph.spawn_run("Write a short poem about AI agents.")).await;

    assert_eq!(speakers(&events), vec!["A", "B", "A", "B", "C"]);

    // tokens reassemble across the multibyte split
    let translated: String = events
        .iter()
        .filter_map(|e| match e {
            TeamEvent::Token { agent, content } if agent == "C" => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(translated, "회로가 조용히 노래한다.");

    match events.last().unwrap() {
        TeamEvent::RunFinished {
            reason, messages, ..
        } => {
            assert_eq!(*reason, StopReason::Completed);
            assert_eq!(*messages, 6);
        }
        other => panic!("expected run_finished last, got {:?}", other),
    }
}

#[tokio::test]
async fn test_endless_rejection_hits_message_cap() {
    let model = ModelClient::new(
        ScriptedClient::new(vec![
            "draft one",      // A
            "not there yet",  // B -> A
            "draft two",      // A
            "still not right", // B -> A
            "draft three",    // A, cap reached after this turn
        ]),
        "scripted-model",
    );

    let graph = review_graph(&model, 6);
    let events = collect(graph.spawn_run("Write a short poem about AI agents.")).await;

    assert_eq!(speakers(&events), vec!["A", "B", "A", "B", "A"]);

    match events.last().unwrap() {
        TeamEvent::RunFinished {
            reason, messages, ..
        } => {
            assert_eq!(*reason, StopReason::MaxMessages);
            assert_eq!(*messages, 6);
        }
        other => panic!("expected run_finished last, got {:?}", other),
    }
}

#[tokio::test]
async fn test_case_sensitive_approval() {
    // lowercase "approve" must not satisfy the Contains("APPROVE") edge
    let model = ModelClient::new(
        ScriptedClient::new(vec![
            "first draft",            // A
            "I approve of the tone, keep going", // B -> back to A (no uppercase APPROVE)
            "second draft",           // A
            "APPROVE",                // B -> C
            "번역된 결과",            // C
        ]),
        "scripted-model",
    );

    let graph = review_graph(&model, 20);
    let events = collect(graph.spawn_run("Write something.")).await;

    assert_eq!(speakers(&events), vec!["A", "B", "A", "B", "C"]);
}
