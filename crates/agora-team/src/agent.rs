use crate::tools::ToolExecutor;
use agora_llm::{
    ChatRequest, Message, ModelClient, StreamEvent, ToolCall, ToolChoice,
};
use agora_types::{ChatMessage, StopReason, TeamEvent, Transcript};
use anyhow::{anyhow, bail, Result};
use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Type alias for the event channel sender
pub type EventSender = mpsc::Sender<TeamEvent>;

type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// A named participant: instructions, a model, and optional tools.
///
/// Agents are cheap to clone; the model client and toolbox are shared.
#[derive(Clone)]
pub struct Agent {
    name: String,
    instructions: String,
    model: ModelClient,
    tools: Option<Arc<dyn ToolExecutor>>,
    reflect_on_tool_use: bool,
    max_tool_rounds: usize,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Agent {
    pub fn builder(name: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Run a single-agent task in the background.
    ///
    /// Wraps one [`run_turn`](Self::run_turn) in the run-level event
    /// envelope and returns the receiving end of the stream.
    pub fn spawn_run(&self, task: ChatMessage) -> mpsc::Receiver<TeamEvent> {
        let (event_tx, event_rx) = mpsc::channel(1000);

        let agent = self.clone();
        tokio::spawn(async move {
            if let Err(e) = agent.run_task(task, event_tx.clone()).await {
                tracing::error!(agent = %agent.name, error = %e, "agent run failed");
                let _ = event_tx
                    .send(TeamEvent::Error {
                        message: e.to_string(),
                        agent: Some(agent.name.clone()),
                    })
                    .await;
            }
        });

        event_rx
    }

    async fn run_task(&self, task: ChatMessage, event_tx: EventSender) -> Result<()> {
        let start_time = Instant::now();

        event_tx
            .send(TeamEvent::run_started(task.content.clone()))
            .await?;

        let transcript = Transcript::from_task(task);

        event_tx
            .send(TeamEvent::TurnStarted {
                agent: self.name.clone(),
                turn: 1,
            })
            .await?;

        self.run_turn(&transcript, &event_tx).await?;

        event_tx
            .send(TeamEvent::RunFinished {
                reason: StopReason::Completed,
                messages: transcript.len() + 1,
                total_duration_ms: start_time.elapsed().as_millis() as u64,
            })
            .await?;

        Ok(())
    }

    /// Run one turn against the transcript, streaming events as they
    /// happen, and return the completed turn text.
    ///
    /// Tool calls are executed between model rounds. With
    /// `reflect_on_tool_use` the results go back to the model for a
    /// final answer; without it the raw results become the turn text.
    pub async fn run_turn(&self, transcript: &Transcript, event_tx: &EventSender) -> Result<String> {
        let mut working = self.render_context(transcript);
        let mut rounds = 0usize;

        loop {
            let stream = self.open_stream(&working).await?;
            let (text, calls) = self.drain_stream(stream, event_tx).await?;

            if calls.is_empty() {
                event_tx
                    .send(TeamEvent::Message {
                        agent: self.name.clone(),
                        content: text.clone(),
                    })
                    .await?;
                return Ok(text);
            }

            let content = if text.is_empty() { None } else { Some(text) };
            working.push(Message::ai_with_tools(content, calls.clone()));

            let results = self.execute_calls(&calls, event_tx).await?;
            for (call, result) in calls.iter().zip(&results) {
                working.push(Message::tool_result(call.id.clone(), result.clone()));
            }

            if !self.reflect_on_tool_use {
                let summary = results.join("\n");
                event_tx
                    .send(TeamEvent::Message {
                        agent: self.name.clone(),
                        content: summary.clone(),
                    })
                    .await?;
                return Ok(summary);
            }

            // Guardrail: max tool rounds
            rounds += 1;
            if rounds >= self.max_tool_rounds {
                bail!(
                    "Agent '{}' exceeded {} tool rounds without a final answer",
                    self.name,
                    self.max_tool_rounds
                );
            }
        }
    }

    /// Render the shared transcript from this agent's point of view:
    /// own messages become assistant turns, everything else user turns.
    fn render_context(&self, transcript: &Transcript) -> Vec<Message> {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(Message::system(self.instructions.clone()));

        for m in transcript.messages() {
            if m.source == self.name {
                messages.push(Message::ai_from(m.source.clone(), m.content.clone()));
            } else if m.is_from_user() {
                messages.push(Message::human(m.content.clone()));
            } else {
                messages.push(Message::human_from(m.source.clone(), m.content.clone()));
            }
        }

        messages
    }

    async fn open_stream(&self, messages: &[Message]) -> Result<EventStream> {
        let mut options = self.model.options();

        if let Some(tools) = &self.tools {
            let schemas = tools.schemas();
            if !schemas.is_empty() {
                options = options.tools(schemas).tool_choice(ToolChoice::auto());
            }
        }

        let request = ChatRequest::new(self.model.model().to_string(), messages.to_vec())
            .with_options(options);

        self.model.client().chat_stream(request).await
    }

    /// Consume one model stream: forward text as token events, merge
    /// tool-call fragments by index into complete calls.
    async fn drain_stream(
        &self,
        mut stream: EventStream,
        event_tx: &EventSender,
    ) -> Result<(String, Vec<ToolCall>)> {
        let mut text = String::new();
        let mut call_buffers: HashMap<u32, (Option<String>, Option<String>, String)> =
            HashMap::new();

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::Message { content } => {
                    event_tx
                        .send(TeamEvent::Token {
                            agent: self.name.clone(),
                            content: content.clone(),
                        })
                        .await?;
                    text.push_str(&content);
                }
                StreamEvent::ToolCall {
                    index,
                    id,
                    name,
                    arguments,
                } => {
                    let entry = call_buffers
                        .entry(index)
                        .or_insert_with(|| (None, None, String::new()));
                    if let Some(id) = id {
                        entry.0 = Some(id);
                    }
                    if let Some(name) = name {
                        entry.1 = Some(name);
                    }
                    if let Some(args) = arguments {
                        entry.2.push_str(&args);
                    }
                }
                StreamEvent::Done { .. } => {}
            }
        }

        let mut indexed: Vec<_> = call_buffers.into_iter().collect();
        indexed.sort_by_key(|(index, _)| *index);

        let calls = indexed
            .into_iter()
            .filter_map(|(_, (id, name, arguments))| match (id, name) {
                (Some(id), Some(name)) => Some(ToolCall::new(id, name, arguments)),
                _ => None,
            })
            .collect();

        Ok((text, calls))
    }

    /// Execute completed tool calls in order, emitting call and result
    /// events. Tool failures become error results rather than aborting
    /// the turn.
    async fn execute_calls(
        &self,
        calls: &[ToolCall],
        event_tx: &EventSender,
    ) -> Result<Vec<String>> {
        let tools = self
            .tools
            .as_ref()
            .ok_or_else(|| anyhow!("Agent '{}' produced tool calls but has no tools", self.name))?;

        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            event_tx
                .send(TeamEvent::ToolCall {
                    agent: self.name.clone(),
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    arguments: call.function.arguments.clone(),
                })
                .await?;

            let arguments: serde_json::Value = serde_json::from_str(&call.function.arguments)?;

            let start = Instant::now();
            let (result, is_error) = match tools.execute(&call.function.name, arguments).await {
                Ok(result) => (result, false),
                Err(e) => {
                    // Tool failed (resilient) - feed the error back as a result
                    tracing::warn!(
                        agent = %self.name,
                        tool = %call.function.name,
                        error = %e,
                        "tool execution failed"
                    );
                    (format!("Tool execution failed: {}", e), true)
                }
            };

            event_tx
                .send(TeamEvent::ToolResult {
                    agent: self.name.clone(),
                    tool_call_id: call.id.clone(),
                    result: result.clone(),
                    is_error,
                    duration_ms: start.elapsed().as_millis() as u64,
                })
                .await?;

            results.push(result);
        }

        Ok(results)
    }
}

/// Builder for [`Agent`].
pub struct AgentBuilder {
    name: String,
    instructions: Option<String>,
    model: Option<ModelClient>,
    tools: Option<Arc<dyn ToolExecutor>>,
    reflect_on_tool_use: bool,
    max_tool_rounds: usize,
}

impl AgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: None,
            model: None,
            tools: None,
            reflect_on_tool_use: false,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// System instructions for every turn of this agent.
    pub fn instructions(mut self, text: impl Into<String>) -> Self {
        self.instructions = Some(text.into());
        self
    }

    pub fn model(mut self, model: ModelClient) -> Self {
        self.model = Some(model);
        self
    }

    pub fn tools(mut self, tools: Arc<dyn ToolExecutor>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Send tool results back to the model for a final answer instead
    /// of using them verbatim as the turn text.
    pub fn reflect_on_tool_use(mut self, reflect: bool) -> Self {
        self.reflect_on_tool_use = reflect;
        self
    }

    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn build(self) -> Result<Agent> {
        if self.name.trim().is_empty() {
            bail!("Agent name must not be empty");
        }
        if self.name == agora_types::USER_SOURCE {
            bail!("Agent name '{}' is reserved", agora_types::USER_SOURCE);
        }

        let instructions = self
            .instructions
            .ok_or_else(|| anyhow!("Agent instructions are required"))?;
        let model = self
            .model
            .ok_or_else(|| anyhow!("Agent model client is required"))?;

        Ok(Agent {
            name: self.name,
            instructions,
            model,
            tools: self.tools,
            reflect_on_tool_use: self.reflect_on_tool_use,
            max_tool_rounds: self.max_tool_rounds,
        })
    }
}
