use crate::agent::{Agent, EventSender};
use crate::router::{route, Edge, EdgeCondition};
use agora_types::{ChatMessage, GraphConfig, StopReason, TeamEvent, Transcript};
use anyhow::{anyhow, bail, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Directed agent flow with conditional transitions.
///
/// Each node is an [`Agent`]; after a node speaks, its message text is
/// matched against the node's outgoing edges to pick the next node.
/// A node with no matching edge ends the flow.
pub struct Graph {
    nodes: Arc<Vec<Agent>>,
    edges: Arc<Vec<Edge>>,
    entry: String,
    config: GraphConfig,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

impl Graph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Spawn one run in the background and return its event stream.
    pub fn spawn_run(&self, task: impl Into<String>) -> mpsc::Receiver<TeamEvent> {
        let (event_tx, event_rx) = mpsc::channel(1000);

        // Clone what we need for the spawned task
        let nodes = Arc::clone(&self.nodes);
        let edges = Arc::clone(&self.edges);
        let entry = self.entry.clone();
        let config = self.config.clone();
        let task = task.into();

        tokio::spawn(async move {
            if let Err(e) =
                Self::run_loop(task, event_tx.clone(), nodes, edges, entry, config).await
            {
                tracing::error!(error = %e, "graph run failed");
                let _ = event_tx
                    .send(TeamEvent::Error {
                        message: e.to_string(),
                        agent: None,
                    })
                    .await;
            }
        });

        event_rx
    }

    async fn run_loop(
        task: String,
        event_tx: EventSender,
        nodes: Arc<Vec<Agent>>,
        edges: Arc<Vec<Edge>>,
        entry: String,
        config: GraphConfig,
    ) -> Result<()> {
        let start_time = Instant::now();

        event_tx.send(TeamEvent::run_started(task.clone())).await?;

        let mut transcript = Transcript::from_task(ChatMessage::user(task));
        let mut current = entry;
        let mut turn = 0usize;

        let reason = loop {
            // Guardrail: max messages (the task message counts)
            if transcript.len() >= config.max_messages {
                break StopReason::MaxMessages;
            }

            turn += 1;
            tracing::debug!(node = %current, turn, "entering node");
            event_tx
                .send(TeamEvent::TurnStarted {
                    agent: current.clone(),
                    turn,
                })
                .await?;

            let agent = nodes
                .iter()
                .find(|a| a.name() == current)
                .ok_or_else(|| anyhow!("Graph node '{}' not found", current))?;

            let content = agent.run_turn(&transcript, &event_tx).await?;
            transcript.push(ChatMessage::new(current.clone(), content.clone()));

            match route(&edges, &current, &content) {
                Some(next) => current = next.to_string(),
                None => break StopReason::Completed,
            }
        };

        event_tx
            .send(TeamEvent::RunFinished {
                reason,
                messages: transcript.len(),
                total_duration_ms: start_time.elapsed().as_millis() as u64,
            })
            .await?;

        Ok(())
    }
}

/// Builder for [`Graph`].
pub struct GraphBuilder {
    nodes: Vec<Agent>,
    edges: Vec<Edge>,
    entry: Option<String>,
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            entry: None,
            config: GraphConfig::default(),
        }
    }

    pub fn node(mut self, agent: Agent) -> Self {
        self.nodes.push(agent);
        self
    }

    /// Unconditional edge, taken when no conditional edge matches.
    pub fn edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.push(Edge {
            from: from.into(),
            to: to.into(),
            condition: None,
        });
        self
    }

    /// Conditional edge, tried in declaration order before the
    /// unconditional fallback.
    pub fn edge_when(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        condition: EdgeCondition,
    ) -> Self {
        self.edges.push(Edge {
            from: from.into(),
            to: to.into(),
            condition: Some(condition),
        });
        self
    }

    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Graph> {
        if self.nodes.is_empty() {
            bail!("A graph needs at least one node");
        }

        let mut names = HashSet::new();
        for agent in &self.nodes {
            if !names.insert(agent.name().to_string()) {
                bail!("Duplicate node name '{}'", agent.name());
            }
        }

        let entry = self
            .entry
            .ok_or_else(|| anyhow!("Graph entry node is required"))?;
        if !names.contains(&entry) {
            bail!("Entry node '{}' is not in the graph", entry);
        }

        let mut unconditional = HashSet::new();
        for edge in &self.edges {
            if !names.contains(&edge.from) {
                bail!("Edge source '{}' is not in the graph", edge.from);
            }
            if !names.contains(&edge.to) {
                bail!("Edge target '{}' is not in the graph", edge.to);
            }
            if edge.condition.is_none() && !unconditional.insert(edge.from.clone()) {
                bail!(
                    "Node '{}' has more than one unconditional outgoing edge",
                    edge.from
                );
            }
        }

        Ok(Graph {
            nodes: Arc::new(self.nodes),
            edges: Arc::new(self.edges),
            entry,
            config: self.config,
        })
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_llm::{ChatClient, ChatRequest, ChatResponse, ModelClient, StreamEvent};
    use async_trait::async_trait;
    use futures::Stream;
    use std::pin::Pin;

    struct NoopClient;

    #[async_trait]
    impl ChatClient for NoopClient {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse> {
            bail!("not used")
        }

        async fn chat_stream(
            &self,
            _request: ChatRequest,
        ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>> {
            bail!("not used")
        }
    }

    fn test_agent(name: &str) -> Agent {
        Agent::builder(name)
            .instructions("You are a test agent.")
            .model(ModelClient::new(Arc::new(NoopClient), "test-model"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_entry() {
        let err = Graph::builder().node(test_agent("A")).build().unwrap_err();
        assert!(err.to_string().contains("entry node is required"));
    }

    #[test]
    fn test_builder_rejects_unknown_entry() {
        let err = Graph::builder()
            .node(test_agent("A"))
            .entry("B")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("'B' is not in the graph"));
    }

    #[test]
    fn test_builder_rejects_unknown_edge_endpoints() {
        let err = Graph::builder()
            .node(test_agent("A"))
            .edge("A", "Ghost")
            .entry("A")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("'Ghost' is not in the graph"));
    }

    #[test]
    fn test_builder_rejects_second_unconditional_edge() {
        let err = Graph::builder()
            .node(test_agent("A"))
            .node(test_agent("B"))
            .node(test_agent("C"))
            .edge("A", "B")
            .edge("A", "C")
            .entry("A")
            .build()
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("more than one unconditional outgoing edge"));
    }

    #[test]
    fn test_builder_allows_conditional_fanout() {
        let graph = Graph::builder()
            .node(test_agent("A"))
            .node(test_agent("B"))
            .node(test_agent("C"))
            .edge("A", "B")
            .edge_when("B", "C", EdgeCondition::contains("APPROVE"))
            .edge_when("B", "A", EdgeCondition::not_contains("APPROVE"))
            .entry("A")
            .build()
            .unwrap();

        assert_eq!(graph.entry(), "A");
    }
}
