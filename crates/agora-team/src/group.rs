use crate::agent::{Agent, EventSender};
use crate::selector::{DeferAll, Selection, SpeakerSelector};
use agora_llm::{Message, ModelClient};
use agora_types::{ChatMessage, StopReason, TeamConfig, TeamEvent, Transcript};
use anyhow::{anyhow, bail, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

const SELECTOR_INSTRUCTIONS: &str = "You are moderating a conversation between several \
participants. Read the transcript, then reply with the name of the participant who should \
speak next. Reply with the name only.";

/// Multi-agent conversation over a shared transcript.
///
/// Each turn the [`SpeakerSelector`] is consulted first; on
/// [`Selection::Defer`] the team's own model names the next speaker.
/// The team is stateless across runs: every [`spawn_run`](Self::spawn_run)
/// starts a fresh transcript seeded with the task.
pub struct GroupChat {
    participants: Arc<Vec<Agent>>,
    selector: Arc<dyn SpeakerSelector>,
    model: ModelClient,
    config: TeamConfig,
}

impl std::fmt::Debug for GroupChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupChat")
            .finish_non_exhaustive()
    }
}

impl GroupChat {
    pub fn builder() -> GroupChatBuilder {
        GroupChatBuilder::new()
    }

    pub fn participant_names(&self) -> Vec<String> {
        self.participants
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Spawn one run in the background and return its event stream.
    ///
    /// The run ends when the transcript reaches `max_turns` messages
    /// (the task counts). Failures surface as a terminal
    /// [`TeamEvent::Error`].
    pub fn spawn_run(&self, task: impl Into<String>) -> mpsc::Receiver<TeamEvent> {
        let (event_tx, event_rx) = mpsc::channel(1000);

        // Clone what we need for the spawned task
        let participants = Arc::clone(&self.participants);
        let selector = Arc::clone(&self.selector);
        let model = self.model.clone();
        let config = self.config.clone();
        let task = task.into();

        tokio::spawn(async move {
            if let Err(e) =
                Self::run_loop(task, event_tx.clone(), participants, selector, model, config).await
            {
                tracing::error!(error = %e, "group chat run failed");
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
        participants: Arc<Vec<Agent>>,
        selector: Arc<dyn SpeakerSelector>,
        model: ModelClient,
        config: TeamConfig,
    ) -> Result<()> {
        let start_time = Instant::now();

        event_tx.send(TeamEvent::run_started(task.clone())).await?;

        let mut transcript = Transcript::from_task(ChatMessage::user(task));
        let mut turn = 0usize;

        // Guardrail: max turns (the task message counts)
        while transcript.len() < config.max_turns {
            let speaker = match selector.pick(&transcript) {
                Selection::Select(name) => {
                    if !participants.iter().any(|a| a.name() == name) {
                        bail!("Selector chose unknown participant '{}'", name);
                    }
                    name
                }
                Selection::Defer => Self::pick_default(&model, &participants, &transcript).await?,
            };

            turn += 1;
            tracing::debug!(speaker = %speaker, turn, "next speaker");
            event_tx
                .send(TeamEvent::TurnStarted {
                    agent: speaker.clone(),
                    turn,
                })
                .await?;

            let agent = participants
                .iter()
                .find(|a| a.name() == speaker)
                .ok_or_else(|| anyhow!("Participant '{}' left the roster", speaker))?;

            let content = agent.run_turn(&transcript, &event_tx).await?;
            transcript.push(ChatMessage::new(speaker, content));
        }

        event_tx
            .send(TeamEvent::RunFinished {
                reason: StopReason::MaxTurns,
                messages: transcript.len(),
                total_duration_ms: start_time.elapsed().as_millis() as u64,
            })
            .await?;

        Ok(())
    }

    /// Default policy: ask the team's model to name the next speaker,
    /// falling back to round robin when the reply names nobody. Model
    /// errors propagate.
    async fn pick_default(
        model: &ModelClient,
        participants: &[Agent],
        transcript: &Transcript,
    ) -> Result<String> {
        let names: Vec<&str> = participants.iter().map(|a| a.name()).collect();

        let prompt = format!(
            "Participants: {}.\n\nTranscript:\n{}\n\nWho should speak next?",
            names.join(", "),
            transcript.render(),
        );

        let response = model
            .chat(vec![
                Message::system(SELECTOR_INSTRUCTIONS),
                Message::human(prompt),
            ])
            .await?;

        if let Some(reply) = response.content {
            if let Some(name) = match_participant(&reply, &names) {
                return Ok(name);
            }
            tracing::warn!(reply = %reply, "speaker reply named no participant, using round robin");
        }

        Ok(round_robin_successor(&names, transcript))
    }
}

/// Resolve which participant a selection reply refers to: exact match
/// on the trimmed reply first, then the first roster name the reply
/// contains.
fn match_participant(reply: &str, names: &[&str]) -> Option<String> {
    let trimmed = reply.trim();

    if let Some(name) = names.iter().find(|n| **n == trimmed) {
        return Some((*name).to_string());
    }

    names
        .iter()
        .find(|n| trimmed.contains(**n))
        .map(|n| (*n).to_string())
}

/// Successor of the most recent agent speaker in roster order, or the
/// first participant when no agent has spoken yet.
fn round_robin_successor(names: &[&str], transcript: &Transcript) -> String {
    let previous = transcript
        .messages()
        .iter()
        .rev()
        .find(|m| !m.is_from_user())
        .and_then(|m| names.iter().position(|n| *n == m.source));

    match previous {
        Some(pos) => names[(pos + 1) % names.len()].to_string(),
        None => names[0].to_string(),
    }
}

/// Builder for [`GroupChat`].
pub struct GroupChatBuilder {
    participants: Vec<Agent>,
    selector: Option<Arc<dyn SpeakerSelector>>,
    model: Option<ModelClient>,
    config: TeamConfig,
}

impl GroupChatBuilder {
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
            selector: None,
            model: None,
            config: TeamConfig::default(),
        }
    }

    pub fn participant(mut self, agent: Agent) -> Self {
        self.participants.push(agent);
        self
    }

    /// Speaker selection policy. Defaults to [`DeferAll`].
    pub fn selector(mut self, selector: impl SpeakerSelector + 'static) -> Self {
        self.selector = Some(Arc::new(selector));
        self
    }

    /// Model used by the default speaker policy.
    pub fn model(mut self, model: ModelClient) -> Self {
        self.model = Some(model);
        self
    }

    pub fn config(mut self, config: TeamConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<GroupChat> {
        if self.participants.len() < 2 {
            bail!("A group chat needs at least two participants");
        }

        let mut seen = HashSet::new();
        for agent in &self.participants {
            if !seen.insert(agent.name().to_string()) {
                bail!("Duplicate participant name '{}'", agent.name());
            }
        }

        let model = self
            .model
            .ok_or_else(|| anyhow!("Group chat model client is required"))?;

        Ok(GroupChat {
            participants: Arc::new(self.participants),
            selector: self.selector.unwrap_or_else(|| Arc::new(DeferAll)),
            model,
            config: self.config,
        })
    }
}

impl Default for GroupChatBuilder {
    fn default() -> Self {
        Self::new()
    }
}
