//! Minimal two-agent group chat.
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! cargo run --example group_chat
//! ```

use agora_llm::ModelClient;
use agora_team::{Agent, GroupChat, TeamConfig};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let model = ModelClient::from_yaml_file("model_config.yaml")?;

    let poet = Agent::builder("Poet")
        .instructions("You write a short poem about whatever the conversation asks for.")
        .model(model.clone())
        .build()?;

    let critic = Agent::builder("Critic")
        .instructions("You give one sentence of feedback on the latest poem.")
        .model(model.clone())
        .build()?;

    let team = GroupChat::builder()
        .participant(poet)
        .participant(critic)
        .model(model)
        .config(TeamConfig::new().with_max_turns(4))
        .build()?;

    let mut events = team.spawn_run("Write a poem about the tides.");
    while let Some(event) = events.recv().await {
        println!("{:?}", event);
    }

    Ok(())
}
