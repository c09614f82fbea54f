use agora_llm::ModelClient;
use agora_team::{Agent, EdgeCondition, Graph, GraphConfig};
use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("MODEL_CONFIG").unwrap_or_else(|_| "model_config.yaml".to_string());
    let model = ModelClient::from_yaml_file(&config_path)?;

    let agent_a = Agent::builder("A")
        .instructions("You are a helpful assistant.")
        .model(model.clone())
        .build()?;
    let agent_b = Agent::builder("B")
        .instructions(
            "Provide feedback on the input, if your feedback has been addressed, \
             say 'APPROVE', otherwise provide a reason for rejection.",
        )
        .model(model.clone())
        .build()?;
    let agent_c = Agent::builder("C")
        .instructions("Translate the final product to Korean.")
        .model(model)
        .build()?;

    // A -> B always; B -> C on approval, back to A otherwise.
    let graph = Graph::builder()
        .node(agent_a)
        .node(agent_b)
        .node(agent_c)
        .edge("A", "B")
        .edge_when("B", "C", EdgeCondition::contains("APPROVE"))
        .edge_when("B", "A", EdgeCondition::not_contains("APPROVE"))
        .entry("A")
        .config(GraphConfig::new().with_max_messages(20)) // review loops can run away
        .build()?;

    let mut events = graph.spawn_run("Write a short poem about AI Agents.");
    while let Some(event) = events.recv().await {
        println!("{:?}", event);
    }

    Ok(())
}
