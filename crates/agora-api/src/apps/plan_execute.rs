//! Plan-then-execute pipeline.
//!
//! A planner turns the user request into a numbered action plan; the
//! executor then works through the plan with a ticket-booking tool.
//! Both stages stream straight to the UI, and the plan text is
//! accumulated from the planner's tokens before the handoff.

use crate::app::{ChatApp, Starter, UiSink};
use crate::config::ChatConfig;
use agora_llm::{ModelClient, Tool};
use agora_team::{Agent, FunctionToolbox};
use agora_types::{ChatMessage, TeamEvent};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

const PLANNER_NAME: &str = "PlanAgent";
const EXECUTOR_NAME: &str = "ExecutorAgent";

const PLANNER_INSTRUCTIONS: &str =
    "你是一个计划生产者。收到用户请求后，请输出一个详细的“行动计划”，按序号列出每一步该做什么。";

const EXECUTOR_INSTRUCTIONS: &str = "你是一个计划执行者。收到 PlanAgent 输出的行动计划后，\
     请按步骤调用相应工具（query_train_ticket）执行计划，并在每一步后附上工具返回的结果。";

fn ticket_toolbox() -> Arc<FunctionToolbox> {
    let tool = Tool::new(
        "query_train_ticket",
        "查询并购买指定日期与区间的火车票",
        json!({
            "type": "object",
            "properties": {
                "date": { "type": "string", "description": "乘车日期" },
                "origin": { "type": "string", "description": "出发站" },
                "destination": { "type": "string", "description": "到达站" }
            },
            "required": ["date", "origin", "destination"]
        }),
    );

    Arc::new(FunctionToolbox::new().register(tool, |args| async move {
        Ok(book_ticket(
            args["date"].as_str().unwrap_or_default(),
            args["origin"].as_str().unwrap_or_default(),
            args["destination"].as_str().unwrap_or_default(),
        ))
    }))
}

fn book_ticket(date: &str, origin: &str, destination: &str) -> String {
    format!(
        "✅ 已为您购买 {} 从 {} → {} 的火车票，车次 G1234，座位 5A。",
        date, origin, destination
    )
}

pub struct PlanExecuteApp {
    model: ModelClient,
}

pub struct PlanExecuteSession {
    planner: Agent,
    executor: Agent,
}

impl PlanExecuteApp {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        Ok(Self {
            model: ModelClient::from_yaml_file(&config.model_config)?,
        })
    }
}

#[async_trait]
impl ChatApp for PlanExecuteApp {
    type Session = PlanExecuteSession;

    fn name(&self) -> &str {
        "plan-execute"
    }

    fn starters(&self) -> Vec<Starter> {
        vec![
            Starter::new("买火车票", "帮我买一张明天从杭州到宁波的火车票"),
            Starter::new("查天气", "帮我查一下明天上海闵行区的天气怎么样"),
        ]
    }

    async fn on_session_start(&self) -> Result<PlanExecuteSession> {
        let planner = Agent::builder(PLANNER_NAME)
            .instructions(PLANNER_INSTRUCTIONS)
            .model(self.model.clone())
            .build()?;

        let executor = Agent::builder(EXECUTOR_NAME)
            .instructions(EXECUTOR_INSTRUCTIONS)
            .model(self.model.clone())
            .tools(ticket_toolbox())
            .reflect_on_tool_use(true)
            .build()?;

        Ok(PlanExecuteSession { planner, executor })
    }

    async fn on_message(
        &self,
        session: &mut PlanExecuteSession,
        content: &str,
        ui: &UiSink,
    ) -> Result<()> {
        // plan stage: stream to the UI while accumulating the plan text
        let plan = relay_run(session.planner.spawn_run(ChatMessage::user(content)), ui).await?;

        // execute stage: the executor sees the plan as the planner's handoff
        relay_run(
            session
                .executor
                .spawn_run(ChatMessage::new(PLANNER_NAME, plan)),
            ui,
        )
        .await?;

        Ok(())
    }
}

/// Forward one agent run to the UI and return the text its tokens
/// accumulated to.
async fn relay_run(mut events: mpsc::Receiver<TeamEvent>, ui: &UiSink) -> Result<String> {
    let mut accumulated = String::new();

    while let Some(event) = events.recv().await {
        match event {
            TeamEvent::Token { content, .. } => {
                accumulated.push_str(&content);
                ui.token(content).await?;
            }
            TeamEvent::Message { content, .. } => ui.message(content).await?,
            TeamEvent::ToolCall {
                name, arguments, ..
            } => ui.tool_call(name, arguments).await?,
            TeamEvent::ToolResult { result, .. } => ui.tool_result(result).await?,
            TeamEvent::Error { message, .. } => return Err(anyhow!(message)),
            _ => {}
        }
    }

    Ok(accumulated)
}
