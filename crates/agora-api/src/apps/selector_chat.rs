//! Four-agent analysis team behind a selector group chat.
//!
//! `InputRefiner` opens every run and `OutputSummarizer` closes it (a
//! [`BookendSelector`]); the retriever and analyst take the middle turns
//! as the default policy sees fit. Only the summarizer speaks to the UI;
//! the refiner's one-line restatement goes to a local log file instead.

use crate::app::{ChatApp, Starter, UiSink};
use crate::config::ChatConfig;
use agora_llm::{ModelClient, Tool};
use agora_team::{Agent, BookendSelector, FunctionToolbox, GroupChat, TeamConfig};
use agora_types::TeamEvent;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

const MAX_TURNS: usize = 6;

/// The fixed roster, in roster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Refiner,
    Retriever,
    Analyst,
    Summarizer,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Refiner,
        Role::Retriever,
        Role::Analyst,
        Role::Summarizer,
    ];

    pub fn agent_name(self) -> &'static str {
        match self {
            Role::Refiner => "InputRefiner",
            Role::Retriever => "InfoRetriever",
            Role::Analyst => "Analyst",
            Role::Summarizer => "OutputSummarizer",
        }
    }

    pub fn parse(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.agent_name() == name)
    }

    fn instructions(self) -> &'static str {
        match self {
            Role::Refiner => {
                "你善于将用户输入精炼为简明、结构化、信息密度高的任务描述。\
                 必须注意：你的发言是高度概括性的，只需要一句话，一般不超过20个字。"
            }
            Role::Retriever => "你善于检索与任务相关的知识、实例、数据，必要时可调用search_web工具。",
            Role::Analyst => "你擅长对给定任务或信息进行条理清晰的分析，可调用analyze_data工具协助判断。",
            Role::Summarizer => {
                "你不直接参与和其他agent的交流，你只需要对目前上下文中的其他团队成员\
                 给出的输出做出系统性的总结，需要是有条理的，易于理解的。"
            }
        }
    }
}

fn search_toolbox() -> Arc<FunctionToolbox> {
    let tool = Tool::new(
        "search_web",
        "检索与任务相关的网页内容",
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "检索关键词" }
            },
            "required": ["query"]
        }),
    );

    Arc::new(FunctionToolbox::new().register(tool, |args| async move {
        let query = args["query"].as_str().unwrap_or_default();
        Ok(format!("🌐 检索结果：'{}' 的最新网页摘要如下……", query))
    }))
}

fn analysis_toolbox() -> Arc<FunctionToolbox> {
    let tool = Tool::new(
        "analyze_data",
        "对给定数据做初步分析",
        json!({
            "type": "object",
            "properties": {
                "data": { "type": "string", "description": "待分析的数据" }
            },
            "required": ["data"]
        }),
    );

    Arc::new(FunctionToolbox::new().register(tool, |args| async move {
        let data = args["data"].as_str().unwrap_or_default();
        Ok(format!("📊 针对数据'{}'的初步分析结果：……", data))
    }))
}

pub struct SelectorChatApp {
    model: ModelClient,
    refiner_log: PathBuf,
}

pub struct SelectorSession {
    team: GroupChat,
}

impl SelectorChatApp {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let model = ModelClient::from_yaml_file(&config.model_config)?;

        Ok(Self {
            model,
            refiner_log: PathBuf::from(&config.refiner_log),
        })
    }

    fn build_team(&self) -> Result<GroupChat> {
        let mut builder = GroupChat::builder();

        for role in Role::ALL {
            let mut agent = Agent::builder(role.agent_name())
                .instructions(role.instructions())
                .model(self.model.clone());

            agent = match role {
                Role::Retriever => agent.tools(search_toolbox()).reflect_on_tool_use(true),
                Role::Analyst => agent.tools(analysis_toolbox()).reflect_on_tool_use(true),
                _ => agent,
            };

            builder = builder.participant(agent.build()?);
        }

        builder
            .selector(BookendSelector::new(
                Role::Refiner.agent_name(),
                Role::Summarizer.agent_name(),
                MAX_TURNS,
            ))
            .model(self.model.clone())
            .config(TeamConfig::new().with_max_turns(MAX_TURNS))
            .build()
    }
}

#[async_trait]
impl ChatApp for SelectorChatApp {
    type Session = SelectorSession;

    fn name(&self) -> &str {
        "selector-chat"
    }

    fn starters(&self) -> Vec<Starter> {
        vec![
            Starter::new(
                "法律咨询",
                "我最近被公司解雇，对方没有提前一个月通知我，只支付了一个月工资补偿，\
                 请问我能否要求更多补偿？有哪些相关的法律依据和案例？我需要注意哪些风险？",
            ),
            Starter::new("旅游攻略", "我想去云南自由行5天，能帮我设计一份详细路线和注意事项吗？"),
            Starter::new(
                "数据分析",
                "请帮我分析一份销售数据，给出增长瓶颈和改进建议。原始数据如下：......",
            ),
        ]
    }

    async fn on_session_start(&self) -> Result<SelectorSession> {
        Ok(SelectorSession {
            team: self.build_team()?,
        })
    }

    async fn on_message(
        &self,
        session: &mut SelectorSession,
        content: &str,
        ui: &UiSink,
    ) -> Result<()> {
        let mut events = session.team.spawn_run(content);

        while let Some(event) = events.recv().await {
            dispatch(event, ui, &self.refiner_log).await?;
        }

        Ok(())
    }
}

/// Route one team event: the summarizer is the visible voice, the
/// refiner writes to its log, everyone else surfaces only tool use.
async fn dispatch(event: TeamEvent, ui: &UiSink, refiner_log: &Path) -> Result<()> {
    match event {
        TeamEvent::Token { agent, content } if Role::parse(&agent) == Some(Role::Summarizer) => {
            ui.token(content).await
        }
        TeamEvent::Message { agent, content } => match Role::parse(&agent) {
            Some(Role::Summarizer) => ui.message(content).await,
            Some(Role::Refiner) => append_refined_line(refiner_log, &content).await,
            _ => {
                tracing::debug!(agent = %agent, "intermediate message kept off the UI");
                Ok(())
            }
        },
        TeamEvent::ToolCall {
            name, arguments, ..
        } => ui.tool_call(name, arguments).await,
        TeamEvent::ToolResult { result, .. } => ui.tool_result(result).await,
        TeamEvent::Error { message, .. } => Err(anyhow!(message)),
        other => {
            tracing::trace!(event = ?other, "team event");
            Ok(())
        }
    }
}

/// Append the refined task to the log as one trimmed line.
async fn append_refined_line(path: &Path, content: &str) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    file.write_all(format!("{}\n", content.trim()).as_bytes())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::UiEvent;
    use tokio::sync::mpsc;

    fn temp_log(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("agora-refiner-{}-{}.txt", tag, std::process::id()))
    }

    #[test]
    fn test_role_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.agent_name()), Some(role));
        }
        assert_eq!(Role::parse("user"), None);
        assert_eq!(Role::parse("inputrefiner"), None);
    }

    #[test]
    fn test_roster_order_is_bookended() {
        assert_eq!(Role::ALL[0], Role::Refiner);
        assert_eq!(Role::ALL[3], Role::Summarizer);
    }

    #[tokio::test]
    async fn test_dispatch_shows_only_the_summarizer() {
        let (tx, mut rx) = mpsc::channel(16);
        let ui = UiSink::new(tx);
        let log = temp_log("dispatch");

        let events = vec![
            TeamEvent::TurnStarted {
                agent: "Analyst".to_string(),
                turn: 3,
            },
            TeamEvent::Token {
                agent: "Analyst".to_string(),
                content: "内部推理".to_string(),
            },
            TeamEvent::Message {
                agent: "Analyst".to_string(),
                content: "分析完成".to_string(),
            },
            TeamEvent::Token {
                agent: "OutputSummarizer".to_string(),
                content: "总结".to_string(),
            },
            TeamEvent::Message {
                agent: "OutputSummarizer".to_string(),
                content: "总结如下".to_string(),
            },
        ];

        for event in events {
            dispatch(event, &ui, &log).await.unwrap();
        }
        drop(ui);

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            seen.push(event);
        }

        assert_eq!(
            seen,
            vec![
                UiEvent::Token {
                    text: "总结".to_string()
                },
                UiEvent::Message {
                    text: "总结如下".to_string()
                },
            ]
        );

        let _ = tokio::fs::remove_file(&log).await;
    }

    #[tokio::test]
    async fn test_refiner_messages_append_trimmed_lines() {
        let (tx, _rx) = mpsc::channel(16);
        let ui = UiSink::new(tx);
        let log = temp_log("refined");
        let _ = tokio::fs::remove_file(&log).await;

        for content in ["  劳动补偿咨询  \n", "云南五日游规划"] {
            dispatch(
                TeamEvent::Message {
                    agent: "InputRefiner".to_string(),
                    content: content.to_string(),
                },
                &ui,
                &log,
            )
            .await
            .unwrap();
        }

        let written = tokio::fs::read_to_string(&log).await.unwrap();
        assert_eq!(written, "劳动补偿咨询\n云南五日游规划\n");

        let _ = tokio::fs::remove_file(&log).await;
    }

    #[tokio::test]
    async fn test_dispatch_forwards_tool_use_and_fails_on_error() {
        let (tx, mut rx) = mpsc::channel(16);
        let ui = UiSink::new(tx);
        let log = temp_log("tools");

        dispatch(
            TeamEvent::ToolCall {
                agent: "InfoRetriever".to_string(),
                id: "call_1".to_string(),
                name: "search_web".to_string(),
                arguments: r#"{"query":"云南"}"#.to_string(),
            },
            &ui,
            &log,
        )
        .await
        .unwrap();

        let err = dispatch(
            TeamEvent::Error {
                message: "model unavailable".to_string(),
                agent: None,
            },
            &ui,
            &log,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("model unavailable"));

        drop(ui);
        match rx.recv().await {
            Some(UiEvent::ToolCall { name, .. }) => assert_eq!(name, "search_web"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_canned_tools_echo_their_input() {
        use agora_team::ToolExecutor;

        let search = search_toolbox();
        let result = search
            .execute("search_web", json!({"query": "云南 自由行"}))
            .await
            .unwrap();
        assert!(result.contains("云南 自由行"));
        assert!(result.starts_with("🌐"));

        let analysis = analysis_toolbox();
        let result = analysis
            .execute("analyze_data", json!({"data": "销售数据"}))
            .await
            .unwrap();
        assert!(result.contains("销售数据"));
        assert!(result.starts_with("📊"));
    }
}
