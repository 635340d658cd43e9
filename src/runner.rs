//! # Runner (orientation)
//!
//! The `Runner` drives an agent run: one model call per turn, sequential
//! tool execution in model order, hand-off interception, and guardrails at
//! the edges. There is a single in-flight request at any time; the loop
//! either returns a final answer, switches agents on a hand-off, or feeds
//! tool outputs back to the model for the next turn.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::error::{AgentsError, Result};
use crate::guardrail::GuardrailRunner;
use crate::items::{
    HandoffItem, Message, MessageItem, Role, RunItem, ToolCallItem, ToolOutputItem,
};
use crate::model::{ModelProvider, ModelSettings, OpenAIProvider};
use crate::result::{RunEvent, RunEventStream, RunResult};
use crate::usage::UsageStats;

/// Configuration for an agent run.
#[derive(Clone, Default)]
pub struct RunConfig {
    /// Cap on model calls for this run. Falls back to the agent's own
    /// `max_turns` (default 10) when unset.
    pub max_turns: Option<usize>,

    /// The model provider to complete against. When unset, a provider over
    /// the standard OpenAI client (configured from the environment) is built
    /// for the agent's model.
    pub model_provider: Option<Arc<dyn ModelProvider>>,
}

impl RunConfig {
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn with_model_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.model_provider = Some(provider);
        self
    }
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("max_turns", &self.max_turns)
            .field("model_provider", &self.model_provider.is_some())
            .finish()
    }
}

/// Executes agents. Stateless; all state lives in the message history the
/// caller threads between runs.
///
/// ## Example
///
/// ```rust,no_run
/// use triage_agents::{Agent, Runner, RunConfig};
///
/// # async fn run_agent() -> triage_agents::Result<()> {
/// let agent = Agent::simple("History Tutor", "You assist with historical queries.");
/// let result = Runner::run(agent, "Who was the first US president?", RunConfig::default()).await?;
/// println!("{}", result.final_output);
/// # Ok(())
/// # }
/// ```
pub struct Runner;

impl Runner {
    /// Run an agent on a single user message.
    pub async fn run(agent: Agent, input: impl Into<String>, config: RunConfig) -> Result<RunResult> {
        Self::run_messages(agent, vec![Message::user(input.into())], config).await
    }

    /// Run an agent on an existing conversation history (without a system
    /// message; the runner builds that from the active agent each turn).
    ///
    /// Interactive loops call this with `result.to_input_list()` plus the
    /// next user message, resuming with `result.last_agent`.
    pub async fn run_messages(
        agent: Agent,
        history: Vec<Message>,
        config: RunConfig,
    ) -> Result<RunResult> {
        Self::run_loop(agent, history, config, None).await
    }

    /// Run an agent and observe progress as a stream of [`RunEvent`]s.
    ///
    /// The run itself executes on a background task; the returned stream
    /// terminates with `RunCompleted` or `RunFailed`.
    pub fn run_stream(
        agent: Agent,
        input: impl Into<String>,
        config: RunConfig,
    ) -> RunEventStream {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let history = vec![Message::user(input.into())];

        tokio::spawn({
            let tx = tx.clone();
            async move {
                match Self::run_loop(agent, history, config, Some(tx.clone())).await {
                    Ok(result) => {
                        let _ = tx.send(RunEvent::RunCompleted { result });
                    }
                    Err(e) => {
                        let _ = tx.send(RunEvent::RunFailed {
                            error: e.to_string(),
                        });
                    }
                }
            }
        });

        RunEventStream::new(rx)
    }

    async fn run_loop(
        mut agent: Agent,
        history: Vec<Message>,
        config: RunConfig,
        events: Option<UnboundedSender<RunEvent>>,
    ) -> Result<RunResult> {
        info!(agent = %agent.name(), "Starting agent run");

        let emit = |event: RunEvent| {
            if let Some(tx) = &events {
                let _ = tx.send(event);
            }
        };

        // Input guardrails see the latest user message.
        if !agent.config.input_guardrails.is_empty() {
            if let Some(user_input) = history
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.clone())
            {
                GuardrailRunner::check_input(&agent.config.input_guardrails, &user_input).await?;
            }
        }

        let max_turns = config
            .max_turns
            .unwrap_or(agent.config.max_turns.unwrap_or(10));

        let model_provider = config.model_provider.unwrap_or_else(|| {
            Arc::new(OpenAIProvider::with_client(
                async_openai::Client::new(),
                agent.config.model.clone(),
            ))
        });

        // Agents reachable from the entry agent, for resolving named
        // hand-off back-references.
        let mut known_agents = HashMap::new();
        collect_agents(&agent, &mut known_agents);

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(agent.build_system_message());
        messages.extend(history);

        let mut items = Vec::new();
        let mut usage_stats = UsageStats::new();
        let mut turn_count = 0;

        emit(RunEvent::AgentUpdated {
            name: agent.name().to_string(),
        });

        loop {
            turn_count += 1;
            if turn_count > max_turns {
                return Err(AgentsError::MaxTurnsExceeded { max_turns });
            }

            debug!(turn = turn_count, agent = %agent.name(), "Starting turn");

            // The system message always reflects the active agent.
            messages[0] = agent.build_system_message();

            let advertised = crate::model::advertised_tools(&agent)?;
            let settings = ModelSettings {
                temperature: agent.config.temperature,
                max_tokens: agent.config.max_tokens,
                output_schema: agent.config.output_schema.clone(),
            };

            let (response, usage) = model_provider
                .complete(messages.clone(), advertised, &settings)
                .await?;
            usage_stats.record(agent.name(), usage);

            if response.has_tool_calls() {
                messages.push(Message::assistant_with_tool_calls(
                    response.content.clone().unwrap_or_default(),
                    response.tool_calls.clone(),
                ));
                if response.has_content() {
                    items.push(RunItem::Message(MessageItem::assistant(
                        response.content.clone().unwrap_or_default(),
                    )));
                }

                // Hand-off short-circuit: process the first hand-off call and
                // start a new turn as the target agent.
                let handoff_call = response.tool_calls.iter().find_map(|tc| {
                    agent
                        .handoffs()
                        .iter()
                        .find(|h| h.tool_name() == tc.name)
                        .map(|h| (tc.clone(), h.clone()))
                });

                if let Some((call, handoff)) = handoff_call {
                    let target = handoff
                        .agent()
                        .cloned()
                        .or_else(|| known_agents.get(handoff.agent_name()).cloned())
                        .ok_or_else(|| AgentsError::HandoffError {
                            message: format!(
                                "No agent named '{}' is reachable in this run",
                                handoff.agent_name()
                            ),
                        })?;

                    info!(from = %agent.name(), to = %target.name(), "Handoff detected");

                    items.push(RunItem::ToolCall(ToolCallItem {
                        id: call.id.clone(),
                        tool_name: call.name.clone(),
                        arguments: call.arguments.clone(),
                        created_at: chrono::Utc::now(),
                    }));
                    items.push(RunItem::Handoff(HandoffItem {
                        id: uuid::Uuid::new_v4().to_string(),
                        from_agent: agent.name().to_string(),
                        to_agent: target.name().to_string(),
                        created_at: chrono::Utc::now(),
                    }));

                    let ack = serde_json::json!({"handoff": target.name(), "ack": true});
                    messages.push(Message::tool(ack.to_string(), &call.id));
                    items.push(RunItem::ToolOutput(ToolOutputItem {
                        id: uuid::Uuid::new_v4().to_string(),
                        tool_call_id: call.id.clone(),
                        output: ack,
                        error: None,
                        created_at: chrono::Utc::now(),
                    }));

                    // Every advertised tool call must be answered with a tool
                    // message before the next provider call, including the
                    // siblings of an intercepted hand-off.
                    for other in response.tool_calls.iter().filter(|tc| tc.id != call.id) {
                        let skipped = serde_json::json!({
                            "skipped": true,
                            "reason": format!("conversation transferred to {}", target.name()),
                        });
                        messages.push(Message::tool(skipped.to_string(), &other.id));
                        items.push(RunItem::ToolOutput(ToolOutputItem {
                            id: uuid::Uuid::new_v4().to_string(),
                            tool_call_id: other.id.clone(),
                            output: skipped,
                            error: None,
                            created_at: chrono::Utc::now(),
                        }));
                    }

                    emit(RunEvent::Handoff {
                        from_agent: agent.name().to_string(),
                        to_agent: target.name().to_string(),
                    });
                    emit(RunEvent::AgentUpdated {
                        name: target.name().to_string(),
                    });

                    collect_agents(&target, &mut known_agents);
                    agent = target;
                    continue;
                }

                // Regular tool calls, executed sequentially in model order.
                for call in &response.tool_calls {
                    items.push(RunItem::ToolCall(ToolCallItem {
                        id: call.id.clone(),
                        tool_name: call.name.clone(),
                        arguments: call.arguments.clone(),
                        created_at: chrono::Utc::now(),
                    }));
                    emit(RunEvent::ToolCalled {
                        tool_name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    });

                    let tool = agent
                        .tools()
                        .iter()
                        .find(|t| t.name() == call.name)
                        .cloned();

                    let (output, error) = match tool {
                        Some(tool) => match tool.execute(call.arguments.clone()).await {
                            Ok(result) => (result.output, result.error),
                            Err(e) => (serde_json::Value::Null, Some(e.to_string())),
                        },
                        None => {
                            warn!(tool = %call.name, "Model called an unknown tool");
                            (
                                serde_json::Value::Null,
                                Some(format!("Unknown tool '{}'", call.name)),
                            )
                        }
                    };

                    let content = match &error {
                        Some(err) => format!("Error: {}", err),
                        None => serde_json::to_string(&output)
                            .unwrap_or_else(|_| "null".to_string()),
                    };
                    messages.push(Message::tool(content, &call.id));
                    items.push(RunItem::ToolOutput(ToolOutputItem {
                        id: uuid::Uuid::new_v4().to_string(),
                        tool_call_id: call.id.clone(),
                        output: output.clone(),
                        error,
                        created_at: chrono::Utc::now(),
                    }));
                    emit(RunEvent::ToolOutput {
                        tool_name: call.name.clone(),
                        output,
                    });
                }

                continue;
            }

            if let Some(content) = &response.content {
                if !content.is_empty() {
                    if !agent.config.output_guardrails.is_empty() {
                        GuardrailRunner::check_output(&agent.config.output_guardrails, content)
                            .await?;
                    }

                    messages.push(Message::assistant(content));
                    items.push(RunItem::Message(MessageItem::assistant(content)));
                    emit(RunEvent::MessageOutput {
                        agent: agent.name().to_string(),
                        content: content.clone(),
                    });

                    info!(agent = %agent.name(), usage = %usage_stats.summary(), "Run finished");
                    return Ok(RunResult::new(
                        content.clone(),
                        items,
                        agent,
                        usage_stats,
                        messages,
                    ));
                }
            }

            return Err(AgentsError::ModelBehaviorError {
                message: "Model returned neither content nor tool calls".to_string(),
            });
        }
    }
}

fn collect_agents(agent: &Agent, map: &mut HashMap<String, Agent>) {
    if map.contains_key(agent.name()) {
        return;
    }
    map.insert(agent.name().to_string(), agent.clone());
    for handoff in agent.handoffs() {
        if let Some(target) = handoff.agent() {
            collect_agents(target, map);
        }
    }
}
