//! # Agent (orientation)
//!
//! An `Agent` is a named configuration bundle: instructions, tools, and the
//! hand-off targets it may transfer a conversation to. Agents hold no
//! conversation state of their own; the [`Runner`](crate::runner::Runner)
//! threads messages through them turn by turn. Agents are cheap to clone and
//! are wired up once at startup by the demo binaries.

use std::sync::Arc;

use crate::guardrail::{InputGuardrail, OutputGuardrail};
use crate::handoff::Handoff;
use crate::items::Message;
use crate::tool::Tool;

/// Defines the complete configuration for an [`Agent`].
#[derive(Clone)]
pub struct AgentConfig {
    /// The name of the agent, used for identification, hand-off routing, and
    /// in logs.
    pub name: String,

    /// The system instructions that set the agent's persona and behavior.
    pub instructions: String,

    /// A description of the agent's capabilities, used when this agent is a
    /// potential hand-off target for another agent.
    pub handoff_description: Option<String>,

    /// Tools the agent can call.
    pub tools: Vec<Arc<dyn Tool>>,

    /// Other agents this agent may transfer the conversation to.
    pub handoffs: Vec<Handoff>,

    /// Guardrails that validate user input before the first model call.
    pub input_guardrails: Vec<Arc<dyn InputGuardrail>>,

    /// Guardrails that validate the agent's final answer before it is
    /// returned to the caller.
    pub output_guardrails: Vec<Arc<dyn OutputGuardrail>>,

    /// The model (or Azure deployment) used for this agent's completions.
    pub model: String,

    /// The maximum number of model calls in a single run. Prevents loops.
    pub max_turns: Option<usize>,

    /// Sampling temperature for the model.
    pub temperature: Option<f32>,

    /// Cap on tokens generated per response, if any.
    pub max_tokens: Option<u32>,

    /// An optional JSON schema enforcing structured output. Used by the
    /// classifier agent behind the homework guardrail.
    pub output_schema: Option<serde_json::Value>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Assistant".to_string(),
            instructions: "You are a helpful assistant.".to_string(),
            handoff_description: None,
            tools: vec![],
            handoffs: vec![],
            input_guardrails: vec![],
            output_guardrails: vec![],
            model: "gpt-4o-mini".to_string(),
            max_turns: Some(10),
            temperature: None,
            max_tokens: None,
            output_schema: None,
        }
    }
}

/// A named participant in a multi-agent workflow.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use triage_agents::{Agent, FunctionTool, Handoff};
///
/// let dns_tool = Arc::new(FunctionTool::new(
///     "check_dns",
///     "Check DNS resolution for a hostname.",
///     serde_json::json!({"type": "object", "properties": {"hostname": {"type": "string"}}}),
///     |args| Ok(serde_json::json!({"hostname": args["hostname"], "has_issues": false})),
/// ));
///
/// let networking = Agent::simple("Networking Agent", "You diagnose networking issues.")
///     .with_tool(dns_tool);
/// let coordinator = Agent::simple("Coordinator", "You route requests.")
///     .with_handoff(Handoff::new(networking, "Handles networking diagnostics"));
///
/// assert_eq!(coordinator.handoffs().len(), 1);
/// ```
#[derive(Clone)]
pub struct Agent {
    pub config: AgentConfig,
}

impl Agent {
    /// Creates a new agent from a full configuration.
    pub fn new(config: AgentConfig) -> Self {
        Self { config }
    }

    /// Creates an agent with just a name and instructions; everything else
    /// uses defaults.
    pub fn simple(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self::new(AgentConfig {
            name: name.into(),
            instructions: instructions.into(),
            ..Default::default()
        })
    }

    /// Sets the model for the agent.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Sets the description shown to agents that can hand off to this one.
    pub fn with_handoff_description(mut self, description: impl Into<String>) -> Self {
        self.config.handoff_description = Some(description.into());
        self
    }

    /// Adds a tool to the agent.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.config.tools.push(tool);
        self
    }

    /// Adds multiple tools to the agent.
    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.config.tools.extend(tools);
        self
    }

    /// Adds a hand-off target to the agent.
    pub fn with_handoff(mut self, handoff: Handoff) -> Self {
        self.config.handoffs.push(handoff);
        self
    }

    /// Adds multiple hand-off targets to the agent.
    pub fn with_handoffs(mut self, handoffs: Vec<Handoff>) -> Self {
        self.config.handoffs.extend(handoffs);
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Sets the maximum number of model calls per run.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.config.max_turns = Some(max_turns);
        self
    }

    /// Sets the maximum number of tokens per response.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    /// Adds an input guardrail.
    pub fn with_input_guardrail(mut self, guardrail: Arc<dyn InputGuardrail>) -> Self {
        self.config.input_guardrails.push(guardrail);
        self
    }

    /// Adds an output guardrail.
    pub fn with_output_guardrail(mut self, guardrail: Arc<dyn OutputGuardrail>) -> Self {
        self.config.output_guardrails.push(guardrail);
        self
    }

    /// Enforces structured output conforming to the given JSON schema.
    pub fn with_output_schema(mut self, schema: serde_json::Value) -> Self {
        self.config.output_schema = Some(schema);
        self
    }

    /// Returns the agent's name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the agent's instructions.
    pub fn instructions(&self) -> &str {
        &self.config.instructions
    }

    /// Returns the tools available to the agent.
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.config.tools
    }

    /// Returns the hand-off targets available to the agent.
    pub fn handoffs(&self) -> &[Handoff] {
        &self.config.handoffs
    }

    pub fn has_tools(&self) -> bool {
        !self.config.tools.is_empty()
    }

    pub fn has_handoffs(&self) -> bool {
        !self.config.handoffs.is_empty()
    }

    /// Constructs the system message for the agent.
    ///
    /// The message is the agent's instructions plus short summaries of its
    /// tools and hand-off targets, so the model knows what it may call.
    pub fn build_system_message(&self) -> Message {
        let mut content = self.config.instructions.clone();

        if !self.config.tools.is_empty() {
            content.push_str("\n\nYou have access to the following tools:\n");
            for tool in &self.config.tools {
                content.push_str(&format!("- {}: {}\n", tool.name(), tool.description()));
            }
        }

        if !self.config.handoffs.is_empty() {
            content.push_str("\n\nYou can hand off to the following agents:\n");
            for handoff in &self.config.handoffs {
                content.push_str(&format!(
                    "- {} (call `{}`): {}\n",
                    handoff.agent_name(),
                    handoff.tool_name(),
                    handoff.description
                ));
            }
        }

        Message::system(content)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.config.name)
            .field("model", &self.config.model)
            .field("tools_count", &self.config.tools.len())
            .field("handoffs_count", &self.config.handoffs.len())
            .finish()
    }
}
