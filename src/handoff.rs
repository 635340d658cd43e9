//! # Agent hand-offs
//!
//! A hand-off lets one agent transfer an in-progress conversation to another,
//! more specialized agent. Each hand-off is advertised to the model as a
//! function tool named `transfer_to_<agent>`; when the model calls it, the
//! runner intercepts the call, acknowledges it, and continues the run with
//! the target agent instead of executing anything.
//!
//! Targets come in two forms:
//!
//! - [`Handoff::new`] owns the target agent directly. This is the common case
//!   for "downward" routing (coordinator → specialist).
//! - [`Handoff::by_name`] names the target and lets the runner resolve it
//!   against the agents it has seen in the current run. This is how two
//!   agents can each declare the other before both exist: build the
//!   specialists with a named back-reference to the coordinator, then build
//!   the coordinator with direct hand-offs to the specialists.
//!
//! ```rust
//! use triage_agents::{Agent, Handoff};
//!
//! let specialist = Agent::simple("Networking Diagnostic Agent", "You diagnose networking issues.")
//!     .with_handoff(Handoff::by_name(
//!         "Coordinator",
//!         "Route non-networking questions back to the coordinator",
//!     ));
//! let coordinator = Agent::simple("Coordinator", "You route requests.")
//!     .with_handoff(Handoff::new(specialist, "Handles NSG and DNS issues"));
//!
//! assert_eq!(coordinator.handoffs()[0].tool_name(), "transfer_to_networking_diagnostic_agent");
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::agent::Agent;
use crate::error::Result;
use crate::tool::{Tool, ToolResult};

/// The system-prompt prefix recommended for agents that participate in
/// hand-offs. Prepend it to agent instructions so the model understands the
/// transfer mechanism.
pub const RECOMMENDED_HANDOFF_PROMPT_PREFIX: &str = "# System context\n\
You are part of a multi-agent system designed to make agent coordination and \
execution easy. The system uses two primary abstractions: **Agents** and \
**Handoffs**. An agent encompasses instructions and tools and can hand off a \
conversation to another agent when appropriate. Handoffs are achieved by \
calling a handoff function, generally named `transfer_to_<agent_name>`. \
Transfers between agents are handled seamlessly in the background; do not \
mention or draw attention to these transfers in your conversation with the \
user.\n";

/// Where a hand-off resolves to.
#[derive(Clone)]
enum HandoffTarget {
    /// A fully built agent, owned by the hand-off.
    Direct(Arc<Agent>),
    /// An agent name resolved by the runner at hand-off time.
    Named(String),
}

/// A potential hand-off target for an agent.
#[derive(Clone)]
pub struct Handoff {
    /// A description of the target agent's capabilities, shown to the model
    /// to help it decide when to delegate.
    pub description: String,

    target: HandoffTarget,
}

impl Handoff {
    /// Creates a hand-off that owns its target agent.
    pub fn new(agent: Agent, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            target: HandoffTarget::Direct(Arc::new(agent)),
        }
    }

    /// Creates a hand-off to an agent identified by name only.
    ///
    /// The runner resolves the name against the agents reachable from the
    /// run's entry agent, so back-references do not need the target to be
    /// built first.
    pub fn by_name(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            target: HandoffTarget::Named(name.into()),
        }
    }

    /// The name of the target agent.
    pub fn agent_name(&self) -> &str {
        match &self.target {
            HandoffTarget::Direct(agent) => agent.name(),
            HandoffTarget::Named(name) => name,
        }
    }

    /// The target agent, when this hand-off owns it directly.
    pub fn agent(&self) -> Option<&Agent> {
        match &self.target {
            HandoffTarget::Direct(agent) => Some(agent),
            HandoffTarget::Named(_) => None,
        }
    }

    /// The function-tool name advertised to the model for this hand-off.
    pub fn tool_name(&self) -> String {
        let mut slug = String::with_capacity(self.agent_name().len());
        for ch in self.agent_name().chars() {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch.to_ascii_lowercase());
            } else if !slug.ends_with('_') {
                slug.push('_');
            }
        }
        format!("transfer_to_{}", slug.trim_matches('_'))
    }
}

impl std::fmt::Debug for Handoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handoff")
            .field("agent", &self.agent_name())
            .field("description", &self.description)
            .finish()
    }
}

/// Adapter exposing a hand-off as a [`Tool`] so it can be advertised to the
/// model alongside regular tools.
#[derive(Clone, Debug)]
pub struct HandoffTool {
    tool_name: String,
    description: String,
}

impl From<&Handoff> for HandoffTool {
    fn from(h: &Handoff) -> Self {
        Self {
            tool_name: h.tool_name(),
            description: format!("Handoff to the {} agent. {}", h.agent_name(), h.description),
        }
    }
}

#[async_trait]
impl Tool for HandoffTool {
    fn name(&self) -> &str {
        &self.tool_name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reason": {"type": "string", "description": "Reason for the handoff"}
            }
        })
    }

    async fn execute(&self, _arguments: Value) -> Result<ToolResult> {
        // Never executed directly; the runner intercepts hand-off calls.
        Ok(ToolResult::success(serde_json::json!({"handoff": true})))
    }
}
