//! # Multi-agent triage demos over OpenAI chat completions
//!
//! A small agent runtime plus a set of runnable demos: a tutor triage desk
//! that routes homework questions to subject specialists, and an SRE
//! coordinator that hands incidents off to diagnostic agents armed with mock
//! telemetry tools.
//!
//! ## Core Concepts
//!
//! - **Agent**: a name, instructions, and the tools and hand-offs it may use
//! - **Tools**: type-safe functions the model can call, with automatic schema
//!   generation from the argument type
//! - **Hand-offs**: agent-to-agent transfers, advertised to the model as
//!   `transfer_to_*` tools
//! - **Guardrails**: checks run on the input before the first turn and on the
//!   final answer before it is returned
//! - **Runner**: the loop that feeds the conversation to the model, executes
//!   tool calls, and follows hand-offs until an agent answers in plain text
//!
//! ## Getting Started
//!
//! Set your OpenAI API key in the `OPENAI_API_KEY` environment variable.
//!
//! ```rust,no_run
//! use triage_agents::{Agent, Handoff, Runner, RunConfig};
//!
//! # async fn example() -> triage_agents::Result<()> {
//! let math = Agent::simple("Math Tutor", "You help with math problems.")
//!     .with_handoff_description("Specialist for math questions");
//!
//! let triage = Agent::simple("Triage Agent", "Route the student to the right tutor.")
//!     .with_handoff(Handoff::new(math, "Transfer math questions here"));
//!
//! let result = Runner::run(triage, "What is 7 * 8?", RunConfig::default()).await?;
//! println!("{}", result.final_output);
//! # Ok(())
//! # }
//! ```
//!
//! The demo binaries (`tutor_triage`, `sre_triage`, `streaming_tools`) show
//! the full set: structured-output guardrails, cyclic hand-offs back to a
//! coordinator, and streamed run events.

pub mod agent;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod guardrail;
pub mod handoff;
pub mod items;
pub mod model;
pub mod result;
pub mod runner;
pub mod tool;
pub mod usage;

pub use agent::{Agent, AgentConfig};
pub use config::{AzureSettings, ProviderSettings};
pub use error::{AgentsError, Result};
pub use guardrail::{GuardrailResult, InputGuardrail, OutputGuardrail};
pub use handoff::{Handoff, RECOMMENDED_HANDOFF_PROMPT_PREFIX};
pub use items::{Message, ModelResponse, Role, RunItem, ToolCall};
pub use model::{ModelProvider, ModelSettings, OpenAIProvider, ScriptedProvider};
pub use result::{RunEvent, RunEventStream, RunResult};
pub use runner::{RunConfig, Runner};
pub use tool::{FunctionTool, Tool, ToolResult};
pub use usage::{Usage, UsageStats};
