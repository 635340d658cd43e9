//! Result and event types for agent runs

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::agent::Agent;
use crate::error::Result;
use crate::items::{Message, Role, RunItem};
use crate::usage::UsageStats;

/// The result of running an agent to completion.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The final text produced by the last active agent.
    pub final_output: String,
    /// Transcript of everything that happened during the run.
    pub items: Vec<RunItem>,
    /// The agent that produced the final output. An interactive loop should
    /// resume the next turn with this agent.
    pub last_agent: Agent,
    /// Token usage aggregated across the run.
    pub usage: UsageStats,
    messages: Vec<Message>,
}

impl RunResult {
    pub(crate) fn new(
        final_output: String,
        items: Vec<RunItem>,
        last_agent: Agent,
        usage: UsageStats,
        messages: Vec<Message>,
    ) -> Self {
        Self {
            final_output,
            items,
            last_agent,
            usage,
            messages,
        }
    }

    /// The conversation so far, ready to be extended with the next user
    /// message and passed back to the runner. The system message is omitted
    /// because the runner rebuilds it for the active agent each turn.
    pub fn to_input_list(&self) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned()
            .collect()
    }

    /// Parse the final output as a structured value. Useful with agents
    /// configured with an output schema.
    pub fn final_output_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.final_output)?)
    }
}

/// An event emitted while a streamed run progresses.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// The active agent changed (sent once at start and after hand-offs).
    AgentUpdated { name: String },
    /// The model requested a tool call.
    ToolCalled { tool_name: String, arguments: Value },
    /// A tool call finished.
    ToolOutput { tool_name: String, output: Value },
    /// One agent handed the conversation to another.
    Handoff { from_agent: String, to_agent: String },
    /// The agent produced a message for the user.
    MessageOutput { agent: String, content: String },
    /// The run finished successfully.
    RunCompleted { result: RunResult },
    /// The run failed.
    RunFailed { error: String },
}

/// Stream of [`RunEvent`]s from [`Runner::run_stream`](crate::runner::Runner::run_stream).
///
/// Terminates after a `RunCompleted` or `RunFailed` event.
pub struct RunEventStream {
    inner: UnboundedReceiverStream<RunEvent>,
}

impl RunEventStream {
    pub(crate) fn new(receiver: tokio::sync::mpsc::UnboundedReceiver<RunEvent>) -> Self {
        Self {
            inner: UnboundedReceiverStream::new(receiver),
        }
    }

    /// Receive the next event, or `None` when the run is over.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        use tokio_stream::StreamExt;
        self.inner.next().await
    }
}

impl Stream for RunEventStream {
    type Item = RunEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
