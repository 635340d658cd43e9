//! Token usage tracking
//!
//! Aggregates the token counts reported by the provider across a run, with a
//! per-agent breakdown so multi-agent runs can be inspected.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Token usage for a single model call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
    pub request_count: usize,
}

impl Usage {
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            request_count: 1,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_usage(&mut self, other: &Usage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
        self.request_count += other.request_count;
    }
}

/// Usage aggregated across an entire run, broken down by agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageStats {
    pub total: Usage,
    pub by_agent: HashMap<String, Usage>,
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, agent: &str, usage: Usage) {
        self.total.add_usage(&usage);
        self.by_agent
            .entry(agent.to_string())
            .or_default()
            .add_usage(&usage);
    }

    /// One-line summary suitable for logging at the end of a run.
    pub fn summary(&self) -> String {
        format!(
            "{} requests, {} prompt + {} completion = {} tokens",
            self.total.request_count,
            self.total.prompt_tokens,
            self.total.completion_tokens,
            self.total.total_tokens
        )
    }
}
