//! # Guardrails (orientation)
//!
//! Input and output guardrails are secondary checks around a run: input
//! guardrails inspect the user's message before the first model call, output
//! guardrails inspect the final answer before it is returned. A tripped
//! guardrail aborts the turn with a typed error. The tutor demo uses an
//! input guardrail backed by a classifier agent to reject non-homework
//! questions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AgentsError, Result};

/// The outcome of a single guardrail check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailResult {
    pub passed: bool,
    pub reason: Option<String>,
}

impl GuardrailResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            reason: None,
        }
    }

    pub fn trip(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Validates user input before it reaches the model.
#[async_trait]
pub trait InputGuardrail: Send + Sync {
    fn name(&self) -> &str;
    fn priority(&self) -> i32 {
        0
    }
    async fn check(&self, input: &str) -> Result<GuardrailResult>;
}

/// Validates the agent's final answer before it is returned.
#[async_trait]
pub trait OutputGuardrail: Send + Sync {
    fn name(&self) -> &str;
    fn priority(&self) -> i32 {
        0
    }
    async fn check(&self, output: &str) -> Result<GuardrailResult>;
}

/// Executes guardrails in descending priority order.
pub struct GuardrailRunner;

impl GuardrailRunner {
    pub async fn check_input(guards: &[Arc<dyn InputGuardrail>], input: &str) -> Result<()> {
        let mut guards = guards.to_vec();
        guards.sort_by_key(|g| -g.priority());
        for g in guards {
            let res = g.check(input).await?;
            if !res.passed {
                return Err(AgentsError::InputGuardrailTriggered {
                    message: res.reason.unwrap_or_else(|| g.name().to_string()),
                });
            }
        }
        Ok(())
    }

    pub async fn check_output(guards: &[Arc<dyn OutputGuardrail>], output: &str) -> Result<()> {
        let mut guards = guards.to_vec();
        guards.sort_by_key(|g| -g.priority());
        for g in guards {
            let res = g.check(output).await?;
            if !res.passed {
                return Err(AgentsError::OutputGuardrailTriggered {
                    message: res.reason.unwrap_or_else(|| g.name().to_string()),
                });
            }
        }
        Ok(())
    }
}
