//! Tutor triage demo.
//!
//! A triage agent routes homework questions to a math or history tutor. An
//! input guardrail backed by a classifier agent rejects questions that are
//! not homework, so the second prompt below is expected to be refused.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use triage_agents::{
    Agent, AgentsError, GuardrailResult, Handoff, InputGuardrail, ModelProvider, ProviderSettings,
    Result, RunConfig, Runner,
};

/// Verdict produced by the guardrail classifier agent.
#[derive(Debug, Deserialize, JsonSchema)]
struct HomeworkOutput {
    is_homework: bool,
    reasoning: String,
}

/// Rejects input that the classifier agent does not consider homework.
struct HomeworkGuardrail {
    classifier: Agent,
    provider: Arc<dyn ModelProvider>,
}

impl HomeworkGuardrail {
    fn new(provider: Arc<dyn ModelProvider>) -> Self {
        let schema = serde_json::to_value(schemars::schema_for!(HomeworkOutput))
            .unwrap_or_else(|_| serde_json::json!({"type": "object"}));
        let classifier = Agent::simple(
            "Guardrail check",
            "Check if the user is asking about homework.",
        )
        .with_output_schema(schema);
        Self {
            classifier,
            provider,
        }
    }
}

#[async_trait]
impl InputGuardrail for HomeworkGuardrail {
    fn name(&self) -> &str {
        "homework_guardrail"
    }

    async fn check(&self, input: &str) -> Result<GuardrailResult> {
        let config = RunConfig::default().with_model_provider(self.provider.clone());
        let result = Runner::run(self.classifier.clone(), input, config).await?;
        let verdict: HomeworkOutput = result.final_output_as()?;

        if verdict.is_homework {
            Ok(GuardrailResult::pass())
        } else {
            Ok(GuardrailResult::trip(verdict.reasoning))
        }
    }
}

fn build_triage_agent(provider: Arc<dyn ModelProvider>) -> Agent {
    let math_tutor = Agent::simple(
        "Math Tutor",
        "You provide help with math problems. Explain your reasoning at each step and include examples",
    )
    .with_handoff_description("Specialist agent for math questions");

    let history_tutor = Agent::simple(
        "History Tutor",
        "You provide assistance with historical queries. Explain important events and context clearly.",
    )
    .with_handoff_description("Specialist agent for historical questions");

    Agent::simple(
        "Triage Agent",
        "You determine which agent to use based on the user's homework question",
    )
    .with_handoffs(vec![
        Handoff::new(history_tutor, "Specialist agent for historical questions"),
        Handoff::new(math_tutor, "Specialist agent for math questions"),
    ])
    .with_input_guardrail(Arc::new(HomeworkGuardrail::new(provider)))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let provider = ProviderSettings::from_env()?.provider();

    let triage = build_triage_agent(provider.clone());
    let config = RunConfig::default()
        .with_model_provider(provider.clone())
        .with_max_turns(2);
    let result = Runner::run(
        triage,
        "I am doing a history homework and want to know who was the first president of the united states?",
        config,
    )
    .await?;
    println!("{}", result.final_output);

    let triage = build_triage_agent(provider.clone());
    let config = RunConfig::default().with_model_provider(provider);
    match Runner::run(triage, "what is life", config).await {
        Ok(result) => println!("{}", result.final_output),
        Err(AgentsError::InputGuardrailTriggered { message }) => {
            println!("Guardrail rejected the question: {}", message);
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
