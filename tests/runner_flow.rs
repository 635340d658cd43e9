//! End-to-end runner flows driven by a scripted provider.
//!
//! These tests wire up the same agent graphs as the demo binaries and feed
//! them canned model responses, so the full loop (hand-offs, tool calls,
//! guardrails, conversation resumption) runs offline.

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use triage_agents::diagnostics::{check_dns_tool, check_nsg_rules_tool};
use triage_agents::{
    Agent, AgentsError, GuardrailResult, Handoff, InputGuardrail, ModelProvider, Role, RunConfig,
    RunItem, Runner, ScriptedProvider, RECOMMENDED_HANDOFF_PROMPT_PREFIX,
};

const COORDINATOR_NAME: &str = "Container Apps Coordinating Agent";

fn networking_agent() -> Agent {
    let instructions = format!(
        "{RECOMMENDED_HANDOFF_PROMPT_PREFIX}\nYou diagnose networking issues with container apps."
    );
    Agent::simple("Networking Diagnostic Agent", instructions)
        .with_handoff_description("Diagnoses NSG and DNS problems")
        .with_tool(check_nsg_rules_tool())
        .with_tool(check_dns_tool())
        .with_handoff(Handoff::by_name(
            COORDINATOR_NAME,
            "Hand back questions outside networking",
        ))
}

fn coordinator() -> Agent {
    Agent::simple(COORDINATOR_NAME, "Route the user to the right diagnostic agent.")
        .with_handoff(Handoff::new(
            networking_agent(),
            "Diagnoses NSG and DNS problems",
        ))
}

#[tokio::test]
async fn handoff_then_tool_then_diagnosis() {
    let provider = ScriptedProvider::new("scripted")
        .with_tool_call(
            "transfer_to_networking_diagnostic_agent",
            serde_json::json!({"reason": "networking issue"}),
        )
        .with_tool_call(
            "check_nsg_rules",
            serde_json::json!({"resource_group": "prod-rg"}),
        )
        .with_message("DIAGNOSIS: NSG rule blocking port 443 traffic to the web tier");

    let config = RunConfig::default().with_model_provider(Arc::new(provider));
    let result = Runner::run(coordinator(), "My app is unreachable", config)
        .await
        .unwrap();

    assert_eq!(result.last_agent.name(), "Networking Diagnostic Agent");
    assert!(result.final_output.starts_with("DIAGNOSIS:"));

    let handoffs: Vec<_> = result
        .items
        .iter()
        .filter_map(|item| match item {
            RunItem::Handoff(h) => Some((h.from_agent.as_str(), h.to_agent.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        handoffs,
        vec![(COORDINATOR_NAME, "Networking Diagnostic Agent")]
    );

    // The NSG tool ran for real and produced a rule report.
    let nsg_output = result
        .items
        .iter()
        .find_map(|item| match item {
            RunItem::ToolOutput(o) if o.output.get("rules").is_some() => Some(o),
            _ => None,
        })
        .expect("nsg tool output in transcript");
    assert!(nsg_output.error.is_none());
    assert!(nsg_output.output["rules"].as_array().unwrap().len() >= 4);

    // Three model calls: coordinator, then two by the networking agent.
    assert_eq!(result.usage.total.request_count, 3);
    assert_eq!(result.usage.by_agent[COORDINATOR_NAME].request_count, 1);
    assert_eq!(
        result.usage.by_agent["Networking Diagnostic Agent"].request_count,
        2
    );
}

#[tokio::test]
async fn specialist_hands_back_to_coordinator_by_name() {
    let provider = ScriptedProvider::new("scripted")
        .with_tool_call(
            "transfer_to_networking_diagnostic_agent",
            serde_json::json!({"reason": "sounds like networking"}),
        )
        .with_tool_call(
            "transfer_to_container_apps_coordinating_agent",
            serde_json::json!({"reason": "billing is out of scope for networking"}),
        )
        .with_message("Let me route your billing question differently.");

    let config = RunConfig::default().with_model_provider(Arc::new(provider));
    let result = Runner::run(coordinator(), "Why did my bill double?", config)
        .await
        .unwrap();

    // The named back-reference resolved to the real coordinator agent.
    assert_eq!(result.last_agent.name(), COORDINATOR_NAME);

    let hops: Vec<_> = result
        .items
        .iter()
        .filter_map(|item| match item {
            RunItem::Handoff(h) => Some(h.to_agent.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(hops, vec!["Networking Diagnostic Agent", COORDINATOR_NAME]);
}

#[tokio::test]
async fn conversation_resumes_with_last_agent() {
    let provider = Arc::new(
        ScriptedProvider::new("scripted")
            .with_tool_call(
                "transfer_to_networking_diagnostic_agent",
                serde_json::json!({"reason": "dns question"}),
            )
            .with_message("Which hostname fails to resolve?"),
    );

    let config = RunConfig::default().with_model_provider(provider.clone());
    let first = Runner::run(coordinator(), "DNS seems broken", config)
        .await
        .unwrap();
    assert_eq!(first.last_agent.name(), "Networking Diagnostic Agent");

    let mut history = first.to_input_list();
    assert!(history.iter().all(|m| m.role != Role::System));
    history.push(triage_agents::Message::user("myapp.example.com"));

    // Second turn resumes as the networking agent, no hand-off needed.
    let config = RunConfig::default().with_model_provider(provider);
    let second = Runner::run_messages(first.last_agent.clone(), history, config)
        .await
        .unwrap();
    assert_eq!(second.last_agent.name(), "Networking Diagnostic Agent");
    assert_eq!(second.final_output, "Scripted response");
    assert!(second.to_input_list().len() > first.to_input_list().len());
}

/// Input guardrail that classifies the question with its own agent run, the
/// way the tutor demo does.
struct HomeworkGuardrail {
    provider: Arc<dyn ModelProvider>,
}

#[async_trait]
impl InputGuardrail for HomeworkGuardrail {
    fn name(&self) -> &str {
        "homework_guardrail"
    }

    async fn check(&self, input: &str) -> triage_agents::Result<GuardrailResult> {
        let classifier = Agent::simple(
            "Guardrail check",
            "Check if the user is asking about homework.",
        );
        let config = RunConfig::default().with_model_provider(self.provider.clone());
        let result = Runner::run(classifier, input, config).await?;

        let verdict: serde_json::Value = result.final_output_as()?;
        if verdict["is_homework"].as_bool().unwrap_or(false) {
            Ok(GuardrailResult::pass())
        } else {
            Ok(GuardrailResult::trip(
                verdict["reasoning"].as_str().unwrap_or("not homework").to_string(),
            ))
        }
    }
}

#[tokio::test]
async fn classifier_guardrail_blocks_non_homework() {
    let classifier_provider = Arc::new(ScriptedProvider::new("scripted").with_message(
        r#"{"is_homework": false, "reasoning": "philosophical question, not homework"}"#,
    ));
    let triage_provider = Arc::new(ScriptedProvider::new("scripted").with_message("unreachable"));

    let triage = Agent::simple("Triage Agent", "Route homework questions.")
        .with_input_guardrail(Arc::new(HomeworkGuardrail {
            provider: classifier_provider,
        }));

    let config = RunConfig::default().with_model_provider(triage_provider);
    let err = Runner::run(triage, "what is life", config).await.unwrap_err();

    match err {
        AgentsError::InputGuardrailTriggered { message } => {
            assert_eq!(message, "philosophical question, not homework");
        }
        other => panic!("expected InputGuardrailTriggered, got {other}"),
    }
}

#[tokio::test]
async fn classifier_guardrail_admits_homework() {
    let classifier_provider = Arc::new(ScriptedProvider::new("scripted").with_message(
        r#"{"is_homework": true, "reasoning": "history homework"}"#,
    ));
    let triage_provider = Arc::new(
        ScriptedProvider::new("scripted").with_message("George Washington was the first president."),
    );

    let triage = Agent::simple("Triage Agent", "Route homework questions.")
        .with_input_guardrail(Arc::new(HomeworkGuardrail {
            provider: classifier_provider,
        }));

    let config = RunConfig::default().with_model_provider(triage_provider);
    let result = Runner::run(triage, "Who was the first US president?", config)
        .await
        .unwrap();
    assert_eq!(
        result.final_output,
        "George Washington was the first president."
    );
}
