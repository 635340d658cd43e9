//! SRE triage demo for container apps.
//!
//! A coordinating agent decides whether an incident is a networking or an
//! availability problem and hands off to the matching diagnostic agent. The
//! diagnostic agents carry mock telemetry tools and hand back to the
//! coordinator when a question falls outside their expertise.
//!
//! Runs an interactive loop: each user line extends the conversation, and
//! the next turn resumes with whichever agent answered last.

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use triage_agents::diagnostics::{
    check_dns_tool, check_nsg_rules_tool, get_cpu_usage_tool, get_logs_tool,
    get_memory_usage_tool,
};
use triage_agents::{
    Agent, Handoff, Message, ProviderSettings, Result, RunConfig, Runner,
    RECOMMENDED_HANDOFF_PROMPT_PREFIX,
};

const COORDINATOR_NAME: &str = "Container Apps Coordinating Agent";

fn coordinator_instructions() -> String {
    format!(
        "{RECOMMENDED_HANDOFF_PROMPT_PREFIX}
You are a coordinator for a container apps SRE agent. Your job is to:
1. Understand the user's request about their container app.
   The container app may be having a problem that needs diagnosis or the user is just asking questions about it
2. Determine which specialized diagnostic agent to use to handle the user's request
3. Handoff to the appropriate diagnostic agent
"
    )
}

fn networking_agent() -> Agent {
    let instructions = format!(
        "{RECOMMENDED_HANDOFF_PROMPT_PREFIX}
You are a specialized networking diagnostic agent. Your job is to diagnose networking issues with container apps.

Focus on these common networking issues:
1. NSG rules blocking traffic
2. DNS resolution issues

If you need more information, ask the user specific questions.
If you need to run a diagnostic tool, use the appropriate function.
If the question is outside of your expertise then handoff to the coordinator agent

If you've identified the issue, respond with a line starting with DIAGNOSIS: followed by a brief description of the issue.
Example: DIAGNOSIS: NSG rule blocking port 443 traffic to the web tier

After any tool usage or diagnosis, provide a clear explanation to the user.
"
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

fn availability_agent() -> Agent {
    let instructions = format!(
        "{RECOMMENDED_HANDOFF_PROMPT_PREFIX}
You are a specialized container apps availability diagnostic agent. Your job is to diagnose availability issues with container apps.

Focus on these common availability issues:
1. High CPU or memory usage makes the app unresponsive
2. High request count makes the app unresponsive
3. Image pull failures in the logs result in the latest revision unable to activate

If you need more information, ask the user specific questions.
If you need to run a diagnostic tool, use the appropriate function.
If the question is outside of your expertise then handoff to the coordinator agent

If you've identified the issue, respond with a line starting with DIAGNOSIS: followed by a brief description of the issue.
Example: DIAGNOSIS: Image pull failure due to incorrect credentials

After any tool usage or diagnosis, provide a clear explanation to the user.
"
    );

    Agent::simple("Availability Diagnostic Agent", instructions)
        .with_handoff_description("Diagnoses resource exhaustion and revision activation problems")
        .with_tool(get_cpu_usage_tool())
        .with_tool(get_memory_usage_tool())
        .with_tool(get_logs_tool())
        .with_handoff(Handoff::by_name(
            COORDINATOR_NAME,
            "Hand back questions outside availability",
        ))
}

fn coordinator() -> Agent {
    Agent::simple(COORDINATOR_NAME, coordinator_instructions())
        .with_handoff(Handoff::new(
            networking_agent(),
            "Diagnoses NSG and DNS problems",
        ))
        .with_handoff(Handoff::new(
            availability_agent(),
            "Diagnoses resource exhaustion and revision activation problems",
        ))
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

    let mut agent = coordinator();
    let mut history: Vec<Message> = Vec::new();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("User: ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        history.push(Message::user(line));

        let config = RunConfig::default().with_model_provider(provider.clone());
        let result = Runner::run_messages(agent.clone(), history.clone(), config).await?;

        println!("{}: {}", result.last_agent.name(), result.final_output);

        agent = result.last_agent.clone();
        history = result.to_input_list();
    }

    Ok(())
}
