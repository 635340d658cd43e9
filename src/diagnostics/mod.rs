//! Mock diagnostic tools for the SRE demo
//!
//! Every tool here fabricates plausible-looking telemetry instead of calling
//! a real monitoring backend: NSG rule sets, DNS probes, CPU/memory time
//! series, and log summaries. The generators are pure functions over an
//! injected [`Rng`](rand::Rng) so tests can drive them with seeded RNGs; the
//! tool wrappers use the thread RNG.
//!
//! The generated records keep a few invariants by construction:
//! - an NSG report's `blocking_rules` holds exactly the rules flagged
//!   `is_blocking`, and `has_issues` iff that list is nonempty;
//! - a log summary's per-category error counts sum to `error_count`;
//! - a resource-usage report satisfies `min <= average <= max`, and
//!   `has_issues` iff the metric's threshold is exceeded.

mod logs;
mod network;
mod resources;

pub use logs::{log_summary, GetLogsArgs, LogSummary};
pub use network::{
    dns_report, nsg_rule_report, CheckDnsArgs, CheckNsgRulesArgs, DnsProbe, DnsReport, NsgRule,
    NsgRuleReport,
};
pub use resources::{
    resource_usage, GetResourceUsageArgs, ResourceMetric, ResourceUsageReport, TimeSeriesPoint,
};

use std::sync::Arc;

use crate::tool::FunctionTool;

/// Check NSG rules for potential blocking issues.
pub fn check_nsg_rules_tool() -> Arc<FunctionTool> {
    Arc::new(FunctionTool::typed(
        "check_nsg_rules",
        "Check network security group rules for potential blocking issues.",
        |_args: CheckNsgRulesArgs| {
            let report = nsg_rule_report(&mut rand::thread_rng());
            Ok(serde_json::to_value(report)?)
        },
    ))
}

/// Check DNS resolution for a hostname.
pub fn check_dns_tool() -> Arc<FunctionTool> {
    Arc::new(FunctionTool::typed(
        "check_dns",
        "Check DNS resolution for a hostname.",
        |args: CheckDnsArgs| {
            let report = dns_report(
                &mut rand::thread_rng(),
                &args.hostname,
                args.dns_server.as_deref(),
            );
            Ok(serde_json::to_value(report)?)
        },
    ))
}

/// Get CPU usage for a container app.
pub fn get_cpu_usage_tool() -> Arc<FunctionTool> {
    Arc::new(FunctionTool::typed(
        "get_cpu_usage",
        "Get the CPU usage time series for a container app.",
        |args: GetResourceUsageArgs| {
            let report = resource_usage(
                &mut rand::thread_rng(),
                &args.container_app_name,
                ResourceMetric::Cpu,
                args.minutes,
            );
            Ok(serde_json::to_value(report)?)
        },
    ))
}

/// Get memory usage for a container app.
pub fn get_memory_usage_tool() -> Arc<FunctionTool> {
    Arc::new(FunctionTool::typed(
        "get_memory_usage",
        "Get the memory usage time series for a container app.",
        |args: GetResourceUsageArgs| {
            let report = resource_usage(
                &mut rand::thread_rng(),
                &args.container_app_name,
                ResourceMetric::Memory,
                args.minutes,
            );
            Ok(serde_json::to_value(report)?)
        },
    ))
}

/// Get a summary of recent logs for a container app.
pub fn get_logs_tool() -> Arc<FunctionTool> {
    Arc::new(FunctionTool::typed(
        "get_logs",
        "Get a summary of recent logs for a container app, grouped by error category.",
        |_args: GetLogsArgs| {
            let report = log_summary(&mut rand::thread_rng());
            Ok(serde_json::to_value(report)?)
        },
    ))
}
