//! Mock log summaries grouped by error category.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_minutes() -> u32 {
    20
}

/// Arguments for the `get_logs` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetLogsArgs {
    /// Name of the container app.
    pub container_app_name: String,
    /// Resource group containing the container app.
    pub resource_group: String,
    /// Lookback window in minutes.
    #[serde(default = "default_minutes")]
    pub minutes: u32,
    /// When true, only error and warning entries are summarized.
    #[serde(default = "default_true")]
    pub error_only: bool,
}

/// Error categories the mock log store can report, paired with a
/// representative log line for each.
const CATEGORIES: &[(&str, &str)] = &[
    (
        "Connection timeout",
        "Connection to upstream service timed out after 30s",
    ),
    (
        "Memory limit exceeded",
        "Container killed: memory usage exceeded the configured limit",
    ),
    (
        "Image pull failure",
        "Failed to pull image 'registry.example.com/myapp:latest': unauthorized",
    ),
    (
        "Database connection error",
        "Could not open connection to database: connection refused",
    ),
    (
        "Permission denied",
        "Permission denied while accessing mounted volume '/data'",
    ),
    (
        "Disk space exhausted",
        "No space left on device while writing temporary file",
    ),
    (
        "Rate limit exceeded",
        "HTTP 429 from downstream API: rate limit exceeded",
    ),
    (
        "Certificate validation failure",
        "TLS handshake failed: certificate has expired",
    ),
];

const IMAGE_PULL: usize = 2;

/// Summary of recent log activity for a container app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSummary {
    pub total_logs: u32,
    pub error_count: u32,
    pub warning_count: u32,
    /// Error count per category. The per-category counts sum to
    /// `error_count`.
    pub error_categories: BTreeMap<String, u32>,
    /// One representative log line per reported category.
    pub sample_errors: Vec<String>,
    pub has_issues: bool,
}

/// Generate a mock log summary.
///
/// 40% of summaries describe a serious incident: error and warning counts an
/// order of magnitude higher, spread over more categories, and biased towards
/// image pull failures since those dominate real container-app outages.
/// `has_issues` is set exactly for those serious summaries.
pub fn log_summary(rng: &mut impl Rng) -> LogSummary {
    let serious = rng.gen_bool(0.4);
    let total_logs = rng.gen_range(500..=2000u32);

    let (error_count, warning_count, category_count) = if serious {
        (
            rng.gen_range(50..=200u32),
            rng.gen_range(100..=300u32),
            rng.gen_range(2..=3usize),
        )
    } else {
        (
            rng.gen_range(5..=30u32),
            rng.gen_range(20..=80u32),
            rng.gen_range(1..=2usize),
        )
    };

    let mut selected: Vec<&(&str, &str)> =
        CATEGORIES.choose_multiple(rng, category_count).collect();
    if serious
        && rng.gen_bool(0.7)
        && !selected.iter().any(|(name, _)| *name == "Image pull failure")
    {
        selected[0] = &CATEGORIES[IMAGE_PULL];
    }

    let mut error_categories = BTreeMap::new();
    let mut sample_errors = Vec::with_capacity(selected.len());
    let mut remaining = error_count;
    let last = selected.len() - 1;

    for (i, (name, sample)) in selected.iter().enumerate() {
        let count = if i == last {
            remaining
        } else {
            let lo = (remaining / 10).max(1);
            let hi = (remaining / 2).max(lo);
            let count = rng.gen_range(lo..=hi);
            remaining -= count;
            count
        };
        error_categories.insert(name.to_string(), count);
        sample_errors.push(format!("ERROR [{}] {}", name, sample));
    }

    LogSummary {
        total_logs,
        error_count,
        warning_count,
        error_categories,
        sample_errors,
        has_issues: serious,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_category_counts_sum_to_error_count() {
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let summary = log_summary(&mut rng);

            let sum: u32 = summary.error_categories.values().sum();
            assert_eq!(sum, summary.error_count);
            assert!(summary.error_categories.values().all(|&c| c > 0));
        }
    }

    #[test]
    fn test_one_sample_line_per_category() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let summary = log_summary(&mut rng);
            assert_eq!(summary.sample_errors.len(), summary.error_categories.len());
        }
    }

    #[test]
    fn test_serious_summaries_carry_more_errors() {
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let summary = log_summary(&mut rng);

            if summary.has_issues {
                assert!((50..=200).contains(&summary.error_count));
                assert!((100..=300).contains(&summary.warning_count));
                assert!((2..=3).contains(&summary.error_categories.len()));
            } else {
                assert!((5..=30).contains(&summary.error_count));
                assert!((20..=80).contains(&summary.warning_count));
                assert!((1..=2).contains(&summary.error_categories.len()));
            }
        }
    }
}
