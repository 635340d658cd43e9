//! Property tests over the mock telemetry generators.
//!
//! The generators are seeded through `StdRng` so every property is
//! reproducible from the proptest seed.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use triage_agents::diagnostics::{
    dns_report, log_summary, nsg_rule_report, resource_usage, ResourceMetric,
};

proptest! {
    #[test]
    fn nsg_blocking_rules_are_exactly_the_flagged_deny_rules(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let report = nsg_rule_report(&mut rng);

        let flagged: Vec<_> = report.rules.iter().filter(|r| r.is_blocking).collect();
        prop_assert_eq!(report.blocking_rules.len(), flagged.len());
        prop_assert_eq!(report.has_issues, !flagged.is_empty());
        for rule in &report.blocking_rules {
            prop_assert_eq!(&rule.access, "Deny");
        }
    }

    #[test]
    fn dns_issue_flag_matches_probe_outcomes(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let report = dns_report(&mut rng, "myapp.example.com", None);

        let any_failed = report.probes.iter().any(|p| !p.success);
        prop_assert_eq!(report.has_issues, any_failed);
        for probe in &report.probes {
            prop_assert_eq!(probe.success, probe.resolved_ip.is_some());
        }
    }

    #[test]
    fn usage_stats_bound_the_series(seed in any::<u64>(), minutes in 1u32..=60) {
        let mut rng = StdRng::seed_from_u64(seed);
        for metric in [ResourceMetric::Cpu, ResourceMetric::Memory] {
            let report = resource_usage(&mut rng, "myapp", metric, minutes);

            prop_assert_eq!(report.time_series.len(), minutes as usize);
            prop_assert!(report.min <= report.average);
            prop_assert!(report.average <= report.max);
            for point in &report.time_series {
                prop_assert!(point.value >= report.min);
                prop_assert!(point.value <= report.max);
            }
        }
    }

    #[test]
    fn usage_issue_flag_tracks_metric_threshold(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);

        let cpu = resource_usage(&mut rng, "myapp", ResourceMetric::Cpu, 20);
        prop_assert_eq!(cpu.has_issues, cpu.max > 90.0);

        let mem = resource_usage(&mut rng, "myapp", ResourceMetric::Memory, 20);
        prop_assert_eq!(mem.has_issues, mem.max > 1500.0);
    }

    #[test]
    fn log_category_counts_sum_to_error_count(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let summary = log_summary(&mut rng);

        let sum: u32 = summary.error_categories.values().sum();
        prop_assert_eq!(sum, summary.error_count);
        prop_assert_eq!(summary.sample_errors.len(), summary.error_categories.len());
        prop_assert!(summary.error_categories.values().all(|&c| c > 0));
        prop_assert!((500..=2000).contains(&summary.total_logs));
    }
}
