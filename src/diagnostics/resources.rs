//! Mock resource-usage telemetry for CPU and memory.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_minutes() -> u32 {
    20
}

/// Arguments for the `get_cpu_usage` and `get_memory_usage` tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetResourceUsageArgs {
    /// Name of the container app.
    pub container_app_name: String,
    /// Resource group containing the container app.
    pub resource_group: String,
    /// Lookback window in minutes, one sample per minute.
    #[serde(default = "default_minutes")]
    pub minutes: u32,
}

/// Which resource metric to fabricate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceMetric {
    Cpu,
    Memory,
}

impl ResourceMetric {
    fn name(self) -> &'static str {
        match self {
            ResourceMetric::Cpu => "CPU",
            ResourceMetric::Memory => "Memory",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            ResourceMetric::Cpu => "percent",
            ResourceMetric::Memory => "MB",
        }
    }

    fn baseline(self) -> f64 {
        match self {
            ResourceMetric::Cpu => 30.0,
            ResourceMetric::Memory => 500.0,
        }
    }

    /// Peak value during a spike (high) or an unremarkable run (normal).
    fn peak(self, high_usage: bool) -> f64 {
        match (self, high_usage) {
            (ResourceMetric::Cpu, true) => 95.0,
            (ResourceMetric::Cpu, false) => 60.0,
            (ResourceMetric::Memory, true) => 1800.0,
            (ResourceMetric::Memory, false) => 1000.0,
        }
    }

    /// Values above this are reported as an issue.
    pub fn threshold(self) -> f64 {
        match self {
            ResourceMetric::Cpu => 90.0,
            ResourceMetric::Memory => 1500.0,
        }
    }

    fn spike_chance(self) -> f64 {
        match self {
            ResourceMetric::Cpu => 0.4,
            ResourceMetric::Memory => 0.3,
        }
    }
}

/// One sample in a usage time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Fabricated usage telemetry for one metric of one container app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceUsageReport {
    pub container_app_name: String,
    pub metric_name: String,
    pub unit: String,
    pub time_series: Vec<TimeSeriesPoint>,
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub has_issues: bool,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generate a usage time series with one sample per minute.
///
/// Sometimes the series carries a spike: values ramp up towards the metric's
/// high peak in the middle third of the window and back down again. Outside a
/// spike each sample is the baseline with up to ±10% variation. `has_issues`
/// is set iff the maximum sample exceeds the metric's threshold, so a spike
/// to the "normal" peak never trips it.
pub fn resource_usage(
    rng: &mut impl Rng,
    container_app_name: &str,
    metric: ResourceMetric,
    minutes: u32,
) -> ResourceUsageReport {
    let minutes = minutes.max(1);
    let high_usage = rng.gen_bool(metric.spike_chance());
    let base = metric.baseline();
    let peak = metric.peak(high_usage);

    let now = Utc::now();
    let half_width = (minutes / 6).max(1) as f64;

    let time_series: Vec<TimeSeriesPoint> = (0..minutes)
        .map(|i| {
            let in_spike_window = high_usage && i > minutes / 3 && i < 2 * minutes / 3;
            let value = if in_spike_window {
                let distance = (i as f64 - (minutes / 2) as f64).abs();
                let severity = (1.0 - distance / half_width).max(0.0);
                base + (peak - base) * severity
            } else {
                base * (1.0 + rng.gen_range(-0.1..=0.1))
            };
            TimeSeriesPoint {
                timestamp: now - Duration::minutes((minutes - i) as i64),
                value: round2(value),
            }
        })
        .collect();

    let min = time_series
        .iter()
        .map(|p| p.value)
        .fold(f64::INFINITY, f64::min);
    let max = time_series
        .iter()
        .map(|p| p.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let average =
        round2(time_series.iter().map(|p| p.value).sum::<f64>() / time_series.len() as f64);

    ResourceUsageReport {
        container_app_name: container_app_name.to_string(),
        metric_name: metric.name().to_string(),
        unit: metric.unit().to_string(),
        time_series,
        min,
        max,
        average,
        has_issues: max > metric.threshold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_series_length_matches_window() {
        let mut rng = StdRng::seed_from_u64(1);
        let report = resource_usage(&mut rng, "myapp", ResourceMetric::Cpu, 20);
        assert_eq!(report.time_series.len(), 20);
        assert_eq!(report.metric_name, "CPU");
        assert_eq!(report.unit, "percent");
    }

    #[test]
    fn test_stats_bound_the_series() {
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for metric in [ResourceMetric::Cpu, ResourceMetric::Memory] {
                let report = resource_usage(&mut rng, "myapp", metric, 20);

                assert!(report.min <= report.average);
                assert!(report.average <= report.max);
                for point in &report.time_series {
                    assert!(point.value >= report.min);
                    assert!(point.value <= report.max);
                }
            }
        }
    }

    #[test]
    fn test_issue_flag_tracks_threshold() {
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let cpu = resource_usage(&mut rng, "myapp", ResourceMetric::Cpu, 20);
            assert_eq!(cpu.has_issues, cpu.max > 90.0);

            let mem = resource_usage(&mut rng, "myapp", ResourceMetric::Memory, 20);
            assert_eq!(mem.has_issues, mem.max > 1500.0);
        }
    }

    #[test]
    fn test_short_window_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(3);
        let report = resource_usage(&mut rng, "myapp", ResourceMetric::Memory, 1);
        assert_eq!(report.time_series.len(), 1);
        assert_eq!(report.min, report.max);
    }

    #[test]
    fn test_timestamps_are_ascending() {
        let mut rng = StdRng::seed_from_u64(5);
        let report = resource_usage(&mut rng, "myapp", ResourceMetric::Cpu, 10);
        for pair in report.time_series.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }
}
