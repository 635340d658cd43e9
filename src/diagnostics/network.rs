//! Mock network diagnostics: NSG rule sets and DNS probes.

use rand::seq::SliceRandom;
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Arguments for the `check_nsg_rules` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckNsgRulesArgs {
    /// Resource group containing the network security group.
    pub resource_group: String,
    /// Name of the network security group. Defaults to the group attached to
    /// the container app environment.
    #[serde(default)]
    pub nsg_name: Option<String>,
}

/// A single network security group rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NsgRule {
    pub name: String,
    pub priority: u32,
    pub direction: String,
    pub access: String,
    pub protocol: String,
    pub source_address_prefix: String,
    pub source_port_range: String,
    pub destination_address_prefix: String,
    pub destination_port_range: String,
    /// Whether this rule is likely to block application traffic.
    pub is_blocking: bool,
}

/// Result of an NSG rule inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NsgRuleReport {
    pub rules: Vec<NsgRule>,
    /// The subset of `rules` flagged as blocking, in rule order.
    pub blocking_rules: Vec<NsgRule>,
    pub has_issues: bool,
}

fn allow_rule(
    name: &str,
    priority: u32,
    source_prefix: &str,
    dest_port: &str,
) -> NsgRule {
    NsgRule {
        name: name.to_string(),
        priority,
        direction: "Inbound".to_string(),
        access: "Allow".to_string(),
        protocol: "TCP".to_string(),
        source_address_prefix: source_prefix.to_string(),
        source_port_range: "*".to_string(),
        destination_address_prefix: "*".to_string(),
        destination_port_range: dest_port.to_string(),
        is_blocking: false,
    }
}

/// Generate a mock NSG rule set.
///
/// The baseline is three allow rules plus the catch-all deny; on top of that
/// there is a 50% chance of a `DenyCustomPort` rule on a commonly used port
/// and a 30% chance of a `DenySubnet` rule, both flagged as blocking.
pub fn nsg_rule_report(rng: &mut impl Rng) -> NsgRuleReport {
    let mut rules = vec![
        allow_rule("AllowHTTPS", 100, "*", "443"),
        allow_rule("AllowHTTP", 110, "*", "80"),
        allow_rule("AllowSSH", 120, "10.0.0.0/24", "22"),
    ];

    if rng.gen_bool(0.5) {
        let ports = ["80", "443", "8080", "3000-3010"];
        let port = ports
            .choose(rng)
            .copied()
            .unwrap_or("443");
        rules.push(NsgRule {
            name: "DenyCustomPort".to_string(),
            priority: 90,
            direction: "Inbound".to_string(),
            access: "Deny".to_string(),
            protocol: "TCP".to_string(),
            source_address_prefix: "*".to_string(),
            source_port_range: "*".to_string(),
            destination_address_prefix: "*".to_string(),
            destination_port_range: port.to_string(),
            is_blocking: true,
        });
    }

    if rng.gen_bool(0.3) {
        rules.push(NsgRule {
            name: "DenySubnet".to_string(),
            priority: 150,
            direction: "Inbound".to_string(),
            access: "Deny".to_string(),
            protocol: "*".to_string(),
            source_address_prefix: "192.168.0.0/24".to_string(),
            source_port_range: "*".to_string(),
            destination_address_prefix: "*".to_string(),
            destination_port_range: "*".to_string(),
            is_blocking: true,
        });
    }

    rules.push(NsgRule {
        name: "DenyAll".to_string(),
        priority: 4096,
        direction: "Inbound".to_string(),
        access: "Deny".to_string(),
        protocol: "*".to_string(),
        source_address_prefix: "*".to_string(),
        source_port_range: "*".to_string(),
        destination_address_prefix: "*".to_string(),
        destination_port_range: "*".to_string(),
        is_blocking: false,
    });

    let blocking_rules: Vec<NsgRule> = rules.iter().filter(|r| r.is_blocking).cloned().collect();
    let has_issues = !blocking_rules.is_empty();

    NsgRuleReport {
        rules,
        blocking_rules,
        has_issues,
    }
}

/// Arguments for the `check_dns` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckDnsArgs {
    /// Hostname to resolve.
    pub hostname: String,
    /// Comma-separated DNS servers to probe. Defaults to the primary and
    /// secondary resolvers.
    #[serde(default)]
    pub dns_server: Option<String>,
}

/// One resolution attempt against a single DNS server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsProbe {
    pub server: String,
    pub success: bool,
    pub status: String,
    pub resolved_ip: Option<String>,
    pub latency_ms: u64,
}

/// Result of resolving a hostname against one or more DNS servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsReport {
    pub hostname: String,
    pub probes: Vec<DnsProbe>,
    pub has_issues: bool,
}

/// Probe DNS resolution for a hostname.
///
/// With 30% probability the first server fails to resolve (split evenly
/// between a hard failure and a timeout); remaining probes succeed with a
/// random address and a single-digit-to-low-hundreds latency.
pub fn dns_report(rng: &mut impl Rng, hostname: &str, dns_server: Option<&str>) -> DnsReport {
    let servers: Vec<String> = match dns_server {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => vec![],
    };
    let servers = if servers.is_empty() {
        vec!["Primary DNS".to_string(), "Secondary DNS".to_string()]
    } else {
        servers
    };

    let has_dns_issues = rng.gen_bool(0.3);

    let probes: Vec<DnsProbe> = servers
        .into_iter()
        .enumerate()
        .map(|(i, server)| {
            if has_dns_issues && i == 0 {
                let status = if rng.gen_bool(0.5) {
                    "Failed to resolve"
                } else {
                    "Timeout"
                };
                DnsProbe {
                    server,
                    success: false,
                    status: status.to_string(),
                    resolved_ip: None,
                    latency_ms: rng.gen_range(500..=2000),
                }
            } else {
                let ip = format!(
                    "{}.{}.{}.{}",
                    rng.gen_range(1..=255u8),
                    rng.gen_range(1..=255u8),
                    rng.gen_range(1..=255u8),
                    rng.gen_range(1..=255u8)
                );
                DnsProbe {
                    server,
                    success: true,
                    status: "Resolved successfully".to_string(),
                    resolved_ip: Some(ip),
                    latency_ms: rng.gen_range(5..=100),
                }
            }
        })
        .collect();

    DnsReport {
        hostname: hostname.to_string(),
        probes,
        has_issues: has_dns_issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_nsg_baseline_rules_always_present() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let report = nsg_rule_report(&mut rng);

            let names: Vec<&str> = report.rules.iter().map(|r| r.name.as_str()).collect();
            assert!(names.contains(&"AllowHTTPS"));
            assert!(names.contains(&"AllowHTTP"));
            assert!(names.contains(&"AllowSSH"));
            assert_eq!(report.rules.last().map(|r| r.name.as_str()), Some("DenyAll"));
            assert!(!report.rules.last().unwrap().is_blocking);
            assert!(report
                .rules
                .iter()
                .all(|r| r.protocol == "TCP" || r.protocol == "*"));
        }
    }

    #[test]
    fn test_nsg_blocking_rules_match_flags() {
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let report = nsg_rule_report(&mut rng);

            let flagged = report.rules.iter().filter(|r| r.is_blocking).count();
            assert_eq!(report.blocking_rules.len(), flagged);
            assert_eq!(report.has_issues, flagged > 0);
            assert!(report.blocking_rules.iter().all(|r| r.access == "Deny"));
        }
    }

    #[test]
    fn test_dns_default_servers() {
        let mut rng = StdRng::seed_from_u64(7);
        let report = dns_report(&mut rng, "myapp.example.com", None);

        assert_eq!(report.hostname, "myapp.example.com");
        assert_eq!(report.probes.len(), 2);
        assert_eq!(report.probes[0].server, "Primary DNS");
        assert_eq!(report.probes[1].server, "Secondary DNS");
    }

    #[test]
    fn test_dns_custom_server_list() {
        let mut rng = StdRng::seed_from_u64(7);
        let report = dns_report(&mut rng, "myapp.example.com", Some("8.8.8.8, 1.1.1.1"));

        let servers: Vec<&str> = report.probes.iter().map(|p| p.server.as_str()).collect();
        assert_eq!(servers, vec!["8.8.8.8", "1.1.1.1"]);
    }

    #[test]
    fn test_dns_issue_implies_failed_probe() {
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let report = dns_report(&mut rng, "svc.internal", None);

            let any_failed = report.probes.iter().any(|p| !p.success);
            assert_eq!(report.has_issues, any_failed);
            for probe in &report.probes {
                if probe.success {
                    assert!(probe.resolved_ip.is_some());
                    assert!((5..=100).contains(&probe.latency_ms));
                } else {
                    assert!(probe.resolved_ip.is_none());
                    assert!((500..=2000).contains(&probe.latency_ms));
                }
            }
        }
    }
}
