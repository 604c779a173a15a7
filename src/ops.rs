//! Command layer.
//!
//! Each function takes the textual arguments of one CLI command, runs the
//! matching core operation and returns a plain report ready for rendering.

use crate::config::{DivideMode, DivideOptions, PlanConfig};
use crate::error::{CidrError, Result};
use crate::net::{Family, Network, EMBEDDING_PREFIXES};
use crate::output::{
    AllocatedSubnet, ContainsReport, CountReport, DivideReport, EmbedEntry, EmbedReport,
    NetworkReport, VlsmReport,
};

/// Total number of addresses in `cidr`
pub fn count(cidr: &str) -> Result<CountReport> {
    let network = Network::parse(cidr)?;
    Ok(CountReport {
        network: network.to_string(),
        total_addresses: network.count().to_string(),
    })
}

/// Membership of each address in `cidr`; bad addresses report `false`
pub fn contains<S: AsRef<str>>(cidr: &str, addrs: &[S]) -> Result<ContainsReport> {
    let network = Network::parse(cidr)?;
    Ok(ContainsReport {
        network: network.to_string(),
        results: network.contains(addrs),
    })
}

/// Split `cidr` into `count` subnets
pub fn divide(cidr: &str, count: usize, options: &DivideOptions) -> Result<DivideReport> {
    let network = Network::parse(cidr)?;

    if options.mode == DivideMode::Equal && count > 0 && !count.is_power_of_two() {
        log::warn!(
            "Count {} is not a power of two; extra subnets will be unused. Use --vlsm.",
            count
        );
    }

    let subnets = network.divide(count, options)?;
    Ok(DivideReport {
        network: network.to_string(),
        mode: options.mode,
        subnets: subnets.iter().map(|subnet| subnet.to_string()).collect(),
    })
}

/// VLSM allocation of one subnet per host count
pub fn vlsm(cidr: &str, host_counts: &[u64]) -> Result<VlsmReport> {
    vlsm_named(cidr, host_counts, &[])
}

/// VLSM allocation driven by a loaded plan; allocations keep their names
pub fn vlsm_plan(plan: &PlanConfig) -> Result<VlsmReport> {
    let names: Vec<Option<String>> = plan.subnets.iter().map(|s| s.name.clone()).collect();
    vlsm_named(&plan.network, &plan.host_counts(), &names)
}

fn vlsm_named(cidr: &str, host_counts: &[u64], names: &[Option<String>]) -> Result<VlsmReport> {
    let network = Network::parse(cidr)?;
    let plan = network.vlsm(host_counts)?;

    let allocated = plan
        .allocated
        .iter()
        .map(|allocation| AllocatedSubnet {
            name: names.get(allocation.request).cloned().flatten(),
            hosts: allocation.hosts,
            subnet: allocation.block.to_string(),
        })
        .collect();

    Ok(VlsmReport {
        network: network.to_string(),
        allocated,
        leftover: plan.leftover.iter().map(|block| block.to_string()).collect(),
    })
}

/// Embed each IPv4 address into the IPv6 network `cidr`.
///
/// A network that cannot host embeddings fails the call; a bad address only
/// fails its own entry.
pub fn embed<S: AsRef<str>>(cidr: &str, v4_addrs: &[S]) -> Result<EmbedReport> {
    let network = Network::parse(cidr)?;

    if network.family() != Family::V6 {
        return Err(CidrError::FamilyMismatch {
            expected: Family::V6,
            found: network.family(),
        });
    }
    if !EMBEDDING_PREFIXES.contains(&network.prefix_len()) {
        return Err(CidrError::InvalidEmbeddingPrefix(network.prefix_len()));
    }

    let embedded = v4_addrs
        .iter()
        .map(|addr| {
            let addr = addr.as_ref();
            match network.embed(addr) {
                Ok(ipv6) => EmbedEntry {
                    ipv4: addr.to_string(),
                    ipv6: Some(ipv6.to_string()),
                    error: None,
                },
                Err(e) => {
                    log::warn!("Error embedding {} in {}: {}", addr, network, e);
                    EmbedEntry {
                        ipv4: addr.to_string(),
                        ipv6: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    Ok(EmbedReport {
        network: network.to_string(),
        embedded,
    })
}

/// Descriptor of `cidr`
pub fn explain(cidr: &str) -> Result<NetworkReport> {
    let network = Network::parse(cidr)?;
    Ok(NetworkReport::from_network(&network))
}
