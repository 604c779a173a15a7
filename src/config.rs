//! Operation options and VLSM plan files.
//!
//! Options that alter an operation are passed to it explicitly as small
//! structs. A VLSM plan is a YAML file naming a network and the subnets to
//! carve out of it:
//!
//! ```yaml
//! network: 10.0.0.0/16
//! subnets:
//!   - name: servers
//!     hosts: 120
//!   - hosts: 10
//! ```

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use clap::ValueEnum;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::{Deserialize, Serialize};

/// How `divide` partitions a network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DivideMode {
    /// Equal-size subnets; surplus space is left unused when the count is
    /// not a power of two
    #[default]
    Equal,
    /// Halve the largest block until the count is reached, covering the
    /// whole network
    Bisect,
}

/// Options for `divide`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivideOptions {
    pub mode: DivideMode,
}

impl DivideOptions {
    pub fn from_vlsm_flag(vlsm: bool) -> Self {
        let mode = if vlsm { DivideMode::Bisect } else { DivideMode::Equal };
        DivideOptions { mode }
    }
}

/// Rendering of command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain text
    #[default]
    Tab,
    /// Pretty-printed JSON
    Json,
}

/// A VLSM plan loaded from YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Network to allocate from, in CIDR notation
    pub network: String,
    /// Subnets to allocate
    pub subnets: Vec<SubnetRequest>,
}

/// One requested subnet in a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetRequest {
    /// (Optional) Label carried through to the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Usable hosts required
    pub hosts: u64,
}

/// Plan validation errors
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Plan lists no subnets")]
    NoSubnets,
    #[error("Subnet #{index} requests {hosts} hosts; host counts must be > 0")]
    ZeroHosts { index: usize, hosts: u64 },
    #[error("Subnet name '{0}' is used more than once")]
    DuplicateName(String),
    #[error("Plan network is empty")]
    NoNetwork,
}

impl PlanConfig {
    /// Check the plan for problems that do not depend on address arithmetic
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.network.trim().is_empty() {
            return Err(PlanError::NoNetwork);
        }
        if self.subnets.is_empty() {
            return Err(PlanError::NoSubnets);
        }

        let mut names = HashSet::new();
        for (index, subnet) in self.subnets.iter().enumerate() {
            if subnet.hosts == 0 {
                return Err(PlanError::ZeroHosts { index, hosts: subnet.hosts });
            }
            if let Some(name) = &subnet.name {
                if !names.insert(name.as_str()) {
                    return Err(PlanError::DuplicateName(name.clone()));
                }
            }
        }

        Ok(())
    }

    pub fn host_counts(&self) -> Vec<u64> {
        self.subnets.iter().map(|subnet| subnet.hosts).collect()
    }
}

/// Load and validate a VLSM plan from a YAML file
pub fn load_plan(path: &Path) -> Result<PlanConfig> {
    log::info!("Loading VLSM plan from: {:?}", path);

    let file = File::open(path)
        .wrap_err_with(|| format!("Failed to open plan file '{}'", path.display()))?;

    let plan: PlanConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse plan file '{}'", path.display()))?;

    plan.validate()?;

    log::info!("Plan for {} requests {} subnets", plan.network, plan.subnets.len());
    Ok(plan)
}
