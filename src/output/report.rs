//! Plain result values handed to the renderer.
//!
//! Each report carries strings only, so rendering never needs to know about
//! address families.

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;

use super::{write_fields, write_rows, Tabular};
use crate::config::DivideMode;
use crate::net::Network;

/// Explain output for one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkReport {
    pub base_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast_address: Option<String>,
    pub netmask: String,
    pub usable_addresses: UsableRange,
    /// Decimal string; `::/0` holds 2^128 addresses.
    pub total_addresses: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsableRange {
    pub first: String,
    pub last: String,
}

impl NetworkReport {
    pub fn from_network(network: &Network) -> Self {
        NetworkReport {
            base_address: network.base_address().to_string(),
            broadcast_address: network.broadcast_address().map(|addr| addr.to_string()),
            netmask: network.netmask().to_string(),
            usable_addresses: UsableRange {
                first: network.first_usable_address().to_string(),
                last: network.last_usable_address().to_string(),
            },
            total_addresses: network.count().to_string(),
        }
    }

    /// Labelled fields in display order. Absent fields are skipped.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("Base address", self.base_address.clone())];
        if let Some(broadcast) = &self.broadcast_address {
            fields.push(("Broadcast address", broadcast.clone()));
        }
        fields.push(("Netmask", self.netmask.clone()));
        fields.push((
            "Usable addresses",
            format!("{} - {}", self.usable_addresses.first, self.usable_addresses.last),
        ));
        fields.push(("Total addresses", self.total_addresses.clone()));
        fields
    }
}

impl Tabular for NetworkReport {
    fn write_tab(&self, w: &mut dyn Write) -> io::Result<()> {
        write_fields(w, &self.fields())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountReport {
    pub network: String,
    pub total_addresses: String,
}

impl Tabular for CountReport {
    fn write_tab(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}", self.total_addresses)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainsReport {
    pub network: String,
    pub results: BTreeMap<String, bool>,
}

impl Tabular for ContainsReport {
    fn write_tab(&self, w: &mut dyn Write) -> io::Result<()> {
        let rows: Vec<(&str, String)> = self
            .results
            .iter()
            .map(|(addr, member)| (addr.as_str(), member.to_string()))
            .collect();
        write_rows(w, &rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivideReport {
    pub network: String,
    pub mode: DivideMode,
    pub subnets: Vec<String>,
}

impl Tabular for DivideReport {
    fn write_tab(&self, w: &mut dyn Write) -> io::Result<()> {
        for subnet in &self.subnets {
            writeln!(w, "{}", subnet)?;
        }
        Ok(())
    }
}

/// One allocated subnet of a VLSM run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocatedSubnet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub hosts: u64,
    pub subnet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlsmReport {
    pub network: String,
    pub allocated: Vec<AllocatedSubnet>,
    pub leftover: Vec<String>,
}

impl Tabular for VlsmReport {
    fn write_tab(&self, w: &mut dyn Write) -> io::Result<()> {
        if !self.allocated.is_empty() {
            writeln!(w, "Allocated subnets:")?;
            let rows: Vec<(String, String)> = self
                .allocated
                .iter()
                .map(|a| {
                    let detail = match &a.name {
                        Some(name) => format!("{} hosts ({})", a.hosts, name),
                        None => format!("{} hosts", a.hosts),
                    };
                    (format!("  {}", a.subnet), detail)
                })
                .collect();
            write_rows(w, &rows)?;
        }

        if !self.leftover.is_empty() {
            writeln!(w, "Leftover subnets:")?;
            for subnet in &self.leftover {
                writeln!(w, "  {}", subnet)?;
            }
        }
        Ok(())
    }
}

/// Outcome of embedding one IPv4 address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedEntry {
    pub ipv4: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedReport {
    pub network: String,
    pub embedded: Vec<EmbedEntry>,
}

impl Tabular for EmbedReport {
    fn write_tab(&self, w: &mut dyn Write) -> io::Result<()> {
        let rows: Vec<(&str, String)> = self
            .embedded
            .iter()
            .map(|entry| {
                let value = match (&entry.ipv6, &entry.error) {
                    (Some(ipv6), _) => ipv6.clone(),
                    (None, Some(error)) => format!("error: {}", error),
                    (None, None) => String::new(),
                };
                (entry.ipv4.as_str(), value)
            })
            .collect();
        write_rows(w, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_report_v4_fields() {
        let network = Network::parse("10.0.0.0/16").unwrap();
        let report = NetworkReport::from_network(&network);
        let labels: Vec<&str> = report.fields().iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            vec!["Base address", "Broadcast address", "Netmask", "Usable addresses", "Total addresses"]
        );
        assert_eq!(report.fields()[3].1, "10.0.0.1 - 10.0.255.254");
        assert_eq!(report.total_addresses, "65536");
    }

    #[test]
    fn test_network_report_v6_omits_broadcast() {
        let network = Network::parse("2001:db8::/32").unwrap();
        let report = NetworkReport::from_network(&network);
        assert_eq!(report.broadcast_address, None);
        assert!(report.fields().iter().all(|(label, _)| *label != "Broadcast address"));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("broadcastAddress").is_none());
        assert_eq!(json["usableAddresses"]["first"], "2001:db8::1");
        assert_eq!(json["totalAddresses"], "79228162514264337593543950336");
    }

    #[test]
    fn test_vlsm_report_tab() {
        let report = VlsmReport {
            network: "10.0.0.0/24".to_string(),
            allocated: vec![
                AllocatedSubnet { name: Some("lan".to_string()), hosts: 100, subnet: "10.0.0.0/25".to_string() },
                AllocatedSubnet { name: None, hosts: 10, subnet: "10.0.0.128/28".to_string() },
            ],
            leftover: vec!["10.0.0.144/28".to_string()],
        };
        let mut out = Vec::new();
        report.write_tab(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Allocated subnets:\n  10.0.0.0/25    100 hosts (lan)\n  10.0.0.128/28  10 hosts\nLeftover subnets:\n  10.0.0.144/28\n"
        );
    }

    #[test]
    fn test_embed_report_tab_shows_errors() {
        let report = EmbedReport {
            network: "2001:db8::/32".to_string(),
            embedded: vec![
                EmbedEntry { ipv4: "192.0.2.33".to_string(), ipv6: Some("2001:db8:c000:221::".to_string()), error: None },
                EmbedEntry { ipv4: "bad".to_string(), ipv6: None, error: Some("nope".to_string()) },
            ],
        };
        let mut out = Vec::new();
        report.write_tab(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "192.0.2.33  2001:db8:c000:221::\nbad         error: nope\n"
        );
    }
}
