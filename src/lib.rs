//! # cidrcalc - Subnet address-space calculator
//!
//! This library computes network boundaries for CIDR blocks and partitions
//! address space, for both IPv4 and IPv6.
//!
//! ## Key Features
//!
//! - **Explain**: base, broadcast (IPv4), netmask, usable range and size
//! - **Divide**: equal-size division, or bisection of the largest block
//! - **VLSM**: best-fit allocation of subnets sized to host demands, with
//!   the leftover space coalesced into the fewest blocks
//! - **Embed**: RFC 6052 IPv4-embedded IPv6 addresses
//! - **Contains / Count**: membership checks and address counts up to 2^128
//!
//! ## Architecture
//!
//! - `net`: the address arithmetic and partitioning algorithms, written once
//!   over a generic address width and instantiated for `u32` and `u128`
//! - `ops`: one function per command, taking text and returning a report
//! - `output`: report types and tab/JSON rendering
//! - `config`: operation options and YAML VLSM plan files
//! - `error`: the typed error enum shared by every operation
//!
//! ## Example Usage
//!
//! ```rust
//! use cidrcalc::config::DivideOptions;
//! use cidrcalc::ops;
//!
//! let report = ops::divide("10.0.0.0/16", 4, &DivideOptions::default())?;
//! assert_eq!(report.subnets[1], "10.0.64.0/18");
//!
//! let report = ops::vlsm("10.0.0.0/16", &[120, 60, 30, 10])?;
//! assert_eq!(report.allocated[0].subnet, "10.0.0.0/25");
//! # Ok::<(), cidrcalc::error::CidrError>(())
//! ```
//!
//! ## Error Handling
//!
//! Core operations return [`error::CidrError`]. Parse and validation errors
//! surface immediately with no partial result; `contains` is the one
//! operation that degrades per item instead of failing. Plan loading and
//! rendering use `color_eyre` reports with context.

pub mod config;
pub mod error;
pub mod net;
pub mod ops;
pub mod output;

pub use error::{CidrError, Result};
pub use net::{Family, Network, Prefix};
