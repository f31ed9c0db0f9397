//! Topology kernel - inventory-driven network topology
//!
//! This library provides:
//! - Grouped host inventory parsing
//! - Link classification between host groups
//! - Health and latency probing through the system `ping`
//! - Static and live topology views, served over a small REST API

pub mod config;
pub mod error;
pub mod http;
pub mod inventory;
pub mod links;
pub mod models;
pub mod probe;
pub mod topology;

// Re-export commonly used types for convenience
pub use config::{load_config, KernelConfig};
pub use error::KernelError;
pub use inventory::{load_inventory, parse_inventory, Inventory};
pub use links::{classify, GROUP_PAIRS, LINK_RULES};
pub use models::{HostStatus, Latency, Link, LinkType, LiveTopology, Server, StaticTopology};
pub use probe::{host_status, measure_latency, PingOutcome, Prober, SystemPinger};
pub use topology::{build_live, build_static, get_topology, get_topology_details};
