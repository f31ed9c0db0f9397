//! Topology builder: static view (inventory only) and live view (probed).
//!
//! Output order never depends on probe scheduling: servers follow inventory
//! order, links follow [`GROUP_PAIRS`] order then the from × to cross product.

use crate::inventory::{load_inventory, Inventory};
use crate::links::{classify, GROUP_PAIRS};
use crate::models::{HostStatus, Link, LinkType, LiveTopology, Server, StaticTopology};
use crate::probe::{host_status, measure_latency, Prober};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Candidate links for every group pair present in the inventory.
fn candidate_links(inventory: &Inventory) -> Vec<(&str, &str, LinkType)> {
    let mut candidates = Vec::new();
    for &(from_group, to_group) in GROUP_PAIRS {
        let (Some(from_hosts), Some(to_hosts)) = (inventory.hosts(from_group), inventory.hosts(to_group)) else {
            continue;
        };
        for from_host in from_hosts {
            for to_host in to_hosts {
                candidates.push((from_host.as_str(), to_host.as_str(), classify(from_group, to_group)));
            }
        }
    }
    candidates
}

fn servers_of(inventory: &Inventory) -> impl Iterator<Item = (&str, &str)> {
    inventory
        .groups()
        .iter()
        .flat_map(|(group, hosts)| hosts.iter().map(move |host| (host.as_str(), group.as_str())))
}

pub fn build_static(inventory: &Inventory) -> StaticTopology {
    let servers = servers_of(inventory)
        .map(|(hostname, role)| Server { hostname: hostname.to_string(), role: role.to_string(), status: None })
        .collect();

    let links = candidate_links(inventory)
        .into_iter()
        .map(|(from, to, link_type)| Link { from: from.to_string(), to: to.to_string(), link_type, latency_ms: None })
        .collect();

    StaticTopology { servers, links, groups: inventory.groups().clone() }
}

/// Probe every host once, keep links whose both ends are healthy, and attach
/// the latency of the `to` host (one latency probe per emitted link).
pub async fn build_live(inventory: &Inventory, prober: &dyn Prober, concurrency: usize) -> LiveTopology {
    let concurrency = concurrency.max(1);

    // éléments possédés : le futur doit rester Send pour le handler axum
    let hosts: Vec<(String, String)> = servers_of(inventory)
        .map(|(hostname, role)| (hostname.to_string(), role.to_string()))
        .collect();

    let servers: Vec<Server> = stream::iter(hosts)
        .map(|(hostname, role)| async move {
            let status = host_status(prober, &hostname).await;
            Server { hostname, role, status: Some(status) }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let candidates: Vec<(String, String, LinkType)> = {
        // un hôte présent dans plusieurs groupes garde le dernier statut sondé
        let status_map: HashMap<&str, HostStatus> = servers
            .iter()
            .filter_map(|s| s.status.map(|status| (s.hostname.as_str(), status)))
            .collect();
        let healthy = |host: &str| status_map.get(host).is_some_and(|s| s.is_healthy());

        candidate_links(inventory)
            .into_iter()
            .filter(|(from, to, _)| healthy(*from) && healthy(*to))
            .map(|(from, to, link_type)| (from.to_string(), to.to_string(), link_type))
            .collect()
    };

    let links: Vec<Link> = stream::iter(candidates)
        .map(|(from, to, link_type)| async move {
            let latency = measure_latency(prober, &to).await;
            Link { from, to, link_type, latency_ms: Some(latency) }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let up = servers.iter().filter(|s| s.status == Some(HostStatus::Healthy)).count();
    debug!("live topology: {}/{} hosts healthy, {} links", up, servers.len(), links.len());

    LiveTopology { servers, links }
}

/// `GET /topology` : relit l'inventaire, aucune sonde.
pub async fn get_topology(inventory_path: &Path) -> StaticTopology {
    let inventory = load_inventory(inventory_path).await;
    build_static(&inventory)
}

/// `GET /topology/details` : relit l'inventaire puis sonde.
pub async fn get_topology_details(inventory_path: &Path, prober: &dyn Prober, concurrency: usize) -> LiveTopology {
    let inventory = load_inventory(inventory_path).await;
    info!("probing {} hosts (concurrency {})", inventory.host_count(), concurrency.max(1));
    build_live(&inventory, prober, concurrency).await
}
