/*!
Test Harness pour le moteur de topologie

Facilite l'écriture de tests avec:
- Inventaire temporaire + MockProber prêts à l'emploi
- Exécution des deux requêtes (statique / live) sur le vrai moteur
- Assertions sur les liens et sur le JSON servi par l'API
*/

use crate::inventory_helpers::{InventoryBuilder, InventoryFile};
use crate::prober_stub::MockProber;
use anyhow::Result;
use serde_json::Value;
use topology_kernel::models::{HostStatus, Link, LinkType, LiveTopology, StaticTopology};
use topology_kernel::topology::{get_topology, get_topology_details};

/// Harness de test complet pour le kernel topologie
pub struct TestHarness {
    pub inventory: InventoryFile,
    pub prober: MockProber,
    pub concurrency: usize,
}

impl TestHarness {
    /// Crée un harness sur un inventaire donné, réseau entièrement joignable
    pub fn new(builder: &InventoryBuilder) -> Result<Self> {
        env_logger::try_init().ok(); // Init logging pour tests

        Ok(Self {
            inventory: builder.write_temp()?,
            prober: MockProber::new(),
            concurrency: 1,
        })
    }

    /// Harness pointant vers un inventaire absent
    pub fn without_inventory() -> Result<Self> {
        env_logger::try_init().ok();

        Ok(Self {
            inventory: InventoryFile::missing()?,
            prober: MockProber::new(),
            concurrency: 1,
        })
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Équivalent de `GET /topology`
    pub async fn static_topology(&self) -> StaticTopology {
        get_topology(self.inventory.path()).await
    }

    /// Équivalent de `GET /topology/details`
    pub async fn live_topology(&self) -> LiveTopology {
        get_topology_details(self.inventory.path(), &self.prober, self.concurrency).await
    }

    /// Vue statique sérialisée comme la sert l'API
    pub async fn static_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.static_topology().await)?)
    }

    pub async fn live_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.live_topology().await)?)
    }

    /// Reset les sondes enregistrées pour un nouveau scénario
    pub fn reset(&mut self) {
        self.prober.clear();
        log::info!("🧹 Test harness reset");
    }
}

/// Assert qu'un lien précis existe avec le bon type
pub fn assert_link(links: &[Link], from: &str, to: &str, link_type: LinkType) -> Result<()> {
    match links.iter().find(|l| l.from == from && l.to == to) {
        Some(link) if link.link_type == link_type => {
            log::info!("✅ Found link {} -> {} ({:?})", from, to, link_type);
            Ok(())
        }
        Some(link) => anyhow::bail!(
            "Link {} -> {} has type {:?}, expected {:?}",
            from, to, link.link_type, link_type
        ),
        None => anyhow::bail!("Link {} -> {} not found", from, to),
    }
}

/// Assert qu'aucun lien live ne touche un hôte non sain
pub fn assert_only_healthy_links(topology: &LiveTopology) -> Result<()> {
    for link in &topology.links {
        for host in [&link.from, &link.to] {
            let healthy = topology
                .servers
                .iter()
                .filter(|s| &s.hostname == host)
                .all(|s| s.status == Some(HostStatus::Healthy));
            if !healthy {
                anyhow::bail!("Link {} -> {} touches unhealthy host {}", link.from, link.to, host);
            }
        }
    }
    Ok(())
}

/// Assert qu'un champ JSON (chemin `a.b.0.c`) a une valeur précise
pub fn assert_field_equals(value: &Value, field_path: &str, expected: &Value) -> Result<()> {
    match get_nested_field(value, field_path) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => anyhow::bail!(
            "Field '{}' mismatch: expected {:?}, got {:?}",
            field_path, expected, actual
        ),
        None => anyhow::bail!("Field '{}' not found", field_path),
    }
}

fn get_nested_field<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for part in path.split('.') {
        current = match current {
            Value::Object(obj) => obj.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}
