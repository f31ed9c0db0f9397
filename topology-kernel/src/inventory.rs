/**
 * INVENTAIRE - Lecture du fichier d'hôtes groupés
 *
 * Format accepté :
 *   [groupe]
 *   hote1 variables_ignorees...
 *   hote2
 *
 * Parsing permissif : lignes vides et `#` ignorées, lignes hors groupe
 * ignorées, seul le premier mot d'une ligne d'hôte est gardé. Un fichier
 * absent donne un inventaire vide.
 */

use crate::models::GroupsMap;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Inventaire construit pour une seule requête, jamais modifié ensuite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    groups: GroupsMap,
}

impl Inventory {
    pub fn groups(&self) -> &GroupsMap {
        &self.groups
    }

    pub fn hosts(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Nombre total d'hôtes, doublons compris.
    pub fn host_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// `[nom]` → `nom` (jusqu'au dernier `]`, au moins un caractère).
fn group_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.rfind(']')?;
    let name = &rest[..end];
    if name.is_empty() { None } else { Some(name) }
}

pub fn parse_inventory(text: &str) -> Inventory {
    let mut groups = GroupsMap::new();
    let mut current: Option<String> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(name) = group_header(line) {
            // un en-tête répété vide le groupe mais garde sa position
            groups.insert(name.to_string(), Vec::new());
            current = Some(name.to_string());
        } else if let Some(group) = &current {
            if let Some(host) = line.split_whitespace().next() {
                groups.entry(group.clone()).or_default().push(host.to_string());
            }
        }
    }

    Inventory { groups }
}

/// Relit l'inventaire à chaque appel ; absent ou illisible → vide.
pub async fn load_inventory(path: &Path) -> Inventory {
    match fs::read_to_string(path).await {
        Ok(text) => {
            let inventory = parse_inventory(&text);
            debug!(
                "inventory {}: {} groups, {} hosts",
                path.display(),
                inventory.groups.len(),
                inventory.host_count()
            );
            inventory
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("inventory {} not found, empty topology", path.display());
            Inventory::default()
        }
        Err(e) => {
            warn!("inventory {} unreadable: {}", path.display(), e);
            Inventory::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(inv: &Inventory) -> Vec<&str> {
        inv.groups().keys().map(String::as_str).collect()
    }

    #[test]
    fn test_extra_tokens_dropped() {
        let inv = parse_inventory("[web]\nhost1 ansible_user=x\nhost2\n");
        assert_eq!(names(&inv), vec!["web"]);
        assert_eq!(inv.hosts("web").unwrap(), ["host1", "host2"]);
    }

    #[test]
    fn test_comments_blanks_and_orphans() {
        let text = "orphan-host\n# comment\n\n[dns]\n  # indented comment\nns1\n\n[db]\n";
        let inv = parse_inventory(text);
        assert_eq!(names(&inv), vec!["dns", "db"]);
        assert_eq!(inv.hosts("dns").unwrap(), ["ns1"]);
        assert!(inv.hosts("db").unwrap().is_empty());
        assert_eq!(inv.host_count(), 1);
    }

    #[test]
    fn test_group_order_and_duplicates_preserved() {
        let inv = parse_inventory("[web]\nb\na\nb\n[db]\nz\n[dns]\ny\n");
        assert_eq!(names(&inv), vec!["web", "db", "dns"]);
        assert_eq!(inv.hosts("web").unwrap(), ["b", "a", "b"]);
    }

    #[test]
    fn test_repeated_header_resets_hosts_in_place() {
        let inv = parse_inventory("[web]\nw1\n[db]\nd1\n[web]\nw2\n");
        assert_eq!(names(&inv), vec!["web", "db"]);
        assert_eq!(inv.hosts("web").unwrap(), ["w2"]);
    }

    #[test]
    fn test_group_header_forms() {
        assert_eq!(group_header("[web]"), Some("web"));
        assert_eq!(group_header("[web:children]"), Some("web:children"));
        assert_eq!(group_header("[web] trailing"), Some("web"));
        assert_eq!(group_header("[]"), None);
        assert_eq!(group_header("[web"), None);
        assert_eq!(group_header("web]"), None);
    }

    #[test]
    fn test_malformed_lines_tolerated() {
        let inv = parse_inventory("[web]\n\t host1\t\tvar=1 \n=== \n");
        assert_eq!(inv.hosts("web").unwrap(), ["host1", "==="]);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let inv = load_inventory(&dir.path().join("nope")).await;
        assert!(inv.is_empty());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts");
        std::fs::write(&path, "[dns]\nns1 ansible_host=10.0.0.2\n").unwrap();
        let inv = load_inventory(&path).await;
        assert_eq!(inv.hosts("dns").unwrap(), ["ns1"]);
    }
}
