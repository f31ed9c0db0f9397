use crate::error::{KernelError, KernelResult};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};

pub const DEFAULT_INVENTORY_PATH: &str = "/opt/fastapi-topology/ansible-hosts3";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct KernelConfig {
    pub inventory_path: PathBuf,
    pub http: HttpConf,
    pub probe: ProbeConf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConf {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProbeConf {
    pub command: String, // ex: "ping" ou "sudo ping -4"
    pub timeout_secs: u64,
    pub concurrency: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            inventory_path: PathBuf::from(DEFAULT_INVENTORY_PATH),
            http: HttpConf::default(),
            probe: ProbeConf::default(),
        }
    }
}

impl Default for HttpConf {
    fn default() -> Self {
        Self { bind: "0.0.0.0".into(), port: 8080 }
    }
}

impl Default for ProbeConf {
    fn default() -> Self {
        Self { command: "ping".into(), timeout_secs: 1, concurrency: 1 }
    }
}

impl HttpConf {
    pub fn socket_addr(&self) -> KernelResult<SocketAddr> {
        let ip: IpAddr = self.bind.parse().map_err(|e: std::net::AddrParseError| {
            KernelError::BindAddress { addr: self.bind.clone(), reason: e.to_string() }
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl ProbeConf {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Au moins une sonde à la fois, même si la conf dit 0.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// Parse une conf YAML ; un texte vide donne la conf par défaut.
pub fn parse_config(txt: &str) -> KernelResult<KernelConfig> {
    if txt.trim().is_empty() {
        return Ok(KernelConfig::default());
    }
    Ok(serde_yaml::from_str(txt)?)
}

pub async fn read_config_file(path: &Path) -> KernelResult<KernelConfig> {
    let txt = fs::read_to_string(path).await?;
    parse_config(&txt)
}

/// Charge la conf depuis `TOPOLOGY_KERNEL_CONFIG` (défaut `kernel.yaml`).
///
/// Fichier absent ou invalide : conf par défaut, jamais d'arrêt du kernel.
/// `TOPOLOGY_INVENTORY` écrase ensuite `inventory_path`.
pub async fn load_config() -> KernelConfig {
    let path = std::env::var("TOPOLOGY_KERNEL_CONFIG").unwrap_or_else(|_| "kernel.yaml".into());
    let mut cfg = if Path::new(&path).exists() {
        read_config_file(Path::new(&path)).await.unwrap_or_else(|e| {
            warn!("config invalide ({path}): {e}");
            KernelConfig::default()
        })
    } else {
        info!("pas de {path}, usage config par défaut");
        KernelConfig::default()
    };

    if let Ok(inventory) = std::env::var("TOPOLOGY_INVENTORY") {
        if !inventory.trim().is_empty() {
            cfg.inventory_path = PathBuf::from(inventory);
        }
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let cfg = parse_config("   \n").unwrap();
        assert_eq!(cfg.inventory_path, PathBuf::from(DEFAULT_INVENTORY_PATH));
        assert_eq!(cfg.http.port, 8080);
        assert_eq!(cfg.probe.command, "ping");
        assert_eq!(cfg.probe.timeout_secs, 1);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg = parse_config("inventory_path: /tmp/hosts\nprobe:\n  concurrency: 8\n").unwrap();
        assert_eq!(cfg.inventory_path, PathBuf::from("/tmp/hosts"));
        assert_eq!(cfg.probe.concurrency, 8);
        assert_eq!(cfg.probe.timeout_secs, 1);
        assert_eq!(cfg.http.bind, "0.0.0.0");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(matches!(parse_config("probe: [1, 2"), Err(KernelError::ConfigParse(_))));
    }

    #[test]
    fn test_socket_addr() {
        let http = HttpConf { bind: "127.0.0.1".into(), port: 9000 };
        assert_eq!(http.socket_addr().unwrap(), "127.0.0.1:9000".parse().unwrap());

        let bad = HttpConf { bind: "not-an-ip".into(), port: 9000 };
        assert!(matches!(bad.socket_addr(), Err(KernelError::BindAddress { .. })));
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let probe = ProbeConf { command: "ping".into(), timeout_secs: 0, concurrency: 0 };
        assert_eq!(probe.timeout(), Duration::from_secs(1));
        assert_eq!(probe.effective_concurrency(), 1);
    }

    #[tokio::test]
    async fn test_read_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kernel.yaml");
        std::fs::write(&path, "http:\n  port: 8181\n").unwrap();
        let cfg = read_config_file(&path).await.unwrap();
        assert_eq!(cfg.http.port, 8181);

        let missing = read_config_file(&dir.path().join("absent.yaml")).await;
        assert!(matches!(missing, Err(KernelError::ConfigIo(_))));
    }
}
