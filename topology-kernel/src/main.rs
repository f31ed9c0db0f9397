/**
 * TOPOLOGY KERNEL - Point d'entrée principal du serveur
 *
 * RÔLE : Charge la conf, initialise les logs, construit le pinger système
 * et sert l'API REST de topologie.
 */

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use topology_kernel::config::load_config;
use topology_kernel::http::{build_router, AppState};
use topology_kernel::probe::SystemPinger;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("topology_kernel=info")),
        )
        .init();

    let cfg = load_config().await;
    info!("inventory: {}", cfg.inventory_path.display());

    let pinger = SystemPinger::from_config(&cfg.probe).context("invalid probe configuration")?;
    info!(
        "probe: `{}` timeout {}s, concurrency {}",
        cfg.probe.command,
        cfg.probe.timeout().as_secs(),
        cfg.probe.effective_concurrency()
    );

    let app = build_router(AppState::new(&cfg, Arc::new(pinger)));

    let addr = cfg.http.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
