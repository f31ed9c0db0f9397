/**
 * API REST TOPOLOGIE - Serveur HTTP du kernel
 *
 * RÔLE :
 * Expose en lecture seule les deux vues du moteur de topologie.
 *
 * ROUTES :
 * - GET /health            : liveness du kernel ("ok")
 * - GET /topology          : vue statique (inventaire seul, rapide)
 * - GET /topology/details  : vue live (ping de chaque hôte + latence par lien)
 *
 * Chaque requête relit l'inventaire : aucun cache, aucun état partagé mutable.
 */

use axum::{extract::State, routing::get, Json, Router};
use crate::config::KernelConfig;
use crate::models::{LiveTopology, StaticTopology};
use crate::probe::Prober;
use crate::topology::{get_topology, get_topology_details};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub inventory_path: Arc<PathBuf>,
    pub prober: Arc<dyn Prober>,
    pub probe_concurrency: usize,
}

impl AppState {
    pub fn new(cfg: &KernelConfig, prober: Arc<dyn Prober>) -> Self {
        Self {
            inventory_path: Arc::new(cfg.inventory_path.clone()),
            prober,
            probe_concurrency: cfg.probe.effective_concurrency(),
        }
    }
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/topology", get(topology))
        .route("/topology/details", get(topology_details))
        .with_state(app_state)
}

// GET /topology
async fn topology(State(app): State<AppState>) -> Json<StaticTopology> {
    Json(get_topology(&app.inventory_path).await)
}

// GET /topology/details (coût : un ping par hôte + un ping par lien sain)
async fn topology_details(State(app): State<AppState>) -> Json<LiveTopology> {
    Json(get_topology_details(&app.inventory_path, app.prober.as_ref(), app.probe_concurrency).await)
}
