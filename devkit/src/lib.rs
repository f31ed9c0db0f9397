/*!
# Topology DevKit - Stubs et Utilitaires pour Développement

Bibliothèque facilitant les tests du kernel topologie avec:
- Prober scripté pour tests sans réseau ni `ping`
- Construction d'inventaires temporaires
- Harness exécutant les vues statique et live
*/

pub mod prober_stub;
pub mod inventory_helpers;
pub mod test_utils;

pub use prober_stub::{MockProber, ScriptedReply};
pub use inventory_helpers::{InventoryBuilder, InventoryFile};
pub use test_utils::TestHarness;
