use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Groupe → hôtes, dans l'ordre d'apparition du fichier d'inventaire.
pub type GroupsMap = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Healthy,
    Down,
}

impl HostStatus {
    pub fn is_healthy(self) -> bool {
        matches!(self, HostStatus::Healthy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Database,
    Network,
    Unknown,
}

/// Latence d'un lien live. Sérialisée en nombre de ms, entier `-1` si non mesurée.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Latency {
    Measured(f64),
    Unreachable,
}

impl Latency {
    pub const SENTINEL_MS: f64 = -1.0;

    pub fn as_ms(self) -> f64 {
        match self {
            Latency::Measured(ms) => ms,
            Latency::Unreachable => Self::SENTINEL_MS,
        }
    }
}

impl Serialize for Latency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Latency::Measured(ms) => serializer.serialize_f64(*ms),
            Latency::Unreachable => serializer.serialize_i64(-1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    pub hostname: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<HostStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<Latency>,
}

/// Réponse de `/topology` : aucune sonde.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticTopology {
    pub servers: Vec<Server>,
    pub links: Vec<Link>,
    pub groups: GroupsMap,
}

/// Réponse de `/topology/details` : statut par serveur, liens sains avec latence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveTopology {
    pub servers: Vec<Server>,
    pub links: Vec<Link>,
}
