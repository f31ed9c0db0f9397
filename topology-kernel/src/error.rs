use thiserror::Error;

/// Erreurs du kernel hors moteur de topologie (config, réseau HTTP).
///
/// Le moteur lui-même ne remonte jamais d'erreur : inventaire absent et
/// sondes en échec se dégradent en valeurs sentinelles.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("config read error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("invalid bind address {addr}: {reason}")]
    BindAddress { addr: String, reason: String },

    #[error("invalid probe command: {0}")]
    ProbeCommand(String),
}

pub type KernelResult<T> = Result<T, KernelError>;
