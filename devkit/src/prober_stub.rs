/*!
Mock Prober pour développement sans réseau

Permet de tester le moteur de topologie sans lancer de vrai `ping`.
Chaque hôte a une réponse scriptée ; tous les appels sont enregistrés
pour les assertions (nombre de sondes par hôte, ordre, etc.).
*/

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use topology_kernel::probe::{PingOutcome, Prober};

/// Réponse scriptée pour un hôte
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedReply {
    /// Succès avec une sortie `time=<ms> ms`
    Up(f64),
    /// Échec (timeout, unreachable...)
    Down,
    /// Sortie brute, pour tester le parsing
    Raw(PingOutcome),
}

impl ScriptedReply {
    fn to_outcome(&self, host: &str) -> PingOutcome {
        match self {
            ScriptedReply::Up(ms) => PingOutcome {
                success: true,
                stdout: ping_output(host, *ms),
            },
            ScriptedReply::Down => PingOutcome::failed(),
            ScriptedReply::Raw(outcome) => outcome.clone(),
        }
    }
}

/// Sortie type `ping -c 1` sous Linux
pub fn ping_output(host: &str, ms: f64) -> String {
    format!(
        "PING {host} 56(84) bytes of data.\n\
         64 bytes from {host}: icmp_seq=1 ttl=64 time={ms} ms\n\n\
         --- {host} ping statistics ---\n\
         1 packets transmitted, 1 received, 0% packet loss, time 0ms\n"
    )
}

/// Mock Prober qui simule le pinger système
#[derive(Clone)]
pub struct MockProber {
    replies: Arc<Mutex<HashMap<String, ScriptedReply>>>,
    default_reply: ScriptedReply,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockProber {
    /// Par défaut tout hôte inconnu répond en 1 ms
    pub fn new() -> Self {
        Self::with_default(ScriptedReply::Up(1.0))
    }

    /// Réseau où tout hôte non scripté est injoignable
    pub fn all_down() -> Self {
        Self::with_default(ScriptedReply::Down)
    }

    pub fn with_default(reply: ScriptedReply) -> Self {
        Self {
            replies: Arc::new(Mutex::new(HashMap::new())),
            default_reply: reply,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn script<S: Into<String>>(&self, host: S, reply: ScriptedReply) -> &Self {
        self.replies.lock().unwrap().insert(host.into(), reply);
        self
    }

    pub fn set_up<S: Into<String>>(&self, host: S, ms: f64) -> &Self {
        self.script(host, ScriptedReply::Up(ms))
    }

    pub fn set_down<S: Into<String>>(&self, host: S) -> &Self {
        self.script(host, ScriptedReply::Down)
    }

    /// Toutes les sondes reçues, dans l'ordre
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, host: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|h| *h == host).count()
    }

    /// Reset les appels enregistrés (les scripts sont conservés)
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Default for MockProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for MockProber {
    async fn ping(&self, host: &str) -> PingOutcome {
        self.calls.lock().unwrap().push(host.to_string());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(host)
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());

        log::debug!("🏓 [MOCK] ping {} -> {:?}", host, reply);
        reply.to_outcome(host)
    }
}
