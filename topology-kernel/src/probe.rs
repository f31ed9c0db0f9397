//! Host probing: binary health and round-trip latency.
//!
//! Both probes go through the [`Prober`] trait so the topology engine can be
//! driven by the system `ping` tool in production and by scripted stubs in
//! tests. Neither probe ever fails: every error degrades to a sentinel
//! ([`HostStatus::Down`], [`Latency::Unreachable`]).

use crate::config::ProbeConf;
use crate::error::{KernelError, KernelResult};
use crate::models::{HostStatus, Latency};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as AsyncCommand;
use tracing::debug;

/// Extra wait on top of the tool's own timeout before the child is killed.
const SPAWN_GRACE: Duration = Duration::from_secs(1);

// "time=0.013 ms" (Linux/macOS) ou "time<1ms" (Windows)
static RTT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"time[=<]([\d.]+)").expect("valid RTT regex"));

/// Raw result of a single liveness probe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PingOutcome {
    pub success: bool,
    pub stdout: String,
}

impl PingOutcome {
    pub fn failed() -> Self {
        Self::default()
    }
}

/// One bounded-timeout liveness probe against a host.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn ping(&self, host: &str) -> PingOutcome;
}

/// Runs `<command> -c 1 -W <secs> <host>` as a child process.
#[derive(Debug, Clone)]
pub struct SystemPinger {
    program: String,
    base_args: Vec<String>,
    timeout: Duration,
}

impl SystemPinger {
    pub fn new(command: &str, timeout: Duration) -> KernelResult<Self> {
        let mut words = shell_words::split(command)
            .map_err(|e| KernelError::ProbeCommand(format!("{command}: {e}")))?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| KernelError::ProbeCommand("empty command".into()))?;
        Ok(Self { program, base_args: words.collect(), timeout })
    }

    pub fn from_config(conf: &ProbeConf) -> KernelResult<Self> {
        Self::new(&conf.command, conf.timeout())
    }

    fn args_for(&self, host: &str) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.extend([
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            self.timeout.as_secs().max(1).to_string(),
            host.to_string(),
        ]);
        args
    }
}

#[async_trait]
impl Prober for SystemPinger {
    async fn ping(&self, host: &str) -> PingOutcome {
        let child = AsyncCommand::new(&self.program)
            .args(self.args_for(host))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.timeout + SPAWN_GRACE, child).await {
            Ok(Ok(output)) => PingOutcome {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            },
            Ok(Err(e)) => {
                debug!("ping {host}: spawn failed: {e}");
                PingOutcome::failed()
            }
            Err(_) => {
                debug!("ping {host}: timed out");
                PingOutcome::failed()
            }
        }
    }
}

/// Extracts the round-trip time in ms, keeping the tool's precision.
pub fn parse_round_trip_ms(output: &str) -> Option<f64> {
    let caps = RTT_PATTERN.captures(output)?;
    caps.get(1)?.as_str().parse::<f64>().ok()
}

pub async fn host_status(prober: &dyn Prober, host: &str) -> HostStatus {
    if prober.ping(host).await.success {
        HostStatus::Healthy
    } else {
        HostStatus::Down
    }
}

pub async fn measure_latency(prober: &dyn Prober, host: &str) -> Latency {
    let outcome = prober.ping(host).await;
    if !outcome.success {
        return Latency::Unreachable;
    }
    match parse_round_trip_ms(&outcome.stdout) {
        Some(ms) => Latency::Measured(ms),
        None => {
            debug!("ping {host}: no time= in output");
            Latency::Unreachable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const LINUX_OUTPUT: &str = "PING localhost (127.0.0.1) 56(84) bytes of data.\n\
        64 bytes from localhost (127.0.0.1): icmp_seq=1 ttl=64 time=0.013 ms\n\n\
        --- localhost ping statistics ---\n\
        1 packets transmitted, 1 received, 0% packet loss, time 0ms\n\
        rtt min/avg/max/mdev = 0.013/0.013/0.013/0.000 ms\n";

    struct Scripted(HashMap<&'static str, PingOutcome>);

    #[async_trait]
    impl Prober for Scripted {
        async fn ping(&self, host: &str) -> PingOutcome {
            self.0.get(host).cloned().unwrap_or_default()
        }
    }

    fn ok(stdout: &str) -> PingOutcome {
        PingOutcome { success: true, stdout: stdout.to_string() }
    }

    #[test]
    fn test_parse_sub_millisecond() {
        assert_eq!(parse_round_trip_ms(LINUX_OUTPUT), Some(0.013));
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(parse_round_trip_ms("Reply from 10.0.0.1: bytes=32 time<1ms TTL=128"), Some(1.0));
        assert_eq!(parse_round_trip_ms("icmp_seq=0 ttl=54 time=23.456 ms"), Some(23.456));
        assert_eq!(parse_round_trip_ms("time=12 ms"), Some(12.0));
        assert_eq!(parse_round_trip_ms("1 packets transmitted, 0 received"), None);
        assert_eq!(parse_round_trip_ms("time=1.2.3 ms"), None);
        assert_eq!(parse_round_trip_ms(""), None);
    }

    #[test]
    fn test_command_split() {
        let pinger = SystemPinger::new("sudo ping -4", Duration::from_secs(2)).unwrap();
        assert_eq!(pinger.program, "sudo");
        assert_eq!(pinger.args_for("db1"), ["ping", "-4", "-c", "1", "-W", "2", "db1"]);

        assert!(matches!(SystemPinger::new("   ", Duration::from_secs(1)), Err(KernelError::ProbeCommand(_))));
        assert!(matches!(SystemPinger::new("ping 'oops", Duration::from_secs(1)), Err(KernelError::ProbeCommand(_))));
    }

    #[tokio::test]
    async fn test_host_status() {
        let prober = Scripted(HashMap::from([("up", ok("")), ("down", PingOutcome::failed())]));
        assert_eq!(host_status(&prober, "up").await, HostStatus::Healthy);
        assert_eq!(host_status(&prober, "down").await, HostStatus::Down);
        assert_eq!(host_status(&prober, "unknown").await, HostStatus::Down);
    }

    #[tokio::test]
    async fn test_measure_latency_sentinels() {
        let prober = Scripted(HashMap::from([
            ("fast", ok(LINUX_OUTPUT)),
            ("silent", ok("no timing here")),
            ("gone", PingOutcome { success: false, stdout: "time=5.0 ms".into() }),
        ]));
        assert_eq!(measure_latency(&prober, "fast").await, Latency::Measured(0.013));
        assert_eq!(measure_latency(&prober, "silent").await, Latency::Unreachable);
        assert_eq!(measure_latency(&prober, "gone").await, Latency::Unreachable);
    }

    #[tokio::test]
    async fn test_missing_binary_is_down() {
        let pinger = SystemPinger::new("definitely-not-a-ping-binary-xyz", Duration::from_secs(1)).unwrap();
        assert_eq!(host_status(&pinger, "127.0.0.1").await, HostStatus::Down);
        assert_eq!(measure_latency(&pinger, "127.0.0.1").await, Latency::Unreachable);
    }
}
