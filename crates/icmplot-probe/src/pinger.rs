use anyhow::{anyhow, Context, Result};
use std::net::IpAddr;
use std::time::Duration;
use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError, ICMP};
use tokio::runtime::Runtime;

/// Seam for the ICMP echo capability: one request, one matched reply.
///
/// `Ok(Some(rtt))` means the target answered within the timeout,
/// `Ok(None)` means no reply arrived in time. `Err` is reserved for
/// transport-level trouble; callers classify it as unanswered.
pub trait EchoSender: Send + Sync {
    fn send_echo(&self, ip: IpAddr, timeout: Duration) -> Result<Option<Duration>>;
}

/// surge-ping backed echo sender running on a private tokio runtime so
/// probe call sites stay plain blocking functions.
pub struct SurgeEchoSender {
    runtime: Runtime,
    client_v4: Client,
    client_v6: Option<Client>,
}

impl SurgeEchoSender {
    /// Opens the ICMP sockets. Failing here means the process lacks raw
    /// socket privileges; treat it as a startup error, not a per-probe one.
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime for ICMP probing")?;

        let client_v4 = runtime
            .block_on(async { Client::new(&Config::default()) })
            .context("failed to open ICMPv4 socket (run as root or grant CAP_NET_RAW)")?;

        // IPv6 is best-effort; hosts without an IPv6 stack still probe v4.
        let client_v6 = runtime
            .block_on(async { Client::new(&Config::builder().kind(ICMP::V6).build()) })
            .ok();

        Ok(Self {
            runtime,
            client_v4,
            client_v6,
        })
    }
}

impl EchoSender for SurgeEchoSender {
    fn send_echo(&self, ip: IpAddr, timeout: Duration) -> Result<Option<Duration>> {
        let client = match ip {
            IpAddr::V4(_) => self.client_v4.clone(),
            IpAddr::V6(_) => self
                .client_v6
                .clone()
                .ok_or_else(|| anyhow!("ICMPv6 socket unavailable for {ip}"))?,
        };

        self.runtime.block_on(async move {
            let mut pinger = client
                .pinger(ip, PingIdentifier(std::process::id() as u16))
                .await;
            pinger.timeout(timeout);

            match pinger.ping(PingSequence(0), &[]).await {
                Ok((_packet, rtt)) => Ok(Some(rtt)),
                Err(SurgeError::Timeout { .. }) => Ok(None),
                Err(err) => Err(anyhow!("icmp exchange with {ip} failed: {err}")),
            }
        })
    }
}
