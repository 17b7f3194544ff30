use crate::pinger::EchoSender;
use icmplot_model::{ProbeRecord, ProbeStatus, Target};
use std::net::IpAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// One ICMP exchange attempt for one target in one cycle.
///
/// A probe is single-shot: `send` runs the exchange and marks the probe
/// terminal. `stop` before `send` turns the send into a no-op, so a probe
/// that was cancelled early serializes with null timing fields instead of
/// dereferencing times that were never taken.
#[derive(Debug, Clone)]
pub struct Probe {
    target: Target,
    timeout: Duration,
    cycle_id: Option<u32>,
    should_stop: bool,
    answered: bool,
    unanswered: bool,
    start_time: Option<f64>,
    end_time: Option<f64>,
    elapsed: Option<f64>,
}

impl Probe {
    pub fn new(target: Target, timeout: Duration, cycle_id: Option<u32>) -> Self {
        Self {
            target,
            timeout,
            cycle_id,
            should_stop: false,
            answered: false,
            unanswered: false,
            start_time: None,
            end_time: None,
            elapsed: None,
        }
    }

    /// Runs the exchange unless the probe was stopped first. Any failure
    /// from the sender counts as unanswered; the batch keeps going.
    pub fn send(&mut self, sender: &dyn EchoSender) {
        if self.should_stop {
            return;
        }

        let start = unix_now();
        self.start_time = Some(start);

        match self.target.ip.parse::<IpAddr>() {
            Ok(ip) => match sender.send_echo(ip, self.timeout) {
                Ok(Some(_rtt)) => self.answered = true,
                Ok(None) => {
                    self.unanswered = true;
                    log::warn!(
                        "[{}] ({}): no answer within {:?}",
                        self.target.alias,
                        self.target.ip,
                        self.timeout
                    );
                }
                Err(err) => {
                    self.unanswered = true;
                    log::warn!("[{}] ({}): {err}", self.target.alias, self.target.ip);
                }
            },
            Err(err) => {
                self.unanswered = true;
                log::warn!(
                    "[{}] ({}): not a usable IP address: {err}",
                    self.target.alias,
                    self.target.ip
                );
            }
        }

        let end = unix_now();
        self.end_time = Some(end);
        self.elapsed = Some(round_ms(end - start));
        self.stop();
    }

    /// Marks the probe terminal. Idempotent and safe before `send`.
    pub fn stop(&mut self) {
        self.should_stop = true;
    }

    pub fn status(&self) -> ProbeStatus {
        if !self.should_stop {
            ProbeStatus::Active
        } else if self.start_time.is_none() {
            ProbeStatus::NeverStarted
        } else if self.answered {
            ProbeStatus::DoneAnswered
        } else {
            ProbeStatus::DoneUnanswered
        }
    }

    pub fn record(&self) -> ProbeRecord {
        ProbeRecord {
            cycle_id: self.cycle_id,
            host_ip: self.target.ip.clone(),
            host_alias: self.target.alias.clone(),
            answered: self.answered,
            unanswered: self.unanswered,
            status: self.status(),
            start_time: self.start_time,
            end_time: self.end_time,
            time: self.elapsed,
            timeout: self.timeout.as_secs_f64(),
        }
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

fn round_ms(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}
