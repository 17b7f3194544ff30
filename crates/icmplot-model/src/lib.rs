//! Shared data structures for IcmpPlot.

use serde::{Deserialize, Serialize};

/// One probed host: IP plus a human-readable alias.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub ip: String,
    pub alias: String,
}

impl Target {
    pub fn new(ip: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            alias: alias.into(),
        }
    }
}

/// Lifecycle state of a single probe. The serialized strings are the wire
/// format of the records file and must stay exactly as written here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProbeStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "NEVER STARTED")]
    NeverStarted,
    #[serde(rename = "DONE (answered)")]
    DoneAnswered,
    #[serde(rename = "DONE (UNANSWERED)")]
    DoneUnanswered,
}

/// Outcome of one ICMP exchange attempt for one target in one cycle.
///
/// Field names serialize in camelCase to match the records-file format.
/// Timing fields are `None` for probes that were stopped before being
/// sent. `answered` and `unanswered` are never both true.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeRecord {
    pub cycle_id: Option<u32>,
    pub host_ip: String,
    pub host_alias: String,
    pub answered: bool,
    pub unanswered: bool,
    pub status: ProbeStatus,
    /// Unix epoch seconds; set when the echo request went out.
    pub start_time: Option<f64>,
    /// Unix epoch seconds; set when the exchange finished or timed out.
    pub end_time: Option<f64>,
    /// Elapsed seconds, rounded to milliseconds. Only meaningful when
    /// `answered` is true.
    pub time: Option<f64>,
    /// Per-probe timeout in seconds; uniform across a batch.
    pub timeout: f64,
}
