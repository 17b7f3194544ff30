//! ICMP probing and cycle scheduling.

pub mod pinger;
pub mod probe;
pub mod runner;

pub use pinger::{EchoSender, SurgeEchoSender};
pub use probe::Probe;
pub use runner::{run_cycles, CycleSettings};
