//! Startup capability checks, run before any real work.
//!
//! Each missing external capability maps to one enumerable variant with
//! remediation in the message, so a misconfigured host fails once, up
//! front, instead of partway through a batch.

use icmplot_probe::SurgeEchoSender;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("ICMP capability missing: {0}")]
    Icmp(String),

    #[error("rendering capability missing: {0}")]
    Rendering(String),
}

/// Checks the chart backend can rasterize text.
pub fn verify_rendering() -> Result<(), CapabilityError> {
    icmplot_render::verify_backend().map_err(|err| CapabilityError::Rendering(format!("{err:#}")))
}

/// Opens the ICMP sockets; the returned sender is reused for the whole run.
pub fn verify_icmp() -> Result<SurgeEchoSender, CapabilityError> {
    SurgeEchoSender::new().map_err(|err| CapabilityError::Icmp(format!("{err:#}")))
}
