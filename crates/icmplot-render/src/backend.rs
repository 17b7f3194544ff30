use anyhow::{anyhow, Result};
use plotters::prelude::*;

/// Proves the raster backend and its font loader work before any probing
/// starts, by drawing text into a throwaway in-memory bitmap. Font
/// lookup is the piece that fails on minimal systems, so exercising it
/// here turns a mid-run rendering crash into a startup error.
pub fn verify_backend() -> Result<()> {
    let mut buffer = vec![0u8; 64 * 64 * 3];
    let root = BitMapBackend::with_buffer(&mut buffer, (64, 64)).into_drawing_area();

    root.fill(&WHITE)
        .map_err(|err| anyhow!("raster backend unusable: {err}"))?;
    root.draw(&Text::new(
        "fonts ok",
        (4, 24),
        ("sans-serif", 12).into_font(),
    ))
    .map_err(|err| anyhow!("font backend unusable: {err} (install system fonts/fontconfig)"))?;

    Ok(())
}
