use icmplot_series::PlotData;

/// Pixel and font sizing for one rendered figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub title_font: u32,
    pub label_font: u32,
    pub tick_font: u32,
}

/// One summary panel plus one panel per host.
pub fn panel_count(plot: &PlotData) -> usize {
    plot.host_order.len() + 1
}

/// Sizing heuristic: width follows the cycle count so tick labels keep
/// room, height follows the panel count, fonts follow the aspect ratio.
/// Everything is clamped so degenerate batches still render legibly.
pub fn layout_for(cycles: usize, hosts: usize) -> ChartLayout {
    let width = (cycles as u32).saturating_mul(60).clamp(900, 4000);
    let height = (hosts as u32 + 1).saturating_mul(280).clamp(560, 8000);
    let ratio = f64::from(width) / f64::from(height);

    ChartLayout {
        width,
        height,
        title_font: ((ratio * 30.0).round() as u32).clamp(16, 40),
        label_font: ((ratio * 20.0).round() as u32).clamp(12, 28),
        tick_font: if cycles > 48 { 9 } else { 11 },
    }
}
