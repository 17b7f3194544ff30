use crate::layout::{layout_for, panel_count, ChartLayout};
use anyhow::{anyhow, Context, Result};
use chrono::{Local, TimeZone};
use icmplot_series::PlotData;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::fs;
use std::path::{Path, PathBuf};

/// Output file name: the first host's first cycle start time in local
/// time, plus a caller-supplied suffix.
pub fn image_file_name(plot: &PlotData, suffix: &str) -> String {
    let first_start = plot
        .host_order
        .first()
        .and_then(|host| plot.per_host[host].first())
        .and_then(|record| record.start_time);

    let stamp = first_start
        .and_then(|ts| Local.timestamp_opt(ts as i64, 0).single())
        .unwrap_or_else(Local::now);

    format!("{}_{}.png", stamp.format("%Y%m%d-%H%M%S"), suffix)
}

/// Renders the composite figure into `out_dir` and returns the written
/// path. One summary panel on top, then one response-time panel per host
/// in first-seen order.
pub fn render_chart(plot: &PlotData, out_dir: &Path, suffix: &str) -> Result<PathBuf> {
    let layout = layout_for(plot.x_labels.len(), plot.host_order.len());

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create image directory {out_dir:?}"))?;
    let path = out_dir.join(image_file_name(plot, suffix));

    {
        let root = BitMapBackend::new(&path, (layout.width, layout.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let panels = root.split_evenly((panel_count(plot), 1));
        draw_summary_panel(&panels[0], plot, &layout)?;
        for (index, host) in plot.host_order.iter().enumerate() {
            draw_host_panel(&panels[index + 1], plot, host, &layout)?;
        }

        root.present().map_err(draw_err)?;
    }
    Ok(path)
}

fn draw_summary_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    plot: &PlotData,
    layout: &ChartLayout,
) -> Result<()> {
    let cycles = plot.x_labels.len();
    let hosts = plot.host_order.len();

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("Ping statistics for timeout={}s", plot.timeout),
            ("sans-serif", layout.title_font),
        )
        .margin(8)
        .x_label_area_size(80)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..cycles as f64, 0f64..hosts as f64)
        .map_err(draw_err)?;

    let labels = &plot.x_labels;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(cycles.min(60))
        .x_label_formatter(&|x| tick_label(labels, *x))
        .x_label_style(
            ("sans-serif", layout.tick_font)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc("Pings answered for this timeout")
        .y_desc("Total number of answers")
        .axis_desc_style(("sans-serif", layout.label_font))
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(
            plot.answers
                .iter()
                .enumerate()
                .map(|(index, count)| bar(index, f64::from(*count))),
        )
        .map_err(draw_err)?;

    Ok(())
}

fn draw_host_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    plot: &PlotData,
    host: &str,
    layout: &ChartLayout,
) -> Result<()> {
    let records = &plot.per_host[host];
    let cycles = records.len();
    let answered = records.iter().filter(|record| record.answered).count();
    let alias = &records[0].host_alias;
    let y_max = plot.timeout + 0.5;

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(80)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..cycles as f64, 0f64..y_max)
        .map_err(draw_err)?;

    let labels = &plot.x_labels;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(cycles.min(60))
        .x_label_formatter(&|x| tick_label(labels, *x))
        .x_label_style(
            ("sans-serif", layout.tick_font)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc(format!("{alias} ({host}) - [{answered}/{cycles}]"))
        .y_desc("Response time (seconds)")
        .axis_desc_style(("sans-serif", layout.label_font))
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(records.iter().enumerate().map(|(index, record)| {
            // Unanswered cycles draw as zero-height bars.
            let value = if record.answered {
                record.time.unwrap_or(0.0).min(y_max)
            } else {
                0.0
            };
            bar(index, value)
        }))
        .map_err(draw_err)?;

    Ok(())
}

fn bar(index: usize, value: f64) -> Rectangle<(f64, f64)> {
    let x = index as f64;
    Rectangle::new([(x + 0.1, 0.0), (x + 0.9, value)], BLUE.filled())
}

fn tick_label(labels: &[String], x: f64) -> String {
    let index = x.floor();
    if index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

fn draw_err(err: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("chart drawing failed: {err}")
}
