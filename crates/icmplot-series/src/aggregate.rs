use crate::error::SeriesError;
use chrono::{Local, TimeZone};
use icmplot_model::ProbeRecord;
use std::collections::HashMap;

/// Derived view of a record batch, ready for rendering.
///
/// `host_order` is first-seen order and determines panel layout; the tick
/// count comes from the first host's cycle count, which aggregation
/// verifies is shared by every host.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub x_labels: Vec<String>,
    pub answers: Vec<u32>,
    pub timeout: f64,
    pub host_order: Vec<String>,
    pub per_host: HashMap<String, Vec<ProbeRecord>>,
}

/// Regroups a flat record batch by host and derives the per-cycle answer
/// counts for the summary panel.
pub fn prepare_plot_data(records: &[ProbeRecord]) -> Result<PlotData, SeriesError> {
    let first = records.first().ok_or(SeriesError::EmptyBatch)?;
    let timeout = first.timeout;

    let mut host_order: Vec<String> = Vec::new();
    let mut per_host: HashMap<String, Vec<ProbeRecord>> = HashMap::new();

    for record in records {
        if !per_host.contains_key(&record.host_ip) {
            host_order.push(record.host_ip.clone());
        }
        per_host
            .entry(record.host_ip.clone())
            .or_default()
            .push(record.clone());
    }

    let first_host = &per_host[&host_order[0]];
    let cycle_count = first_host.len();

    for host in &host_order {
        let actual = per_host[host].len();
        if actual != cycle_count {
            return Err(SeriesError::RaggedCycles {
                host: host.clone(),
                expected: cycle_count,
                actual,
            });
        }
    }

    let x_labels: Vec<String> = first_host
        .iter()
        .map(|record| format_tick(record.start_time))
        .collect();

    let answers: Vec<u32> = (0..cycle_count)
        .map(|tick| {
            host_order
                .iter()
                .filter(|host| per_host[*host][tick].answered)
                .count() as u32
        })
        .collect();

    Ok(PlotData {
        x_labels,
        answers,
        timeout,
        host_order,
        per_host,
    })
}

/// Tick label for one cycle: the probe's local send time, or a dash for a
/// probe that never started.
pub fn format_tick(start_time: Option<f64>) -> String {
    start_time
        .and_then(|ts| Local.timestamp_opt(ts as i64, 0).single())
        .map(|dt| dt.format("%d-%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}
