use icmplot_model::{ProbeRecord, ProbeStatus};
use icmplot_series::{load_records, prepare_plot_data, SeriesError};
use std::fs;

fn record(host: &str, alias: &str, cycle: u32, answered: bool, time: f64) -> ProbeRecord {
    let start = 1756300000.0 + cycle as f64 * 10.0;
    ProbeRecord {
        cycle_id: Some(cycle),
        host_ip: host.to_string(),
        host_alias: alias.to_string(),
        answered,
        unanswered: !answered,
        status: if answered {
            ProbeStatus::DoneAnswered
        } else {
            ProbeStatus::DoneUnanswered
        },
        start_time: Some(start),
        end_time: Some(start + time),
        time: Some(time),
        timeout: 5.0,
    }
}

/// Two hosts, three cycles, interleaved emission order: host A answers
/// every cycle, host B answers none.
fn two_host_batch() -> Vec<ProbeRecord> {
    vec![
        record("192.0.2.1", "alpha", 0, true, 0.1),
        record("192.0.2.2", "beta", 0, false, 5.0),
        record("192.0.2.1", "alpha", 1, true, 0.2),
        record("192.0.2.2", "beta", 1, false, 5.0),
        record("192.0.2.1", "alpha", 2, true, 0.15),
        record("192.0.2.2", "beta", 2, false, 5.0),
    ]
}

#[test]
fn answers_count_hosts_per_cycle() {
    let plot = prepare_plot_data(&two_host_batch()).unwrap();

    assert_eq!(plot.answers, vec![1, 1, 1]);
    assert_eq!(plot.timeout, 5.0);
    assert_eq!(plot.x_labels.len(), 3);
    for count in &plot.answers {
        assert!(*count as usize <= plot.host_order.len());
    }
}

#[test]
fn host_order_is_first_seen() {
    let plot = prepare_plot_data(&two_host_batch()).unwrap();

    assert_eq!(
        plot.host_order,
        vec!["192.0.2.1".to_string(), "192.0.2.2".to_string()]
    );
    assert_eq!(plot.per_host["192.0.2.1"].len(), 3);
    assert_eq!(plot.per_host["192.0.2.2"].len(), 3);
}

#[test]
fn tick_labels_follow_first_host_start_times() {
    let plot = prepare_plot_data(&two_host_batch()).unwrap();

    let expected: Vec<String> = plot.per_host["192.0.2.1"]
        .iter()
        .map(|record| icmplot_series::aggregate::format_tick(record.start_time))
        .collect();
    assert_eq!(plot.x_labels, expected);
}

#[test]
fn never_started_record_gets_placeholder_tick() {
    assert_eq!(icmplot_series::aggregate::format_tick(None), "-");
}

#[test]
fn empty_batch_is_rejected() {
    assert!(matches!(
        prepare_plot_data(&[]),
        Err(SeriesError::EmptyBatch)
    ));
}

#[test]
fn ragged_cycle_counts_are_rejected() {
    let mut batch = two_host_batch();
    batch.push(record("192.0.2.1", "alpha", 3, true, 0.1));

    match prepare_plot_data(&batch) {
        Err(SeriesError::RaggedCycles {
            host,
            expected,
            actual,
        }) => {
            assert_eq!(host, "192.0.2.2");
            assert_eq!(expected, 4);
            assert_eq!(actual, 3);
        }
        other => panic!("expected RaggedCycles, got {other:?}"),
    }
}

#[test]
fn saved_batch_aggregates_identically() {
    let batch = two_host_batch();
    let in_memory = prepare_plot_data(&batch).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    fs::write(&path, serde_json::to_vec_pretty(&batch).unwrap()).unwrap();

    let reloaded = load_records(&path).unwrap();
    let from_disk = prepare_plot_data(&reloaded).unwrap();

    assert_eq!(in_memory, from_disk);
}

#[test]
fn missing_source_is_its_own_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");

    assert!(matches!(
        load_records(&path),
        Err(SeriesError::SourceMissing(_))
    ));
}

#[test]
fn malformed_source_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    fs::write(&path, b"{ not json ]").unwrap();

    assert!(matches!(load_records(&path), Err(SeriesError::Parse { .. })));
}
