use crate::pinger::EchoSender;
use crate::probe::Probe;
use icmplot_model::{ProbeRecord, Target};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub cycles: u32,
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            cycles: 1,
            timeout: Duration::from_secs(5),
            interval: Duration::ZERO,
        }
    }
}

/// Runs `settings.cycles` rounds of probes over `targets`.
///
/// Within a cycle every target is probed on its own thread; each probe is
/// an independent blocking round-trip bounded by its own timeout. Results
/// come back over a channel and are reordered to the configured target
/// order, so the flat record list is deterministic regardless of which
/// reply lands first. The stop flag is honored between cycles; probes not
/// yet sent when it flips record as never started.
pub fn run_cycles(
    targets: &[Target],
    settings: &CycleSettings,
    sender: &dyn EchoSender,
    stop: &AtomicBool,
) -> Vec<ProbeRecord> {
    let mut records = Vec::with_capacity(targets.len() * settings.cycles as usize);

    for cycle in 0..settings.cycles {
        if stop.load(Ordering::SeqCst) {
            break;
        }

        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            for (index, target) in targets.iter().enumerate() {
                let tx = tx.clone();
                scope.spawn(move || {
                    let mut probe = Probe::new(target.clone(), settings.timeout, Some(cycle));
                    if stop.load(Ordering::SeqCst) {
                        probe.stop();
                    }
                    probe.send(sender);
                    let _ = tx.send((index, probe.record()));
                });
            }
        });
        drop(tx);

        let mut cycle_records: Vec<(usize, ProbeRecord)> = rx.try_iter().collect();
        cycle_records.sort_by_key(|(index, _)| *index);
        records.extend(cycle_records.into_iter().map(|(_, record)| record));

        let more_cycles = cycle + 1 < settings.cycles;
        if more_cycles && settings.interval > Duration::ZERO && !stop.load(Ordering::SeqCst) {
            thread::sleep(settings.interval);
        }
    }

    records
}
