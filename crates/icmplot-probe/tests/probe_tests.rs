use icmplot_model::{ProbeStatus, Target};
use icmplot_probe::{EchoSender, Probe};
use std::net::IpAddr;
use std::time::Duration;

struct FakeEchoSender {
    reply: Option<Duration>,
}

impl EchoSender for FakeEchoSender {
    fn send_echo(&self, _ip: IpAddr, _timeout: Duration) -> anyhow::Result<Option<Duration>> {
        Ok(self.reply)
    }
}

struct FailingEchoSender;

impl EchoSender for FailingEchoSender {
    fn send_echo(&self, ip: IpAddr, _timeout: Duration) -> anyhow::Result<Option<Duration>> {
        Err(anyhow::anyhow!("no such device while probing {ip}"))
    }
}

fn probe() -> Probe {
    Probe::new(
        Target::new("192.0.2.1", "lab"),
        Duration::from_secs(2),
        Some(0),
    )
}

#[test]
fn fresh_probe_is_active() {
    assert_eq!(probe().status(), ProbeStatus::Active);
}

#[test]
fn answered_reply_classifies_as_answered() {
    let mut probe = probe();
    probe.send(&FakeEchoSender {
        reply: Some(Duration::from_millis(12)),
    });

    assert_eq!(probe.status(), ProbeStatus::DoneAnswered);

    let record = probe.record();
    assert!(record.answered);
    assert!(!record.unanswered);
    assert!(record.start_time.is_some());
    assert!(record.end_time >= record.start_time);
    assert!(record.time.is_some());
}

#[test]
fn missing_reply_classifies_as_unanswered() {
    let mut probe = probe();
    probe.send(&FakeEchoSender { reply: None });

    assert_eq!(probe.status(), ProbeStatus::DoneUnanswered);

    let record = probe.record();
    assert!(!record.answered);
    assert!(record.unanswered);
}

#[test]
fn sender_error_classifies_as_unanswered() {
    let mut probe = probe();
    probe.send(&FailingEchoSender);

    assert_eq!(probe.status(), ProbeStatus::DoneUnanswered);
    assert!(probe.record().unanswered);
}

#[test]
fn unparsable_target_ip_classifies_as_unanswered() {
    let mut probe = Probe::new(
        Target::new("not-an-ip", "typo"),
        Duration::from_secs(2),
        None,
    );
    probe.send(&FakeEchoSender {
        reply: Some(Duration::from_millis(1)),
    });

    assert_eq!(probe.status(), ProbeStatus::DoneUnanswered);
    assert!(probe.record().unanswered);
}

#[test]
fn stop_before_send_makes_send_a_no_op() {
    let mut probe = probe();
    probe.stop();
    probe.send(&FakeEchoSender {
        reply: Some(Duration::from_millis(1)),
    });

    assert_eq!(probe.status(), ProbeStatus::NeverStarted);

    let record = probe.record();
    assert_eq!(record.status, ProbeStatus::NeverStarted);
    assert!(!record.answered);
    assert!(!record.unanswered);
    assert!(record.start_time.is_none());
    assert!(record.end_time.is_none());
    assert!(record.time.is_none());
}

#[test]
fn repeated_stop_leaves_record_unchanged() {
    let mut probe = probe();
    probe.send(&FakeEchoSender {
        reply: Some(Duration::from_millis(1)),
    });
    probe.stop();
    let first = probe.record();

    probe.stop();
    probe.stop();
    assert_eq!(probe.record(), first);
    assert_eq!(probe.status(), ProbeStatus::DoneAnswered);
}

#[test]
fn record_carries_target_and_cycle() {
    let mut probe = Probe::new(
        Target::new("192.0.2.7", "edge"),
        Duration::from_secs(3),
        Some(4),
    );
    probe.send(&FakeEchoSender { reply: None });

    let record = probe.record();
    assert_eq!(record.host_ip, "192.0.2.7");
    assert_eq!(record.host_alias, "edge");
    assert_eq!(record.cycle_id, Some(4));
    assert_eq!(record.timeout, 3.0);
}
