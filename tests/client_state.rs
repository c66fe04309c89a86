//! State-machine tests for the telemetry client: connection lifecycle,
//! backoff schedule, retry bound, snapshot replacement and teardown.

use std::time::Duration;

use ssetop::client::{
    Action, ClientEvent, Envelope, Phase, TelemetryClient, BASE_RECONNECT_DELAY,
    MAX_RECONNECT_ATTEMPTS,
};

const URL: &str = "http://127.0.0.1:8080/api/stats/sse";

fn snapshot_json(hostname: &str) -> String {
    format!(
        r#"{{
            "host": {{"hostname": "{hostname}", "os": "linux 6.8", "uptime": 93784}},
            "memory": {{"total": 16000, "used": 8000, "free": 8000,
                        "swapTotal": 4000, "swapUsed": 100, "swapFree": 3900}},
            "cpu": [{{"usage": 12.5, "model": "Test CPU", "cores": 8}},
                    {{"usage": 50.0, "model": "Test CPU", "cores": 8}}],
            "disk": [{{"mountpoint": "/", "type": "ext4", "total": 1000,
                       "used": 400, "free": 600, "usedPercent": 40.0}}],
            "network": [{{"interfaceName": "eth0", "totalBytesSent": 123,
                          "totalBytesRecv": 456}}]
        }}"#
    )
}

fn open_epoch(a: &Action) -> u64 {
    match a {
        Action::OpenTransport { epoch, .. } => *epoch,
        other => panic!("expected OpenTransport, got {other:?}"),
    }
}

fn schedule(a: &Action) -> (Duration, u64) {
    match a {
        Action::ScheduleReconnect { delay, epoch } => (*delay, *epoch),
        other => panic!("expected ScheduleReconnect, got {other:?}"),
    }
}

fn connected_client() -> (TelemetryClient, u64) {
    let mut c = TelemetryClient::new(Some(URL.into()));
    let epoch = open_epoch(&c.connect());
    let a = c.handle(Envelope {
        epoch,
        event: ClientEvent::Open,
    });
    assert_eq!(a, Action::None);
    (c, epoch)
}

#[test]
fn starts_loading_and_disconnected() {
    let c = TelemetryClient::new(Some(URL.into()));
    assert!(c.is_loading());
    assert!(!c.is_connected());
    assert!(c.error().is_none());
    assert_eq!(c.reconnect_attempts(), 0);
}

// Scenario A: no endpoint configured is an intentional idle state, not an error.
#[test]
fn missing_endpoint_is_quiet_idle() {
    let mut c = TelemetryClient::new(None);
    let a = c.connect();
    assert_eq!(a, Action::None);
    assert!(!c.is_loading());
    assert!(!c.is_connected());
    assert!(c.error().is_none());
    assert_eq!(c.phase(), Phase::Idle);
}

// Scenario B: open completes the attempt and resets the retry budget.
#[test]
fn open_marks_connected() {
    let (c, _) = connected_client();
    assert!(c.is_connected());
    assert!(!c.is_loading());
    assert!(c.error().is_none());
    assert_eq!(c.reconnect_attempts(), 0);
    assert_eq!(c.phase(), Phase::Connected);
}

// Scenario C: consecutive errors schedule doubling delays with the attempt
// count climbing, never reconnecting eagerly.
#[test]
fn consecutive_errors_back_off() {
    let (mut c, mut epoch) = connected_client();

    let mut delays = Vec::new();
    for attempt in 1..=3u32 {
        let a = c.handle(Envelope {
            epoch,
            event: ClientEvent::Error("connection reset".into()),
        });
        let (delay, timer_epoch) = schedule(&a);
        delays.push(delay);
        assert!(!c.is_connected());
        assert!(!c.is_loading());
        assert_eq!(c.reconnect_attempts(), attempt);
        assert_eq!(c.phase(), Phase::ReconnectScheduled);
        let err = c.error().expect("reconnect message");
        assert!(err.contains(&format!("attempt {attempt}/{MAX_RECONNECT_ATTEMPTS}")));
        assert!(err.contains(&format!("{}s", delay.as_secs())));

        // Timer fires: a fresh attempt with a fresh epoch
        let a = c.handle(Envelope {
            epoch: timer_epoch,
            event: ClientEvent::ReconnectDue,
        });
        let next = open_epoch(&a);
        assert!(next > epoch);
        epoch = next;
    }
    assert_eq!(
        delays,
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(4000),
        ]
    );
}

// P2 + P3: five scheduled retries at 1s/2s/4s/8s/16s, then terminal failure.
#[test]
fn retries_are_bounded() {
    let (mut c, mut epoch) = connected_client();

    for n in 0..MAX_RECONNECT_ATTEMPTS {
        let a = c.handle(Envelope {
            epoch,
            event: ClientEvent::Error("refused".into()),
        });
        let (delay, timer_epoch) = schedule(&a);
        assert_eq!(delay, BASE_RECONNECT_DELAY * 2u32.pow(n));
        epoch = open_epoch(&c.handle(Envelope {
            epoch: timer_epoch,
            event: ClientEvent::ReconnectDue,
        }));
    }

    // Budget exhausted: the next error is terminal.
    let a = c.handle(Envelope {
        epoch,
        event: ClientEvent::Error("refused".into()),
    });
    assert_eq!(a, Action::None);
    assert_eq!(c.phase(), Phase::Failed);
    assert!(c.error().unwrap().contains("manual reconnect"));

    // No stray timer can revive it.
    let a = c.handle(Envelope {
        epoch,
        event: ClientEvent::ReconnectDue,
    });
    assert_eq!(a, Action::None);
    assert_eq!(c.phase(), Phase::Failed);

    // Manual reconnect starts over with a full budget.
    let epoch = open_epoch(&c.reconnect());
    assert_eq!(c.reconnect_attempts(), 0);
    assert_eq!(c.phase(), Phase::Connecting);
    c.handle(Envelope {
        epoch,
        event: ClientEvent::Open,
    });
    assert!(c.is_connected());
}

// P1: a second connect while one is in flight is dropped, and events from a
// superseded handle never mutate state.
#[test]
fn in_flight_guard_and_stale_epochs() {
    let mut c = TelemetryClient::new(Some(URL.into()));
    let first = open_epoch(&c.connect());
    assert_eq!(c.connect(), Action::None);

    // Complete the attempt, then reconnect: the old handle's epoch is dead.
    c.handle(Envelope {
        epoch: first,
        event: ClientEvent::Open,
    });
    let second = open_epoch(&c.reconnect());
    assert!(second > first);

    let a = c.handle(Envelope {
        epoch: first,
        event: ClientEvent::Error("late error from old stream".into()),
    });
    assert_eq!(a, Action::None);
    assert_eq!(c.phase(), Phase::Connecting);
    assert!(c.error().is_none());
}

// P4: a parsed message replaces the snapshot wholesale.
#[test]
fn snapshot_replaced_atomically() {
    let (mut c, epoch) = connected_client();
    c.handle(Envelope {
        epoch,
        event: ClientEvent::Message(snapshot_json("alpha")),
    });
    assert_eq!(c.data().unwrap().host.hostname, "alpha");
    assert_eq!(c.updates(), 1);

    c.handle(Envelope {
        epoch,
        event: ClientEvent::Message(snapshot_json("beta")),
    });
    let s = c.data().unwrap();
    assert_eq!(s.host.hostname, "beta");
    assert_eq!(s.cpu.len(), 2);
    assert_eq!(c.updates(), 2);
}

// Scenario D / P5: malformed payloads warn without touching connection state
// or the stored snapshot.
#[test]
fn parse_error_is_isolated() {
    let (mut c, epoch) = connected_client();
    c.handle(Envelope {
        epoch,
        event: ClientEvent::Message(snapshot_json("alpha")),
    });

    let a = c.handle(Envelope {
        epoch,
        event: ClientEvent::Message("{bad json".into()),
    });
    assert_eq!(a, Action::None);
    assert!(c.error().unwrap().contains("malformed snapshot"));
    assert!(c.is_connected());
    assert!(!c.is_loading());
    assert_eq!(c.data().unwrap().host.hostname, "alpha");

    // The next good message clears the warning.
    c.handle(Envelope {
        epoch,
        event: ClientEvent::Message(snapshot_json("beta")),
    });
    assert!(c.error().is_none());
    assert_eq!(c.data().unwrap().host.hostname, "beta");
}

// An oversized frame the decoder refused to buffer surfaces like any other
// bad payload: a warning, never a disconnect.
#[test]
fn oversized_frame_report_is_isolated() {
    let (mut c, epoch) = connected_client();
    c.handle(Envelope {
        epoch,
        event: ClientEvent::Message(snapshot_json("alpha")),
    });

    let a = c.handle(Envelope {
        epoch,
        event: ClientEvent::Malformed("oversized stream event dropped (2097152 bytes)".into()),
    });
    assert_eq!(a, Action::None);
    assert!(c.error().unwrap().contains("oversized"));
    assert!(c.is_connected());
    assert!(!c.is_loading());
    assert_eq!(c.data().unwrap().host.hostname, "alpha");

    // The next good message clears the warning.
    c.handle(Envelope {
        epoch,
        event: ClientEvent::Message(snapshot_json("beta")),
    });
    assert!(c.error().is_none());
}

#[test]
fn refresh_reconnects_when_connected() {
    let (mut c, _) = connected_client();
    let a = c.refresh();
    assert!(matches!(a, Action::OpenTransport { .. }));
    assert_eq!(c.phase(), Phase::Connecting);
    assert_eq!(c.reconnect_attempts(), 0);
}

#[test]
fn refresh_connects_when_idle() {
    let mut c = TelemetryClient::new(Some(URL.into()));
    let a = c.refresh();
    assert!(matches!(a, Action::OpenTransport { .. }));
}

// P6: teardown is idempotent and final.
#[test]
fn shutdown_is_idempotent_and_final() {
    let (mut c, epoch) = connected_client();
    c.handle(Envelope {
        epoch,
        event: ClientEvent::Message(snapshot_json("alpha")),
    });
    c.shutdown();
    c.shutdown();

    assert_eq!(c.connect(), Action::None);
    assert_eq!(c.reconnect(), Action::None);
    let a = c.handle(Envelope {
        epoch,
        event: ClientEvent::Error("late".into()),
    });
    assert_eq!(a, Action::None);
    // Last known state is preserved, not mutated.
    assert!(c.is_connected());
    assert_eq!(c.data().unwrap().host.hostname, "alpha");
}
