//! Snapshot decoding against the monitoring server's JSON field names.

use ssetop::types::Snapshot;

const PAYLOAD: &str = r#"{
  "host": {"hostname": "delphi", "os": "linux 6.8.0-45-generic", "uptime": 354123},
  "memory": {
    "total": 33554432000, "used": 12884901888, "free": 20669530112,
    "swapTotal": 8589934592, "swapUsed": 536870912, "swapFree": 8053063680
  },
  "cpu": [
    {"usage": 23.4, "model": "AMD Ryzen 7 5800X", "cores": 8},
    {"usage": 11.0, "model": "AMD Ryzen 7 5800X", "cores": 8},
    {"usage": 96.2, "model": "AMD Ryzen 7 5800X", "cores": 8},
    {"usage": 4.1, "model": "AMD Ryzen 7 5800X", "cores": 8}
  ],
  "disk": [
    {"mountpoint": "/", "type": "ext4", "total": 512110190592,
     "used": 256055095296, "free": 256055095296, "usedPercent": 50.0},
    {"mountpoint": "/data", "type": "xfs", "total": 2199023255552,
     "used": 1979120929996, "free": 219902325556, "usedPercent": 90.0}
  ],
  "network": [
    {"interfaceName": "eth0", "totalBytesSent": 987654321, "totalBytesRecv": 123456789},
    {"interfaceName": "lo", "totalBytesSent": 42, "totalBytesRecv": 42}
  ]
}"#;

#[test]
fn full_payload_decodes() {
    let s: Snapshot = serde_json::from_str(PAYLOAD).expect("decode snapshot");
    assert_eq!(s.host.hostname, "delphi");
    assert_eq!(s.host.uptime, 354123);
    assert_eq!(s.memory.swap_total, 8589934592);
    assert_eq!(s.memory.swap_free, 8053063680);
    assert_eq!(s.cpu.len(), 4);
    assert_eq!(s.cpu[0].cores, 8);
    assert_eq!(s.disk[1].fs_type, "xfs");
    assert!((s.disk[1].used_percent - 90.0).abs() < f64::EPSILON);
    assert_eq!(s.network[0].interface_name, "eth0");
    assert_eq!(s.network[0].total_bytes_recv, 123456789);
    assert_eq!(s.network[0].total_bytes_sent, 987654321);
}

#[test]
fn cpu_avg_is_mean_of_cores() {
    let s: Snapshot = serde_json::from_str(PAYLOAD).unwrap();
    let expected = (23.4 + 11.0 + 96.2 + 4.1) / 4.0;
    assert!((s.cpu_avg() - expected).abs() < 1e-9);
}

#[test]
fn missing_field_is_an_error() {
    // "memory" absent: must fail as a whole, never a partial snapshot
    let bad = r#"{"host": {"hostname": "x", "os": "linux", "uptime": 1},
                  "cpu": [], "disk": [], "network": []}"#;
    assert!(serde_json::from_str::<Snapshot>(bad).is_err());
}

#[test]
fn wrong_shape_is_an_error() {
    assert!(serde_json::from_str::<Snapshot>("[1,2,3]").is_err());
    assert!(serde_json::from_str::<Snapshot>("\"nope\"").is_err());
}
