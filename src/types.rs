//! Types that mirror the monitoring server's JSON schema.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Host {
    pub hostname: String,
    pub os: String,
    // seconds
    pub uptime: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub swap_total: u64,
    pub swap_used: u64,
    pub swap_free: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Cpu {
    // percentage 0..100
    pub usage: f64,
    pub model: String,
    pub cores: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Disk {
    pub mountpoint: String,
    #[serde(rename = "type")]
    pub fs_type: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    #[serde(rename = "usedPercent")]
    pub used_percent: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    // cumulative totals; client diffs to compute rates
    pub total_bytes_sent: u64,
    pub total_bytes_recv: u64,
    pub interface_name: String,
}

/// One complete telemetry reading. Each stream message replaces the previous
/// snapshot wholesale; nothing is merged field by field.
#[derive(Debug, Deserialize, Clone)]
pub struct Snapshot {
    pub host: Host,
    pub memory: Memory,
    pub cpu: Vec<Cpu>,
    pub disk: Vec<Disk>,
    pub network: Vec<Network>,
}

impl Snapshot {
    /// Average usage across all reported CPUs (0..100).
    pub fn cpu_avg(&self) -> f64 {
        if self.cpu.is_empty() {
            return 0.0;
        }
        self.cpu.iter().map(|c| c.usage).sum::<f64>() / self.cpu.len() as f64
    }
}
