//! Small utilities to manage bounded history buffers and rate derivation for
//! the charts.

use std::collections::VecDeque;
use std::time::Instant;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if dq.len() == cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

/// Turns cumulative interface byte counters into KB/s samples by diffing
/// against the previous reading. The first sample yields zero.
pub struct NetRates {
    last: Option<(u64, u64, Instant)>,
}

impl NetRates {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn sample(&mut self, rx_total: u64, tx_total: u64) -> (u64, u64) {
        self.sample_at(rx_total, tx_total, Instant::now())
    }

    pub fn sample_at(&mut self, rx_total: u64, tx_total: u64, now: Instant) -> (u64, u64) {
        let rates = if let Some((prx, ptx, pts)) = self.last {
            let dt = now.duration_since(pts).as_secs_f64().max(1e-6);
            let rx = ((rx_total.saturating_sub(prx)) as f64 / dt / 1024.0).round() as u64;
            let tx = ((tx_total.saturating_sub(ptx)) as f64 / dt / 1024.0).round() as u64;
            (rx, tx)
        } else {
            (0, 0)
        };
        self.last = Some((rx_total, tx_total, now));
        rates
    }
}

impl Default for NetRates {
    fn default() -> Self {
        Self::new()
    }
}
