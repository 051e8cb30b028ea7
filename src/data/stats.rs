//! Process-wide uptime/downtime accumulator.

use crate::model::{MonitorStatus, Site};

/// Response-time-weighted uptime/downtime totals across all sites.
///
/// For every history entry of every monitor: an `up` entry adds its response
/// time to `total_uptime`, a `down` entry adds it to `total_downtime`, any
/// other status is ignored, and a missing response time counts as 0. These are
/// deliberately not wall-clock durations — they are a cheap global health
/// gauge, while per-monitor MTTR lives in the analytics snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlobalStats {
    total_uptime: f64,
    total_downtime: f64,
}

impl GlobalStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the totals from the given site collection.
    ///
    /// `None` is a safe no-op that leaves the accumulators unchanged; `Some`
    /// resets them and sums over every entry. Summation is order-insensitive,
    /// so shuffling the sites does not change the result.
    pub fn recompute(&mut self, sites: Option<&[Site]>) {
        let Some(sites) = sites else {
            return;
        };

        self.reset();
        for site in sites {
            for monitor in &site.monitors {
                for entry in &monitor.history {
                    let value = entry.response_time.unwrap_or(0.0);
                    match entry.status {
                        MonitorStatus::Up => self.total_uptime += value,
                        MonitorStatus::Down => self.total_downtime += value,
                        _ => {}
                    }
                }
            }
        }
    }

    pub fn total_uptime(&self) -> f64 {
        self.total_uptime
    }

    pub fn total_downtime(&self) -> f64 {
        self.total_downtime
    }

    /// Overwrite the uptime accumulator (UI layer and tests).
    pub fn set_total_uptime(&mut self, value: f64) {
        self.total_uptime = value;
    }

    /// Overwrite the downtime accumulator (UI layer and tests).
    pub fn set_total_downtime(&mut self, value: f64) {
        self.total_downtime = value;
    }

    /// Zero both accumulators.
    pub fn reset(&mut self) {
        self.total_uptime = 0.0;
        self.total_downtime = 0.0;
    }
}
