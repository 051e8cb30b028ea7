//! Derived availability and performance analytics.
//!
//! [`compute_analytics`] is a pure function over a monitor's history. It never
//! fails: an empty or missing history yields a zeroed snapshot, and malformed
//! entries simply contribute nothing to the aggregates they are excluded from.
//!
//! Conventions (locked by tests):
//! - Uptime with no up/down entries is `0.0`, not NaN.
//! - Percentiles use the nearest-rank method (`ceil(p/100 · n)`, 1-based) on
//!   the sorted measured response times.
//! - Uptime is rounded to two decimal places.

use serde::Serialize;

use super::history::HistoryBuffer;
use super::units::{now_ms, round_percent};
use crate::model::{MonitorStatus, StatusEntry};

/// Options controlling which slice of history a snapshot covers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsOptions {
    /// Inclusive `(from, to)` timestamp window in epoch milliseconds.
    /// `None` covers the full history.
    pub range: Option<(i64, i64)>,

    /// Anchor for "ongoing" downtime durations. Defaults to the wall clock;
    /// tests pin it for determinism.
    pub now: Option<i64>,
}

impl AnalyticsOptions {
    /// Restrict to entries with `from <= timestamp <= to`.
    pub fn with_range(from: i64, to: i64) -> Self {
        Self {
            range: Some((from, to)),
            now: None,
        }
    }
}

/// A maximal contiguous run of `down` entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DowntimePeriod {
    /// Timestamp of the first `down` entry in the run.
    pub start: i64,

    /// Timestamp of the first subsequent `up` entry, or `None` while the
    /// outage is still ongoing at the end of the examined slice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,

    /// `end - start`, or `now - start` for an ongoing period. Never negative.
    pub duration_ms: i64,
}

impl DowntimePeriod {
    /// True if the period had not recovered by the end of the slice.
    pub fn is_ongoing(&self) -> bool {
        self.end.is_none()
    }
}

/// Point-in-time statistics derived from a monitor's history.
///
/// Recomputed on demand; never cached beyond a single query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyticsSnapshot {
    /// Number of entries in the examined slice.
    pub total_checks: usize,
    /// Entries with status `up`.
    pub up_count: usize,
    /// Entries with status `down`. Pending/paused entries count toward neither.
    pub down_count: usize,
    /// `up / (up + down) · 100`, two decimal places; `0.0` when undefined.
    pub uptime_percent: f64,

    /// Mean of the measured response times, if any were measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_response_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fastest_response: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slowest_response: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p95: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p99: Option<f64>,

    /// Contiguous down-spans, oldest first.
    pub downtime_periods: Vec<DowntimePeriod>,
    /// Sum of all period durations.
    pub total_downtime_ms: i64,
    /// Mean time to recovery; `0.0` when there were no incidents.
    pub mttr_ms: f64,
    /// `downtime_periods.len()`.
    pub incident_count: usize,

    /// The time-range-filtered slice the numbers were computed from.
    pub filtered: Vec<StatusEntry>,
}

/// Compute a snapshot of derived statistics for one monitor's history.
pub fn compute_analytics(history: &HistoryBuffer, options: &AnalyticsOptions) -> AnalyticsSnapshot {
    let filtered: Vec<StatusEntry> = history
        .iter()
        .filter(|e| match options.range {
            Some((from, to)) => e.timestamp >= from && e.timestamp <= to,
            None => true,
        })
        .cloned()
        .collect();

    let up_count = filtered.iter().filter(|e| e.status == MonitorStatus::Up).count();
    let down_count = filtered.iter().filter(|e| e.status == MonitorStatus::Down).count();

    let counted = up_count + down_count;
    let uptime_percent = if counted == 0 {
        0.0
    } else {
        round_percent(up_count as f64 / counted as f64 * 100.0)
    };

    let mut measured: Vec<f64> =
        filtered.iter().filter_map(StatusEntry::measured_response_time).collect();
    measured.sort_by(|a, b| a.total_cmp(b));

    let avg_response_time = if measured.is_empty() {
        None
    } else {
        Some(measured.iter().sum::<f64>() / measured.len() as f64)
    };
    let fastest_response = measured.first().copied();
    let slowest_response = measured.last().copied();

    let downtime_periods = detect_downtime_periods(&filtered, options.now.unwrap_or_else(now_ms));
    let total_downtime_ms: i64 = downtime_periods.iter().map(|p| p.duration_ms).sum();
    let incident_count = downtime_periods.len();
    let mttr_ms = if incident_count == 0 {
        0.0
    } else {
        total_downtime_ms as f64 / incident_count as f64
    };

    AnalyticsSnapshot {
        total_checks: filtered.len(),
        up_count,
        down_count,
        uptime_percent,
        avg_response_time,
        fastest_response,
        slowest_response,
        p50: percentile(&measured, 50.0),
        p95: percentile(&measured, 95.0),
        p99: percentile(&measured, 99.0),
        downtime_periods,
        total_downtime_ms,
        mttr_ms,
        incident_count,
        filtered,
    }
}

/// Nearest-rank percentile over sorted values: the value at 1-based rank
/// `ceil(p/100 · n)`.
fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    // Multiply before dividing so exact ranks stay exact (95·100/100 == 95.0)
    let rank = (p * sorted.len() as f64 / 100.0).ceil() as usize;
    let index = rank.clamp(1, sorted.len()) - 1;
    Some(sorted[index])
}

/// Scan the time-ordered slice for maximal contiguous down-spans.
///
/// A period opens at the first `down` entry after a non-down state (or at the
/// start) and closes at the first subsequent `up` entry. Pending/paused entries
/// neither open nor close a period. A period still open at the end of the
/// slice is ongoing and its duration anchors at `now`.
fn detect_downtime_periods(entries: &[StatusEntry], now: i64) -> Vec<DowntimePeriod> {
    let mut periods = Vec::new();
    let mut open: Option<i64> = None;

    for entry in entries {
        match entry.status {
            MonitorStatus::Down => {
                if open.is_none() {
                    open = Some(entry.timestamp);
                }
            }
            MonitorStatus::Up => {
                if let Some(start) = open.take() {
                    periods.push(DowntimePeriod {
                        start,
                        end: Some(entry.timestamp),
                        duration_ms: (entry.timestamp - start).max(0),
                    });
                }
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        periods.push(DowntimePeriod {
            start,
            end: None,
            duration_ms: (now - start).max(0),
        });
    }

    periods
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MonitorStatus::{Down, Paused, Pending, Up};

    fn entry(timestamp: i64, status: MonitorStatus, response_time: Option<f64>) -> StatusEntry {
        StatusEntry {
            timestamp,
            status,
            response_time,
            details: None,
        }
    }

    fn history(entries: Vec<StatusEntry>) -> HistoryBuffer {
        entries.into_iter().collect()
    }

    #[test]
    fn test_empty_history_yields_zeroed_snapshot() {
        let snapshot = compute_analytics(&HistoryBuffer::default(), &AnalyticsOptions::default());
        assert_eq!(snapshot.total_checks, 0);
        assert_eq!(snapshot.uptime_percent, 0.0);
        assert_eq!(snapshot.avg_response_time, None);
        assert_eq!(snapshot.p99, None);
        assert!(snapshot.downtime_periods.is_empty());
        assert_eq!(snapshot.mttr_ms, 0.0);
    }

    #[test]
    fn test_counts_and_uptime_worked_example() {
        // The canonical 3-entry example: uptime 66.67%
        let history = history(vec![
            entry(1, Up, Some(100.0)),
            entry(2, Down, Some(50.0)),
            entry(3, Up, Some(200.0)),
        ]);
        let snapshot = compute_analytics(&history, &AnalyticsOptions::default());

        assert_eq!(snapshot.total_checks, 3);
        assert_eq!(snapshot.up_count, 2);
        assert_eq!(snapshot.down_count, 1);
        assert_eq!(snapshot.uptime_percent, 66.67);
        assert_eq!(snapshot.up_count + snapshot.down_count, snapshot.total_checks);
    }

    #[test]
    fn test_pending_and_paused_count_toward_neither() {
        let history = history(vec![
            entry(1, Up, None),
            entry(2, Pending, None),
            entry(3, Paused, None),
        ]);
        let snapshot = compute_analytics(&history, &AnalyticsOptions::default());
        assert_eq!(snapshot.total_checks, 3);
        assert_eq!(snapshot.up_count, 1);
        assert_eq!(snapshot.down_count, 0);
        assert_eq!(snapshot.uptime_percent, 100.0);
    }

    #[test]
    fn test_response_time_aggregates_exclude_unmeasured() {
        let history = history(vec![
            entry(1, Up, Some(100.0)),
            entry(2, Up, Some(0.0)),  // no measurement, not a 0ms response
            entry(3, Up, None),
            entry(4, Up, Some(300.0)),
        ]);
        let snapshot = compute_analytics(&history, &AnalyticsOptions::default());
        assert_eq!(snapshot.avg_response_time, Some(200.0));
        assert_eq!(snapshot.fastest_response, Some(100.0));
        assert_eq!(snapshot.slowest_response, Some(300.0));
    }

    #[test]
    fn test_nearest_rank_percentiles() {
        // 1..=100, so pXX is exactly XX under nearest-rank
        let entries: Vec<StatusEntry> =
            (1..=100).map(|i| entry(i, Up, Some(i as f64))).collect();
        let snapshot = compute_analytics(&history(entries), &AnalyticsOptions::default());
        assert_eq!(snapshot.p50, Some(50.0));
        assert_eq!(snapshot.p95, Some(95.0));
        assert_eq!(snapshot.p99, Some(99.0));
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[42.0], 50.0), Some(42.0));
        assert_eq!(percentile(&[42.0], 99.0), Some(42.0));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_downtime_period_detection() {
        let history = history(vec![
            entry(100, Up, Some(10.0)),
            entry(200, Down, None),
            entry(300, Down, None),
            entry(400, Up, Some(12.0)),
            entry(500, Down, None),
        ]);
        let options = AnalyticsOptions {
            range: None,
            now: Some(800),
        };
        let snapshot = compute_analytics(&history, &options);

        assert_eq!(snapshot.incident_count, 2);
        assert_eq!(snapshot.incident_count, snapshot.downtime_periods.len());

        let closed = &snapshot.downtime_periods[0];
        assert_eq!(closed.start, 200);
        assert_eq!(closed.end, Some(400));
        assert_eq!(closed.duration_ms, 200);
        assert!(!closed.is_ongoing());

        let ongoing = &snapshot.downtime_periods[1];
        assert_eq!(ongoing.start, 500);
        assert!(ongoing.is_ongoing());
        assert_eq!(ongoing.duration_ms, 300); // now(800) - start(500)

        assert_eq!(snapshot.total_downtime_ms, 500);
        assert_eq!(snapshot.mttr_ms, 250.0);
    }

    #[test]
    fn test_pending_does_not_close_a_period() {
        let history = history(vec![
            entry(100, Down, None),
            entry(200, Pending, None),
            entry(300, Down, None),
            entry(400, Up, Some(5.0)),
        ]);
        let snapshot = compute_analytics(&history, &AnalyticsOptions::default());
        assert_eq!(snapshot.incident_count, 1);
        assert_eq!(snapshot.downtime_periods[0].start, 100);
        assert_eq!(snapshot.downtime_periods[0].end, Some(400));
    }

    #[test]
    fn test_downtime_at_sequence_start() {
        let history = history(vec![entry(50, Down, None), entry(150, Up, Some(8.0))]);
        let snapshot = compute_analytics(&history, &AnalyticsOptions::default());
        assert_eq!(snapshot.incident_count, 1);
        assert_eq!(snapshot.downtime_periods[0].start, 50);
        assert_eq!(snapshot.downtime_periods[0].duration_ms, 100);
    }

    #[test]
    fn test_time_range_filtering() {
        let history = history(vec![
            entry(100, Up, Some(10.0)),
            entry(200, Down, None),
            entry(300, Up, Some(20.0)),
            entry(400, Down, None),
        ]);
        let snapshot = compute_analytics(&history, &AnalyticsOptions::with_range(200, 300));

        assert_eq!(snapshot.total_checks, 2);
        assert_eq!(snapshot.up_count, 1);
        assert_eq!(snapshot.down_count, 1);
        assert_eq!(snapshot.uptime_percent, 50.0);
        assert_eq!(snapshot.filtered.len(), 2);
        assert_eq!(snapshot.filtered[0].timestamp, 200);
    }

    #[test]
    fn test_total_downtime_equals_sum_of_durations() {
        let history = history(vec![
            entry(0, Down, None),
            entry(10, Up, None),
            entry(20, Down, None),
            entry(35, Up, None),
        ]);
        let snapshot = compute_analytics(&history, &AnalyticsOptions::default());
        let sum: i64 = snapshot.downtime_periods.iter().map(|p| p.duration_ms).sum();
        assert_eq!(snapshot.total_downtime_ms, sum);
        assert_eq!(snapshot.total_downtime_ms, 25);
    }
}
