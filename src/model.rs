//! Core data model for sites, monitors and check results.
//!
//! These types match the serialization format used by the monitoring backend.
//! The backend is the source of truth: sites and monitors arrive fully formed
//! (via bulk fetch or push events) and are replaced wholesale, never merged
//! field by field.

use serde::{Deserialize, Serialize};

use crate::data::history::HistoryBuffer;

/// The outcome of the most recent check for a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    Up,
    Down,
    /// A check is scheduled but no result has been recorded yet.
    Pending,
    /// Monitoring is suspended; results recorded while paused carry no signal.
    Paused,
    /// No information at all (e.g. a monitor that has never been checked).
    Unknown,
}

impl MonitorStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            MonitorStatus::Up => "UP",
            MonitorStatus::Down => "DOWN",
            MonitorStatus::Pending => "PENDING",
            MonitorStatus::Paused => "PAUSED",
            MonitorStatus::Unknown => "?",
        }
    }
}

/// One recorded check result.
///
/// Entries are append-only: they are created once and never mutated in place.
/// Malformed data (negative timestamps, zeroed response times) is stored as-is;
/// validation belongs to the layer that produced the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Milliseconds since the Unix epoch. Non-decreasing within a monitor.
    pub timestamp: i64,

    /// Result of the check.
    pub status: MonitorStatus,

    /// Measured response time in milliseconds.
    ///
    /// `None` or `0` means "no measurement" and is excluded from response-time
    /// aggregates (it is not treated as a 0ms response).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,

    /// Free-form detail from the checker (HTTP status line, resolver error, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl StatusEntry {
    /// The response time, if one was actually measured.
    ///
    /// A missing or non-positive value is "no measurement", not a 0ms response.
    pub fn measured_response_time(&self) -> Option<f64> {
        self.response_time.filter(|v| *v > 0.0)
    }
}

/// Type-specific connection parameters for a monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MonitorKind {
    Http { url: String },
    Port { host: String, port: u16 },
    Ping { host: String },
    Dns { host: String, record_type: String },
}

impl MonitorKind {
    /// Returns the protocol label for display.
    pub fn label(&self) -> &'static str {
        match self {
            MonitorKind::Http { .. } => "http",
            MonitorKind::Port { .. } => "port",
            MonitorKind::Ping { .. } => "ping",
            MonitorKind::Dns { .. } => "dns",
        }
    }
}

/// One checked endpoint belonging to a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monitor {
    /// Unique within the owning site.
    pub id: String,

    /// Protocol and connection parameters.
    #[serde(flatten)]
    pub kind: MonitorKind,

    /// Current status. Once the history is non-empty this agrees with the
    /// newest history entry (the backend maintains that invariant; this side
    /// only ever replaces monitors wholesale).
    pub status: MonitorStatus,

    /// Whether checks are currently scheduled for this monitor.
    pub monitoring: bool,

    /// Interval between checks, in milliseconds.
    pub check_interval_ms: u64,

    /// Per-check timeout, in milliseconds.
    pub timeout_ms: u64,

    /// Number of retries before a check is reported as down.
    pub retry_attempts: u32,

    /// Bounded, time-ordered sequence of recorded check results.
    #[serde(default)]
    pub history: HistoryBuffer,

    /// Latest measured response time in milliseconds, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
}

impl Monitor {
    /// The newest recorded check result, if any.
    pub fn latest_entry(&self) -> Option<&StatusEntry> {
        self.history.latest()
    }
}

/// A user-registered endpoint group: one site, one or more monitors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// Unique, immutable identifier assigned at registration.
    pub identifier: String,

    /// Optional user-chosen display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The site's monitors, in backend order.
    pub monitors: Vec<Monitor>,
}

impl Site {
    /// Derived aggregate flag: true if any monitor is actively monitoring.
    pub fn monitoring(&self) -> bool {
        self.monitors.iter().any(|m| m.monitoring)
    }

    /// Name to show in lists: the custom name, or the identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.identifier)
    }

    /// Look up a monitor by id.
    pub fn monitor(&self, monitor_id: &str) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.id == monitor_id)
    }

    /// Look up a monitor by id, mutably.
    pub fn monitor_mut(&mut self, monitor_id: &str) -> Option<&mut Monitor> {
        self.monitors.iter_mut().find(|m| m.id == monitor_id)
    }
}
