//! History storage and derived statistics.
//!
//! ## Submodules
//!
//! - [`history`]: the bounded per-monitor check-result buffer
//! - [`analytics`]: pure derivation of availability/performance snapshots
//! - [`stats`]: the process-wide uptime/downtime accumulator
//! - [`units`]: the single seconds/milliseconds conversion boundary
//!
//! ## Data flow
//!
//! ```text
//! StatusEntry (from backend events)
//!        │
//!        ▼
//! HistoryBuffer::append() / replace_all()
//!        │
//!        ├──▶ compute_analytics() -> AnalyticsSnapshot   (pull, per query)
//!        │
//!        └──▶ GlobalStats::recompute()                   (on collection change)
//! ```

pub mod analytics;
pub mod history;
pub mod stats;
pub mod units;

pub use analytics::{compute_analytics, AnalyticsOptions, AnalyticsSnapshot, DowntimePeriod};
pub use history::{HistoryBuffer, DEFAULT_HISTORY_LIMIT};
pub use stats::GlobalStats;
