//! # sitewatch
//!
//! Monitoring history and analytics core for tracking the availability of
//! user-registered network endpoints ("sites"), each composed of one or more
//! monitors (HTTP, TCP port, ping, DNS).
//!
//! This crate owns the hard parts of the client side of such a system: the
//! bounded per-monitor history, the derived availability analytics, the
//! process-wide uptime/downtime totals, and the draft/canonical reconciliation
//! used while editing monitor settings against a backend that is the source of
//! truth and pushes asynchronous status updates. The probing engine,
//! persistence and rendering all live behind interfaces.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          Application                           │
//! │  ┌─────────┐     ┌───────────┐     ┌───────────────────────┐  │
//! │  │  store  │────▶│   data    │────▶│  analytics snapshots  │  │
//! │  │ (sites) │     │ (history) │     │  + global stats       │  │
//! │  └────┬────┘     └───────────┘     └───────────────────────┘  │
//! │       │                                                        │
//! │       ▼                                                        │
//! │  ┌─────────┐      ┌─────────────┐                              │
//! │  │ backend │◀────▶│   session   │  drafts, dirty flags, saves  │
//! │  │ (trait) │ push │ (per detail │                              │
//! │  └─────────┘      │    view)    │                              │
//! │                   └─────────────┘                              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`model`]**: sites, monitors and check-result entries (wire types)
//! - **[`data`]**: the bounded [`HistoryBuffer`], pure [`compute_analytics`],
//!   the [`GlobalStats`] accumulator, and the units conversion boundary
//! - **[`backend`]**: the [`MonitoringBackend`] trait and the status-update
//!   push channel ([`UpdateSource`] / [`ChannelSource`])
//! - **[`store`]**: the canonical site collection ([`SiteStore`])
//! - **[`session`]**: the draft reconciliation controller ([`DetailSession`])
//!
//! ## Computing analytics
//!
//! ```
//! use sitewatch::{compute_analytics, AnalyticsOptions, HistoryBuffer};
//! use sitewatch::{MonitorStatus, StatusEntry};
//!
//! let mut history = HistoryBuffer::new(100);
//! history.append(StatusEntry {
//!     timestamp: 1_000,
//!     status: MonitorStatus::Up,
//!     response_time: Some(120.0),
//!     details: None,
//! });
//!
//! let snapshot = compute_analytics(&history, &AnalyticsOptions::default());
//! assert_eq!(snapshot.uptime_percent, 100.0);
//! ```
//!
//! ## Receiving status updates
//!
//! ```
//! use sitewatch::{ChannelSource, SiteStore};
//!
//! // The sender goes to whatever bridges the backend transport; dropping the
//! // source unsubscribes.
//! let (tx, mut source) = ChannelSource::create("backend ipc");
//! let mut store = SiteStore::default();
//! store.drain_updates(&mut source);
//! ```
//!
//! ## Saving draft edits
//!
//! ```
//! use std::sync::Arc;
//! use sitewatch::{DetailSession, Monitor, MonitorKind, MonitorStatus, Site};
//! # use anyhow::Result;
//! # use async_trait::async_trait;
//! # use sitewatch::{MonitoringBackend, SiteChanges};
//! # struct NullBackend;
//! # #[async_trait]
//! # impl MonitoringBackend for NullBackend {
//! #     async fn get_sites(&self) -> Result<Vec<Site>> { Ok(Vec::new()) }
//! #     async fn update_site(&self, _: &str, _: SiteChanges) -> Result<()> { Ok(()) }
//! #     async fn delete_site(&self, _: &str) -> Result<()> { Ok(()) }
//! #     async fn check_site_now(&self, _: &str, _: &str) -> Result<()> { Ok(()) }
//! #     async fn start_monitoring(&self, _: &str, _: &str) -> Result<()> { Ok(()) }
//! #     async fn stop_monitoring(&self, _: &str, _: &str) -> Result<()> { Ok(()) }
//! #     async fn update_check_interval(&self, _: &str, _: &str, _: u64) -> Result<()> { Ok(()) }
//! #     async fn update_timeout(&self, _: &str, _: &str, _: u64) -> Result<()> { Ok(()) }
//! #     async fn update_retry_attempts(&self, _: &str, _: &str, _: u32) -> Result<()> { Ok(()) }
//! # }
//! let monitor = Monitor {
//!     id: "m1".to_string(),
//!     kind: MonitorKind::Http { url: "https://example.com".to_string() },
//!     status: MonitorStatus::Up,
//!     monitoring: true,
//!     check_interval_ms: 60_000,
//!     timeout_ms: 10_000,
//!     retry_attempts: 3,
//!     history: Default::default(),
//!     response_time: None,
//! };
//! let site = Site {
//!     identifier: "s1".to_string(),
//!     name: None,
//!     monitors: vec![monitor.clone()],
//! };
//!
//! tokio_test::block_on(async {
//!     let mut session = DetailSession::new(Arc::new(NullBackend), &site, &monitor);
//!     // The timeout is edited in seconds; the save converts to milliseconds
//!     session.set_timeout_seconds(20.0);
//!     assert!(session.flags().timeout);
//!     session.save_timeout().await;
//!     assert!(!session.flags().timeout);
//! });
//! ```

pub mod backend;
pub mod data;
pub mod model;
pub mod session;
pub mod settings;
pub mod store;

// Re-export main types for convenience
pub use backend::{ChannelSource, MonitoringBackend, SiteChanges, StatusUpdate, UpdateSource};
pub use data::{
    compute_analytics, AnalyticsOptions, AnalyticsSnapshot, DowntimePeriod, GlobalStats,
    HistoryBuffer,
};
pub use model::{Monitor, MonitorKind, MonitorStatus, Site, StatusEntry};
pub use session::{DetailSession, DirtyFlags, SessionPhase};
pub use settings::Settings;
pub use store::SiteStore;
