//! Interface to the monitoring backend.
//!
//! The backend performs the actual probing, scheduling and persistence; this
//! crate only consumes it. [`MonitoringBackend`] covers the mutation and fetch
//! surface, and [`channel`] delivers asynchronous status-update push events.

mod channel;

pub use channel::{ChannelSource, StatusUpdate, UpdateSource};

use anyhow::Result;
use async_trait::async_trait;

use crate::model::Site;

/// Site-level fields changed by an `update_site` call.
///
/// Outer `None` leaves a field untouched. For `name`, the inner `None` is the
/// explicit "clear custom name" path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteChanges {
    pub name: Option<Option<String>>,
}

impl SiteChanges {
    /// Set the site's display name.
    pub fn rename(name: &str) -> Self {
        Self {
            name: Some(Some(name.to_string())),
        }
    }

    /// Clear the site's custom display name.
    pub fn clear_name() -> Self {
        Self { name: Some(None) }
    }
}

/// The mutation and fetch operations exposed by the monitoring backend.
///
/// All calls may fail (transport errors, unknown ids); failures propagate as
/// `anyhow::Error` and are turned into user-visible messages by the session
/// layer, never re-thrown at callers.
#[async_trait]
pub trait MonitoringBackend: Send + Sync {
    /// Bulk fetch of the full site collection (initial load and resync).
    async fn get_sites(&self) -> Result<Vec<Site>>;

    /// Apply site-level edits (display name and similar).
    async fn update_site(&self, site_id: &str, changes: SiteChanges) -> Result<()>;

    /// Remove a site; the backend cascades to its monitors and history.
    async fn delete_site(&self, site_id: &str) -> Result<()>;

    /// Trigger an immediate check for one monitor.
    async fn check_site_now(&self, site_id: &str, monitor_id: &str) -> Result<()>;

    /// Begin scheduling checks for one monitor.
    async fn start_monitoring(&self, site_id: &str, monitor_id: &str) -> Result<()>;

    /// Stop scheduling checks for one monitor.
    async fn stop_monitoring(&self, site_id: &str, monitor_id: &str) -> Result<()>;

    /// Change the interval between checks, in milliseconds.
    async fn update_check_interval(
        &self,
        site_id: &str,
        monitor_id: &str,
        interval_ms: u64,
    ) -> Result<()>;

    /// Change the per-check timeout, in milliseconds.
    async fn update_timeout(&self, site_id: &str, monitor_id: &str, timeout_ms: u64) -> Result<()>;

    /// Change the retry count applied before reporting a check as down.
    async fn update_retry_attempts(
        &self,
        site_id: &str,
        monitor_id: &str,
        attempts: u32,
    ) -> Result<()>;
}
