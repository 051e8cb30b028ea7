//! Canonical site collection.
//!
//! The store mirrors the backend's site collection, applies pushed status
//! updates, appends incoming check results, and keeps the global stats in step
//! with every change. All mutation is synchronous with the calling event
//! handler; the only await points are the explicit backend calls.

use anyhow::Result;
use tracing::debug;

use crate::backend::{MonitoringBackend, StatusUpdate, UpdateSource};
use crate::data::history::DEFAULT_HISTORY_LIMIT;
use crate::data::stats::GlobalStats;
use crate::model::{Monitor, Site, StatusEntry};

/// Holds the canonical sites and the derived global totals.
#[derive(Debug)]
pub struct SiteStore {
    sites: Vec<Site>,
    history_limit: usize,
    stats: GlobalStats,
}

impl Default for SiteStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl SiteStore {
    /// Create an empty store keeping at most `history_limit` entries per monitor.
    pub fn new(history_limit: usize) -> Self {
        Self {
            sites: Vec::new(),
            history_limit,
            stats: GlobalStats::new(),
        }
    }

    /// Replace the whole collection (initial load / resync), clamp histories,
    /// and recompute the global totals.
    pub fn replace_sites(&mut self, sites: Vec<Site>) {
        self.sites = sites;
        self.clamp_histories();
        self.recompute_stats();
    }

    /// Fetch the full collection from the backend and replace the local copy.
    pub async fn resync(&mut self, backend: &dyn MonitoringBackend) -> Result<()> {
        let sites = backend.get_sites().await?;
        debug!(count = sites.len(), "resynced site collection");
        self.replace_sites(sites);
        Ok(())
    }

    /// Apply one pushed status update: the matching site is replaced
    /// atomically (no partial merge). An unknown identifier appends — a site
    /// registered on the backend mid-session.
    pub fn apply_update(&mut self, update: StatusUpdate) {
        debug!(site = %update.site_identifier, "applying status update");
        match self.sites.iter_mut().find(|s| s.identifier == update.site_identifier) {
            Some(existing) => *existing = update.site,
            None => self.sites.push(update.site),
        }
        self.clamp_histories();
        self.recompute_stats();
    }

    /// Drain every pending update from `source`, applying each in arrival
    /// order. Returns the number applied.
    pub fn drain_updates(&mut self, source: &mut dyn UpdateSource) -> usize {
        let mut applied = 0;
        while let Some(update) = source.poll() {
            self.apply_update(update);
            applied += 1;
        }
        applied
    }

    /// Append one check result to a monitor's history and keep the monitor's
    /// headline fields consistent with its newest entry. Unknown site/monitor
    /// ids are silent no-ops.
    pub fn append_entry(&mut self, site_id: &str, monitor_id: &str, entry: StatusEntry) {
        let Some(monitor) =
            self.sites.iter_mut().find(|s| s.identifier == site_id).and_then(|s| s.monitor_mut(monitor_id))
        else {
            return;
        };

        monitor.status = entry.status;
        monitor.response_time = entry.measured_response_time().or(monitor.response_time);
        monitor.history.append(entry);
        self.recompute_stats();
    }

    /// Remove a site, cascading to its monitors and their histories.
    /// Returns false if the identifier was unknown.
    pub fn remove_site(&mut self, site_id: &str) -> bool {
        let before = self.sites.len();
        self.sites.retain(|s| s.identifier != site_id);
        let removed = self.sites.len() != before;
        if removed {
            debug!(site = %site_id, "removed site");
            self.recompute_stats();
        }
        removed
    }

    /// Change the per-monitor history limit, re-clamping every buffer.
    pub fn set_history_limit(&mut self, limit: usize) {
        self.history_limit = limit;
        self.clamp_histories();
        self.recompute_stats();
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, site_id: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.identifier == site_id)
    }

    pub fn monitor(&self, site_id: &str, monitor_id: &str) -> Option<&Monitor> {
        self.site(site_id).and_then(|s| s.monitor(monitor_id))
    }

    pub fn stats(&self) -> &GlobalStats {
        &self.stats
    }

    /// Direct access to the accumulator (set/reset surface).
    pub fn stats_mut(&mut self) -> &mut GlobalStats {
        &mut self.stats
    }

    fn clamp_histories(&mut self) {
        for site in &mut self.sites {
            for monitor in &mut site.monitors {
                monitor.history.set_limit(self.history_limit);
            }
        }
    }

    fn recompute_stats(&mut self) {
        self.stats.recompute(Some(&self.sites));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SiteChanges;
    use crate::model::{MonitorKind, MonitorStatus};
    use async_trait::async_trait;

    fn monitor(id: &str) -> Monitor {
        Monitor {
            id: id.to_string(),
            kind: MonitorKind::Ping {
                host: "example.com".to_string(),
            },
            status: MonitorStatus::Pending,
            monitoring: true,
            check_interval_ms: 60_000,
            timeout_ms: 10_000,
            retry_attempts: 1,
            history: Default::default(),
            response_time: None,
        }
    }

    fn site(identifier: &str, monitors: Vec<Monitor>) -> Site {
        Site {
            identifier: identifier.to_string(),
            name: None,
            monitors,
        }
    }

    fn entry(timestamp: i64, status: MonitorStatus, response_time: Option<f64>) -> StatusEntry {
        StatusEntry {
            timestamp,
            status,
            response_time,
            details: None,
        }
    }

    #[test]
    fn test_append_entry_updates_monitor_and_stats() {
        let mut store = SiteStore::default();
        store.replace_sites(vec![site("s1", vec![monitor("m1")])]);

        store.append_entry("s1", "m1", entry(100, MonitorStatus::Up, Some(120.0)));
        store.append_entry("s1", "m1", entry(200, MonitorStatus::Down, Some(30.0)));

        let m = store.monitor("s1", "m1").unwrap();
        assert_eq!(m.status, MonitorStatus::Down);
        assert_eq!(m.history.len(), 2);
        assert_eq!(store.stats().total_uptime(), 120.0);
        assert_eq!(store.stats().total_downtime(), 30.0);
    }

    #[test]
    fn test_append_entry_unknown_ids_is_a_no_op() {
        let mut store = SiteStore::default();
        store.replace_sites(vec![site("s1", vec![monitor("m1")])]);

        store.append_entry("missing", "m1", entry(1, MonitorStatus::Up, Some(5.0)));
        store.append_entry("s1", "missing", entry(1, MonitorStatus::Up, Some(5.0)));

        assert!(store.monitor("s1", "m1").unwrap().history.is_empty());
        assert_eq!(store.stats().total_uptime(), 0.0);
    }

    #[test]
    fn test_apply_update_replaces_site_wholesale() {
        let mut store = SiteStore::default();
        store.replace_sites(vec![site("s1", vec![monitor("m1"), monitor("m2")])]);

        let mut replacement = site("s1", vec![monitor("m1")]);
        replacement.name = Some("Renamed".to_string());
        replacement.monitors[0].status = MonitorStatus::Up;
        replacement.monitors[0]
            .history
            .append(entry(1, MonitorStatus::Up, Some(80.0)));

        store.apply_update(StatusUpdate {
            site_identifier: "s1".to_string(),
            site: replacement,
        });

        let s = store.site("s1").unwrap();
        assert_eq!(s.name.as_deref(), Some("Renamed"));
        // m2 is gone: the push replaced the whole site, no partial merge
        assert_eq!(s.monitors.len(), 1);
        assert_eq!(store.stats().total_uptime(), 80.0);
    }

    #[test]
    fn test_apply_update_appends_unknown_site() {
        let mut store = SiteStore::default();
        store.apply_update(StatusUpdate {
            site_identifier: "new".to_string(),
            site: site("new", vec![monitor("m1")]),
        });
        assert_eq!(store.sites().len(), 1);
    }

    #[test]
    fn test_apply_update_clamps_history_to_limit() {
        let mut store = SiteStore::new(2);
        let mut incoming = site("s1", vec![monitor("m1")]);
        incoming.monitors[0].history.replace_all(vec![
            entry(1, MonitorStatus::Up, None),
            entry(2, MonitorStatus::Up, None),
            entry(3, MonitorStatus::Up, None),
        ]);

        store.apply_update(StatusUpdate {
            site_identifier: "s1".to_string(),
            site: incoming,
        });

        let m = store.monitor("s1", "m1").unwrap();
        assert_eq!(m.history.len(), 2);
        assert_eq!(m.history.iter().next().unwrap().timestamp, 2);
    }

    #[test]
    fn test_remove_site_cascades() {
        let mut store = SiteStore::default();
        store.replace_sites(vec![site("s1", vec![monitor("m1")])]);
        store.append_entry("s1", "m1", entry(1, MonitorStatus::Up, Some(50.0)));
        assert_eq!(store.stats().total_uptime(), 50.0);

        assert!(store.remove_site("s1"));
        assert!(store.sites().is_empty());
        assert_eq!(store.stats().total_uptime(), 0.0);

        assert!(!store.remove_site("s1"));
    }

    #[test]
    fn test_drain_updates_applies_all_pending() {
        use crate::backend::ChannelSource;

        let mut store = SiteStore::default();
        let (tx, mut source) = ChannelSource::create("test");

        tx.send(StatusUpdate {
            site_identifier: "a".to_string(),
            site: site("a", vec![]),
        })
        .unwrap();
        tx.send(StatusUpdate {
            site_identifier: "b".to_string(),
            site: site("b", vec![]),
        })
        .unwrap();

        assert_eq!(store.drain_updates(&mut source), 2);
        assert_eq!(store.sites().len(), 2);
        assert_eq!(store.drain_updates(&mut source), 0);
    }

    struct FixedBackend {
        sites: Vec<Site>,
    }

    #[async_trait]
    impl MonitoringBackend for FixedBackend {
        async fn get_sites(&self) -> Result<Vec<Site>> {
            Ok(self.sites.clone())
        }
        async fn update_site(&self, _: &str, _: SiteChanges) -> Result<()> {
            Ok(())
        }
        async fn delete_site(&self, _: &str) -> Result<()> {
            Ok(())
        }
        async fn check_site_now(&self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }
        async fn start_monitoring(&self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }
        async fn stop_monitoring(&self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }
        async fn update_check_interval(&self, _: &str, _: &str, _: u64) -> Result<()> {
            Ok(())
        }
        async fn update_timeout(&self, _: &str, _: &str, _: u64) -> Result<()> {
            Ok(())
        }
        async fn update_retry_attempts(&self, _: &str, _: &str, _: u32) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_resync_replaces_collection() {
        let backend = FixedBackend {
            sites: vec![site("remote", vec![monitor("m1")])],
        };

        let mut store = SiteStore::default();
        store.replace_sites(vec![site("stale", vec![])]);

        store.resync(&backend).await.unwrap();
        assert_eq!(store.sites().len(), 1);
        assert!(store.site("remote").is_some());
        assert!(store.site("stale").is_none());
    }
}
