//! Draft reconciliation for the site-detail view.
//!
//! A [`DetailSession`] holds local (draft) copies of the editable monitor and
//! site fields while the backend stays the source of truth. Each field carries
//! its own dirty flag, recomputed by strict comparison against the canonical
//! value on every change, so re-entering the original value clears dirtiness.
//!
//! Reconciliation policy (documented decisions):
//! - A pushed update wins for fields it changed; drafts for untouched fields
//!   survive the push.
//! - Switching monitors discards unsaved drafts without confirmation.
//! - A save requested while another save is in flight is rejected, not
//!   queued. Public callers cannot overlap saves at all — each `save_*`
//!   holds the exclusive borrow across its await — so the rejection guards
//!   any path that reaches the saving flag another way.
//!
//! Backend failures are never thrown at callers: every wrapper converts them
//! into a `"Failed to <action>: <reason>"` message surfaced via
//! [`DetailSession::last_error`] and logged.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::{MonitoringBackend, SiteChanges};
use crate::data::units::{ms_to_seconds, seconds_to_ms};
use crate::model::{Monitor, Site};

/// Where the session sits in the edit/commit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Drafts match the canonical values.
    Clean,
    /// At least one field differs from its canonical value.
    Dirty,
    /// A commit is in flight.
    Saving,
}

/// Per-field dirty flags. Changing one field never marks another dirty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub check_interval: bool,
    pub timeout: bool,
    pub retry_attempts: bool,
    pub name: bool,
}

impl DirtyFlags {
    pub fn any(&self) -> bool {
        self.check_interval || self.timeout || self.retry_attempts || self.name
    }
}

/// Canonical values the drafts are compared against.
#[derive(Debug, Clone, PartialEq)]
struct CanonicalSettings {
    check_interval_ms: u64,
    timeout_ms: u64,
    retry_attempts: u32,
    /// Site-level display name ("" when no custom name is set).
    name: String,
}

impl CanonicalSettings {
    fn from_parts(site_name: Option<&str>, monitor: &Monitor) -> Self {
        Self {
            check_interval_ms: monitor.check_interval_ms,
            timeout_ms: monitor.timeout_ms,
            retry_attempts: monitor.retry_attempts,
            name: site_name.unwrap_or_default().to_string(),
        }
    }
}

/// Draft/canonical reconciliation state for one open site-detail view.
pub struct DetailSession {
    backend: Arc<dyn MonitoringBackend>,

    site_id: String,
    monitor_id: String,
    canonical: CanonicalSettings,

    // Drafts. The timeout is edited in user-facing seconds and converted to
    // milliseconds only at the units boundary.
    check_interval_ms: u64,
    timeout_seconds: f64,
    retry_attempts: u32,
    name: String,

    flags: DirtyFlags,
    saving: bool,
    last_error: Option<String>,
}

impl DetailSession {
    /// Open a session for `monitor` within `site`, seeding drafts from the
    /// canonical values.
    pub fn new(backend: Arc<dyn MonitoringBackend>, site: &Site, monitor: &Monitor) -> Self {
        let canonical = CanonicalSettings::from_parts(site.name.as_deref(), monitor);
        Self {
            backend,
            site_id: site.identifier.clone(),
            monitor_id: monitor.id.clone(),
            check_interval_ms: canonical.check_interval_ms,
            timeout_seconds: ms_to_seconds(canonical.timeout_ms),
            retry_attempts: canonical.retry_attempts,
            name: canonical.name.clone(),
            canonical,
            flags: DirtyFlags::default(),
            saving: false,
            last_error: None,
        }
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn monitor_id(&self) -> &str {
        &self.monitor_id
    }

    pub fn check_interval_ms(&self) -> u64 {
        self.check_interval_ms
    }

    pub fn timeout_seconds(&self) -> f64 {
        self.timeout_seconds
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> DirtyFlags {
        self.flags
    }

    pub fn phase(&self) -> SessionPhase {
        if self.saving {
            SessionPhase::Saving
        } else if self.flags.any() {
            SessionPhase::Dirty
        } else {
            SessionPhase::Clean
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // --- draft changes -----------------------------------------------------

    /// Update the check-interval draft (milliseconds).
    pub fn set_check_interval(&mut self, interval_ms: u64) {
        self.check_interval_ms = interval_ms;
        self.flags.check_interval = interval_ms != self.canonical.check_interval_ms;
    }

    /// Update the timeout draft (user-facing seconds). Dirtiness is compared
    /// in milliseconds through the shared conversion boundary, so the read and
    /// save paths cannot disagree on rounding.
    pub fn set_timeout_seconds(&mut self, seconds: f64) {
        self.timeout_seconds = seconds;
        self.flags.timeout = seconds_to_ms(seconds) != self.canonical.timeout_ms;
    }

    /// Update the retry-attempts draft.
    pub fn set_retry_attempts(&mut self, attempts: u32) {
        self.retry_attempts = attempts;
        self.flags.retry_attempts = attempts != self.canonical.retry_attempts;
    }

    /// Update the site-name draft.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.flags.name = self.name != self.canonical.name;
    }

    // --- commits -----------------------------------------------------------

    /// Commit the check-interval draft.
    pub async fn save_check_interval(&mut self) {
        if !self.begin_save() {
            return;
        }
        let value = self.check_interval_ms;
        let result = self
            .backend
            .update_check_interval(&self.site_id, &self.monitor_id, value)
            .await;
        match result {
            Ok(()) => {
                self.canonical.check_interval_ms = value;
                self.flags.check_interval = false;
            }
            Err(err) => self.surface_error("update check interval", err),
        }
        self.saving = false;
    }

    /// Commit the timeout draft, converting seconds to milliseconds at the
    /// units boundary.
    pub async fn save_timeout(&mut self) {
        if !self.begin_save() {
            return;
        }
        let timeout_ms = seconds_to_ms(self.timeout_seconds);
        let result = self
            .backend
            .update_timeout(&self.site_id, &self.monitor_id, timeout_ms)
            .await;
        match result {
            Ok(()) => {
                self.canonical.timeout_ms = timeout_ms;
                self.flags.timeout = false;
            }
            Err(err) => self.surface_error("update timeout", err),
        }
        self.saving = false;
    }

    /// Commit the retry-attempts draft.
    pub async fn save_retry_attempts(&mut self) {
        if !self.begin_save() {
            return;
        }
        let value = self.retry_attempts;
        let result = self
            .backend
            .update_retry_attempts(&self.site_id, &self.monitor_id, value)
            .await;
        match result {
            Ok(()) => {
                self.canonical.retry_attempts = value;
                self.flags.retry_attempts = false;
            }
            Err(err) => self.surface_error("update retry attempts", err),
        }
        self.saving = false;
    }

    /// Commit the name draft.
    ///
    /// No backend call when the trimmed draft equals the canonical name. An
    /// empty trimmed draft takes the explicit "clear custom name" path. On
    /// success the draft is normalized to its trimmed form.
    pub async fn save_name(&mut self) {
        let trimmed = self.name.trim().to_string();
        if trimmed == self.canonical.name {
            self.name = trimmed;
            self.flags.name = false;
            return;
        }
        if !self.begin_save() {
            return;
        }

        let changes = if trimmed.is_empty() {
            SiteChanges::clear_name()
        } else {
            SiteChanges::rename(&trimmed)
        };
        match self.backend.update_site(&self.site_id, changes).await {
            Ok(()) => {
                self.canonical.name = trimmed.clone();
                self.name = trimmed;
                self.flags.name = false;
            }
            Err(err) => self.surface_error("update site name", err),
        }
        self.saving = false;
    }

    // --- lifecycle actions -------------------------------------------------

    /// Trigger an immediate check. State changes arrive through the push
    /// channel, so nothing is mutated locally.
    pub async fn check_now(&mut self) {
        self.clear_error();
        if let Err(err) = self.backend.check_site_now(&self.site_id, &self.monitor_id).await {
            self.surface_error("trigger check", err);
        }
    }

    /// Start scheduled monitoring for the selected monitor.
    pub async fn start_monitoring(&mut self) {
        self.clear_error();
        if let Err(err) = self.backend.start_monitoring(&self.site_id, &self.monitor_id).await {
            self.surface_error("start monitoring", err);
        }
    }

    /// Stop scheduled monitoring for the selected monitor.
    pub async fn stop_monitoring(&mut self) {
        self.clear_error();
        if let Err(err) = self.backend.stop_monitoring(&self.site_id, &self.monitor_id).await {
            self.surface_error("stop monitoring", err);
        }
    }

    /// Delete the whole site. Refuses (returning false, no backend call)
    /// unless the caller has completed an external confirmation step. Returns
    /// true when the delete call succeeded.
    pub async fn remove_site(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.clear_error();
        match self.backend.delete_site(&self.site_id).await {
            Ok(()) => true,
            Err(err) => {
                self.surface_error("remove site", err);
                false
            }
        }
    }

    // --- canonical reconciliation ------------------------------------------

    /// Select a different monitor within the same site, discarding any unsaved
    /// drafts for the previous one: all drafts reset from the new monitor's
    /// canonical values, all flags forced false.
    pub fn select_monitor(&mut self, monitor: &Monitor) {
        self.monitor_id = monitor.id.clone();
        self.canonical.check_interval_ms = monitor.check_interval_ms;
        self.canonical.timeout_ms = monitor.timeout_ms;
        self.canonical.retry_attempts = monitor.retry_attempts;

        self.check_interval_ms = self.canonical.check_interval_ms;
        self.timeout_seconds = ms_to_seconds(self.canonical.timeout_ms);
        self.retry_attempts = self.canonical.retry_attempts;
        self.name = self.canonical.name.clone();
        self.flags = DirtyFlags::default();
    }

    /// Merge a pushed canonical update: for every field the push changed, the
    /// push wins (draft overwritten, flag cleared); untouched fields keep
    /// their drafts with flags recomputed against the new canonical values.
    ///
    /// A push that no longer contains the selected monitor leaves the session
    /// untouched; the owner decides whether to close it.
    pub fn apply_canonical(&mut self, site: &Site) {
        let Some(monitor) = site.monitor(&self.monitor_id) else {
            debug!(monitor = %self.monitor_id, "pushed site no longer contains selected monitor");
            return;
        };
        let incoming = CanonicalSettings::from_parts(site.name.as_deref(), monitor);

        if incoming.check_interval_ms != self.canonical.check_interval_ms {
            self.check_interval_ms = incoming.check_interval_ms;
            self.flags.check_interval = false;
        } else {
            self.flags.check_interval = self.check_interval_ms != incoming.check_interval_ms;
        }

        if incoming.timeout_ms != self.canonical.timeout_ms {
            self.timeout_seconds = ms_to_seconds(incoming.timeout_ms);
            self.flags.timeout = false;
        } else {
            self.flags.timeout = seconds_to_ms(self.timeout_seconds) != incoming.timeout_ms;
        }

        if incoming.retry_attempts != self.canonical.retry_attempts {
            self.retry_attempts = incoming.retry_attempts;
            self.flags.retry_attempts = false;
        } else {
            self.flags.retry_attempts = self.retry_attempts != incoming.retry_attempts;
        }

        if incoming.name != self.canonical.name {
            self.name = incoming.name.clone();
            self.flags.name = false;
        } else {
            self.flags.name = self.name != incoming.name;
        }

        self.canonical = incoming;
    }

    // --- internals ---------------------------------------------------------

    /// Enter the saving phase. A save already in flight rejects the request,
    /// never queues it.
    ///
    /// Through the public API the exclusive `&mut` borrow already guarantees
    /// at most one save at a time; the flag is the policy's explicit form and
    /// what makes [`SessionPhase::Saving`] observable.
    fn begin_save(&mut self) -> bool {
        if self.saving {
            warn!(monitor = %self.monitor_id, "save rejected: another save is in flight");
            return false;
        }
        self.clear_error();
        self.saving = true;
        true
    }

    fn surface_error(&mut self, action: &str, err: anyhow::Error) {
        let message = format!("Failed to {}: {}", action, err);
        warn!(site = %self.site_id, monitor = %self.monitor_id, "{}", message);
        self.last_error = Some(message);
    }
}
