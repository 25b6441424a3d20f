//! Latest-crash polling.
//!
//! [`Poller`] asks the service for the latest crash, compares its identity
//! with the last one displayed and only refreshes the crash list when it
//! changed. When the latest crash cannot be fetched it falls back to the
//! seeded test record and then to a hardcoded placeholder. Fallback records
//! never become the tracked identity.

use std::future::Future;

use chrono::Local;
use crashwatch_core::crash::{CrashKey, CrashSummary, TEST_CRASH_KEY};
use crashwatch_core::timestamp::STORAGE_FORMAT;
use tokio_util::sync::CancellationToken;

use crate::backoff::{Backoff, BackoffConfig};
use crate::source::CrashSource;
use crate::store::{DashboardStore, LatestPanel, PanelSource};

// ---------------------------------------------------------------------------
// LatestTracker
// ---------------------------------------------------------------------------

/// Remembers the `camera_id-frame_id` identity of the last crash displayed.
#[derive(Debug, Default)]
pub struct LatestTracker {
    last: Option<String>,
}

impl LatestTracker {
    /// Record `key` as seen. Returns `true` if it differs from the previous
    /// identity.
    pub fn observe(&mut self, key: CrashKey) -> bool {
        let id = key.to_string();
        if self.last.as_deref() == Some(id.as_str()) {
            return false;
        }
        self.last = Some(id);
        true
    }

    /// Set the identity without reporting a change.
    pub fn seed(&mut self, key: CrashKey) {
        self.last = Some(key.to_string());
    }

    pub fn current(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

// ---------------------------------------------------------------------------
// PollOutcome
// ---------------------------------------------------------------------------

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A crash with a new identity arrived; the list was refreshed.
    NewCrash(CrashKey),
    /// The latest crash is the one already tracked.
    Unchanged,
    /// The tracked crash is back on display after a fallback.
    Recovered(CrashKey),
    /// The latest crash was unavailable and a fallback record is shown.
    Fallback { source: PanelSource, redraw: bool },
}

impl PollOutcome {
    /// Whether the dashboard should be printed again.
    pub fn needs_redraw(&self) -> bool {
        match self {
            PollOutcome::NewCrash(_) | PollOutcome::Recovered(_) => true,
            PollOutcome::Unchanged => false,
            PollOutcome::Fallback { redraw, .. } => *redraw,
        }
    }
}

// ---------------------------------------------------------------------------
// Poller
// ---------------------------------------------------------------------------

/// Single-flight poller over a [`CrashSource`].
pub struct Poller<S> {
    source: S,
    tracker: LatestTracker,
    backoff: Backoff,
}

impl<S: CrashSource> Poller<S> {
    pub fn new(source: S, backoff: BackoffConfig) -> Self {
        Self {
            source,
            tracker: LatestTracker::default(),
            backoff: Backoff::new(backoff),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn tracker(&self) -> &LatestTracker {
        &self.tracker
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Load the first dashboard state.
    ///
    /// With a selector the named crash is shown instead of the latest one
    /// and becomes the tracked identity.
    pub async fn initialize(&mut self, store: &mut DashboardStore, selector: Option<&str>) {
        if let Some(selector) = selector {
            self.load_linked(store, selector).await;
            self.refresh_list(store).await;
            return;
        }

        let outcome = self.poll_once(store).await;
        if !matches!(outcome, PollOutcome::NewCrash(_)) {
            self.refresh_list(store).await;
        }
    }

    /// Fetch the latest crash once and update the store.
    pub async fn poll_once(&mut self, store: &mut DashboardStore) -> PollOutcome {
        match self.source.latest().await {
            Ok(latest) => {
                self.backoff.record_success();
                let key = latest.crash.key();

                if self.tracker.observe(key) {
                    tracing::info!(crash = %key, "New crash detected");
                    store.show_latest(latest.crash, PanelSource::Latest);
                    self.refresh_list(store).await;
                    return PollOutcome::NewCrash(key);
                }

                if showing_fallback(store) {
                    tracing::info!(crash = %key, "Latest crash available again");
                    store.show_latest(latest.crash, PanelSource::Latest);
                    return PollOutcome::Recovered(key);
                }

                PollOutcome::Unchanged
            }
            Err(e) if e.is_not_found() => {
                // An empty table is a healthy service.
                self.backoff.record_success();
                tracing::debug!(error = %e, "No latest crash");
                self.fallback(store).await
            }
            Err(e) => {
                self.backoff.record_failure();
                tracing::warn!(
                    error = %e,
                    failures = self.backoff.failures(),
                    next_poll_ms = self.backoff.delay().as_millis() as u64,
                    "Failed to fetch latest crash"
                );
                self.fallback(store).await
            }
        }
    }

    /// Re-fetch the full crash list. On failure the previous list is kept.
    pub async fn refresh_list(&self, store: &mut DashboardStore) {
        match self.source.list().await {
            Ok(crashes) => {
                tracing::debug!(count = crashes.len(), "Crash list refreshed");
                store.replace_crashes(crashes);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh crash list");
            }
        }
    }

    /// Show the crash named by a `camera_id-frame_id` selector.
    ///
    /// A malformed selector or a failed lookup replaces the latest panel with
    /// a not-found message. Returns `true` if the crash was loaded.
    pub async fn load_linked(&mut self, store: &mut DashboardStore, selector: &str) -> bool {
        let key = match selector.parse::<CrashKey>() {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(selector, error = %e, "Invalid crash selector");
                store.show_not_found(selector);
                return false;
            }
        };

        match self.source.get(key).await {
            Ok(crash) => {
                self.tracker.seed(key);
                store.show_latest(crash, PanelSource::Linked);
                true
            }
            Err(e) => {
                tracing::warn!(crash = %key, error = %e, "Linked crash unavailable");
                store.show_not_found(selector);
                false
            }
        }
    }

    /// Poll until `cancel` fires, sleeping for the current backoff delay
    /// between polls. `on_update` runs after every poll that needs a redraw.
    pub async fn run<F>(
        &mut self,
        store: &mut DashboardStore,
        cancel: CancellationToken,
        mut on_update: F,
    ) where
        F: FnMut(&DashboardStore, &PollOutcome),
    {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Poller cancelled");
                    break;
                }
                _ = tokio::time::sleep(self.backoff.delay()) => {
                    let outcome = self.poll_once(store).await;
                    if outcome.needs_redraw() {
                        on_update(store, &outcome);
                    }
                }
            }
        }
    }

    async fn fallback(&self, store: &mut DashboardStore) -> PollOutcome {
        let (crash, source) = match self.source.get(TEST_CRASH_KEY).await {
            Ok(crash) => (crash, PanelSource::TestRecord),
            Err(e) => {
                tracing::debug!(error = %e, "Test crash unavailable, showing placeholder");
                let now = Local::now().format(STORAGE_FORMAT).to_string();
                (CrashSummary::placeholder(now), PanelSource::Placeholder)
            }
        };
        let redraw = store.show_latest(crash, source);
        PollOutcome::Fallback { source, redraw }
    }
}

/// Cancel `cancel` once `signal` fires.
///
/// If the signal handler cannot be installed the error is logged and the
/// token is never cancelled, so polling keeps running.
pub async fn cancel_on_signal<F>(signal: F, cancel: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl-C received, stopping");
    cancel.cancel();
}

fn showing_fallback(store: &DashboardStore) -> bool {
    matches!(
        store.latest_panel(),
        LatestPanel::Crash {
            source: PanelSource::TestRecord | PanelSource::Placeholder,
            ..
        }
    )
}
