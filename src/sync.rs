//! Data sync controller.
//!
//! Orchestrates the dashboard's data loads: the email list and the statistics
//! summary are fetched concurrently and joined, so the load settles only when
//! both have, and either failure fails the whole load. The client holds no
//! cache; every load re-fetches, with `force_refresh` forwarded to the email
//! fetch as a backend cache-busting hint.
//!
//! Overlapping loads are resolved by cancellation rather than
//! last-settled-wins: each invocation takes a generation stamp and may only
//! publish while its stamp is still current, so a stale completion can never
//! overwrite state a newer load produced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ApiGateway;
use crate::error::Result;
use crate::models::{EmailRecord, StatsSummary};

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardData {
    pub emails: Vec<EmailRecord>,
    pub stats: StatsSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    /// Refresh in flight; carries the previous data so the dashboard stays
    /// rendered under the overlay
    Refreshing(DashboardData),
    Ready(DashboardData),
    Failed(String),
}

impl LoadState {
    pub fn data(&self) -> Option<&DashboardData> {
        match self {
            LoadState::Ready(data) | LoadState::Refreshing(data) => Some(data),
            _ => None,
        }
    }
}

pub struct SyncController {
    gateway: Arc<dyn ApiGateway>,
    state_tx: watch::Sender<LoadState>,
    state_rx: watch::Receiver<LoadState>,
    generation: AtomicU64,
}

impl SyncController {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        let (state_tx, state_rx) = watch::channel(LoadState::Idle);
        Self {
            gateway,
            state_tx,
            state_rx,
            generation: AtomicU64::new(0),
        }
    }

    /// Observe load state changes
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state_rx.clone()
    }

    pub fn state(&self) -> LoadState {
        self.state_rx.borrow().clone()
    }

    /// Publish `state` unless a newer load has claimed the slot
    fn publish_if_current(&self, generation: u64, state: LoadState) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding stale load result");
            return;
        }
        self.state_tx.send_replace(state);
    }

    /// Fetch emails and stats, joined. A refresh over an already-loaded
    /// dashboard keeps the previous data visible; any other entry shows the
    /// first-load state.
    pub async fn load(&self, force_refresh: bool) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let previous = self.state().data().cloned();
        let entry = match previous {
            Some(data) if force_refresh => LoadState::Refreshing(data),
            _ => LoadState::Loading,
        };
        self.publish_if_current(generation, entry);

        match tokio::try_join!(
            self.gateway.fetch_emails(force_refresh),
            self.gateway.fetch_stats(),
        ) {
            Ok((email_list, stats)) => {
                info!(
                    emails = email_list.emails.len(),
                    cached = email_list.cached,
                    "Dashboard data loaded"
                );
                if !stats.is_consistent() {
                    warn!(?stats, "Backend stats buckets do not sum to total");
                }
                self.publish_if_current(
                    generation,
                    LoadState::Ready(DashboardData {
                        emails: email_list.emails,
                        stats,
                    }),
                );
            }
            Err(e) => {
                warn!(error = %e, "Dashboard load failed");
                self.publish_if_current(generation, LoadState::Failed(e.user_message()));
            }
        }
    }

    /// User-initiated retry from the error screen; always asks the backend for
    /// fresh data
    pub async fn retry(&self) {
        self.load(true).await;
    }

    /// Mark one email as read, reconciling local state on success: the record
    /// flips to read and the unread count drops. Failure leaves local state
    /// untouched.
    pub async fn mark_read(&self, id: &str) -> Result<()> {
        self.gateway.mark_read(id).await?;

        self.state_tx.send_if_modified(|state| {
            let data = match state {
                LoadState::Ready(data) | LoadState::Refreshing(data) => data,
                _ => return false,
            };
            match data.emails.iter_mut().find(|e| e.id == id) {
                Some(record) if !record.read => {
                    record.read = true;
                    data.stats.unread = data.stats.unread.saturating_sub(1);
                    true
                }
                _ => false,
            }
        });
        Ok(())
    }

    /// Drop all fetched data and invalidate any in-flight load. Models the
    /// full-reload teardown that follows logout.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state_tx.send_replace(LoadState::Idle);
    }
}
