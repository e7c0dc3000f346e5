//! Application facade: owns the two controllers, enforces the ordering between
//! them (data is never fetched while unauthenticated), and exposes the reduced
//! view plus the filtered-export path to shells.

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::api::ApiGateway;
use crate::error::Result;
use crate::export;
use crate::filter::EmailFilter;
use crate::models::EmailRecord;
use crate::navigation::Navigator;
use crate::session::SessionController;
use crate::sync::SyncController;
use crate::view::{view_mode, ViewMode};

pub struct InsightApp {
    pub session: SessionController,
    pub sync: SyncController,
}

impl InsightApp {
    pub fn new(gateway: Arc<dyn ApiGateway>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            session: SessionController::new(Arc::clone(&gateway), navigator),
            sync: SyncController::new(gateway),
        }
    }

    /// Startup sequence: resolve the session, then load data if and only if
    /// the session resolved authenticated
    pub async fn start(&self) {
        self.session.resolve_initial_session().await;
        if self.session.state().is_authenticated() {
            self.sync.load(false).await;
        }
    }

    pub async fn login(&self) {
        self.session.login().await;
    }

    /// Logout plus the full state reset the page reload performs in a browser
    pub async fn logout(&self) {
        self.session.logout().await;
        self.sync.reset();
    }

    /// User-initiated refresh; a no-op while unauthenticated
    pub async fn refresh(&self) {
        if !self.session.state().is_authenticated() {
            debug!("Ignoring refresh while unauthenticated");
            return;
        }
        self.sync.load(true).await;
    }

    /// Retry from the error screen
    pub async fn retry(&self) {
        if !self.session.state().is_authenticated() {
            return;
        }
        self.sync.retry().await;
    }

    pub async fn mark_read(&self, id: &str) -> Result<()> {
        self.sync.mark_read(id).await
    }

    /// The single renderable mode for the current state pair
    pub fn view_mode(&self) -> ViewMode {
        view_mode(&self.session.state(), &self.sync.state())
    }

    /// The currently filtered card list
    pub fn filtered(&self, filter: &EmailFilter) -> Vec<EmailRecord> {
        match self.sync.state().data() {
            Some(data) => filter.apply(&data.emails).into_iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Export the currently filtered view (never the full set) to a CSV file
    pub async fn export_csv(&self, filter: &EmailFilter, path: &Path) -> Result<()> {
        let records = self.filtered(filter);
        export::write_csv(records.iter(), path).await
    }
}
