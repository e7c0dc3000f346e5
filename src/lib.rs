//! JobMail Insight client engine
//!
//! The session/data synchronization core of a dashboard for classified
//! job-application emails: it recovers authentication state from an OAuth
//! redirect or a backend status check, orchestrates the joined email+stats
//! loads, and reduces both into a single renderable view mode. Rendering is
//! left to shells; this crate ships a CLI shell for scripting and inspection.
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use jobmail_insight::{
//!     api::HttpApiClient, app::InsightApp, config::Config, navigation::MemoryNavigator,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml".as_ref()).await?;
//!     let gateway = Arc::new(HttpApiClient::new(&config.backend.base_url, config.timeout())?);
//!     let navigator = Arc::new(MemoryNavigator::parse("https://insight.example/")?);
//!
//!     let app = InsightApp::new(gateway, navigator);
//!     app.start().await;
//!     println!("{:?}", app.view_mode());
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`api`] - Typed REST gateway to the classification backend
//! - [`app`] - Facade wiring the controllers and the reduced view together
//! - [`config`] - Configuration management
//! - [`error`] - Error types and result aliases
//! - [`export`] - CSV serialization of the filtered card list
//! - [`filter`] - Client-side search and status filtering
//! - [`models`] - Core data structures and wire envelopes
//! - [`navigation`] - Host location/history seam
//! - [`session`] - Auth session controller with OAuth-callback recovery
//! - [`singleflight`] - Coalescing of concurrent identical operations
//! - [`sync`] - Data sync controller with joined fetches and cancellation
//! - [`view`] - Pure view-state reducer

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod navigation;
pub mod session;
pub mod singleflight;
pub mod sync;
pub mod view;

// Re-export commonly used types for convenience
pub use error::{InsightError, Result};

// Core data models
pub use models::{ApplicationStatus, EmailRecord, StatsSummary};

// Gateway
pub use api::{ApiGateway, HttpApiClient};

// Controllers and facade
pub use app::InsightApp;
pub use session::{AuthPhase, SessionController, SessionState};
pub use sync::{DashboardData, LoadState, SyncController};

// View and filtering
pub use filter::{EmailFilter, StatusFilter};
pub use view::{view_mode, ViewMode};

// Config
pub use config::Config;

// Navigation seam
pub use navigation::{MemoryNavigator, Navigator};
