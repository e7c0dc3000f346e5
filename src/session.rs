//! Auth session controller.
//!
//! Resolves the client's belief about whether the user is authorized, once per
//! page session. Resolution first looks for an OAuth-callback signal in the
//! entry URL; only in its absence does it consult the backend status endpoint,
//! and that consultation is coalesced so the view layer's mount/redraw cycle
//! can re-trigger resolution without issuing duplicate requests.
//!
//! State machine: `Init -> Checking -> {Authenticated, Unauthenticated}`.
//! `Authenticated -> Unauthenticated` happens only through [`SessionController::logout`];
//! `Unauthenticated -> Authenticated` only through the `auth=success` callback
//! path, since the status check runs once at startup.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::ApiGateway;
use crate::navigation::{scrubbed, Navigator};
use crate::singleflight::SingleFlight;

/// Default message for an `auth=error` callback without one of its own
pub const CALLBACK_ERROR_FALLBACK: &str = "Authentication failed";

/// Message for a failed login initiation
const LOGIN_ERROR: &str = "Failed to initiate login. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Init,
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Client-held session belief plus the dismissible error surfaced next to the
/// login prompt, when there is one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub phase: AuthPhase,
    pub error: Option<String>,
}

impl SessionState {
    fn initial() -> Self {
        Self {
            phase: AuthPhase::Init,
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }
}

/// OAuth-callback signal carried in the entry URL's query string
enum CallbackSignal {
    Success,
    Error(String),
}

fn callback_signal(url: &Url) -> Option<CallbackSignal> {
    let mut auth = None;
    let mut message = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "auth" => auth = Some(value.into_owned()),
            "message" => message = Some(value.into_owned()),
            _ => {}
        }
    }

    match auth.as_deref() {
        Some("success") => Some(CallbackSignal::Success),
        Some("error") => Some(CallbackSignal::Error(
            message.unwrap_or_else(|| CALLBACK_ERROR_FALLBACK.to_string()),
        )),
        _ => None,
    }
}

pub struct SessionController {
    gateway: Arc<dyn ApiGateway>,
    navigator: Arc<dyn Navigator>,
    state_tx: watch::Sender<SessionState>,
    state_rx: watch::Receiver<SessionState>,
    status_check: SingleFlight<bool>,
}

impl SessionController {
    pub fn new(gateway: Arc<dyn ApiGateway>, navigator: Arc<dyn Navigator>) -> Self {
        let (state_tx, state_rx) = watch::channel(SessionState::initial());
        Self {
            gateway,
            navigator,
            state_tx,
            state_rx,
            status_check: SingleFlight::new(),
        }
    }

    /// Observe session state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    pub fn state(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    fn publish(&self, state: SessionState) {
        self.state_tx.send_replace(state);
    }

    /// Determine the initial session, recovering it from an OAuth redirect if
    /// one brought us here.
    ///
    /// A callback signal in the entry URL settles the session immediately,
    /// without a status call, and the parameters are stripped from the visible
    /// URL with no new history entry so a reload does not replay them. With no
    /// signal present, the status endpoint is consulted exactly once; callers
    /// that arrive while that check is pending share it. Check failures
    /// resolve silently to unauthenticated.
    pub async fn resolve_initial_session(&self) {
        match self.state().phase {
            AuthPhase::Authenticated | AuthPhase::Unauthenticated => {
                // Already settled; resolution runs once per page session.
                return;
            }
            AuthPhase::Init | AuthPhase::Checking => {}
        }

        let entry_url = self.navigator.current_url();
        if let Some(signal) = callback_signal(&entry_url) {
            self.navigator.replace_url(&scrubbed(&entry_url));
            match signal {
                CallbackSignal::Success => {
                    info!("OAuth callback reported success");
                    self.publish(SessionState {
                        phase: AuthPhase::Authenticated,
                        error: None,
                    });
                }
                CallbackSignal::Error(message) => {
                    warn!(message, "OAuth callback reported an error");
                    self.publish(SessionState {
                        phase: AuthPhase::Unauthenticated,
                        error: Some(message),
                    });
                }
            }
            return;
        }

        self.publish(SessionState {
            phase: AuthPhase::Checking,
            error: None,
        });

        let gateway = Arc::clone(&self.gateway);
        let authenticated = self
            .status_check
            .run("auth-check", move || async move {
                match gateway.auth_status().await {
                    Ok(authenticated) => authenticated,
                    Err(e) => {
                        // Distinct from the explicit auth=error path: this is
                        // never surfaced to the user.
                        debug!(error = %e, "Session status check failed");
                        false
                    }
                }
            })
            .await;

        // Logout or a callback may have settled the session while the check
        // was in flight; a settled session is never moved by the check.
        if self.state().phase != AuthPhase::Checking {
            return;
        }

        self.publish(SessionState {
            phase: if authenticated {
                AuthPhase::Authenticated
            } else {
                AuthPhase::Unauthenticated
            },
            error: None,
        });
    }

    /// Request an authorization URL and leave the application for it.
    /// On failure the session keeps its phase and surfaces a dismissible error.
    pub async fn login(&self) {
        self.dismiss_error();
        match self.gateway.login_url().await {
            Ok(auth_url) => {
                info!("Navigating to OAuth provider");
                self.navigator.navigate(&auth_url);
            }
            Err(e) => {
                warn!(error = %e, "Login initiation failed");
                let mut state = self.state();
                state.error = Some(LOGIN_ERROR.to_string());
                self.publish(state);
            }
        }
    }

    /// Invalidate the backend session, then drop all client state via a full
    /// reload. From the UI's perspective logout always succeeds; a backend
    /// failure is only logged.
    pub async fn logout(&self) {
        if let Err(e) = self.gateway.logout().await {
            warn!(error = %e, "Backend logout failed");
        }
        self.publish(SessionState {
            phase: AuthPhase::Unauthenticated,
            error: None,
        });
        self.navigator.reload();
    }

    /// Clear the surfaced error without touching the phase
    pub fn dismiss_error(&self) {
        let mut state = self.state();
        if state.error.take().is_some() {
            self.publish(state);
        }
    }
}
