//! View state reducer.
//!
//! Collapses session and load state into the one mode the shell should render.
//! Pure and total; precedence is strict: an unresolved session blanks
//! everything, an unauthenticated session shows the login prompt no matter
//! what the load state says, and only an authenticated session lets the load
//! state drive the screen. A refresh is an overlay on the dashboard, never a
//! full-screen mode.

use crate::session::{AuthPhase, SessionState};
use crate::sync::{DashboardData, LoadState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// Session not yet resolved; spinner only
    CheckingAuth,
    /// Login prompt, with the surfaced callback/login error when present
    Unauthenticated { error: Option<String> },
    /// First data load in flight
    LoadingData,
    /// Data load failed; retry screen
    DataError { message: String },
    /// Dashboard over loaded data; `refreshing` drives the overlay
    Dashboard {
        data: DashboardData,
        refreshing: bool,
    },
}

pub fn view_mode(session: &SessionState, load: &LoadState) -> ViewMode {
    match session.phase {
        AuthPhase::Init | AuthPhase::Checking => ViewMode::CheckingAuth,
        AuthPhase::Unauthenticated => ViewMode::Unauthenticated {
            error: session.error.clone(),
        },
        AuthPhase::Authenticated => match load {
            LoadState::Idle | LoadState::Loading => ViewMode::LoadingData,
            LoadState::Failed(message) => ViewMode::DataError {
                message: message.clone(),
            },
            LoadState::Ready(data) => ViewMode::Dashboard {
                data: data.clone(),
                refreshing: false,
            },
            LoadState::Refreshing(data) => ViewMode::Dashboard {
                data: data.clone(),
                refreshing: true,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(phase: AuthPhase) -> SessionState {
        SessionState { phase, error: None }
    }

    #[test]
    fn test_unresolved_session_takes_priority() {
        for phase in [AuthPhase::Init, AuthPhase::Checking] {
            let mode = view_mode(&session(phase), &LoadState::Ready(DashboardData::default()));
            assert_eq!(mode, ViewMode::CheckingAuth);
        }
    }

    #[test]
    fn test_unauthenticated_wins_over_any_load_state() {
        let states = [
            LoadState::Idle,
            LoadState::Loading,
            LoadState::Ready(DashboardData::default()),
            LoadState::Failed("boom".to_string()),
        ];
        for load in &states {
            let mode = view_mode(&session(AuthPhase::Unauthenticated), load);
            assert_eq!(mode, ViewMode::Unauthenticated { error: None });
        }
    }

    #[test]
    fn test_unauthenticated_carries_surfaced_error() {
        let state = SessionState {
            phase: AuthPhase::Unauthenticated,
            error: Some("Foo".to_string()),
        };
        assert_eq!(
            view_mode(&state, &LoadState::Idle),
            ViewMode::Unauthenticated {
                error: Some("Foo".to_string())
            }
        );
    }

    #[test]
    fn test_authenticated_load_ladder() {
        let auth = session(AuthPhase::Authenticated);

        assert_eq!(view_mode(&auth, &LoadState::Idle), ViewMode::LoadingData);
        assert_eq!(view_mode(&auth, &LoadState::Loading), ViewMode::LoadingData);
        assert_eq!(
            view_mode(&auth, &LoadState::Failed("boom".to_string())),
            ViewMode::DataError {
                message: "boom".to_string()
            }
        );
        assert_eq!(
            view_mode(&auth, &LoadState::Ready(DashboardData::default())),
            ViewMode::Dashboard {
                data: DashboardData::default(),
                refreshing: false
            }
        );
    }

    #[test]
    fn test_refreshing_is_dashboard_overlay() {
        let auth = session(AuthPhase::Authenticated);
        let mode = view_mode(&auth, &LoadState::Refreshing(DashboardData::default()));
        assert_eq!(
            mode,
            ViewMode::Dashboard {
                data: DashboardData::default(),
                refreshing: true
            }
        );
    }
}
