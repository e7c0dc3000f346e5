use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One classified job-application email as served by the backend.
///
/// Records are immutable once fetched; the only local mutation is the
/// optimistic read flag applied after a successful mark-as-read call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: String,
    pub company: String,
    pub subject: String,
    pub sender: String,
    /// Backend serializes dates as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub read: bool,
}

/// Classification assigned by the backend's email classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Selection,
    Pending,
    Rejection,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Selection => "Selection",
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Rejection => "Rejection",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "selection" => Ok(ApplicationStatus::Selection),
            "pending" => Ok(ApplicationStatus::Pending),
            "rejection" => Ok(ApplicationStatus::Rejection),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// Aggregate counts computed by the backend over the classified set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total: u64,
    pub selection: u64,
    pub pending: u64,
    pub rejection: u64,
    pub unread: u64,
}

impl StatsSummary {
    /// Backend invariant: the three status buckets partition the total.
    /// The client trusts the values but exposes the check for diagnostics.
    pub fn is_consistent(&self) -> bool {
        self.selection + self.pending + self.rejection == self.total
    }
}

/// `GET /emails` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct EmailListResponse {
    #[serde(default)]
    pub emails: Vec<EmailRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub cached: bool,
}

/// `GET /auth/status` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}

/// `GET /auth/login` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub auth_url: String,
}
