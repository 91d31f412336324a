//! Core types for helpdesk-requests-core

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a support request.
///
/// `new` is the only status a request can be created with by default;
/// the remaining states are set by administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(rename = "new")]
    New,
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl RequestStatus {
    /// Statuses an administrator may move a request to.
    pub const ADMIN_SETTABLE: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::Accepted,
        RequestStatus::Rejected,
        RequestStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::Pending => "Pending",
            RequestStatus::Accepted => "Accepted",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Completed => "Completed",
        }
    }

    pub fn is_admin_settable(&self) -> bool {
        Self::ADMIN_SETTABLE.contains(self)
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(RequestStatus::New),
            "Pending" => Ok(RequestStatus::Pending),
            "Accepted" => Ok(RequestStatus::Accepted),
            "Rejected" => Ok(RequestStatus::Rejected),
            "Completed" => Ok(RequestStatus::Completed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string outside the fixed set
#[derive(Debug, Clone)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status {:?}", self.0)
    }
}

/// A persisted support request
#[derive(Debug, Clone, Serialize)]
pub struct SupportRequest {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    /// Owning user; nullable, so orphaned requests stay representable.
    /// Once set it is never reassigned.
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        for s in ["new", "Pending", "Accepted", "Rejected", "Completed"] {
            assert_eq!(s.parse::<RequestStatus>().unwrap().as_str(), s);
        }
        assert!("Done".parse::<RequestStatus>().is_err());
        assert!("pending".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn new_is_not_admin_settable() {
        assert!(!RequestStatus::New.is_admin_settable());
        assert!(RequestStatus::Accepted.is_admin_settable());
    }
}
