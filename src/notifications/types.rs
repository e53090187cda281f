//! Types for notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-side event shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: String,
    pub job_id: i64,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<ApplicationSnapshot>,
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        NotificationKind::classify(&self.message)
    }
}

/// Read-only copy of the application that triggered a notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSnapshot {
    pub id: i64,
    pub freelancer_name: String,
    pub freelancer_email: String,
    pub created_at: DateTime<Utc>,
}

/// What a notification is about, derived from its message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Applied,
    Accepted,
    Rejected,
    Other,
}

impl NotificationKind {
    pub fn classify(message: &str) -> Self {
        if message.contains("applied") {
            NotificationKind::Applied
        } else if message.contains("accepted") {
            NotificationKind::Accepted
        } else if message.contains("rejected") {
            NotificationKind::Rejected
        } else {
            NotificationKind::Other
        }
    }
}
