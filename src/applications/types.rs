//! Types for client-owned jobs and their applications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::de::de_price;

/// Lifecycle of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A job owner's answer to an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

impl From<Decision> for ApplicationStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accepted => ApplicationStatus::Accepted,
            Decision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// Body of `PATCH /api/applications/{id}/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: Decision,
}

/// A specialist's bid on a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub job_id: i64,
    pub freelancer_clerk_id: String,
    pub freelancer_name: String,
    pub freelancer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// A job as seen by the client who posted it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientJob {
    pub id: i64,
    pub service_type: String,
    #[serde(deserialize_with = "de_price")]
    pub max_price: f64,
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl ClientJob {
    pub fn pending_count(&self) -> usize {
        self.applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
            .count()
    }
}

/// What the applications screen renders
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationsView {
    pub jobs: Vec<ClientJob>,
    /// Banner text for the last failed fetch
    pub error: Option<String>,
    /// True until the first fetch attempt finishes
    pub loading: bool,
    /// True while a pull-to-refresh is running
    pub refreshing: bool,
    /// Applications with a status change in flight
    pub updating: BTreeSet<i64>,
}

impl Default for ApplicationsView {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            error: None,
            loading: true,
            refreshing: false,
            updating: BTreeSet::new(),
        }
    }
}

impl ApplicationsView {
    pub fn find_application(&self, application_id: i64) -> Option<&Application> {
        self.jobs
            .iter()
            .flat_map(|job| job.applications.iter())
            .find(|a| a.id == application_id)
    }

    /// Set the status of one application, leaving everything else untouched
    pub(crate) fn set_status(&mut self, application_id: i64, status: ApplicationStatus) -> bool {
        for job in &mut self.jobs {
            if let Some(app) = job.applications.iter_mut().find(|a| a.id == application_id) {
                app.status = status;
                return true;
            }
        }
        false
    }
}
