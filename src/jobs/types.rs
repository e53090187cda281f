//! Types for job postings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::de::{de_opt_price, de_services};
use crate::error::Error;
use crate::fetch::Pagination;

/// Page size the server uses when `limit` is not given
pub const DEFAULT_LIMIT: u32 = 10;

/// A posted job as returned by listing, lookup, search and creation.
///
/// Rows come straight from the database on some deployments, so the
/// snake_case column names are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: i64,
    #[serde(alias = "service_type")]
    pub service_type: String,
    #[serde(default, alias = "selected_services", deserialize_with = "de_services")]
    pub selected_services: Vec<String>,
    #[serde(default, alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
    #[serde(default, alias = "max_price", deserialize_with = "de_opt_price")]
    pub max_price: Option<f64>,
    #[serde(default, alias = "specialist_choice")]
    pub specialist_choice: Option<String>,
    #[serde(default, alias = "additional_info")]
    pub additional_info: Option<String>,
    #[serde(default)]
    pub documents: Option<String>,
    #[serde(default, alias = "clerk_id")]
    pub clerk_id: Option<String>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The multi-step job posting form, sent as-is to `POST /api/jobs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub service_type: String,
    pub selected_services: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    /// As typed by the user
    pub max_price: String,
    pub specialist_choice: String,
    pub additional_info: String,
    pub documents: String,
}

impl NewJob {
    pub fn new(service_type: &str) -> Self {
        Self {
            service_type: service_type.to_string(),
            ..Default::default()
        }
    }

    pub fn with_dates(mut self, start_date: &str, end_date: &str) -> Self {
        self.start_date = start_date.to_string();
        self.end_date = end_date.to_string();
        self
    }

    pub fn with_max_price(mut self, max_price: &str) -> Self {
        self.max_price = max_price.to_string();
        self
    }

    pub fn with_specialist_choice(mut self, choice: &str) -> Self {
        self.specialist_choice = choice.to_string();
        self
    }

    pub fn with_additional_info(mut self, info: &str) -> Self {
        self.additional_info = info.to_string();
        self
    }

    /// Check the form before anything is sent
    pub fn validate(&self) -> Result<(), Error> {
        if self.service_type.trim().is_empty() {
            return Err(Error::validation("Please enter a service type"));
        }
        Ok(())
    }

    /// Select `service` if it is not selected, deselect it otherwise
    pub fn toggle_service(&mut self, service: &str) {
        if let Some(pos) = self.selected_services.iter().position(|s| s == service) {
            self.selected_services.remove(pos);
        } else {
            self.selected_services.push(service.to_string());
        }
    }

    /// Clear the form after a successful submission
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Filters for `GET /api/jobs`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    pub clerk_id: Option<String>,
    pub service_type: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl JobQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clerk_id(mut self, clerk_id: &str) -> Self {
        self.clerk_id = Some(clerk_id.to_string());
        self
    }

    pub fn service_type(mut self, service_type: &str) -> Self {
        self.service_type = Some(service_type.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Query-string pairs in a stable order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(clerk_id) = &self.clerk_id {
            pairs.push(("clerkId", clerk_id.clone()));
        }
        if let Some(service_type) = &self.service_type {
            pairs.push(("serviceType", service_type.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }

    /// Pagination to assume when the server omits it
    pub(crate) fn fallback_pagination(&self, total: usize) -> Pagination {
        Pagination {
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            offset: self.offset.unwrap_or(0),
            total: u32::try_from(total).unwrap_or(u32::MAX),
        }
    }
}

/// One page of `GET /api/jobs`
#[derive(Debug, Clone, PartialEq)]
pub struct JobPage {
    pub jobs: Vec<JobRecord>,
    pub pagination: Pagination,
}
