//! Job listing, lookup, search and creation

mod types;

use log::{debug, info};
use reqwest::Client;

use crate::auth::TokenSource;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

pub use types::*;

/// Client for the jobs endpoints
pub struct JobsClient {
    client: Client,
    options: ClientOptions,
}

impl JobsClient {
    /// Create a new JobsClient
    pub fn new(client: Client, options: ClientOptions) -> Self {
        Self { client, options }
    }

    fn get_url(&self, path: &str) -> String {
        format!("{}/api/jobs{}", self.options.base_url, path)
    }

    /// List jobs, newest first
    pub async fn list(&self, query: &JobQuery) -> Result<JobPage, Error> {
        let mut fetch = Fetch::get(&self.client, &self.get_url(""))
            .header("X-Client-Info", &self.options.client_info)
            .timeout(self.options.request_timeout);
        for (key, value) in query.to_pairs() {
            fetch = fetch.query_pair(key, &value);
        }

        let mut envelope = fetch.execute().await?;
        let jobs: Vec<JobRecord> = envelope.take_data()?;
        let pagination = envelope
            .pagination
            .unwrap_or_else(|| query.fallback_pagination(jobs.len()));

        Ok(JobPage { jobs, pagination })
    }

    /// Fetch a single job by id
    pub async fn get(&self, id: i64) -> Result<JobRecord, Error> {
        let mut envelope = Fetch::get(&self.client, &self.get_url(""))
            .header("X-Client-Info", &self.options.client_info)
            .query_pair("id", &id.to_string())
            .timeout(self.options.request_timeout)
            .execute()
            .await?;

        envelope.take_data()
    }

    /// Free-text search; a blank query returns nothing without a request
    pub async fn search(&self, query: &str) -> Result<Vec<JobRecord>, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut envelope = Fetch::get(&self.client, &self.get_url("/search"))
            .header("X-Client-Info", &self.options.client_info)
            .query_pair("q", query)
            .timeout(self.options.request_timeout)
            .execute()
            .await?;

        if envelope.data.is_none() {
            return Ok(Vec::new());
        }
        envelope.take_data()
    }

    /// Post a new job.
    ///
    /// The form is validated first and nothing is sent if it fails. A bearer
    /// token is attached when `tokens` is ready.
    pub async fn create(&self, job: &NewJob, tokens: &TokenSource) -> Result<JobRecord, Error> {
        job.validate()?;

        let token = match tokens {
            TokenSource::Ready(_) => Some(tokens.token().await?),
            TokenSource::NotReady => {
                debug!("[jobs] creating job without a bearer token");
                None
            }
        };

        let mut envelope = Fetch::post(&self.client, &self.get_url(""))
            .header("X-Client-Info", &self.options.client_info)
            .maybe_bearer_auth(token.as_deref())
            .timeout(self.options.request_timeout)
            .json(job)?
            .execute()
            .await?;

        let record: JobRecord = envelope.take_data()?;
        info!("[jobs] created job {} ({})", record.id, record.service_type);
        Ok(record)
    }
}
