//! Configuration options for the QuickHands client

use std::env;
use std::time::Duration;

use crate::error::Error;
use crate::sync::MIN_POLL_PERIOD;

/// Base URL of the hosted QuickHands API
pub const DEFAULT_BASE_URL: &str = "https://quickhands-api.vercel.app";

/// Period of the notification and application polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration options for the QuickHands client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL every endpoint path is joined onto
    pub base_url: String,

    /// Fixed polling period
    pub poll_interval: Duration,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Value of the `X-Client-Info` header
    pub client_info: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Some(Duration::from_secs(30)),
            client_info: format!("quickhands-sync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Set the base URL
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the polling period, raised to [`MIN_POLL_PERIOD`] if shorter
    pub fn with_poll_interval(mut self, value: Duration) -> Self {
        self.poll_interval = value.max(MIN_POLL_PERIOD);
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the client info header value
    pub fn with_client_info(mut self, value: &str) -> Self {
        self.client_info = value.to_string();
        self
    }
}

/// Process environment required at startup.
///
/// The database connection string and the auth provider's publishable key
/// belong to external collaborators; the client only checks they exist.
#[derive(Debug, Clone)]
pub struct Environment {
    pub database_url: String,
    pub publishable_key: String,
    pub api_url: Option<String>,
}

impl Environment {
    pub const DATABASE_URL: &'static str = "DATABASE_URL";
    pub const PUBLISHABLE_KEY: &'static str = "EXPO_PUBLIC_CLERK_PUBLISHABLE_KEY";
    pub const API_URL: &'static str = "QUICKHANDS_API_URL";

    /// Load the environment, reading a `.env` file first if one exists.
    ///
    /// A missing or empty required variable is a fatal startup error.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the environment from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::config(format!("{} must be set", key)))
        };

        Ok(Self {
            database_url: required(Self::DATABASE_URL)?,
            publishable_key: required(Self::PUBLISHABLE_KEY)?,
            api_url: lookup(Self::API_URL).filter(|value| !value.trim().is_empty()),
        })
    }

    /// Client options pointing at the configured API
    pub fn client_options(&self) -> ClientOptions {
        match &self.api_url {
            Some(url) => ClientOptions::default().with_base_url(url),
            None => ClientOptions::default(),
        }
    }
}
