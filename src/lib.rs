//! QuickHands sync client library
//!
//! A Rust client for the QuickHands local-services marketplace API. It keeps a
//! locally cached view of a user's notifications and of the applications on
//! the jobs they posted, refreshed by fixed-interval polling, and gives access
//! to the job listing, search and posting endpoints.

pub mod applications;
pub mod auth;
pub mod config;
mod de;
pub mod error;
pub mod fetch;
pub mod format;
pub mod jobs;
pub mod notifications;
pub mod sync;

use reqwest::Client;
use std::sync::Arc;

use crate::applications::{ApplicationSync, ApplicationsClient};
use crate::auth::AuthHandle;
use crate::config::{ClientOptions, Environment};
use crate::error::Error;
use crate::jobs::JobsClient;
use crate::notifications::{NotificationSync, NotificationsClient};
use crate::sync::SyncScope;

/// The main entry point for the QuickHands client
pub struct QuickHands {
    /// HTTP client shared by every endpoint client
    pub http_client: Client,
    /// Identity shared by the sync clients
    pub auth: AuthHandle,
    /// Client options
    pub options: ClientOptions,
}

impl QuickHands {
    /// Create a new client against the default API with default options
    ///
    /// # Example
    ///
    /// ```
    /// use quickhands_sync::QuickHands;
    ///
    /// let quickhands = QuickHands::new();
    /// assert!(!quickhands.auth().is_ready());
    /// ```
    pub fn new() -> Self {
        Self::new_with_options(ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use quickhands_sync::{QuickHands, config::ClientOptions};
    /// use std::time::Duration;
    ///
    /// let options = ClientOptions::default()
    ///     .with_base_url("http://localhost:8081")
    ///     .with_poll_interval(Duration::from_secs(5));
    /// let quickhands = QuickHands::new_with_options(options);
    /// ```
    pub fn new_with_options(options: ClientOptions) -> Self {
        Self {
            http_client: Client::new(),
            auth: AuthHandle::new(),
            options,
        }
    }

    /// Create a client from the process environment.
    ///
    /// Fails when the required startup variables are missing.
    pub fn from_env() -> Result<Self, Error> {
        let environment = Environment::from_env()?;
        Ok(Self::new_with_options(environment.client_options()))
    }

    /// The shared identity handle; update it as sign-in completes
    pub fn auth(&self) -> &AuthHandle {
        &self.auth
    }

    pub fn notifications(&self) -> NotificationsClient {
        NotificationsClient::new(self.http_client.clone(), self.options.clone())
    }

    pub fn applications(&self) -> ApplicationsClient {
        ApplicationsClient::new(self.http_client.clone(), self.options.clone())
    }

    pub fn jobs(&self) -> JobsClient {
        JobsClient::new(self.http_client.clone(), self.options.clone())
    }

    /// Notification sync client bound to `scope`
    pub fn notification_sync(&self, scope: &SyncScope) -> NotificationSync {
        NotificationSync::new(
            Arc::new(self.notifications()),
            self.auth.clone(),
            scope,
            self.options.poll_interval,
        )
    }

    /// Application sync client bound to `scope`
    pub fn application_sync(&self, scope: &SyncScope) -> ApplicationSync {
        ApplicationSync::new(
            Arc::new(self.applications()),
            self.auth.clone(),
            scope,
            self.options.poll_interval,
        )
    }
}

impl Default for QuickHands {
    fn default() -> Self {
        Self::new()
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::applications::{ApplicationStatus, ApplicationSync, ClientJob, Decision};
    pub use crate::auth::{AuthHandle, FnToken, StaticToken, TokenProvider, TokenSource};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::jobs::{JobQuery, NewJob};
    pub use crate::notifications::{Notification, NotificationSync};
    pub use crate::sync::{MutationOutcome, MutationStrategy, RefreshOutcome, SyncScope};
    pub use crate::QuickHands;
}
