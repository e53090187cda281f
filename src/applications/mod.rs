//! Job-owner view of applications: HTTP access and the sync client

mod types;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::Client;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::auth::{AuthHandle, Credentials};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::sync::{
    read_lock, write_lock, MutationOutcome, MutationStrategy, PollHandle, PollTarget, Poller,
    RefreshOutcome, Sequencer, SyncScope, Ticket,
};

pub use types::*;

/// Server access needed by [`ApplicationSync`]
#[async_trait]
pub trait ApplicationsApi: Send + Sync {
    /// Jobs posted by the token's owner, each with its applications
    async fn fetch_client_jobs(&self, token: &str) -> Result<Vec<ClientJob>, Error>;

    /// Accept or reject one application
    async fn update_status(
        &self,
        application_id: i64,
        decision: Decision,
        token: &str,
    ) -> Result<(), Error>;
}

/// Client for the applications endpoints
pub struct ApplicationsClient {
    client: Client,
    options: ClientOptions,
}

impl ApplicationsClient {
    /// Create a new ApplicationsClient
    pub fn new(client: Client, options: ClientOptions) -> Self {
        Self { client, options }
    }

    fn get_url(&self, path: &str) -> String {
        format!("{}/api/applications{}", self.options.base_url, path)
    }
}

#[async_trait]
impl ApplicationsApi for ApplicationsClient {
    async fn fetch_client_jobs(&self, token: &str) -> Result<Vec<ClientJob>, Error> {
        let mut envelope = Fetch::get(&self.client, &self.get_url("/client"))
            .header("X-Client-Info", &self.options.client_info)
            .bearer_auth(token)
            .timeout(self.options.request_timeout)
            .execute()
            .await?;

        if envelope.data.is_none() {
            return Ok(Vec::new());
        }
        envelope.take_data()
    }

    async fn update_status(
        &self,
        application_id: i64,
        decision: Decision,
        token: &str,
    ) -> Result<(), Error> {
        let url = self.get_url(&format!("/{}/status", application_id));
        Fetch::patch(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .bearer_auth(token)
            .timeout(self.options.request_timeout)
            .json(&StatusUpdate { status: decision })?
            .execute()
            .await?;
        Ok(())
    }
}

/// Applications screen state for a job owner.
///
/// Fetches are the screen's primary content, so failures are kept in
/// `ApplicationsView::error` and the stale job list is cleared. Status
/// changes are applied only after the server confirms them.
#[derive(Clone)]
pub struct ApplicationSync {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn ApplicationsApi>,
    auth: AuthHandle,
    scope: SyncScope,
    poller: Poller,
    sequencer: Sequencer,
    view: RwLock<ApplicationsView>,
}

const FETCH_FAILED: &str = "Failed to fetch applications";

impl ApplicationSync {
    /// Strategy used by [`ApplicationSync::update_application_status`]
    pub const UPDATE_STATUS: MutationStrategy = MutationStrategy::ServerConfirmed;

    pub fn new(
        api: Arc<dyn ApplicationsApi>,
        auth: AuthHandle,
        scope: &SyncScope,
        poll_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                auth,
                scope: scope.clone(),
                poller: Poller::new(poll_interval),
                sequencer: Sequencer::new(),
                view: RwLock::new(ApplicationsView::default()),
            }),
        }
    }

    /// Snapshot of the screen state
    pub fn view(&self) -> ApplicationsView {
        read_lock(&self.inner.view).clone()
    }

    pub fn jobs(&self) -> Vec<ClientJob> {
        read_lock(&self.inner.view).jobs.clone()
    }

    pub fn error(&self) -> Option<String> {
        read_lock(&self.inner.view).error.clone()
    }

    pub fn is_updating(&self, application_id: i64) -> bool {
        read_lock(&self.inner.view).updating.contains(&application_id)
    }

    pub fn scope(&self) -> &SyncScope {
        &self.inner.scope
    }

    /// Replace the job list with the server's copy
    pub async fn fetch_applications(&self) -> RefreshOutcome {
        let inner = &self.inner;
        write_lock(&inner.view).error = None;

        let ticket = inner.sequencer.issue();
        let tokens = match inner.auth.credentials() {
            Credentials::Ready { tokens, .. } => tokens,
            Credentials::Anonymous => {
                error!("[applications] no user id");
                let mut view = write_lock(&inner.view);
                view.loading = false;
                view.refreshing = false;
                return RefreshOutcome::Skipped;
            }
            Credentials::Pending { .. } => {
                error!("[applications] token provider not ready");
                return self.apply(ticket, Err(Error::AuthNotReady));
            }
        };

        let result = async {
            let token = tokens.token().await?;
            inner.api.fetch_client_jobs(&token).await
        }
        .await;

        self.apply(ticket, result)
    }

    /// Pull-to-refresh: flags `refreshing` for the duration of the fetch
    pub async fn refresh(&self) -> RefreshOutcome {
        write_lock(&self.inner.view).refreshing = true;
        self.fetch_applications().await
    }

    fn apply(&self, ticket: Ticket, result: Result<Vec<ClientJob>, Error>) -> RefreshOutcome {
        let inner = &self.inner;
        if !inner.scope.is_alive() {
            debug!("[applications] scope closed, dropping response #{}", ticket.value());
            return RefreshOutcome::Discarded;
        }

        let mut view = write_lock(&inner.view);
        view.loading = false;
        view.refreshing = false;

        if !inner.sequencer.commit(ticket) {
            debug!("[applications] response #{} is stale", ticket.value());
            return RefreshOutcome::Stale;
        }

        match result {
            Ok(jobs) => {
                debug!("[applications] loaded {} jobs", jobs.len());
                let count = jobs.len();
                view.jobs = jobs;
                view.error = None;
                RefreshOutcome::Applied { count }
            }
            Err(e) => {
                error!("[applications] error: {}", e);
                let message = match &e {
                    Error::Api { message, .. } if message.is_empty() => FETCH_FAILED.to_string(),
                    other => other.user_message(),
                };
                view.jobs.clear();
                view.error = Some(message);
                RefreshOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Accept or reject an application once the server agrees.
    ///
    /// Unknown ids are ignored without a request, and a second call for an id
    /// that is still being updated is refused.
    pub async fn update_application_status(
        &self,
        application_id: i64,
        decision: Decision,
    ) -> MutationOutcome {
        let inner = &self.inner;
        {
            let mut view = write_lock(&inner.view);
            if view.find_application(application_id).is_none() {
                debug!("[applications] unknown application {}", application_id);
                return MutationOutcome::NoOp;
            }
            if !view.updating.insert(application_id) {
                return MutationOutcome::InFlight;
            }
        }

        let result = async {
            let tokens = match inner.auth.credentials() {
                Credentials::Ready { tokens, .. } => tokens,
                _ => return Err(Error::AuthNotReady),
            };
            let token = tokens.token().await?;
            inner.api.update_status(application_id, decision, &token).await
        }
        .await;

        let mut view = write_lock(&inner.view);
        view.updating.remove(&application_id);

        if !inner.scope.is_alive() {
            return MutationOutcome::Discarded;
        }

        match result {
            Ok(()) => {
                inner.sequencer.invalidate_in_flight();
                if view.set_status(application_id, decision.into()) {
                    info!("[applications] application {} {:?}", application_id, decision);
                    MutationOutcome::Applied(Self::UPDATE_STATUS)
                } else {
                    MutationOutcome::NoOp
                }
            }
            Err(e) => {
                warn!(
                    "[applications] error updating application {} status: {}",
                    application_id, e
                );
                MutationOutcome::Rejected {
                    reason: e.user_message(),
                }
            }
        }
    }

    /// Poll on the configured interval until the scope closes or the handle is dropped
    pub fn start_polling(&self) -> PollHandle {
        info!("[applications] starting poller");
        self.inner
            .poller
            .spawn(&self.inner.scope, Arc::new(self.clone()))
    }
}

#[async_trait]
impl PollTarget for ApplicationSync {
    fn name(&self) -> &'static str {
        "applications"
    }

    fn is_ready(&self) -> bool {
        self.inner.auth.is_ready()
    }

    async fn poll(&self) {
        self.fetch_applications().await;
    }
}
