//! Notification feed: HTTP access and the polling sync client

mod types;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::auth::{AuthHandle, Credentials};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::sync::{
    read_lock, write_lock, MutationOutcome, MutationStrategy, PollHandle, PollTarget, Poller,
    RefreshOutcome, Sequencer, SyncScope,
};

pub use types::*;

/// Server access needed by [`NotificationSync`]
#[async_trait]
pub trait NotificationsApi: Send + Sync {
    /// All notifications for `user_id`, newest first as ordered by the server
    async fn fetch_for_user(&self, user_id: &str, token: &str) -> Result<Vec<Notification>, Error>;
}

/// Client for the notifications endpoint
pub struct NotificationsClient {
    client: Client,
    options: ClientOptions,
}

impl NotificationsClient {
    /// Create a new NotificationsClient
    pub fn new(client: Client, options: ClientOptions) -> Self {
        Self { client, options }
    }

    fn get_url(&self, user_id: &str) -> String {
        format!(
            "{}/api/notifications/by-clerk/{}",
            self.options.base_url, user_id
        )
    }
}

#[async_trait]
impl NotificationsApi for NotificationsClient {
    async fn fetch_for_user(&self, user_id: &str, token: &str) -> Result<Vec<Notification>, Error> {
        let mut envelope = Fetch::get(&self.client, &self.get_url(user_id))
            .header("X-Client-Info", &self.options.client_info)
            .bearer_auth(token)
            .timeout(self.options.request_timeout)
            .execute()
            .await?;

        envelope.take_notifications()
    }
}

/// Locally cached notification feed for one signed-in user.
///
/// Refreshes replace the whole collection with the server's copy. Marking
/// as read is local only, so a later refresh brings `read: false` back for
/// notifications the server still reports as unread.
#[derive(Clone)]
pub struct NotificationSync {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn NotificationsApi>,
    auth: AuthHandle,
    scope: SyncScope,
    poller: Poller,
    sequencer: Sequencer,
    notifications: RwLock<Vec<Notification>>,
}

impl NotificationSync {
    /// Strategy used by [`NotificationSync::mark_as_read`]
    pub const MARK_AS_READ: MutationStrategy = MutationStrategy::LocalOnly;

    pub fn new(
        api: Arc<dyn NotificationsApi>,
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
                notifications: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Snapshot of the local collection
    pub fn notifications(&self) -> Vec<Notification> {
        read_lock(&self.inner.notifications).clone()
    }

    /// Number of local notifications not yet read
    pub fn unread_count(&self) -> usize {
        read_lock(&self.inner.notifications)
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    pub fn scope(&self) -> &SyncScope {
        &self.inner.scope
    }

    /// Best-effort refresh from the server.
    ///
    /// Never fails: a missing user or token provider skips the request, and
    /// request failures are logged while the local collection stays as it was.
    pub async fn fetch_notifications(&self) -> RefreshOutcome {
        let inner = &self.inner;
        let (user_id, tokens) = match inner.auth.credentials() {
            Credentials::Ready { user_id, tokens } => (user_id, tokens),
            Credentials::Anonymous => {
                debug!("[notifications] no user id, skipping fetch");
                return RefreshOutcome::Skipped;
            }
            Credentials::Pending { .. } => {
                warn!("[notifications] token provider not ready yet");
                return RefreshOutcome::Skipped;
            }
        };

        if !inner.scope.is_alive() {
            return RefreshOutcome::Discarded;
        }

        let ticket = inner.sequencer.issue();
        let result = async {
            let token = tokens.token().await?;
            inner.api.fetch_for_user(&user_id, &token).await
        }
        .await;

        if !inner.scope.is_alive() {
            debug!("[notifications] scope closed, dropping response #{}", ticket.value());
            return RefreshOutcome::Discarded;
        }

        match result {
            Ok(notifications) => {
                let mut current = write_lock(&inner.notifications);
                if !inner.sequencer.commit(ticket) {
                    debug!("[notifications] response #{} is stale", ticket.value());
                    return RefreshOutcome::Stale;
                }
                let count = notifications.len();
                *current = notifications;
                RefreshOutcome::Applied { count }
            }
            Err(e) => {
                warn!("[notifications] error fetching: {}", e);
                RefreshOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// User-triggered refresh; completes once the attempt has finished
    pub async fn refresh_notifications(&self) -> RefreshOutcome {
        self.fetch_notifications().await
    }

    /// Mark one notification as read, locally only
    pub fn mark_as_read(&self, notification_id: i64) -> MutationOutcome {
        let mut notifications = write_lock(&self.inner.notifications);
        match notifications.iter_mut().find(|n| n.id == notification_id) {
            Some(notification) if !notification.read => {
                notification.read = true;
                MutationOutcome::Applied(Self::MARK_AS_READ)
            }
            _ => MutationOutcome::NoOp,
        }
    }

    /// Empty the local collection
    pub fn clear_notifications(&self) {
        write_lock(&self.inner.notifications).clear();
    }

    /// Poll on the configured interval until the scope closes or the handle is dropped
    pub fn start_polling(&self) -> PollHandle {
        info!("[notifications] starting poller");
        self.inner
            .poller
            .spawn(&self.inner.scope, Arc::new(self.clone()))
    }
}

#[async_trait]
impl PollTarget for NotificationSync {
    fn name(&self) -> &'static str {
        "notifications"
    }

    fn is_ready(&self) -> bool {
        self.inner.auth.is_ready()
    }

    async fn poll(&self) {
        self.fetch_notifications().await;
    }
}
