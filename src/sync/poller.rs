use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::scope::SyncScope;

/// Something refreshed on a fixed interval
#[async_trait]
pub trait PollTarget: Send + Sync + 'static {
    /// Label used in log lines
    fn name(&self) -> &'static str;

    /// Whether a poll may issue requests right now
    fn is_ready(&self) -> bool;

    /// One refresh attempt; failures are handled by the target
    async fn poll(&self);
}

/// Fixed-interval poller.
///
/// The first tick fires immediately. Ticks where the target is not ready are
/// skipped without any request; a target becoming ready is picked up at the
/// next tick. Each tick's poll runs as its own task so a slow request can
/// overlap the following tick.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    period: Duration,
}

/// Shortest period a poller will run with; shorter periods are raised to it
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(1);

impl Poller {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_POLL_PERIOD),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start polling `target` until `parent` closes or the handle is stopped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<T: PollTarget>(&self, parent: &SyncScope, target: Arc<T>) -> PollHandle {
        let scope = parent.child();
        let loop_scope = scope.clone();
        let period = self.period;

        let task = tokio::spawn(async move {
            info!("[{}] polling every {:?}", target.name(), period);
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = loop_scope.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                if !target.is_ready() {
                    debug!("[{}] not ready, skipping tick", target.name());
                    continue;
                }

                let tick_scope = loop_scope.clone();
                let tick_target = target.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = tick_scope.cancelled() => {
                            debug!("[{}] in-flight poll cancelled", tick_target.name());
                        }
                        _ = tick_target.poll() => {}
                    }
                });
            }

            info!("[{}] polling stopped", target.name());
        });

        PollHandle {
            scope,
            task: Some(task),
        }
    }
}

/// Running poller; stops on `stop()` or drop
#[derive(Debug)]
pub struct PollHandle {
    scope: SyncScope,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn stop(&self) {
        self.scope.close();
    }

    pub fn is_running(&self) -> bool {
        self.scope.is_alive()
            && self
                .task
                .as_ref()
                .map(|task| !task.is_finished())
                .unwrap_or(false)
    }

    /// Stop and wait for the polling loop to exit
    pub async fn shutdown(mut self) {
        self.scope.close();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.scope.close();
    }
}
