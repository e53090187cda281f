use tokio_util::sync::CancellationToken;

/// Lifetime of a mounted screen or context.
///
/// Every sync client and poller is bound to one scope. Closing it stops the
/// pollers, cancels in-flight ticks and makes late responses be discarded.
/// Child scopes close with their parent but can also be closed on their own.
#[derive(Debug, Clone, Default)]
pub struct SyncScope {
    token: CancellationToken,
}

impl SyncScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_alive(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Resolves once the scope is closed
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Close the scope when the returned guard is dropped
    pub fn guard(&self) -> ScopeGuard {
        ScopeGuard(self.clone())
    }
}

/// Closes its scope on drop
#[derive(Debug)]
pub struct ScopeGuard(SyncScope);

impl ScopeGuard {
    pub fn scope(&self) -> &SyncScope {
        &self.0
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}
