//! Results reported by sync operations instead of errors

/// How a local mutation relates to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStrategy {
    /// Applied locally without any server write
    LocalOnly,
    /// Applied locally only after the server confirmed it
    ServerConfirmed,
}

impl MutationStrategy {
    pub fn requires_server(self) -> bool {
        matches!(self, MutationStrategy::ServerConfirmed)
    }
}

/// Result of a user-initiated mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Local state changed
    Applied(MutationStrategy),
    /// Nothing to change: unknown id or state already matches
    NoOp,
    /// The same target is already being updated
    InFlight,
    /// The server or transport refused; local state is untouched
    Rejected { reason: String },
    /// The owning scope closed before the server answered
    Discarded,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied(_))
    }
}

/// Result of one refresh attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The server collection replaced the local one
    Applied { count: usize },
    /// Preconditions not met (no user or token provider); no request sent
    Skipped,
    /// The request failed; local state is untouched
    Failed { reason: String },
    /// A newer response had already been applied
    Stale,
    /// The owning scope closed before the response arrived
    Discarded,
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }
}
