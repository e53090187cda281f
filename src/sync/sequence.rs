use std::sync::atomic::{AtomicU64, Ordering};

/// Position of a request in dispatch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Orders responses by the time their requests were dispatched.
///
/// A response may only be applied if no later-dispatched response has been
/// applied before it. Callers must `commit` while holding the lock of the
/// state they are about to replace.
#[derive(Debug, Default)]
pub struct Sequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a request about to be sent
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether a response for `ticket` would still be applied
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 > self.applied.load(Ordering::SeqCst)
    }

    /// Record `ticket` as applied; false if a newer one already was
    pub fn commit(&self, ticket: Ticket) -> bool {
        self.applied.fetch_max(ticket.0, Ordering::SeqCst) < ticket.0
    }

    /// Make every ticket issued so far stale.
    ///
    /// Used after a server-confirmed mutation so a fetch dispatched before it
    /// cannot overwrite the confirmed state.
    pub fn invalidate_in_flight(&self) {
        let issued = self.issued.load(Ordering::SeqCst);
        self.applied.fetch_max(issued, Ordering::SeqCst);
    }

    pub fn last_applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }
}
