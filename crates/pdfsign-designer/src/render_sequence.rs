//! Ordering for page render requests.
//!
//! A new render implicitly supersedes any render still in flight. Each
//! request gets a monotonically increasing ticket; a completion is applied
//! only if its ticket is the latest one issued.

use std::fmt;

use tracing::debug;

/// Tag attached to one render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTicket(u64);

impl RenderTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RenderTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct RenderSequencer {
    latest: u64,
    in_flight: bool,
}

impl RenderSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the ticket for a new render, superseding all earlier ones.
    pub fn issue(&mut self) -> RenderTicket {
        self.latest += 1;
        self.in_flight = true;
        debug!("Issued render#{}", self.latest);
        RenderTicket(self.latest)
    }

    /// Whether `ticket` belongs to the most recent request.
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Marks `ticket` complete. Returns false (and changes nothing) for a
    /// stale ticket or when nothing is in flight.
    pub fn complete(&mut self, ticket: RenderTicket) -> bool {
        if !self.in_flight || !self.is_current(ticket) {
            return false;
        }
        self.in_flight = false;
        true
    }

    /// Abandons the request in flight. Ticket numbering continues, so any
    /// ticket issued before the cancel stays stale.
    pub fn cancel(&mut self) {
        if self.in_flight {
            debug!("Cancelled render#{}", self.latest);
        }
        self.in_flight = false;
    }

    /// Whether the latest request has not completed yet.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
