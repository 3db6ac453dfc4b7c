use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one render pass. Only the most recently issued ticket is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PassTicket(u64);

impl PassTicket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Latest-wins bookkeeping for render passes sharing one mount point.
///
/// A pass calls [`RenderSession::begin`] before awaiting its data and checks
/// [`RenderSession::is_current`] once the data arrives; a pass that was overtaken drops its
/// result instead of touching the target.
#[derive(Debug, Default)]
pub struct RenderSession {
    latest: AtomicU64,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> PassTicket {
        PassTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: PassTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
