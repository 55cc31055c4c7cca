// Generation tokens for request/response roundtrips

/// Marks one started request
///
/// Only the token handed out by the most recent `start_pending` is accepted
/// when the response arrives. Older tokens belong to superseded requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToken {
    generation: u64,
}

/// Tracks the single request whose response may still be applied
#[derive(Debug, Default)]
pub struct Roundtrip {
    generation: u64,
    pending: Option<u64>,
}

impl Roundtrip {
    pub const fn new() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start the next request, superseding any request still pending
    pub fn start_pending(&mut self) -> PendingToken {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(self.generation);
        PendingToken {
            generation: self.generation,
        }
    }

    /// Finish a pending request
    ///
    /// Returns `false` if the token was superseded or the roundtrip was reset
    /// in the meantime, in which case the response must be discarded.
    pub fn finish_pending(&mut self, token: PendingToken) -> bool {
        if self.pending == Some(token.generation) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Forget the pending request without starting a new one
    pub fn reset(&mut self) {
        self.pending = None;
    }
}
