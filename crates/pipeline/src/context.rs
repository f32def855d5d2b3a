//! Conversation context — the rolling window of recent exchanges.
//!
//! The window is the only shared mutable state in the pipeline. Every
//! access (append, snapshot, evict) takes one exclusive lock, held only
//! for the duration of the operation and never across an await point.
//! The relative order of entries across concurrent requests is therefore
//! the lock-acquisition order, not request start or completion order.
//!
//! Eviction keeps pairs together: when the bound of `2 × max_pairs`
//! entries is exceeded, the oldest user+assistant pair is removed as a
//! unit. A failed generation leaves a user turn without a reply; such a
//! lone half is evicted on its own, so the window never starts with an
//! assistant turn.

use std::sync::{Arc, Mutex, MutexGuard};

use ragchat_core::exchange::{Exchange, Speaker};

/// Default number of exchange-pairs retained in the window.
pub const DEFAULT_MAX_PAIRS: usize = 5;

/// A cheaply cloneable handle to the shared conversation window.
///
/// Construct one at startup and hand clones to every request handler;
/// tests get a fresh instance each for isolation.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    window: Arc<Mutex<Vec<Exchange>>>,
    max_pairs: usize,
}

impl ConversationContext {
    /// Create an empty window retaining at most `max_pairs` exchange-pairs.
    pub fn new(max_pairs: usize) -> Self {
        Self {
            window: Arc::new(Mutex::new(Vec::with_capacity(max_pairs * 2))),
            max_pairs,
        }
    }

    /// The configured pair capacity.
    pub fn max_pairs(&self) -> usize {
        self.max_pairs
    }

    // A poisoned lock only means another thread panicked mid-append of a
    // single element; the window itself is still a valid Vec, so recover
    // the guard rather than propagating the panic.
    fn lock(&self) -> MutexGuard<'_, Vec<Exchange>> {
        self.window.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a user turn to the end of the window.
    pub fn append_user(&self, text: impl Into<String>) {
        self.lock().push(Exchange::user(text));
    }

    /// Append an assistant turn to the end of the window.
    pub fn append_assistant(&self, text: impl Into<String>) {
        self.lock().push(Exchange::assistant(text));
    }

    /// Remove oldest exchanges until the window is within its bound.
    ///
    /// Eviction is speaker-aware: each round drops the leading user turn
    /// together with everything up to the next user turn. For complete
    /// pairs that is exactly one user+assistant pair; a failed generation
    /// leaves a lone user half, which is then evicted on its own rather
    /// than shifting pair alignment. The front of a non-empty window is
    /// therefore always a user turn.
    ///
    /// When eviction runs after every assistant append the bound is
    /// exceeded by at most one pair, but the loop does not rely on that.
    pub fn evict_if_over_capacity(&self) {
        let mut window = self.lock();
        while window.len() > self.max_pairs * 2 {
            let group_end = window
                .iter()
                .skip(1)
                .position(|e| e.speaker == Speaker::User)
                .map(|i| i + 1)
                .unwrap_or(window.len());
            window.drain(..group_end);
        }
    }

    /// A copy of the current window contents, taken under the lock.
    ///
    /// The assembler iterates this copy so a concurrent request can never
    /// mutate the entries mid-iteration.
    pub fn snapshot(&self) -> Vec<Exchange> {
        self.lock().clone()
    }

    /// Current number of entries (turns, not pairs).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the window holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAIRS)
    }
}
