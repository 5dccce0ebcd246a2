//! Query cache bookkeeping
//!
//! Views hold their own copies of server data. The cache tracks which of those
//! copies are known fresh, and which have been invalidated and must be refetched
//! on next use. Invalidation is the only way one component tells another that its
//! data changed.
//!
//! A `QueryCache` is a cheap handle: clones share the same state, so a board and
//! the dialogs opened from it can all hold one.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

/// Invalidations remembered; older entries are dropped
pub const INVALIDATION_LOG_LEN: usize = 128;

/// Cached query identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Project snapshot (board)
    Project(Uuid),
    /// Project member list (assignee pickers)
    Memberships(Uuid),
    /// Invitable users for a project
    NonMemberships(Uuid),
    /// Single task (detail editor)
    Task(Uuid),
    /// Per-project status counts
    Analytics,
}

#[derive(Debug, Default)]
struct CacheState {
    fresh: HashSet<QueryKey>,
    invalidations: VecDeque<QueryKey>,
}

#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    inner: Arc<Mutex<CacheState>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records that `key` was just fetched
    pub fn mark_fresh(&self, key: QueryKey) {
        self.lock().fresh.insert(key);
    }

    /// Marks `key` stale and logs the invalidation
    pub fn invalidate(&self, key: QueryKey) {
        tracing::debug!(?key, "Query invalidated");

        let mut state = self.lock();
        state.fresh.remove(&key);
        if state.invalidations.len() == INVALIDATION_LOG_LEN {
            state.invalidations.pop_front();
        }
        state.invalidations.push_back(key);
    }

    /// True if `key` was never fetched or was invalidated since
    pub fn is_stale(&self, key: QueryKey) -> bool {
        !self.lock().fresh.contains(&key)
    }

    /// Recent invalidations, oldest first
    pub fn invalidations(&self) -> Vec<QueryKey> {
        self.lock().invalidations.iter().copied().collect()
    }

    pub fn clear_log(&self) {
        self.lock().invalidations.clear();
    }
}
