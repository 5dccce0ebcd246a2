//! Notification toasts
//!
//! A [`ToastCenter`] is owned by whoever creates the board and handed to the
//! components that report progress. There is no global instance. A toast created
//! as `Loading` can later be resolved in place to `Success` or `Error` under the
//! same id, which is how a pending persist turns into its outcome.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Visible toasts kept at most; the oldest resolved ones go first
pub const MAX_TOASTS: usize = 16;

/// Toast identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,

    /// Secondary line, e.g. the server's error message
    pub description: Option<String>,
}

#[derive(Debug, Default)]
struct ToastState {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastState {
    fn upsert(
        &mut self,
        id: Option<ToastId>,
        kind: ToastKind,
        message: String,
        description: Option<String>,
    ) -> ToastId {
        if let Some(id) = id {
            if let Some(toast) = self.toasts.iter_mut().find(|t| t.id == id) {
                toast.kind = kind;
                toast.message = message;
                toast.description = description;
                return id;
            }
        }

        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.toasts.push(Toast {
            id,
            kind,
            message,
            description,
        });
        self.evict();
        id
    }

    fn evict(&mut self) {
        while self.toasts.len() > MAX_TOASTS {
            let oldest = self
                .toasts
                .iter()
                .position(|t| t.kind != ToastKind::Loading)
                .unwrap_or(0);
            self.toasts.remove(oldest);
        }
    }
}

/// Shared toast list; clones refer to the same toasts
#[derive(Debug, Clone, Default)]
pub struct ToastCenter {
    inner: Arc<Mutex<ToastState>>,
}

impl ToastCenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ToastState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shows a pending indicator
    pub fn loading(&self, message: impl Into<String>) -> ToastId {
        self.lock().upsert(None, ToastKind::Loading, message.into(), None)
    }

    /// Shows a success toast, replacing `replace` if it is still visible
    pub fn success(&self, message: impl Into<String>, replace: Option<ToastId>) -> ToastId {
        let message = message.into();
        tracing::info!(%message, "Toast: success");
        self.lock().upsert(replace, ToastKind::Success, message, None)
    }

    /// Shows an error toast, replacing `replace` if it is still visible
    pub fn error(
        &self,
        message: impl Into<String>,
        description: Option<String>,
        replace: Option<ToastId>,
    ) -> ToastId {
        let message = message.into();
        tracing::warn!(%message, description = description.as_deref(), "Toast: error");
        self.lock().upsert(replace, ToastKind::Error, message, description)
    }

    /// Removes a toast; returns whether it was visible
    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut state = self.lock();
        let before = state.toasts.len();
        state.toasts.retain(|t| t.id != id);
        state.toasts.len() != before
    }

    /// Drops every toast that is no longer loading; returns how many went
    pub fn clear_resolved(&self) -> usize {
        let mut state = self.lock();
        let before = state.toasts.len();
        state.toasts.retain(|t| t.kind == ToastKind::Loading);
        before - state.toasts.len()
    }

    pub fn get(&self, id: ToastId) -> Option<Toast> {
        self.lock().toasts.iter().find(|t| t.id == id).cloned()
    }

    /// Visible toasts, oldest first
    pub fn snapshot(&self) -> Vec<Toast> {
        self.lock().toasts.clone()
    }

    /// Most recently created visible toast
    pub fn latest(&self) -> Option<Toast> {
        self.lock().toasts.last().cloned()
    }
}
