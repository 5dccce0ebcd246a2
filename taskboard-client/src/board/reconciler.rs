//! Drag-and-drop status reconciliation
//!
//! [`BoardState`] is the board's local copy of the project's tasks. A drop onto a
//! different column rewrites that copy at once and marks the task provisional.
//! [`BoardController`] then persists the change, reports progress through the
//! toast centre, and re-derives the board from a fresh server snapshot whether
//! the persist succeeded or not. Local state is never trusted past that refetch.
//!
//! Drags of the same task are coalesced: a newer drop cancels the persist of the
//! previous one. If the superseded request has not been sent it never is; if it
//! has, its outcome is discarded and its loading toast removed.
//!
//! The persist path invalidates no cached queries. The board itself reacts to
//! invalidation through [`BoardController::revalidate`], which refetches once
//! another view (the editor, the task creator) has marked the project stale.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use taskboard_shared::models::{
    project::ProjectDetail,
    task::{TaskStatus, TaskWithAssignee},
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::view_model::BoardColumns;
use crate::api::ProjectApi;
use crate::cache::{QueryCache, QueryKey};
use crate::error::{ClientError, ClientResult};
use crate::toast::ToastCenter;

pub const PERSIST_LOADING_MESSAGE: &str = "Updating task status...";
pub const PERSIST_SUCCESS_MESSAGE: &str = "Updated task successfully!";
pub const PERSIST_ERROR_MESSAGE: &str = "Failed to update task";

/// What a drag-release did to the local copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Released outside any column
    NoTarget,
    /// Released over something that is not a status column
    UnknownColumn,
    /// The dragged task is not on this board
    UnknownTask,
    /// Dropped back onto its own column
    SameColumn,
    /// Optimistically moved
    Moved { from: TaskStatus, to: TaskStatus },
}

/// Local board copy
#[derive(Debug, Clone)]
pub struct BoardState {
    project_id: Uuid,
    tasks: Vec<TaskWithAssignee>,
    columns: BoardColumns,
    active: Option<Uuid>,
    provisional: HashSet<Uuid>,
}

impl BoardState {
    pub fn new(project: &ProjectDetail) -> Self {
        Self {
            project_id: project.id,
            tasks: project.tasks.clone(),
            columns: BoardColumns::derive(&project.tasks),
            active: None,
            provisional: HashSet::new(),
        }
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    /// Records the task being dragged; false if it is not on the board
    pub fn drag_start(&mut self, task_id: Uuid) -> bool {
        if self.task(task_id).is_none() {
            return false;
        }
        self.active = Some(task_id);
        true
    }

    /// Task shown in the drag preview
    pub fn active(&self) -> Option<&TaskWithAssignee> {
        self.active.and_then(|id| self.task(id))
    }

    pub fn drag_cancel(&mut self) {
        self.active = None;
    }

    /// Handles a drag-release of `task_id` over the column `over`
    pub fn drag_end(&mut self, task_id: Uuid, over: Option<&str>) -> DragOutcome {
        self.active = None;

        let Some(over) = over else {
            return DragOutcome::NoTarget;
        };
        let Some(to) = TaskStatus::from_column_id(over) else {
            return DragOutcome::UnknownColumn;
        };
        let Some(from) = self.task(task_id).map(|t| t.status) else {
            return DragOutcome::UnknownTask;
        };

        if from == to {
            return DragOutcome::SameColumn;
        }

        self.apply_optimistic(task_id, to);
        DragOutcome::Moved { from, to }
    }

    /// Rewrites a task's status locally and marks it provisional
    ///
    /// Returns the previous status, or `None` if the task is unknown.
    pub fn apply_optimistic(&mut self, task_id: Uuid, status: TaskStatus) -> Option<TaskStatus> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        let previous = std::mem::replace(&mut task.status, status);

        self.provisional.insert(task_id);
        self.columns = BoardColumns::derive(&self.tasks);
        Some(previous)
    }

    /// Replaces the local copy with the server's, dropping optimistic edits
    ///
    /// Moves listed in `in_flight` have not been answered yet; they are laid
    /// back over the snapshot and stay provisional.
    pub fn sync_from_server(&mut self, project: &ProjectDetail, in_flight: &[(Uuid, TaskStatus)]) {
        self.tasks = project.tasks.clone();
        self.provisional.clear();

        for (task_id, status) in in_flight {
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == *task_id) {
                task.status = *status;
                self.provisional.insert(*task_id);
            }
        }
        self.columns = BoardColumns::derive(&self.tasks);

        if self.active.is_some_and(|id| self.task(id).is_none()) {
            self.active = None;
        }
    }

    pub fn columns(&self) -> &BoardColumns {
        &self.columns
    }

    pub fn tasks(&self) -> &[TaskWithAssignee] {
        &self.tasks
    }

    pub fn task(&self, task_id: Uuid) -> Option<&TaskWithAssignee> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// True if the task's local status has not been confirmed by a refetch
    pub fn is_provisional(&self, task_id: Uuid) -> bool {
        self.provisional.contains(&task_id)
    }
}

/// A status change waiting to be persisted
#[derive(Debug, Clone)]
pub struct PendingPersist {
    pub project_id: Uuid,
    pub task_id: Uuid,
    pub status: TaskStatus,
    generation: u64,
    token: CancellationToken,
}

impl PendingPersist {
    /// True once a newer drag of the same task has replaced this one
    pub fn is_superseded(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Result of [`BoardController::persist`]
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    /// Server accepted the change; `resynced` if the follow-up refetch worked
    Saved { resynced: bool },
    /// Server rejected the change or could not be reached
    Failed { error: ClientError, resynced: bool },
    /// A newer drag of the same task took over
    Superseded,
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    status: TaskStatus,
    token: CancellationToken,
}

/// Board session: owns the local copy and drives persists
///
/// Clones share everything, so a persist can run on a spawned task while the
/// board keeps handling drags.
#[derive(Clone)]
pub struct BoardController {
    api: Arc<dyn ProjectApi>,
    toasts: ToastCenter,
    cache: QueryCache,
    state: Arc<Mutex<BoardState>>,
    in_flight: Arc<Mutex<HashMap<Uuid, InFlight>>>,
    generation: Arc<AtomicU64>,
}

impl std::fmt::Debug for BoardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardController")
            .field("project_id", &self.project_id())
            .finish_non_exhaustive()
    }
}

impl BoardController {
    /// Fetches the project and builds the board
    pub async fn load(
        api: Arc<dyn ProjectApi>,
        toasts: ToastCenter,
        cache: QueryCache,
        project_id: Uuid,
    ) -> ClientResult<Self> {
        let project = api.fetch_project(project_id).await?;
        cache.mark_fresh(QueryKey::Project(project_id));

        tracing::debug!(
            project_id = %project_id,
            tasks = project.tasks.len(),
            "Board loaded"
        );

        Ok(Self {
            api,
            toasts,
            cache,
            state: Arc::new(Mutex::new(BoardState::new(&project))),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn in_flight(&self) -> MutexGuard<'_, HashMap<Uuid, InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn project_id(&self) -> Uuid {
        self.state().project_id()
    }

    pub fn toasts(&self) -> &ToastCenter {
        &self.toasts
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn api(&self) -> Arc<dyn ProjectApi> {
        Arc::clone(&self.api)
    }

    /// Current columns
    pub fn columns(&self) -> BoardColumns {
        self.state().columns().clone()
    }

    /// Copy of the local board state
    pub fn snapshot(&self) -> BoardState {
        self.state().clone()
    }

    pub fn is_provisional(&self, task_id: Uuid) -> bool {
        self.state().is_provisional(task_id)
    }

    pub fn drag_start(&self, task_id: Uuid) -> bool {
        self.state().drag_start(task_id)
    }

    pub fn drag_cancel(&self) {
        self.state().drag_cancel();
    }

    /// Applies a drag-release locally
    ///
    /// Returns the persist to run if the task changed column. Any persist still
    /// pending for the same task is cancelled.
    pub fn drag_end(&self, task_id: Uuid, over: Option<&str>) -> Option<PendingPersist> {
        let (outcome, project_id) = {
            let mut state = self.state();
            (state.drag_end(task_id, over), state.project_id())
        };

        let DragOutcome::Moved { from, to } = outcome else {
            tracing::debug!(task_id = %task_id, ?outcome, "Drag ended without a move");
            return None;
        };

        tracing::info!(
            task_id = %task_id,
            from = %from,
            to = %to,
            "Task moved"
        );

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let token = CancellationToken::new();

        let previous = self.in_flight().insert(
            task_id,
            InFlight {
                generation,
                status: to,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            tracing::debug!(task_id = %task_id, "Superseding earlier persist");
            previous.token.cancel();
        }

        Some(PendingPersist {
            project_id,
            task_id,
            status: to,
            generation,
            token,
        })
    }

    /// Sends a pending status change and reconciles with the server
    pub async fn persist(&self, pending: PendingPersist) -> PersistOutcome {
        let PendingPersist {
            project_id,
            task_id,
            status,
            generation,
            token,
        } = pending;

        if token.is_cancelled() {
            self.finish(task_id, generation);
            return PersistOutcome::Superseded;
        }

        let toast = self.toasts.loading(PERSIST_LOADING_MESSAGE);

        let result = tokio::select! {
            biased;

            _ = token.cancelled() => {
                self.toasts.dismiss(toast);
                self.finish(task_id, generation);
                return PersistOutcome::Superseded;
            }
            result = self.api.update_task_status(project_id, task_id, status) => result,
        };

        self.finish(task_id, generation);

        match result {
            Ok(()) => {
                self.toasts.success(PERSIST_SUCCESS_MESSAGE, Some(toast));
                let resynced = self.resync().await;
                PersistOutcome::Saved { resynced }
            }
            Err(error) => {
                tracing::warn!(
                    task_id = %task_id,
                    status = %status,
                    error = %error,
                    "Task status persist failed"
                );
                self.toasts
                    .error(PERSIST_ERROR_MESSAGE, Some(error.to_string()), Some(toast));
                let resynced = self.resync().await;
                PersistOutcome::Failed { error, resynced }
            }
        }
    }

    /// Re-derives the board from a fresh snapshot
    pub async fn refresh(&self) -> ClientResult<()> {
        let project_id = self.project_id();
        let project = self.api.fetch_project(project_id).await?;

        let in_flight: Vec<(Uuid, TaskStatus)> = self
            .in_flight()
            .iter()
            .map(|(task_id, f)| (*task_id, f.status))
            .collect();

        self.state().sync_from_server(&project, &in_flight);
        self.cache.mark_fresh(QueryKey::Project(project_id));
        Ok(())
    }

    /// Refetches if the project query was invalidated since the last fetch
    ///
    /// Returns whether a refetch happened.
    pub async fn revalidate(&self) -> ClientResult<bool> {
        let key = QueryKey::Project(self.project_id());
        if !self.cache.is_stale(key) {
            return Ok(false);
        }

        tracing::debug!(?key, "Board revalidating");
        self.refresh().await?;
        Ok(true)
    }

    async fn resync(&self) -> bool {
        match self.refresh().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Board refetch failed, keeping provisional state");
                false
            }
        }
    }

    fn finish(&self, task_id: Uuid, generation: u64) {
        let mut in_flight = self.in_flight();
        if in_flight
            .get(&task_id)
            .is_some_and(|f| f.generation == generation)
        {
            in_flight.remove(&task_id);
        }
    }
}
