//! Kanban board
//!
//! - `view_model`: partitions tasks into status columns
//! - `reconciler`: drag-and-drop with optimistic updates and server reconciliation

pub mod reconciler;
pub mod view_model;

pub use reconciler::{BoardController, BoardState, DragOutcome, PendingPersist, PersistOutcome};
pub use view_model::{BoardColumns, Column};
