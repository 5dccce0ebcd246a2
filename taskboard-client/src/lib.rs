//! # Taskboard Client Library
//!
//! Client-side state for the kanban board: the local task copy, optimistic
//! drag-and-drop with server reconciliation, task creation and editing, and the
//! member invitation flow. Everything talks to the server through [`api::ProjectApi`].
//!
//! ## Modules
//!
//! - `api`: `ProjectApi` trait and its reqwest implementation
//! - `board`: Column derivation and the drag-and-drop reconciler
//! - `cache`: Query freshness and invalidation
//! - `config`: Client configuration
//! - `creator`: New task dialog
//! - `editor`: Task detail editor
//! - `error`: Client error taxonomy
//! - `invite`: Member invitation flow
//! - `mock`: In-memory `ProjectApi`
//! - `toast`: Notification toasts
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use taskboard_client::{
//!     board::BoardController, cache::QueryCache, mock::{project_fixture, MockProjectApi},
//!     toast::ToastCenter,
//! };
//! use taskboard_shared::models::task::TaskStatus;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let project = project_fixture(&[("Write docs", TaskStatus::Todo)]);
//! let task_id = project.tasks[0].id;
//! let api = Arc::new(MockProjectApi::new(project.clone()));
//!
//! let board = BoardController::load(api, ToastCenter::new(), QueryCache::new(), project.id).await?;
//! if let Some(pending) = board.drag_end(task_id, Some("done")) {
//!     board.persist(pending).await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod board;
pub mod cache;
pub mod config;
pub mod creator;
pub mod editor;
pub mod error;
pub mod invite;
pub mod mock;
pub mod toast;
