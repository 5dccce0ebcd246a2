/// Database models for Taskboard
///
/// Each model owns its SQL. Queries are runtime-checked `sqlx::query_as` calls so the
/// crate builds without a live database.
///
/// # Models
///
/// - `user`: User accounts and the public `UserSummary` shape
/// - `project`: Projects and the `ProjectDetail` snapshot the board consumes
/// - `membership`: Non-owner access grants to a project
/// - `task`: Tasks, the status enumeration and its column mapping table
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::project::Project;
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// # use uuid::Uuid;
///
/// # async fn example(project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// if let Some(detail) = Project::detail(&pool, project_id).await? {
///     println!("{} has {} tasks", detail.name, detail.tasks.len());
/// }
/// # Ok(())
/// # }
/// ```

pub mod membership;
pub mod project;
pub mod task;
pub mod user;

pub use membership::{Membership, MembershipWithUser};
pub use project::{Project, ProjectDetail, ProjectSummary};
pub use task::{ProjectTaskCounts, Task, TaskStatus, TaskWithAssignee};
pub use user::{User, UserSummary};
