//! # Taskboard CLI
//!
//! Drives a project board against a running API server.
//!
//! ## Usage
//!
//! ```bash
//! taskboard login --email ana@example.com --password hunter2hunter2
//! TASKBOARD_TOKEN=... taskboard show <project-id>
//! TASKBOARD_TOKEN=... taskboard move <project-id> <task-id> in-progress
//! TASKBOARD_TOKEN=... taskboard add <project-id> todo --title "Write docs"
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use taskboard_client::{
    api::{HttpProjectApi, ProjectApi},
    board::{BoardColumns, BoardController, PersistOutcome},
    cache::QueryCache,
    config::ClientConfig,
    creator::TaskCreator,
    toast::ToastCenter,
};
use taskboard_shared::models::task::TaskStatus;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskboard", version, about = "Kanban board client")]
struct Cli {
    /// Configuration file (without extension)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and print an access token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Print the board's columns
    Show { project: Uuid },
    /// Move a task to another column
    Move {
        project: Uuid,
        task: Uuid,
        /// Target column: todo, in-progress or done
        column: String,
    },
    /// Add a task to a column
    Add {
        project: Uuid,
        /// Column: todo, in-progress or done
        column: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Assignee email, must be a project member
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Print per-project task counts
    Analytics,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref()).context("Invalid client configuration")?;
    let api = HttpProjectApi::new(&config)?;

    match cli.command {
        Commands::Login { email, password } => {
            let token = api.login(&email, &password).await?;
            println!("{}", token);
        }
        Commands::Show { project } => {
            let board = open_board(api, project).await?;
            print_columns(&board.columns());
        }
        Commands::Move {
            project,
            task,
            column,
        } => {
            let board = open_board(api, project).await?;

            let Some(pending) = board.drag_end(task, Some(&column)) else {
                println!("Nothing to do");
                return Ok(());
            };

            let outcome = board.persist(pending).await;
            if let Some(toast) = board.toasts().latest() {
                match toast.description {
                    Some(description) => println!("{}: {}", toast.message, description),
                    None => println!("{}", toast.message),
                }
            }
            print_columns(&board.columns());

            if let PersistOutcome::Failed { error, .. } = outcome {
                anyhow::bail!(error);
            }
        }
        Commands::Add {
            project,
            column,
            title,
            description,
            assignee,
        } => {
            let status = TaskStatus::from_column_id(&column)
                .with_context(|| format!("Unknown column: {}", column))?;
            let board = open_board(api, project).await?;
            let api = board.api();

            let mut creator = TaskCreator::open(api.as_ref(), board.cache(), project, status).await?;
            creator.set_title(title);
            if let Some(description) = description {
                creator.set_description(description);
            }
            if let Some(email) = assignee {
                creator.search_assignee(email.as_str());
                let user_id = creator
                    .picker()
                    .visible()
                    .into_iter()
                    .find(|u| u.email.eq_ignore_ascii_case(&email))
                    .map(|u| u.id)
                    .with_context(|| format!("{} is not a member of this project", email))?;
                creator.select_assignee(user_id);
            }

            let result = creator.submit(api.as_ref(), board.cache(), board.toasts()).await;
            if let Some(toast) = board.toasts().latest() {
                println!("{}", toast.message);
            }
            result?;

            board.revalidate().await?;
            print_columns(&board.columns());
        }
        Commands::Analytics => {
            for counts in api.task_analytics().await? {
                println!(
                    "{:<24} todo {:>3}  in progress {:>3}  done {:>3}",
                    counts.project.name, counts.todo, counts.in_progress, counts.done
                );
            }
        }
    }

    Ok(())
}

async fn open_board(api: HttpProjectApi, project_id: Uuid) -> anyhow::Result<BoardController> {
    let api: Arc<dyn ProjectApi> = Arc::new(api);
    let board = BoardController::load(api, ToastCenter::new(), QueryCache::new(), project_id)
        .await
        .with_context(|| format!("Failed to load project {}", project_id))?;
    Ok(board)
}

fn print_columns(columns: &BoardColumns) {
    for column in columns.columns() {
        println!("{} ({})", column.label, column.tasks.len());
        for task in column.tasks {
            let assignee = task
                .assignee
                .as_ref()
                .map(|u| u.email.as_str())
                .unwrap_or("unassigned");
            println!("  {}  {}  [{}]", task.id, task.title, assignee);
        }
    }
}
