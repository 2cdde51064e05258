//! Command line surface of the `pmdash` binary
//!
//! Argument parsing lives here so [`dispatch`] can be driven from tests
//! without spawning the binary.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use pmdash_domain::{
    ApiError, MembershipInput, MembershipRole, PmDashError, ProjectInput, ProjectStatus,
    RegisterRequest, TaskInput, TaskStatus,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::commands;
use crate::context::AppContext;

/// Headless client for the Project Management Dashboard API
#[derive(Debug, Parser)]
#[command(name = "pmdash", version, about)]
pub struct Cli {
    /// Read configuration from this JSON or TOML file instead of the
    /// environment
    #[arg(short, long, global = true, env = "PMDASH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the issued credentials
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "PMDASH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account (does not sign in)
    Register(RegisterArgs),
    /// Sign out and forget the stored credentials
    Logout,
    /// Show the signed-in user
    Me,
    #[command(subcommand)]
    Projects(ProjectCommand),
    #[command(subcommand)]
    Tasks(TaskCommand),
    #[command(subcommand)]
    Notifications(NotificationCommand),
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub username: String,
    #[arg(short, long, env = "PMDASH_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
}

impl From<RegisterArgs> for RegisterRequest {
    fn from(args: RegisterArgs) -> Self {
        Self {
            username: args.username,
            email: args.email,
            first_name: args.first_name,
            last_name: args.last_name,
            password2: args.password.clone(),
            password: args.password,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    List,
    Create(ProjectArgs),
    Update {
        id: i64,
        #[command(flatten)]
        project: ProjectArgs,
    },
    Delete {
        id: i64,
    },
    /// List memberships, optionally for a single project
    Memberships {
        #[arg(long)]
        project: Option<i64>,
    },
    AddMember {
        #[arg(long)]
        project: i64,
        #[arg(long)]
        user: i64,
        #[arg(long, default_value_t = MembershipRole::Viewer)]
        role: MembershipRole,
    },
    RemoveMember {
        membership_id: i64,
    },
}

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
    #[arg(long, default_value_t = ProjectStatus::Pending)]
    pub status: ProjectStatus,
}

impl From<ProjectArgs> for ProjectInput {
    fn from(args: ProjectArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            start_date: args.start_date,
            end_date: args.end_date,
            status: args.status,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    List,
    Create(TaskArgs),
    Update {
        id: i64,
        #[command(flatten)]
        task: TaskArgs,
    },
    Delete {
        id: i64,
    },
    Comments {
        task_id: i64,
    },
    Comment {
        task_id: i64,
        content: String,
    },
}

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[arg(long)]
    pub project: i64,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value_t = TaskStatus::Pending)]
    pub status: TaskStatus,
    #[arg(long)]
    pub assignee: Option<i64>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub due_date: Option<NaiveDate>,
}

impl From<TaskArgs> for TaskInput {
    fn from(args: TaskArgs) -> Self {
        Self {
            project: args.project,
            name: args.name,
            description: args.description,
            status: args.status,
            assignee: args.assignee,
            due_date: args.due_date,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum NotificationCommand {
    List,
    Read { id: i64 },
    Unread { id: i64 },
}

fn to_output<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| {
        ApiError::Local(PmDashError::Serialization(format!("Failed to render output: {e}")))
    })
}

fn done() -> Value {
    json!({ "status": "ok" })
}

/// Run one command against `ctx` and return what should be printed
///
/// # Errors
/// Returns the [`ApiError`] of the underlying call.
pub async fn dispatch(ctx: &AppContext, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::Login { username, password } => {
            to_output(commands::auth::login(ctx, &username, &password).await?)
        }
        Command::Register(args) => {
            let request = RegisterRequest::from(args);
            to_output(commands::auth::register(ctx, &request).await?.user)
        }
        Command::Logout => {
            commands::auth::logout(ctx).await?;
            Ok(done())
        }
        Command::Me => to_output(commands::auth::me(ctx).await?),
        Command::Projects(command) => dispatch_projects(ctx, command).await,
        Command::Tasks(command) => dispatch_tasks(ctx, command).await,
        Command::Notifications(command) => match command {
            NotificationCommand::List => to_output(commands::notifications::list(ctx).await?),
            NotificationCommand::Read { id } => {
                to_output(commands::notifications::mark_read(ctx, id).await?)
            }
            NotificationCommand::Unread { id } => {
                to_output(commands::notifications::mark_unread(ctx, id).await?)
            }
        },
    }
}

async fn dispatch_projects(ctx: &AppContext, command: ProjectCommand) -> Result<Value, ApiError> {
    match command {
        ProjectCommand::List => to_output(commands::projects::list(ctx).await?),
        ProjectCommand::Create(args) => {
            to_output(commands::projects::create(ctx, &args.into()).await?)
        }
        ProjectCommand::Update { id, project } => {
            to_output(commands::projects::update(ctx, id, &project.into()).await?)
        }
        ProjectCommand::Delete { id } => {
            commands::projects::remove(ctx, id).await?;
            Ok(done())
        }
        ProjectCommand::Memberships { project } => {
            to_output(commands::projects::memberships(ctx, project).await?)
        }
        ProjectCommand::AddMember { project, user, role } => {
            let input = MembershipInput { project, user, role };
            to_output(commands::projects::add_member(ctx, &input).await?)
        }
        ProjectCommand::RemoveMember { membership_id } => {
            commands::projects::remove_member(ctx, membership_id).await?;
            Ok(done())
        }
    }
}

async fn dispatch_tasks(ctx: &AppContext, command: TaskCommand) -> Result<Value, ApiError> {
    match command {
        TaskCommand::List => to_output(commands::tasks::list(ctx).await?),
        TaskCommand::Create(args) => to_output(commands::tasks::create(ctx, &args.into()).await?),
        TaskCommand::Update { id, task } => {
            to_output(commands::tasks::update(ctx, id, &task.into()).await?)
        }
        TaskCommand::Delete { id } => {
            commands::tasks::remove(ctx, id).await?;
            Ok(done())
        }
        TaskCommand::Comments { task_id } => {
            to_output(commands::tasks::comments(ctx, task_id).await?)
        }
        TaskCommand::Comment { task_id, content } => {
            to_output(commands::tasks::add_comment(ctx, task_id, &content).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_project_create_with_dates_and_status() {
        let cli = Cli::try_parse_from([
            "pmdash",
            "projects",
            "create",
            "--name",
            "Relaunch",
            "--start-date",
            "2024-03-01",
            "--status",
            "in-progress",
        ])
        .unwrap();

        let args = match cli.command {
            Command::Projects(ProjectCommand::Create(args)) => args,
            other => panic!("unexpected command: {other:?}"),
        };
        let input = ProjectInput::from(args);
        assert_eq!(input.status, ProjectStatus::InProgress);
        assert_eq!(input.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(input.end_date.is_none());
    }

    #[test]
    fn rejects_unknown_task_status() {
        let result = Cli::try_parse_from([
            "pmdash", "tasks", "create", "--project", "1", "--name", "x", "--status", "cancelled",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn register_repeats_password_confirmation() {
        let cli = Cli::try_parse_from([
            "pmdash",
            "register",
            "--username",
            "ana",
            "--password",
            "s3cret",
            "--email",
            "ana@example.com",
        ])
        .unwrap();

        let args = match cli.command {
            Command::Register(args) => args,
            other => panic!("unexpected command: {other:?}"),
        };
        let request = RegisterRequest::from(args);
        assert_eq!(request.password, request.password2);
        assert_eq!(request.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn global_config_flag_follows_subcommand() {
        let cli = Cli::try_parse_from(["pmdash", "me", "--config", "pmdash.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("pmdash.toml")));
    }
}
