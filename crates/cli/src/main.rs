//! AgencyOps CLI - work lifecycle and team capacity dashboards.

use std::path::PathBuf;
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use agencyops_core::{
    Category, CategoryId, Client, ClientId, PedItemId, PedKind, PedPriority, PedScope, PedStatus,
    StepId, TeamMember, Time, TodoId, UserId, WorkId, WorkStatus,
};
use agencyops_progress::{DashboardTracker, EngineConfig, PlanPeriod, StorageDashboardTracker};
use agencyops_storage::{JsonStorage, Storage};
use agencyops_work::{BasicWorkManager, PedItemSpec, WorkManager, WorkSpec};

#[derive(Parser)]
#[command(name = "agencyops")]
#[command(about = "Work lifecycle and team capacity for agencies", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, global = true, default_value = ".agencyops")]
    data: PathBuf,

    /// Engine config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print views as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the team dashboard
    Dashboard,
    /// Show plan statistics for a week or month
    PedStats {
        /// Any day inside the period (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Use the calendar month instead of the week
        #[arg(long)]
        month: bool,
    },
    /// Show this week's load per team member
    WeeklyLoad {
        /// Which plan item relation counts
        #[arg(long, value_enum, default_value = "assignee")]
        scope: ScopeArg,
        /// Only this user
        #[arg(long)]
        user: Option<UserId>,
    },
    /// Manage works
    Work {
        #[command(subcommand)]
        action: WorkCommand,
    },
    /// Manage work steps
    Step {
        #[command(subcommand)]
        action: StepCommand,
    },
    /// Manage personal todos
    Todo {
        #[command(subcommand)]
        action: TodoCommand,
    },
    /// Manage the editorial plan
    Ped {
        #[command(subcommand)]
        action: PedCommand,
    },
    /// Add a team member
    Member {
        /// Display name
        name: String,
    },
    /// Add a work category
    Category {
        /// Category name
        name: String,
    },
    /// Add a client
    Client {
        /// Client name
        name: String,
    },
}

#[derive(Subcommand)]
enum WorkCommand {
    /// Create a work
    Add {
        /// Title
        title: String,
        /// Client ID
        #[arg(long)]
        client: ClientId,
        /// Category ID
        #[arg(long)]
        category: CategoryId,
        /// Assignee
        #[arg(long)]
        assignee: Option<UserId>,
        /// Deadline (RFC 3339)
        #[arg(long)]
        deadline: Option<Time>,
    },
    /// Set a work's status
    Status {
        /// Work ID
        id: WorkId,
        /// New status, e.g. IN_REVIEW
        status: WorkStatus,
    },
    /// Pause a work
    Pause {
        /// Work ID
        id: WorkId,
    },
    /// Resume a paused work
    Resume {
        /// Work ID
        id: WorkId,
    },
    /// Reopen a finished work
    Reopen {
        /// Work ID
        id: WorkId,
    },
}

#[derive(Subcommand)]
enum StepCommand {
    /// Append a step
    Add {
        /// Work ID
        work: WorkId,
        /// Title
        title: String,
    },
    /// Toggle a step
    Toggle {
        /// Step ID
        id: StepId,
    },
    /// List a work's steps
    List {
        /// Work ID
        work: WorkId,
    },
}

#[derive(Subcommand)]
enum TodoCommand {
    /// Append a todo
    Add {
        /// Owner
        #[arg(long)]
        user: UserId,
        /// Title
        title: String,
    },
    /// Tick a todo
    Done {
        /// Owner
        #[arg(long)]
        user: UserId,
        /// Todo ID
        id: TodoId,
        /// Untick instead
        #[arg(long)]
        undo: bool,
    },
    /// List a user's todos
    List {
        /// Owner
        #[arg(long)]
        user: UserId,
    },
}

#[derive(Subcommand)]
enum PedCommand {
    /// Plan an item
    Add {
        /// Title
        title: String,
        /// Planner
        #[arg(long)]
        owner: UserId,
        /// Executor
        #[arg(long)]
        assignee: UserId,
        /// Client ID
        #[arg(long)]
        client: ClientId,
        /// Plan day
        #[arg(long)]
        date: NaiveDate,
        /// Content type, e.g. post
        #[arg(long = "type", default_value = "post")]
        content_type: String,
        /// CONTENT or TASK
        #[arg(long, default_value = "CONTENT")]
        kind: PedKind,
        /// Mark urgent
        #[arg(long)]
        urgent: bool,
        /// Ad-hoc addition outside the plan
        #[arg(long)]
        extra: bool,
    },
    /// Set an item's status
    Status {
        /// Item ID
        id: PedItemId,
        /// New status, e.g. DONE
        status: PedStatus,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    Assignee,
    Owner,
}

impl From<ScopeArg> for PedScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Assignee => PedScope::Assignee,
            ScopeArg::Owner => PedScope::Owner,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::load(cli.config.as_deref())?;
    let mut storage = JsonStorage::new(&cli.data).await?;
    info!("Using data directory {}", cli.data.display());
    let now = Utc::now();

    match cli.command {
        Commands::Dashboard => {
            let tracker = StorageDashboardTracker::new(storage, config);
            let view = tracker.dashboard(now).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }

            let capacity = view.stats.capacity;
            println!("Works: {}", view.stats.total);
            println!(
                "Capacity: {}/{} ({}%){}",
                capacity.current,
                capacity.max,
                capacity.saturation_pct,
                if capacity.is_overloaded { " OVERLOADED" } else { "" }
            );
            println!("By status:");
            for entry in &view.stats.by_status {
                println!("  {}: {}", entry.status, entry.count);
            }
            println!("By category:");
            for entry in &view.stats.by_category {
                println!("  {}: {}", entry.name, entry.count);
            }
            for (label, list) in [
                ("Due soon", &view.deadlines.works_in_deadline),
                ("Expired", &view.deadlines.expired_works),
                ("In review", &view.deadlines.in_review_works),
            ] {
                println!("{} ({}):", label, list.total);
                for entry in &list.entries {
                    let deadline = entry
                        .deadline
                        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!("  {} | {} | {} | {}", entry.work_id, deadline, entry.status, entry.title);
                }
            }
        }
        Commands::PedStats { date, month } => {
            let day = date.unwrap_or_else(|| now.date_naive());
            let period = if month {
                PlanPeriod::month_containing(day)
            } else {
                PlanPeriod::week_containing(day)
            };
            let tracker = StorageDashboardTracker::new(storage, config);
            let stats = tracker.ped_stats(&period).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }

            println!("{}: {} items ({} planned, {} extra, {} urgent)",
                stats.period_label, stats.total, stats.planned, stats.extra, stats.urgent);
            for bar in &stats.by_type {
                let width = (bar.width_pct / 5) as usize;
                println!("  {:<12} {:>4} {}", bar.content_type, bar.count, "#".repeat(width));
            }
            for entry in &stats.by_status {
                println!("  {}: {}", entry.status, entry.count);
            }
            if let Some(capacity) = stats.capacity {
                println!("Capacity: {}/{} ({}%)", capacity.current, capacity.max, capacity.saturation_pct);
            }
        }
        Commands::WeeklyLoad { scope, user } => {
            let tracker = StorageDashboardTracker::new(storage, config);
            if let Some(user) = user {
                let row = tracker.user_load(user, now, scope.into()).await?;
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&row)?);
                } else {
                    println!("{}: {} ({} tasks, {} works)", row.user_name, row.total, row.task_count, row.work_count);
                }
                return Ok(());
            }

            let overview = tracker.weekly_load(now, scope.into()).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
                return Ok(());
            }
            println!("{}", overview.period.label);
            for row in &overview.rows {
                let width = (overview.relative_pct(row) / 5) as usize;
                println!(
                    "  {:<16} {:>3} ({} tasks, {} works) {}",
                    row.user_name, row.total, row.task_count, row.work_count, "#".repeat(width)
                );
            }
        }
        Commands::Work { action } => {
            let manager = BasicWorkManager::new(storage);
            let work = match action {
                WorkCommand::Add { title, client, category, assignee, deadline } => {
                    manager
                        .create_work(WorkSpec {
                            title,
                            client_id: client,
                            category_id: category,
                            assigned_to: assignee,
                            deadline,
                        })
                        .await?
                }
                WorkCommand::Status { id, status } => manager.change_work_status(id, status, now).await?,
                WorkCommand::Pause { id } => manager.pause_work(id, now).await?,
                WorkCommand::Resume { id } => manager.resume_work(id, now).await?,
                WorkCommand::Reopen { id } => manager.reopen_work(id, now).await?,
            };
            manager.commit("Update work").await?;
            println!("{} | {} | {}", work.id, work.status, work.title);
        }
        Commands::Step { action } => {
            let manager = BasicWorkManager::new(storage);
            match action {
                StepCommand::Add { work, title } => {
                    let step = manager.add_step(work, title).await?;
                    manager.commit("Add step").await?;
                    println!("Added step: {} - {}", step.id, step.title);
                }
                StepCommand::Toggle { id } => {
                    let step = manager.toggle_step(id, now).await?;
                    manager.commit("Toggle step").await?;
                    println!("{} | {:?} | {}", step.id, step.status(), step.title);
                }
                StepCommand::List { work } => {
                    let steps = manager.list_steps(work).await?;
                    println!("Steps ({})", steps.len());
                    for step in steps {
                        let mark = if step.is_done() { "x" } else { " " };
                        println!("  [{}] {} - {}", mark, step.id, step.title);
                    }
                }
            }
        }
        Commands::Todo { action } => {
            let manager = BasicWorkManager::new(storage);
            match action {
                TodoCommand::Add { user, title } => {
                    let todo = manager.add_todo(user, title).await?;
                    manager.commit("Add todo").await?;
                    println!("Added todo: {} - {}", todo.id, todo.title);
                }
                TodoCommand::Done { user, id, undo } => {
                    let todo = manager.set_todo_completed(user, id, !undo, now).await?;
                    manager.commit("Update todo").await?;
                    println!("{} | {} | {}", todo.id, if todo.completed { "done" } else { "open" }, todo.title);
                }
                TodoCommand::List { user } => {
                    let todos = manager.list_todos(user).await?;
                    println!("Todos ({})", todos.len());
                    for todo in todos {
                        let mark = if todo.completed { "x" } else { " " };
                        println!("  [{}] {} - {}", mark, todo.id, todo.title);
                    }
                }
            }
        }
        Commands::Ped { action } => {
            let manager = BasicWorkManager::new(storage);
            let item = match action {
                PedCommand::Add { title, owner, assignee, client, date, content_type, kind, urgent, extra } => {
                    manager
                        .add_ped_item(PedItemSpec {
                            owner_id: owner,
                            assigned_to: assignee,
                            client_id: client,
                            date,
                            title,
                            kind,
                            content_type,
                            priority: if urgent { PedPriority::Urgent } else { PedPriority::NotUrgent },
                            is_extra: extra,
                        })
                        .await?
                }
                PedCommand::Status { id, status } => manager.set_ped_status(id, status).await?,
            };
            manager.commit("Update plan").await?;
            println!("{} | {} | {} | {}", item.id, item.date, item.status, item.title);
        }
        Commands::Member { name } => {
            let member = TeamMember::new(name);
            storage.save_member(&member).await?;
            storage.commit("Add member").await?;
            println!("Added member: {} - {}", member.id, member.name);
        }
        Commands::Category { name } => {
            let category = Category::new(name);
            storage.save_category(&category).await?;
            storage.commit("Add category").await?;
            println!("Added category: {} - {}", category.id, category.name);
        }
        Commands::Client { name } => {
            let client = Client::new(name);
            storage.save_client(&client).await?;
            storage.commit("Add client").await?;
            println!("Added client: {} - {}", client.id, client.name);
        }
    }

    Ok(())
}
