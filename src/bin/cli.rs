//! Scrape Dash CLI
//!
//! Command-line access to the scraper backend:
//! - Show stats, accounts and tasks
//! - Add accounts and create tasks (same validation as the dashboard forms)
//! - Fetch or export task results
//! - Cancel tasks and check backend health

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use scrape_dash::api::{download_export, DashboardApi, HttpApiClient};
use scrape_dash::config::{generate_default_config, Config};
use scrape_dash::model::{ExportFormat, StatusFilter, TaskType};
use scrape_dash::render::viewer::item_count;
use scrape_dash::validate::{
    format_timestamp, task_type_icon, validate_account_input, validate_task_input, NEVER,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scrape-dash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage scraping accounts and tasks from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir, then ./scrape-dash.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show aggregate counters
    Stats,

    /// List accounts
    Accounts,

    /// Add a scraping account
    AddAccount {
        /// Username (a leading @ is ignored)
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// List tasks
    Tasks {
        /// Only tasks with this status (all, pending, running, completed, failed)
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
    },

    /// Create a scraping task
    CreateTask {
        /// profile, posts, hashtag, followers or following
        task_type: String,
        /// Username, or hashtag without #
        target: String,
        #[arg(short, long, default_value = "50")]
        max_items: String,
    },

    /// Print a task's scraped data
    Data { task_id: i64 },

    /// Download a task export
    Export {
        task_id: i64,
        /// csv or json
        #[arg(long = "as", default_value = "csv")]
        export_format: ExportFormat,
        /// Target directory (default: configured download dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Cancel a task
    Cancel { task_id: i64 },

    /// Check backend health
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.backend.base_url = url.clone();
    }
    scrape_dash::logging::init(&config.logging);

    let json = cli.format == "json";
    let client = HttpApiClient::new(&config.backend).context("building HTTP client")?;

    match cli.command {
        Commands::Stats => {
            let stats = client.fetch_stats().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Total accounts:   {}", stats.total_accounts);
                println!("Active accounts:  {}", stats.active_accounts);
                println!("Completed tasks:  {}", stats.completed_tasks);
                println!("Running tasks:    {}", stats.running_tasks);
            }
        }

        Commands::Accounts => {
            let accounts = client.fetch_accounts().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&accounts)?);
            } else if accounts.is_empty() {
                println!("No accounts added yet.");
                println!();
                println!("Add one with:");
                println!("  scrape-dash add-account <username> --password <password>");
            } else {
                println!(
                    "{:<6} {:<24} {:<10} {:<8} {:<24} {}",
                    "ID", "Username", "Status", "Tasks", "Last used", "Active"
                );
                println!("{}", "-".repeat(80));
                for account in accounts {
                    let last_used = match account.last_used.as_deref() {
                        Some(ts) => format_timestamp(Some(ts)),
                        None => NEVER.to_string(),
                    };
                    println!(
                        "{:<6} {:<24} {:<10} {:<8} {:<24} {}",
                        account.id,
                        format!("@{}", account.username),
                        account.status,
                        account.tasks_completed,
                        last_used,
                        if account.is_active { "yes" } else { "no" }
                    );
                }
            }
        }

        Commands::AddAccount { username, password } => {
            let account = validate_account_input(&username, &password)?;
            client.create_account(&account).await?;
            println!("Account @{} added", account.username);
        }

        Commands::Tasks { status } => {
            let tasks = client.fetch_tasks(status).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                match status.status() {
                    Some(s) => println!("No tasks found with status \"{}\".", s),
                    None => println!("No tasks found."),
                }
            } else {
                println!(
                    "{:<6} {:<14} {:<24} {:<10} {}",
                    "ID", "Type", "Target", "Status", "Created"
                );
                println!("{}", "-".repeat(80));
                for task in tasks {
                    println!(
                        "{:<6} {:<14} {:<24} {:<10} {}",
                        format!("#{}", task.id),
                        format!("{} {}", task_type_icon(&task.task_type), task.task_type),
                        task.target,
                        task.status,
                        format_timestamp(Some(&task.created_at))
                    );
                }
            }
        }

        Commands::CreateTask {
            task_type,
            target,
            max_items,
        } => {
            let task_type = TaskType::from(task_type.as_str());
            let task = validate_task_input(&task_type, &target, &max_items)?;
            client.create_task(&task).await?;
            println!(
                "Task created! Scraping {} items from {}",
                task.max_items, task.target
            );
        }

        Commands::Data { task_id } => {
            let data = client.fetch_task_data(task_id).await?;
            let empty = data.is_null() || data.as_array().is_some_and(|a| a.is_empty());
            if empty {
                bail!("No data found for task #{}", task_id);
            }
            if !json {
                eprintln!("Task #{}: {} items", task_id, item_count(&data));
            }
            println!("{}", serde_json::to_string_pretty(&data)?);
        }

        Commands::Export {
            task_id,
            export_format,
            output,
        } => {
            let dir = output.unwrap_or_else(|| PathBuf::from(&config.downloads.dir));
            let path = download_export(&client, task_id, export_format, &dir).await?;
            println!("{} export saved to {}", export_format.label(), path.display());
        }

        Commands::Cancel { task_id } => {
            let message = client.cancel_task(task_id).await?;
            println!("{}", message);
        }

        Commands::Status => match client.health().await {
            Ok(health) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&health)?);
                } else {
                    println!("Scrape Dash v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("Backend:  {}", client.paths().base_url());
                    println!("Status:   {}", health.status);
                    if let Some(db) = &health.database {
                        println!("Database: {}", db);
                    }
                    if let Some(n) = health.active_scrapers {
                        println!("Active scrapers: {}", n);
                    }
                }
            }
            Err(e) => {
                eprintln!("Cannot reach backend at {}", client.paths().base_url());
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}
