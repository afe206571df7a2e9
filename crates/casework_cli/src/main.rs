//! Command-line driver for the casework API.
//!
//! # Responsibility
//! - Map subcommands one-to-one onto API routes against a local database.
//! - Print response bodies to stdout; non-200 responses exit with an error.

use anyhow::{bail, Context, Result};
use casework_api::{ApiResponse, CaseworkApi};
use casework_core::{init_from_config, CoreConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "casework")]
#[command(about = "Case and task store driver")]
#[command(version)]
struct Cli {
    /// SQLite database file; overrides CASEWORK_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Absolute log directory; overrides CASEWORK_LOG_DIR.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print core health and version.
    Ping,
    /// Seed the example dataset.
    LoadTestData,
    /// Remove the example dataset.
    ClearTestData,
    /// Print the fixed example case.
    ExampleCase,
    /// Create a case from a JSON body.
    CreateCase { body: String },
    GetCase { id: String },
    DeleteCase { id: String },
    /// Set one case property, e.g. `status Closed`.
    UpdateCase {
        id: String,
        property: String,
        value: String,
    },
    Search {
        #[arg(default_value = "")]
        text: String,
        #[arg(long, default_value_t = 0)]
        page: i64,
        #[arg(long, default_value_t = 10)]
        size: i64,
        /// `field[,asc|desc]`, e.g. `createdDate,desc`.
        #[arg(long)]
        sort: Option<String>,
    },
    /// Create a task from a JSON body; the parent goes under `case`.
    CreateTask { body: String },
    GetTask { id: String },
    DeleteTask { id: String },
    UpdateTask {
        id: String,
        property: String,
        value: String,
    },
    TasksForCase {
        id: String,
        #[arg(long, default_value_t = 0)]
        page: i64,
        #[arg(long, default_value_t = 10)]
        size: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CoreConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = Some(log_dir);
    }
    init_from_config(&config).context("failed to initialize logging")?;

    let api = CaseworkApi::from_config(&config);
    let response = match cli.command {
        Command::Ping => {
            println!("casework_core ping={}", casework_api::api::ping());
            println!("casework_core version={}", casework_api::api::core_version());
            return Ok(());
        }
        Command::LoadTestData => api.load_test_data(),
        Command::ClearTestData => api.clear_test_data(),
        Command::ExampleCase => api.get_example_case(),
        Command::CreateCase { body } => api.create_case(&body),
        Command::GetCase { id } => api.get_case(&id),
        Command::DeleteCase { id } => api.delete_case(&id),
        Command::UpdateCase {
            id,
            property,
            value,
        } => api.update_case_property(&id, &property, &value),
        Command::Search {
            text,
            page,
            size,
            sort,
        } => api.search_cases(&text, page, size, sort.as_deref()),
        Command::CreateTask { body } => api.create_task(&body),
        Command::GetTask { id } => api.get_task(&id),
        Command::DeleteTask { id } => api.delete_task(&id),
        Command::UpdateTask {
            id,
            property,
            value,
        } => api.update_task_property(&id, &property, &value),
        Command::TasksForCase { id, page, size } => api.tasks_for_case(&id, page, size),
    };

    print_response(response)
}

fn print_response(response: ApiResponse) -> Result<()> {
    if !response.is_success() {
        bail!("request failed with status {}: {}", response.status, response.body);
    }
    if !response.body.is_empty() {
        println!("{}", response.body);
    }
    Ok(())
}
