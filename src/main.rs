use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;
use tracing::{error, warn};

use users_backend::config::AppConfig;
use users_backend::error::AppResult;
use users_backend::logging::init_tracing;
use users_backend::models::{User, UserUpdate};
use users_backend::startup::connect_service;
use users_backend::UserService;

#[derive(Parser, Debug)]
#[command(name = "users-backend")]
#[command(about = "User store backed by PostgreSQL or SQLite")]
struct Args {
    /// Configuration file path (DB_* environment variables when omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the users table if it does not exist
    InitSchema,
    /// Probe the database and print pool statistics
    Health,
    /// Create a user
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        email: String,
    },
    /// Fetch a user by ID
    Get { id: String },
    /// Update the given fields of a user
    Update {
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        email: Option<String>,
    },
}

fn load_config(path: Option<&str>) -> AppResult<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::from_env(),
    }
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Returns whether the command succeeded
async fn run(service: &UserService, command: Command) -> AppResult<bool> {
    match command {
        Command::InitSchema => {
            service.init_schema().await?;
            Ok(true)
        }
        Command::Health => {
            let report = service.health().await;
            print_json(&report)?;
            Ok(report.is_up())
        }
        Command::Create {
            first_name,
            last_name,
            age,
            email,
        } => {
            let user = User::new(first_name, last_name, age, email);
            print_json(&service.create_user(&user).await?)?;
            Ok(true)
        }
        Command::Get { id } => {
            print_json(&service.get_user_by_id(&id).await?)?;
            Ok(true)
        }
        Command::Update {
            id,
            first_name,
            last_name,
            age,
            email,
        } => {
            let update = UserUpdate {
                first_name,
                last_name,
                age,
                email,
            };
            print_json(&service.update_user_by_id(&id, &update).await?)?;
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Err(e) = init_tracing(args.debug) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let service = match connect_service(&config).await {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = run(&service, args.command).await;
    service.close().await;

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) if e.is_client_error() => {
            warn!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
