//! CLI administration tool for the referral code service.
//!
//! Manages referral codes directly against the database without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all referral codes
//! cargo run --bin admin -- codes list
//!
//! # Create a referral code
//! cargo run --bin admin -- codes create alpha1 Alice
//!
//! # Deactivate / activate
//! cargo run --bin admin -- codes deactivate 3
//! cargo run --bin admin -- codes activate 3
//!
//! # Delete (asks for confirmation unless -y)
//! cargo run --bin admin -- codes delete 3
//!
//! # Seed the default referral codes
//! cargo run --bin admin -- seed
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components, required): PostgreSQL connection

use referral_codes::api::dto::referral_code::ReferralCodeRequest;
use referral_codes::application::services::ReferralCodeService;
use referral_codes::config;
use referral_codes::domain::entities::ReferralCode;
use referral_codes::infrastructure::persistence::PgReferralCodeRepository;
use referral_codes::server::connect_database;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

type Service = ReferralCodeService<PgReferralCodeRepository>;

/// CLI tool for managing referral codes.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage referral codes
    Codes {
        #[command(subcommand)]
        action: CodeAction,
    },

    /// Create the default referral codes that are missing
    Seed,

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Referral code subcommands.
#[derive(Subcommand)]
enum CodeAction {
    /// List all referral codes
    List {
        /// Only show active codes
        #[arg(short, long)]
        active: bool,
    },

    /// Create a referral code
    Create { code: String, owner_name: String },

    /// Delete a referral code permanently
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Mark a referral code active
    Activate { id: i64 },

    /// Mark a referral code inactive
    Deactivate { id: i64 },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL must be set")?;

    let pool = connect_database(&config, &database_url).await?;
    let repository = PgReferralCodeRepository::new(Arc::new(pool.clone()))
        .with_top_limit(config.top_codes_limit);
    let service = ReferralCodeService::new(Arc::new(repository));

    match cli.command {
        Commands::Codes { action } => handle_code_action(action, &service).await?,
        Commands::Seed => handle_seed(&service).await?,
        Commands::Stats => handle_stats(&service).await?,
        Commands::Db { action } => match action {
            DbAction::Check => {
                println!("{}", "Checking database connection...".bright_blue());
                sqlx::query("SELECT 1").fetch_one(&pool).await?;
                println!("{}", "Database connection OK".green().bold());
            }
        },
    }

    Ok(())
}

/// Dispatches referral code commands.
async fn handle_code_action(action: CodeAction, service: &Service) -> Result<()> {
    match action {
        CodeAction::List { active } => {
            let codes = if active {
                service.list_active().await?
            } else {
                service.list_all().await?
            };
            print_codes(&codes);
        }
        CodeAction::Create { code, owner_name } => {
            let new_code = ReferralCodeRequest::new(code, owner_name).into_new_referral_code()?;
            let created = service.create_referral_code(new_code).await?;
            println!(
                "{} {} (id {})",
                "Created".green().bold(),
                created.code.bright_white(),
                created.id
            );
        }
        CodeAction::Delete { id, yes } => {
            let existing = service.get_by_id(id).await?;

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Delete referral code '{}' owned by {}?",
                        existing.code, existing.owner_name
                    ))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "Cancelled".yellow());
                    return Ok(());
                }
            }

            service.delete_referral_code(id).await?;
            println!("{} {}", "Deleted".green().bold(), existing.code);
        }
        CodeAction::Activate { id } => {
            let code = service.activate(id).await?;
            println!("{} {}", "Activated".green().bold(), code.code);
        }
        CodeAction::Deactivate { id } => {
            let code = service.deactivate(id).await?;
            println!("{} {}", "Deactivated".yellow().bold(), code.code);
        }
    }

    Ok(())
}

async fn handle_seed(service: &Service) -> Result<()> {
    let created = service.seed_defaults().await?;

    if created == 0 {
        println!("{}", "All default referral codes already exist".yellow());
    } else {
        println!(
            "{}",
            format!("Created {created} default referral codes").green().bold()
        );
    }

    Ok(())
}

/// Displays totals across all referral codes.
async fn handle_stats(service: &Service) -> Result<()> {
    let stats = service.statistics().await?;

    println!("{}", "Statistics".bright_blue().bold());
    println!();
    println!(
        "  Codes:       {}",
        stats.total_codes.to_string().bright_green().bold()
    );
    println!(
        "  Active:      {}",
        stats.active_codes.to_string().bright_green().bold()
    );
    println!(
        "  Inactive:    {}",
        stats.inactive_codes.to_string().bright_green().bold()
    );
    println!(
        "  Total usage: {}",
        stats.total_usage.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

fn print_codes(codes: &[ReferralCode]) {
    if codes.is_empty() {
        println!("{}", "No referral codes found".yellow());
        return;
    }

    println!(
        "{:>6}  {:<24} {:<20} {:<8} {:>6}",
        "ID".bold(),
        "CODE".bold(),
        "OWNER".bold(),
        "STATUS".bold(),
        "USES".bold()
    );

    for rc in codes {
        let status = if rc.is_active {
            "active".green()
        } else {
            "inactive".red()
        };
        println!(
            "{:>6}  {:<24} {:<20} {:<8} {:>6}",
            rc.id, rc.code, rc.owner_name, status, rc.usage_count
        );
    }
}
