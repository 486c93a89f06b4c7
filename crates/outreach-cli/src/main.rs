//! Outreach CLI
//!
//! Operator surface over the outreach engine. Results are printed as JSON.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use outreach_core::logging_facility::{self, Profile};

mod commands;
mod config;

use config::{Overrides, Settings, DEFAULT_CONFIG_PATH};

#[derive(Debug, Parser)]
#[command(name = "outreach")]
#[command(about = "Outreach - campaign enrollment and recipient tracking", long_about = None)]
struct Cli {
    /// TOML settings file; missing file means defaults
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// SQLite database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Acting user id
    #[arg(long, global = true)]
    user: Option<String>,

    /// Log profile: development, production or test
    #[arg(long, global = true)]
    log: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply schema migrations and list them
    Migrate,
    /// User operations
    User(commands::user::UserArgs),
    /// Target list operations
    List(commands::list::ListArgs),
    /// Campaign and sequence operations
    Campaign(commands::campaign::CampaignArgs),
    /// Snapshot a target list into a campaign
    Enroll(commands::enroll::EnrollArgs),
    /// Recipient operations tracking
    Ops(commands::ops::OpsArgs),
    /// Recipients due for contact now
    Due(commands::report::DueArgs),
    /// Campaign engagement statistics
    Stats(commands::report::StatsArgs),
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load(&cli.config)?.apply(Overrides {
        database_path: cli.db,
        user_id: cli.user,
        log_profile: cli.log,
    });
    logging_facility::init(settings.log_profile);

    let mut session = commands::Session::open(&settings)?;

    match cli.command {
        Commands::Migrate => commands::migrate(&session),
        Commands::User(args) => commands::user::execute(args, &session),
        Commands::List(args) => commands::list::execute(args, &mut session),
        Commands::Campaign(args) => commands::campaign::execute(args, &session),
        Commands::Enroll(args) => commands::enroll::execute(args, &mut session),
        Commands::Ops(args) => commands::ops::execute(args, &mut session),
        Commands::Due(args) => commands::report::due(args, &session),
        Commands::Stats(args) => commands::report::stats(args, &session),
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
