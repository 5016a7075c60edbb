//! Supamigrate CLI - apply pending SQL migrations to a Supabase project

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
mod output;

use commands::{new, status, up};

/// Supamigrate - apply SQL migrations through the Supabase Management API
#[derive(Parser)]
#[command(name = "supamigrate", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Defaults to `up` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every command
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Settings file (default: ./supamigrate.json if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Supabase project ref
    #[arg(long, global = true)]
    pub project_ref: Option<String>,
    /// Management API access token (prefer SUPABASE_ACCESS_TOKEN)
    #[arg(long, global = true)]
    pub access_token: Option<String>,
    /// Management API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// Directory containing <version>_<name>.sql files
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,
    /// More diagnostic output on stderr (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply every migration not yet recorded in the tracking table
    Up {
        /// List pending migrations without applying them
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which migrations are applied and which are pending
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new, empty migration file
    New {
        /// Short description, used for the file name
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    supamigrate_core::logging::init(cli.global.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::error(&format!("ERROR: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let command = cli.command.unwrap_or(Commands::Up {
        dry_run: false,
        json: false,
    });

    match command {
        Commands::Up { dry_run, json } => up::run(&cli.global, dry_run, json),
        Commands::Status { json } => status::run(&cli.global, json),
        Commands::New { name } => new::run(&cli.global, &name),
    }
}
