//! Loyalty CLI - command-line front end for journal-backed loyalty ledgers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;
mod output;

use commands::{init, list, ops, query, verify, Context};
use config::CliConfig;
use logging::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "loyalty")]
#[command(about = "Reward catalog and point balances kept in an append-only journal")]
struct Cli {
    /// Config file (default: ./loyalty.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Journal file (overrides the config file)
    #[arg(long, global = true)]
    journal: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new ledger
    Init {
        /// Initial owner
        #[arg(long)]
        owner: String,
    },
    /// Print the current owner
    Owner,
    /// Transfer ownership
    SetOwner {
        /// Identity performing the call
        #[arg(long = "as")]
        caller: String,
        /// New owner
        new_owner: String,
    },
    /// Register a reward and print its id
    AddReward {
        /// Identity performing the call
        #[arg(long = "as")]
        caller: String,
        /// Reward description (may be empty)
        description: String,
    },
    /// Credit points to a user and print the new balance
    Earn {
        /// Identity performing the call
        #[arg(long = "as")]
        caller: String,
        /// User to credit
        user: String,
        /// Points to credit
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Redeem a reward with the caller's points and print the remaining balance
    Redeem {
        /// Identity performing the call
        #[arg(long = "as")]
        caller: String,
        /// Reward to redeem
        #[arg(allow_hyphen_values = true)]
        reward_id: String,
    },
    /// Print a reward's description (empty if unknown)
    Reward {
        /// Reward id
        #[arg(allow_hyphen_values = true)]
        reward_id: String,
    },
    /// Print a user's balance
    Points {
        /// User identity
        user: String,
    },
    /// List journal records
    List {
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
        /// Only records of this event type
        #[arg(long = "type")]
        event_type: Option<String>,
        /// Only records performed by this caller
        #[arg(long)]
        principal: Option<String>,
        /// Only records touching this user's balance
        #[arg(long)]
        user: Option<String>,
        /// Stop after N records (default: unlimited)
        #[arg(long)]
        max_events: Option<u64>,
    },
    /// Verify every record id and chain link
    Verify {
        /// Exit with error code if verification fails
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn run(cli: Cli) -> commands::CommandResult {
    let config = CliConfig::load(cli.config.as_deref())?;
    let format: LogFormat = config.log_format.parse()?;
    init_logging(format, &config.log_level);
    let ctx = Context::new(&config, cli.journal);

    match cli.command {
        Commands::Init { owner } => init::run(&ctx, &owner),
        Commands::Owner => query::owner(&ctx),
        Commands::SetOwner { caller, new_owner } => ops::set_owner(&ctx, &caller, &new_owner),
        Commands::AddReward {
            caller,
            description,
        } => ops::add_reward(&ctx, &caller, &description),
        Commands::Earn {
            caller,
            user,
            amount,
        } => ops::earn(&ctx, &caller, &user, &amount),
        Commands::Redeem { caller, reward_id } => ops::redeem(&ctx, &caller, &reward_id),
        Commands::Reward { reward_id } => query::reward(&ctx, &reward_id),
        Commands::Points { user } => query::points(&ctx, &user),
        Commands::List {
            json,
            event_type,
            principal,
            user,
            max_events,
        } => list::run(
            &ctx,
            list::ListArgs {
                json,
                event_type,
                principal,
                user,
                max_events,
            },
        ),
        Commands::Verify { strict, json } => verify::run(&ctx, strict, json),
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
