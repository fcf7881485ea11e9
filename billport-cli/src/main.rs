use anyhow::{bail, Result};
use billport_ingest::{parse_mail_export_csv, search_query, BillExtractor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bills_cmd;
mod config;
mod reminders_cmd;
mod rewards_cmd;
mod setup;
mod state;

use bills_cmd::BillsCommand;
use rewards_cmd::RewardsCommand;

#[derive(Parser, Debug)]
#[command(
    name = "billport",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BILLPORT_BUILD_SHA"), ")"),
    about = "Track bills, due dates and reminders"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One-time interactive setup: create a profile and default config
    Setup,

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Add, list and pay bills
    Bills {
        #[command(subcommand)]
        command: BillsCommand,
    },

    /// Overdue / due-soon / upcoming summary
    Dashboard {
        /// Due-soon window in days (default from config; 7 for a weekly view)
        #[arg(long)]
        lead_days: Option<i64>,
    },

    /// Reward points
    Rewards {
        #[command(subcommand)]
        command: RewardsCommand,
    },

    /// Score exported mail for bill-like messages
    Scan {
        /// Mail export CSV (id,from,subject,date,snippet)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Only keep candidates scoring above this (default from config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Print the mail search query to export with, then exit
        #[arg(long, default_value_t = false)]
        query: bool,
    },

    /// Show reminders due on a day (default: today)
    Reminders {
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,

        /// One JSON intent per line
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write config.toml with defaults if missing
    Init,
    /// Print the effective config
    Show,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("BILLPORT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Setup => setup::run_setup()?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}\n", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg)?);
            }
        },

        Command::Bills { command } => {
            let cfg = config::load_config()?;
            let profile = state::read_profile()?;
            let mut store = state::load_store()?;
            bills_cmd::run(command, &cfg, &profile, &mut store)?;
        }

        Command::Dashboard { lead_days } => {
            let cfg = config::load_config()?;
            let profile = state::read_profile()?;
            let store = state::load_store()?;
            bills_cmd::dashboard(&cfg, &profile, &store, lead_days)?;
        }

        Command::Rewards { command } => {
            let profile = state::read_profile()?;
            let mut store = state::load_store()?;
            rewards_cmd::run(command, &profile, &mut store)?;
        }

        Command::Scan {
            csv,
            threshold,
            query,
        } => {
            if query {
                println!("{}", search_query(10));
                return Ok(());
            }
            let Some(csv_path) = csv else {
                bail!("pass --csv <mail export> (or --query for the search to export with)");
            };
            let cfg = config::load_config()?;
            scan(&cfg, &csv_path, threshold)?;
        }

        Command::Reminders { date, json } => {
            let cfg = config::load_config()?;
            let profile = state::read_profile()?;
            let store = state::load_store()?;
            reminders_cmd::run(&cfg, &profile, &store, date, json)?;
        }
    }

    Ok(())
}

fn scan(cfg: &config::Config, csv_path: &std::path::Path, threshold: Option<f64>) -> Result<()> {
    if !csv_path.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", csv_path.display());
    }

    let messages = parse_mail_export_csv(csv_path, cfg.scan.max_messages)?;
    let extractor = BillExtractor::with_policy(cfg.scan_policy(threshold))?;
    let candidates = extractor.scan(&messages);

    println!("Scanned {} messages from {}", messages.len(), csv_path.display());
    println!("Found {} likely bills\n", candidates.len());

    for c in &candidates {
        let amount = c
            .amount
            .map(|a| format!("${:.2}", a))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "- {:.0}% | {} | {} | {} | due {} | {}",
            c.confidence * 100.0,
            c.company,
            c.category,
            amount,
            c.due_date.as_deref().unwrap_or("-"),
            c.subject
        );
    }
    Ok(())
}
