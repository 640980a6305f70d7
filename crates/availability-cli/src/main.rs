//! `booking`: query open appointment slots from a provider configuration.
//!
//! All output is JSON on stdout; logs and errors go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use availability_engine::{
    ClientContact, ProviderConfig, SlotOptions, TimeOfDay, DEFAULT_SCAN_HORIZON_DAYS,
};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "booking",
    version,
    about = "Query open appointment slots and build booking requests"
)]
struct Cli {
    /// Provider configuration file (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List open slots for a service on a date
    Slots {
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Service id from the catalog
        #[arg(long)]
        service: u64,
        /// Minutes between candidate start times (overrides the config)
        #[arg(long)]
        step: Option<u32>,
    },
    /// Find the next open date
    NextDate {
        /// First date to consider (default: today)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Number of days to scan, including the first
        #[arg(long, default_value_t = DEFAULT_SCAN_HORIZON_DAYS)]
        horizon: u32,
        /// Require an actual open slot for this service, not just an open weekday
        #[arg(long)]
        service: Option<u64>,
    },
    /// Validate and print a booking request for an open slot
    Book {
        #[arg(long)]
        date: NaiveDate,
        /// Start time as HH:MM
        #[arg(long)]
        time: TimeOfDay,
        #[arg(long)]
        service: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Check that the configuration loads
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(config = %cli.config.display(), "starting");

    let config = ProviderConfig::from_path(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;

    match cli.command {
        Command::Slots {
            date,
            service,
            step,
        } => {
            let options = SlotOptions {
                step_minutes: step.unwrap_or(config.step_minutes),
            };
            let slots = config
                .slots_with_options(date, service, &options)
                .with_context(|| format!("cannot list slots for service {} on {}", service, date))?;
            print_json(&slots)?;
        }
        Command::NextDate {
            from,
            horizon,
            service,
        } => {
            let from = from.unwrap_or_else(|| chrono::Local::now().date_naive());
            match service {
                Some(id) => {
                    let date = config
                        .next_bookable_date(id, from, horizon)
                        .with_context(|| format!("cannot scan for service {}", id))?;
                    print_json(&json!({ "date": date, "service": id }))?;
                }
                None => print_json(&config.next_available_date(from, horizon))?,
            }
        }
        Command::Book {
            date,
            time,
            service,
            name,
            email,
            phone,
        } => {
            let contact = ClientContact { name, email, phone };
            let request = config
                .request_booking(service, date, time, contact)
                .context("booking request rejected")?;
            print_json(&request)?;
        }
        Command::Validate => {
            let open_days = availability_engine::template::WEEK
                .iter()
                .filter(|&&d| config.schedule.is_open(d))
                .count();
            println!(
                "ok: {} ({} services, {} bookings, {} open days)",
                config.provider.name,
                config.services.len(),
                config.bookings.len(),
                open_days
            );
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", out);
    Ok(())
}
