//! `availability` CLI — load schedules and query availability and overlap offline.
//!
//! ## Usage
//!
//! ```sh
//! # Future availability of one user
//! availability show -i schedule.json --user user123
//!
//! # Overlap between two users, evaluated at a fixed instant
//! availability --now 2026-03-01T00:00:00Z overlap -i schedule.json --user user123 --other user456
//!
//! # Move a slot, then print the user's availability
//! availability reschedule -i schedule.json --user user123 \
//!     --old-start 2026-03-18T09:00:00Z --old-end 2026-03-18T11:00:00Z \
//!     --new-start 2026-03-18T12:00:00Z --new-end 2026-03-18T14:00:00Z
//!
//! # Expand a recurring slot
//! availability expand --start 2026-03-20T09:00:00Z --end 2026-03-20T11:00:00Z --recurrence weekdays
//!
//! # Validate a document without querying it
//! availability check -i schedule.json
//! ```
//!
//! Output is JSON on stdout. Logs go to stderr and are controlled by `RUST_LOG`.

mod document;

use std::io::{self, Read};

use anyhow::{Context, Result};
use availability_core::validation::parse_utc;
use availability_core::{
    AvailabilityService, BatchPolicy, EngineConfig, FixedClock, Recurrence, SetOutcome,
    SlotBounds, SlotRequest,
};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::document::ScheduleDocument;

#[derive(Parser)]
#[command(
    name = "availability",
    version,
    about = "Per-user availability and pairwise overlap"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Evaluation instant for future checks (UTC, RFC 3339). Defaults to the system clock.
    #[arg(long, global = true, value_parser = parse_utc)]
    now: Option<DateTime<Utc>>,

    /// Reject a user's whole batch if any slot is invalid
    #[arg(long, global = true)]
    all_or_nothing: bool,

    /// Days covered by recurrence expansion
    #[arg(long, global = true, default_value_t = availability_core::expander::DEFAULT_HORIZON_DAYS)]
    horizon_days: u16,
}

#[derive(Args)]
struct InputArgs {
    /// Schedule document (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a user's future availability
    Show {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        user: String,
    },
    /// Print the future overlap between two users
    Overlap {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        user: String,
        #[arg(long)]
        other: String,
    },
    /// Replace one of a user's slots, then print their availability
    Reschedule {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        user: String,
        #[arg(long)]
        old_start: String,
        #[arg(long)]
        old_end: String,
        #[arg(long)]
        new_start: String,
        #[arg(long)]
        new_end: String,
    },
    /// Delete one of a user's slots, then print their availability
    Delete {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        user: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Expand a single slot without storing it
    Expand {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long, default_value_t = Recurrence::None)]
        recurrence: Recurrence,
    },
    /// Load a document and report per-user insert counts
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let now = cli.now.unwrap_or_else(Utc::now);
    let config = EngineConfig {
        expansion_horizon_days: cli.horizon_days,
        batch_policy: if cli.all_or_nothing {
            BatchPolicy::AllOrNothing
        } else {
            BatchPolicy::PerSlot
        },
    };
    let service = AvailabilityService::with_config(FixedClock(now), config)
        .context("Invalid engine configuration")?;

    let output = match cli.command {
        Commands::Show { input, user } => {
            load(&service, &input)?;
            json!({ "availability": service.get_availability(&user) })
        }
        Commands::Overlap { input, user, other } => {
            load(&service, &input)?;
            json!({ "overlap": service.compute_overlap(&user, &other) })
        }
        Commands::Reschedule {
            input,
            user,
            old_start,
            old_end,
            new_start,
            new_end,
        } => {
            load(&service, &input)?;
            service
                .reschedule_slot(
                    &user,
                    &SlotBounds::new(old_start, old_end),
                    &SlotBounds::new(new_start, new_end),
                )
                .context("Failed to reschedule slot")?;
            json!({ "availability": service.get_availability(&user) })
        }
        Commands::Delete {
            input,
            user,
            start,
            end,
        } => {
            load(&service, &input)?;
            service
                .delete_slot(&user, &SlotBounds::new(start, end))
                .context("Failed to delete slot")?;
            json!({ "availability": service.get_availability(&user) })
        }
        Commands::Expand {
            start,
            end,
            recurrence,
        } => {
            let slot = SlotRequest::new(start, end).with_recurrence(recurrence);
            let intervals = service
                .expand_slot(&slot)
                .context("Failed to expand slot")?;
            json!({ "intervals": intervals })
        }
        Commands::Check { input } => {
            let outcomes = load(&service, &input)?;
            let users: serde_json::Map<String, serde_json::Value> = outcomes
                .into_iter()
                .map(|(user_id, outcome)| (user_id, json!(outcome)))
                .collect();
            json!({ "users": users })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn load(
    service: &AvailabilityService<FixedClock>,
    input: &InputArgs,
) -> Result<Vec<(String, SetOutcome)>> {
    let json = read_input(input.input.as_deref())?;
    ScheduleDocument::from_json(&json)?.load_into(service)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
