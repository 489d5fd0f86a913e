//! `schedule`: a month calendar on the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use schedule_engine::{
    parse_date, Calendar, CalendarOptions, JsonFileStore, LocalClock, Recurrence,
};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

/// Month calendar with recurring events and conflict-checked moves
#[derive(Parser, Debug)]
#[command(name = "schedule")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file holding the events
    #[arg(long, global = true, env = "SCHEDULE_STORE", default_value = "events.json")]
    store: PathBuf,

    /// IANA time zone used to read dates and times
    #[arg(long, global = true, env = "SCHEDULE_TZ", default_value = "UTC")]
    timezone: String,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true, env = "SCHEDULE_TODAY")]
    today: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an event
    Add {
        #[arg(long)]
        title: String,
        /// Local date and time, e.g. 2024-06-10T09:00
        #[arg(long)]
        at: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// none, daily, weekly, monthly, yearly or custom (every 2 weeks)
        #[arg(long, default_value = "none")]
        recurrence: Recurrence,
    },
    /// Change fields of an existing event
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        recurrence: Option<Recurrence>,
    },
    /// Delete an event
    Delete { id: String },
    /// List events
    List {
        /// Case-insensitive text in title or description
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List the categories in use
    Categories,
    /// Show a month grid
    Month {
        /// Month as YYYY-MM (defaults to the current month)
        month: Option<String>,
        /// Only show the week containing today
        #[arg(long)]
        week: bool,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Check whether an event occurs on a date
    Occurs { id: String, date: String },
    /// Check whether an event could be moved to a date
    CanMove { id: String, date: String },
    /// Move a one-time event to a date, keeping its time of day
    Move { id: String, date: String },
    /// Write all events to an iCalendar file
    Export {
        #[arg(short, long, default_value = schedule_engine::EXPORT_FILE_NAME)]
        output: PathBuf,
        /// Open the Google Calendar import page afterwards
        #[arg(long)]
        open_import: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let clock = LocalClock::from_name(&args.timezone)?;
    let today = match &args.today {
        Some(s) => parse_date(s)?,
        None => clock.today(Utc::now()),
    };
    let options = CalendarOptions {
        clock,
        ..CalendarOptions::default()
    };
    let store = JsonFileStore::new(&args.store);
    let mut cal = Calendar::open(store, options, today)
        .with_context(|| format!("failed to open {}", args.store.display()))?;

    let out = commands::Output { json: args.json };

    match args.command {
        Command::Add {
            title,
            at,
            description,
            category,
            color,
            recurrence,
        } => commands::add(
            &mut cal,
            &out,
            commands::Fields {
                title: Some(title),
                at: Some(at),
                description,
                category,
                color,
                recurrence: Some(recurrence),
            },
        ),
        Command::Edit {
            id,
            title,
            at,
            description,
            category,
            color,
            recurrence,
        } => commands::edit(
            &mut cal,
            &out,
            &id,
            commands::Fields {
                title,
                at,
                description,
                category,
                color,
                recurrence,
            },
        ),
        Command::Delete { id } => commands::delete(&mut cal, &out, &id),
        Command::List { search, category } => commands::list(&cal, &out, search, category),
        Command::Categories => commands::categories(&cal, &out),
        Command::Month {
            month,
            week,
            search,
            category,
        } => {
            if let Some(m) = month {
                cal.show_month(parse_month(&m)?);
            }
            commands::month(&cal, &out, today, week, search, category)
        }
        Command::Occurs { id, date } => commands::occurs(&cal, &out, &id, parse_date(&date)?),
        Command::CanMove { id, date } => commands::can_move(&cal, &out, &id, parse_date(&date)?),
        Command::Move { id, date } => commands::move_event(&mut cal, &out, &id, parse_date(&date)?),
        Command::Export {
            output,
            open_import,
        } => commands::export(&cal, &out, &output, open_import),
    }
}

fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("invalid month '{}', expected YYYY-MM", s))
}
