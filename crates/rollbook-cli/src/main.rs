use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use rollbook_calendar::{RangeResolver, ResolveContext, TermCalendar};
use rollbook_cli::{calendar_file::load_calendar, roster::sample_roster};
use rollbook_models::{Frequency, Term};

#[derive(Parser)]
#[command(name = "rollbook-cli")]
#[command(about = "Rollbook CLI - Attendance range tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a frequency preset to a date range and its school days
    Resolve {
        /// Preset name, e.g. business-week, term, custom
        #[arg(short = 'f', long)]
        frequency: Frequency,

        /// Reference date (defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Term calendar JSON, required for term, half-term and session
        #[arg(short = 'c', long)]
        calendar: Option<PathBuf>,

        /// Academic session label
        #[arg(short = 's', long)]
        session: Option<String>,

        /// first, second or third
        #[arg(short = 't', long)]
        term: Option<Term>,

        /// Custom range start
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Custom range end
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// List sessions and terms in a calendar file
    Sessions {
        /// Term calendar JSON
        #[arg(short = 'c', long)]
        calendar: PathBuf,

        /// Highlight the term containing this date (defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Print a fake class roster as JSON
    SampleRoster {
        /// Number of students
        #[arg(short = 'n', long, default_value = "25")]
        students: usize,
    },
}

fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            frequency,
            today,
            calendar,
            session,
            term,
            from,
            to,
        } => handle_resolve(frequency, today, calendar, session, term, from, to),
        Commands::Sessions { calendar, today } => handle_sessions(calendar, today),
        Commands::SampleRoster { students } => handle_sample_roster(students),
    }
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("❌ {}: {}", context, err);
    std::process::exit(1);
}

fn handle_resolve(
    frequency: Frequency,
    today: Option<NaiveDate>,
    calendar: Option<PathBuf>,
    session: Option<String>,
    term: Option<Term>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) {
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let calendar: Option<TermCalendar> = calendar.map(|path| {
        load_calendar(&path).unwrap_or_else(|e| fail("Error loading calendar", format!("{:#}", e)))
    });

    let resolver = match &calendar {
        Some(calendar) => RangeResolver::new(calendar),
        None => RangeResolver::without_calendar(),
    };

    let ctx = ResolveContext {
        session: session.as_deref(),
        term,
        custom: from
            .zip(to)
            .map(|(from, to)| rollbook_calendar::CustomPick { from, to }),
    };

    match resolver.resolve(frequency, today, ctx) {
        Ok(range) => match serde_json::to_string_pretty(&range) {
            Ok(json) => println!("{}", json),
            Err(e) => fail("Error encoding range", e),
        },
        Err(e) => fail("Error resolving range", e),
    }
}

fn handle_sessions(path: PathBuf, today: Option<NaiveDate>) {
    let calendar = load_calendar(&path)
        .unwrap_or_else(|e| fail("Error loading calendar", format!("{:#}", e)));
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let current = calendar
        .current_term(today)
        .map(|(session, term, _)| (session.to_string(), term));

    if calendar.is_empty() {
        println!("No academic sessions in {}", path.display());
        return;
    }

    for session in calendar.sessions() {
        println!("{}", session.label);
        for (term, dates) in session.terms.iter() {
            let marker = match &current {
                Some((label, current_term)) if *label == session.label && *current_term == term => {
                    "  <- current"
                }
                _ => "",
            };
            println!(
                "  {:<7} {} .. {} ({} days){}",
                term.to_string(),
                dates.start,
                dates.end,
                dates.num_days() + 1,
                marker
            );
        }
    }
}

fn handle_sample_roster(students: usize) {
    let roster = sample_roster(students);
    match serde_json::to_string_pretty(&roster) {
        Ok(json) => println!("{}", json),
        Err(e) => fail("Error encoding roster", e),
    }
}
