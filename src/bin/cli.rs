//! Timetable Crawler CLI
//!
//! Prints the result envelope of one crawl as JSON.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use timetable_crawler::{
    error::Result,
    models::{CalendarQuery, Config, EnrollmentQuery},
    pipeline,
};

/// Timetable crawler
#[derive(Parser, Debug)]
#[command(
    name = "timetable",
    version,
    about = "Fetch timetable and enrollment tables as JSON"
)]
struct Cli {
    /// Path to a TOML config file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the timetable listing
    Calendar(CalendarArgs),

    /// Fetch the enrollment grid
    Enrollment(EnrollmentArgs),

    /// Validate configuration and show key maps
    Validate,
}

#[derive(Args, Debug)]
struct CalendarArgs {
    #[arg(long)]
    semester: Option<String>,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long = "class")]
    subject_class: Option<String>,
    #[arg(long)]
    subject_name: Option<String>,
    #[arg(long)]
    teacher: Option<String>,
    #[arg(long)]
    amphitheater: Option<String>,
    /// 2..7, or CN for Sunday
    #[arg(long)]
    day: Option<String>,
}

impl From<CalendarArgs> for CalendarQuery {
    fn from(args: CalendarArgs) -> Self {
        CalendarQuery {
            semester_id: args.semester,
            subject_id: args.subject,
            subject_class_id: args.subject_class,
            subject_name: args.subject_name,
            teacher_name: args.teacher,
            amphitheater: args.amphitheater,
            day: args.day,
            ..CalendarQuery::default()
        }
    }
}

#[derive(Args, Debug)]
struct EnrollmentArgs {
    #[arg(long)]
    limit: Option<i64>,
    #[arg(long)]
    semester: Option<String>,
    #[arg(long)]
    student: Option<String>,
    #[arg(long)]
    name: Option<String>,
    /// dd/mm/yyyy
    #[arg(long)]
    birth: Option<String>,
    #[arg(long)]
    official_class: Option<String>,
    #[arg(long = "class")]
    subject_class: Option<String>,
    #[arg(long)]
    class_name: Option<String>,
    #[arg(long)]
    group: Option<String>,
    #[arg(long)]
    credits: Option<i64>,
    #[arg(long)]
    note: Option<String>,
    #[arg(long)]
    page: Option<i64>,
}

impl From<EnrollmentArgs> for EnrollmentQuery {
    fn from(args: EnrollmentArgs) -> Self {
        EnrollmentQuery {
            limit: args.limit,
            semester_id: args.semester,
            student_id: args.student,
            student_name: args.name,
            student_date_birth: args.birth,
            student_official_class: args.official_class,
            subject_class_id: args.subject_class,
            subject_class_name: args.class_name,
            subject_group: args.group,
            subject_credit_number: args.credits,
            subject_note: args.note,
            page: args.page,
            ..EnrollmentQuery::default()
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            log::info!("Loaded configuration from {}", path.display());
            config
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Calendar(args) => {
            let envelope = pipeline::run_calendar(&config, &args.into()).await?;
            print_json(&envelope)?;
        }
        Command::Enrollment(args) => {
            let envelope = pipeline::run_enrollment(&config, &args.into()).await?;
            print_json(&envelope)?;
        }
        Command::Validate => {
            let summaries = pipeline::run_validate(&config)?;
            print_json(&summaries)?;
        }
    }

    Ok(())
}
