//! `vaultplan` command-line entry point.
//!
//! # Responsibility
//! - Load tasks and settings from JSON files and run one planner query.
//! - Print results as pretty JSON on stdout; diagnostics go to stderr.

mod input;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use input::{load_settings, parse_now, CliError, JsonFileTaskSource};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use vaultplan_core::{default_log_level, init_logging, Basin, PlannerService};

#[derive(Parser)]
#[command(name = "vaultplan", version, about = "Prioritize and schedule vault tasks")]
struct Cli {
    /// Log level for the rolling log file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for log files; logging stays off without it.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args)]
struct Inputs {
    /// JSON task list.
    #[arg(long)]
    tasks: PathBuf,

    /// JSON planner settings.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Local wall-clock instant to plan for (defaults to the current time).
    #[arg(long)]
    now: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Compile today's schedule.
    Plan(Inputs),

    /// List every task with its dimensions, best score first.
    Score(Inputs),

    /// Show the rows of one basin view.
    Basin {
        #[arg(value_parser = parse_basin)]
        view: Basin,
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Group B5 candidates and committed tasks into slots.
    Slots(Inputs),
}

fn parse_basin(value: &str) -> Result<Basin, String> {
    Basin::parse(value).ok_or_else(|| format!("unknown basin `{value}`; expected B0..B6"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    match cli.cmd {
        Command::Plan(inputs) => {
            let (service, now) = open(&inputs)?;
            let schedule = service.plan_day(now)?;
            report(&schedule.diagnostics);
            print_json(&schedule)
        }
        Command::Score(inputs) => {
            let (service, now) = open(&inputs)?;
            print_json(&service.scored_tasks(now.date())?)
        }
        Command::Basin { view, inputs } => {
            let (service, now) = open(&inputs)?;
            print_json(&service.basin_rows(view, now.date())?)
        }
        Command::Slots(inputs) => {
            let (service, now) = open(&inputs)?;
            print_json(&service.b5_slots(now.date())?)
        }
    }
}

type CliService = PlannerService<JsonFileTaskSource, vaultplan_core::StaticTagLexicon>;

fn open(inputs: &Inputs) -> Result<(CliService, NaiveDateTime), CliError> {
    let now = match inputs.now.as_deref() {
        Some(value) => parse_now(value)?,
        None => chrono::Local::now().naive_local(),
    };
    let (settings, diagnostics) = load_settings(inputs.settings.as_deref())?;
    report(&diagnostics);

    let lexicon = settings.lexicon.clone();
    let source = JsonFileTaskSource::new(&inputs.tasks);
    let mut service = PlannerService::new(source, lexicon, settings);
    let count = service.refresh()?;
    report(service.snapshot()?.diagnostics());
    info!("event=cli_open module=cli status=ok tasks={count}");
    Ok((service, now))
}

fn report(diagnostics: &[String]) {
    for line in diagnostics {
        eprintln!("warning: {line}");
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(CliError::Output)?;
    println!("{text}");
    Ok(())
}
