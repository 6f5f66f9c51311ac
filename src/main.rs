//! CLI entry point for the bikeshare explorer.
//!
//! `explore` walks through the interactive question loop; `report` and `raw`
//! run a single analysis from command-line arguments.

use anyhow::{Context, Result};
use bikeshare_explorer::{
    config::{CityRegistry, Config, FILE_LOG_DIRECTIVE, STDERR_LOG_DIRECTIVE},
    error::StatsError,
    filter::FilterCriteria,
    output::{
        ColorPrinter, Printer, Tone, print_json, render_durations, render_page, render_stations,
        render_temporal, render_users,
    },
    prompt::{PromptError, PromptResult, Prompter},
    session::AnalysisSession,
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{self, BufRead};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory holding the city CSV files [env: BIKESHARE_DATA_DIR]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON file mapping city names to CSV paths [env: BIKESHARE_CITIES]
    #[arg(long, global = true)]
    cities: Option<PathBuf>,

    /// Raw records shown per page [env: BIKESHARE_PAGE_SIZE]
    #[arg(long, global = true)]
    page_size: Option<NonZeroUsize>,

    /// Disable colored output
    #[arg(long, global = true, default_value_t = false)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively pick a city and filters, then browse statistics and raw data
    Explore,
    /// Print statistics for one city
    Report {
        city: String,

        /// Month to filter by (January-December or All)
        #[arg(short, long, default_value = "All")]
        month: String,

        /// Day of week to filter by (Monday-Sunday or All)
        #[arg(short, long, default_value = "All")]
        day: String,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print raw trip records page by page
    Raw {
        city: String,

        #[arg(short, long, default_value = "All")]
        month: String,

        #[arg(short, long, default_value = "All")]
        day: String,

        /// Number of pages to print
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// List configured cities
    Cities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::from_env("RUST_LOG").add_directive(STDERR_LOG_DIRECTIVE.parse()?),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::from_env("RUST_LOG_JSON").add_directive(FILE_LOG_DIRECTIVE.parse()?),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env(cli.data_dir, cli.cities, cli.page_size)?;
    config.color = !cli.no_color;
    let registry = config.registry()?;

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => {
            let stdin = io::stdin();
            let mut prompter =
                Prompter::new(stdin.lock(), ColorPrinter::stdout(config.color));
            match explore(&mut prompter, &registry, &config) {
                Ok(()) => {
                    prompter
                        .printer()
                        .print(Tone::Warning, "Program complete...exiting")?;
                }
                Err(PromptError::Cancelled) => {
                    prompter
                        .printer()
                        .print(Tone::Warning, "Input closed...exiting.")?;
                }
                Err(PromptError::Io(e)) => return Err(e.into()),
            }
        }
        Commands::Report {
            city,
            month,
            day,
            json,
        } => {
            let criteria = FilterCriteria::new(&month, &day)?;
            let session = AnalysisSession::open(&registry, &city, criteria, config.page_size)
                .with_context(|| format!("cannot analyze {city}"))?;

            if json {
                let report = session.report()?;
                print_json(&mut io::stdout(), &report)?;
            } else {
                let mut printer = ColorPrinter::stdout(config.color);
                print_statistics(&mut printer, &session)?;
            }
        }
        Commands::Raw {
            city,
            month,
            day,
            pages,
        } => {
            let criteria = FilterCriteria::new(&month, &day)?;
            let mut session = AnalysisSession::open(&registry, &city, criteria, config.page_size)
                .with_context(|| format!("cannot load {city}"))?;
            let mut printer = ColorPrinter::stdout(config.color);

            for _ in 0..pages {
                let page = session.next_page();
                if page.is_empty() {
                    break;
                }
                render_page(&mut printer, &page)?;
                if !page.has_more {
                    break;
                }
            }
        }
        Commands::Cities => {
            let mut printer = ColorPrinter::stdout(config.color);
            for (city, path) in registry.iter() {
                printer.print(Tone::Plain, &format!("{city}\t{}", path.display()))?;
            }
        }
    }

    Ok(())
}

/// Question loop: pick filters, show statistics, offer raw data, restart.
fn explore<R: BufRead, P: Printer>(
    prompter: &mut Prompter<R, P>,
    registry: &CityRegistry,
    config: &Config,
) -> PromptResult<()> {
    let cities: Vec<&str> = registry.cities().collect();
    let page_size = config.page_size.get();

    prompter
        .printer()
        .print(Tone::Heading, "Hello! Let's explore some US bikeshare data!")?;

    loop {
        let city = prompter.ask_city(&cities)?;
        let criteria = prompter.ask_filters()?;
        prompter.printer().rule(Tone::Heading)?;
        prompter
            .printer()
            .print(Tone::Heading, "Loading selected data and filters...")?;

        match AnalysisSession::open(registry, &city, criteria, config.page_size) {
            Ok(mut session) => {
                info!(city = %city, %criteria, records = session.dataset().len(), "Exploring");
                print_statistics(prompter.printer(), &session)?;
                browse_raw(prompter, &mut session, page_size)?;
            }
            Err(e) => {
                error!(error = %e, stage = %e.stage(), "Could not start analysis");
                prompter.printer().print(Tone::Warning, &e.to_string())?;
            }
        }

        if !prompter.confirm("Would you like to restart?")? {
            return Ok(());
        }
    }
}

fn print_statistics<P: Printer>(printer: &mut P, session: &AnalysisSession) -> io::Result<()> {
    render_temporal(printer, &logged(session.temporal_stats()))?;
    render_stations(printer, &logged(session.station_stats()))?;
    render_durations(printer, &logged(session.duration_stats()))?;
    let users = session.user_stats();
    if let Some(Err(e)) = &users.birth_years {
        warn!(error = %e, "Birth year statistics unavailable for current filters");
    }
    render_users(printer, session.city(), &users)?;
    printer.rule(Tone::Heading)
}

fn logged<T>(result: Result<T, StatsError>) -> Result<T, StatsError> {
    result.inspect_err(|e| warn!(error = %e, "Statistic unavailable for current filters"))
}

fn browse_raw<R: BufRead, P: Printer>(
    prompter: &mut Prompter<R, P>,
    session: &mut AnalysisSession,
    page_size: usize,
) -> PromptResult<()> {
    if !prompter.confirm(&format!(
        "Would you like to display {page_size} rows of raw data?"
    ))? {
        prompter.printer().print(Tone::Warning, "No raw data chosen.")?;
        return Ok(());
    }

    loop {
        let page = session.next_page();
        if page.is_empty() {
            prompter.printer().print(Tone::Warning, "No more raw data.")?;
            return Ok(());
        }
        render_page(prompter.printer(), &page)?;
        if !page.has_more {
            prompter.printer().print(Tone::Success, "End of raw data.")?;
            return Ok(());
        }
        if !prompter.confirm(&format!(
            "Display an additional {page_size} rows?"
        ))? {
            return Ok(());
        }
    }
}
