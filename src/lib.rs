pub mod config;
pub mod model;
pub mod render;
pub mod search;
pub mod ui;

use anyhow::Result;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use config::{AppConfig, ConfigError, Overrides, Profile};
use render::ViewMode;
use search::client::SearchClient;
use search::query::{Endpoint, Field, SearchCriteria};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "AGENDA_SEARCH_LOG";

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "agenda",
    version,
    about = "Search the event agenda by name, position, organization or filter"
)]
pub struct Cli {
    /// Path to the config file (defaults to the platform config dir)
    #[arg(long, env = config::ENV_CONFIG, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the agenda service
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request profile; production adds a JSON content type header
    #[arg(long, value_enum, global = true)]
    pub profile: Option<Profile>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// When to colorize output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,

    /// Increase log verbosity (-v warn, -vv info, -vvv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch interactive TUI (the default)
    Tui,
    /// Run one search and print the results
    Search {
        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Result view
        #[arg(long, value_enum, default_value_t = ViewMode::Cards)]
        view: ViewMode,

        /// Shorthand for --view raw
        #[arg(long)]
        json: bool,
    },
    /// Print the URL a search would request, without sending it
    Endpoint {
        #[command(flatten)]
        criteria: CriteriaArgs,
    },
    /// Print the effective configuration
    Config,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Man,
}

/// The four search inputs. Highest priority non-empty one is used.
#[derive(Args, Debug, Clone, Default)]
pub struct CriteriaArgs {
    /// Search by name
    #[arg(long)]
    pub name: Option<String>,

    /// Search by position
    #[arg(long)]
    pub position: Option<String>,

    /// Search by organization
    #[arg(long)]
    pub organization: Option<String>,

    /// Search by generic filter
    #[arg(long)]
    pub filter: Option<String>,
}

impl From<CriteriaArgs> for SearchCriteria {
    fn from(args: CriteriaArgs) -> Self {
        SearchCriteria::default()
            .with(Field::Name, args.name.unwrap_or_default())
            .with(Field::Position, args.position.unwrap_or_default())
            .with(Field::Organization, args.organization.unwrap_or_default())
            .with(Field::Filter, args.filter.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("TUI is disabled: stdout is not a terminal (use `agenda search` instead)")]
    TuiUnavailable,
}

/// Process exit code for an error returned by [`run`].
///
/// 1 request failed, 2 usage or TUI unavailable, 3 configuration.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() {
        3
    } else if err.downcast_ref::<CliError>().is_some() {
        2
    } else {
        1
    }
}

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(*shell, &mut Cli::command(), "agenda", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Man) => {
            clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?;
            return Ok(());
        }
        _ => {}
    }

    let is_tui = matches!(cli.command, None | Some(Commands::Tui));
    if is_tui && !io::stdout().is_terminal() {
        return Err(CliError::TuiUnavailable.into());
    }
    let _log_guard = if is_tui {
        init_file_logging(cli.verbose)
    } else {
        init_stderr_logging(cli.verbose);
        None
    };

    let overrides = Overrides {
        base_url: cli.base_url.clone(),
        profile: cli.profile,
        timeout_secs: cli.timeout,
    };
    let config = AppConfig::load(cli.config.as_deref(), &overrides)?;

    match cli.command {
        None | Some(Commands::Tui) => run_tui(&config),
        Some(Commands::Search { criteria, view, json }) => {
            let view = if json { ViewMode::Raw } else { view };
            run_search(&config, criteria.into(), view, cli.color).await
        }
        Some(Commands::Endpoint { criteria }) => {
            let endpoint = Endpoint::select(&criteria.into());
            println!("{}", endpoint.url(&config.base_url));
            Ok(())
        }
        Some(Commands::Config) => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Some(Commands::Completions { .. } | Commands::Man) => Ok(()),
    }
}

fn run_tui(config: &AppConfig) -> Result<()> {
    let client = SearchClient::new(config)?;
    let handle = tokio::runtime::Handle::current();
    tokio::task::block_in_place(|| ui::tui::run_tui(client, handle))
}

async fn run_search(
    config: &AppConfig,
    criteria: SearchCriteria,
    view: ViewMode,
    color: ColorChoice,
) -> Result<()> {
    let client = SearchClient::new(config)?;
    let spinner = loading_spinner(color);

    let outcome = client.dispatch(&criteria).await;
    spinner.finish_and_clear();
    let result = outcome?;

    let color = color.enabled();
    colored::control::set_override(color);
    let text = render::format_rendered(&render::render(&result, view), color);

    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn loading_spinner(color: ColorChoice) -> ProgressBar {
    if color == ColorChoice::Never || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Searching...");
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn env_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        })
    })
}

fn init_stderr_logging(verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to a daily file so the TUI screen stays clean.
fn init_file_logging(verbose: u8) -> Option<WorkerGuard> {
    let dir = dirs::data_local_dir()?.join("agenda-search").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::daily(dir, "agenda-search.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}
