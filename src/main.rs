use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use riichi_stats::commands;
use riichi_stats::config::{self, Config};
use riichi_stats::data_provider::{DatasetSource, RecordSource};
use riichi_stats::fixtures;
use riichi_stats::i18n::{detect_language, I18n, Language, MissingKeyRecorder};
use riichi_stats::model::{Model, PlayerModel};
use riichi_stats::preference::{PreferenceStore, LANGUAGE_KEY};
use riichi_stats::tracker::Tracker;
use riichi_stats::tui::{self, AppState};

// Default Configuration Constants
/// Default log level when not specified
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file path (no logging to file)
const DEFAULT_LOG_FILE: &str = "/dev/null";

/// Missing translation keys land here in i18n debug mode
const MISSING_KEYS_FILE: &str = "missing-keys.json";

/// Response delay of the bundled demo dataset, so loading states show
const DEMO_LATENCY: Duration = Duration::from_millis(300);

#[derive(Parser)]
#[command(name = "riichi-stats")]
#[command(
    about = "Riichi mahjong ranked player stats",
    long_about = "Riichi mahjong ranked player stats\n\nIf no command is specified, the program starts in interactive mode."
)]
struct Cli {
    /// Set log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log file path (default: /dev/null for no logging)
    #[arg(short = 'F', long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Default)]
struct ViewArgs {
    /// Account id of the player to show
    #[arg(short, long)]
    player: Option<u32>,

    /// Lobby room id (repeatable, e.g. --mode 12 --mode 16)
    #[arg(short, long = "mode")]
    modes: Vec<u32>,

    /// First day to include, YYYY-MM-DD
    #[arg(long)]
    from: Option<String>,

    /// Last day to include, YYYY-MM-DD
    #[arg(long)]
    to: Option<String>,

    /// Dataset JSON file (overrides the configured one)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Use the bundled demo dataset with simulated latency
    #[arg(long)]
    demo: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse a player's stats interactively (default)
    View(ViewArgs),
    /// List players in the dataset
    Players {
        /// Dataset JSON file (overrides the configured one)
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Print a player's stats
    Stats {
        /// Account id of the player
        #[arg(short, long)]
        player: u32,

        /// Lobby room id (repeatable)
        #[arg(short, long = "mode")]
        modes: Vec<u32>,

        /// First day to include, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,

        /// Last day to include, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,

        /// Dataset JSON file (overrides the configured one)
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Display current configuration
    Config,
}

fn init_logging(log_level: &str, log_file: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file, e);
            return;
        }
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Resolve log configuration from CLI args and config file
/// CLI arguments take precedence over config file
fn resolve_log_config<'a>(cli: &'a Cli, config: &'a Config) -> (&'a str, &'a str) {
    let log_level = if cli.log_level != DEFAULT_LOG_LEVEL {
        cli.log_level.as_str()
    } else {
        config.log_level.as_str()
    };

    let log_file = if cli.log_file != DEFAULT_LOG_FILE {
        cli.log_file.as_str()
    } else {
        config.log_file.as_str()
    };

    (log_level, log_file)
}

/// Language from the persisted choice, then the configured one, then the environment
fn resolve_language(config: &Config, prefs: &PreferenceStore) -> Language {
    let persisted: Option<String> = prefs.load_global(LANGUAGE_KEY);
    detect_language(
        persisted.as_deref().or(config.language.as_deref()),
        |var| std::env::var(var).ok(),
    )
}

/// Translator, recording missing keys in debug builds when asked to
fn build_i18n(config: &Config, language: Language) -> I18n {
    let i18n = I18n::new(language);
    if !(cfg!(debug_assertions) && config.i18n_debug) {
        return i18n;
    }
    let Some(dir) = config::get_data_dir() else {
        return i18n;
    };
    match MissingKeyRecorder::create(dir.join(MISSING_KEYS_FILE)) {
        Ok(recorder) => i18n.with_recorder(Arc::new(recorder)),
        Err(e) => {
            tracing::warn!("Cannot record missing translation keys: {:#}", e);
            i18n
        }
    }
}

fn source_for(dataset: Option<PathBuf>, config: &Config) -> anyhow::Result<Arc<dyn RecordSource>> {
    commands::open_source(dataset.or_else(|| config.dataset.clone()).as_deref())
}

/// Run TUI mode for the player and filters given on the command line
async fn run_tui_mode(config: Config, args: ViewArgs) -> anyhow::Result<()> {
    let source: Arc<dyn RecordSource> = if args.demo {
        Arc::new(DatasetSource::new(fixtures::demo_dataset()).with_latency(DEMO_LATENCY))
    } else {
        source_for(args.dataset, &config)?
    };

    let range = commands::parse_range(args.from.as_deref(), args.to.as_deref())?;
    let modes = commands::parse_modes(&args.modes)?;
    let player = args
        .player
        .or_else(|| args.demo.then_some(fixtures::DEMO_PLAYER_ID));

    let prefs = Arc::new(PreferenceStore::open_default());
    let language = resolve_language(&config, &prefs);

    let mut state = AppState::default();
    state.player.model = match player {
        Some(player_id) => Model::Player(PlayerModel {
            start_date: range.start,
            end_date: range.end,
            ..PlayerModel::new(player_id).with_modes(modes)
        }),
        None => Model::Latest,
    };
    state.system.i18n = Arc::new(build_i18n(&config, language));
    state.system.prefs = prefs;
    let tracker = Tracker::from_config(&config.analytics);
    state.system.config = config;

    tui::run(source, state, tracker).await?;
    Ok(())
}

/// Execute a CLI command by routing it to the appropriate command handler
async fn execute_command(config: Config, command: Commands) -> anyhow::Result<()> {
    let prefs = PreferenceStore::open_default();
    let i18n = I18n::new(resolve_language(&config, &prefs));
    match command {
        Commands::View(args) => run_tui_mode(config, args).await,
        Commands::Config => {
            commands::config::run();
            Ok(())
        }
        Commands::Players { dataset } => {
            let source = source_for(dataset, &config)?;
            commands::players::run(source.as_ref(), &i18n, &config.display).await
        }
        Commands::Stats {
            player,
            modes,
            from,
            to,
            dataset,
        } => {
            let source = source_for(dataset, &config)?;
            let range = commands::parse_range(from.as_deref(), to.as_deref())?;
            let modes = commands::parse_modes(&modes)?;
            commands::stats::run(source.as_ref(), player, &modes, range, &i18n, &config.display).await
        }
    }
}

#[tokio::main]
async fn main() {
    let config = config::read();
    let cli = Cli::parse();

    // Resolve and initialize logging
    let (log_level, log_file) = resolve_log_config(&cli, &config);
    if log_file != DEFAULT_LOG_FILE {
        init_logging(log_level, log_file);
    }

    let command = cli.command.unwrap_or(Commands::View(ViewArgs::default()));
    if let Err(e) = execute_command(config, command).await {
        eprintln!("Error: {:#}", e);
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
