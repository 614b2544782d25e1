use clap::{Parser, Subcommand};
use planora_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "planora", version, about = "Planora study timer and planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus/break session timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Study task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Progress notes against tasks
    Update {
        #[command(subcommand)]
        action: commands::update::UpdateAction,
    },
    /// Recorded study sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Study analytics
    Stats,
    /// Everything due, studied and logged on one day, or a month overview
    Calendar {
        /// Day to show (YYYY-MM-DD, default today)
        date: Option<chrono::NaiveDate>,
        /// Per-day counts for a whole month (YYYY-MM)
        #[arg(long, conflicts_with = "date", value_parser = commands::calendar::parse_month)]
        month: Option<(i32, u32)>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Config::load_or_default().logging.filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Update { action } => commands::update::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Stats => commands::stats::run(),
        Commands::Calendar { date, month } => commands::calendar::run(date, month),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
