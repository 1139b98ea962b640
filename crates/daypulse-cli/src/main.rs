use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "daypulse", version, about = "Daily load and schedule conflict checks")]
struct Cli {
    /// Config file to use instead of ~/.config/daypulse/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one day's load
    Energy(commands::energy::EnergyArgs),
    /// Find overlapping scheduled tasks
    Conflicts(commands::conflicts::ConflictsArgs),
    /// Energy and conflicts for one day
    Today(commands::today::TodayArgs),
    /// Energy for several consecutive days
    Week(commands::week::WeekArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // Logs go to stderr so --json output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("daypulse=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Energy(args) => commands::energy::run(args, config_path),
        Commands::Conflicts(args) => commands::conflicts::run(args, config_path),
        Commands::Today(args) => commands::today::run(args, config_path),
        Commands::Week(args) => commands::week::run(args, config_path),
        Commands::Config { action } => commands::config::run(action, config_path),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
