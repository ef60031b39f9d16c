use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::error;

use blinkboard::config::DashboardConfig;
use blinkboard::logging::{init_logging, LogLevel};
use blinkboard::runner;
use blinkboard::tabs::TabId;

#[derive(Parser, Debug)]
#[command(name = "blinkboard")]
#[command(version)]
#[command(about = "Terminal dashboard for the BLINK adaptive traffic-signal pilot")]
struct Cli {
    /// Path to a TOML configuration file (built-in dataset when omitted)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Tab to activate at startup (overview, training, analysis, network)
    #[arg(long, default_value = "overview")]
    tab: String,

    /// Override the configured frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Disable colors (also respects the NO_COLOR environment variable)
    #[arg(long)]
    no_color: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Suppress all log output except warnings and errors
    #[arg(long, short)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(long, short, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LogLevel::from_flags(cli.quiet, cli.verbose));

    if cli.print_config {
        return match DashboardConfig::default().to_toml() {
            Ok(rendered) => {
                println!("{rendered}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!(%err, "failed to render default configuration");
                ExitCode::FAILURE
            }
        };
    }

    let initial_tab = match cli.tab.parse::<TabId>() {
        Ok(tab) => tab,
        Err(err) => {
            error!(%err, "valid tabs: overview, training, analysis, network");
            return ExitCode::FAILURE;
        }
    };

    let mut config = match DashboardConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "could not load configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(fps) = cli.fps {
        config.fps = fps.max(1);
    }
    let use_color = !cli.no_color && std::env::var("NO_COLOR").is_err();

    match runner::run(config, initial_tab, use_color).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "dashboard exited with an error");
            ExitCode::FAILURE
        }
    }
}
