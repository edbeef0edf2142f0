//! CLI Adapter.

mod apply;
mod describe;
mod products;
mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::config::{Settings, SettingsOverrides};
use crate::domain::AppError;

#[derive(Parser)]
#[command(name = "hana-ha")]
#[command(version)]
#[command(
    about = "Validate and provision SAP HANA System Replication clusters",
    long_about = None
)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Directory with static data files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Directory for generated artifacts and install logs
    #[arg(long, global = true)]
    var_dir: Option<PathBuf>,
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products and their cluster scenarios
    #[clap(visible_alias = "p")]
    Products,
    /// Check an answers file against this node
    #[clap(visible_alias = "v")]
    Validate {
        /// Answers file (YAML)
        answers: PathBuf,
    },
    /// Print the configuration of an answers file
    #[clap(visible_alias = "d")]
    Describe {
        /// Answers file (YAML)
        answers: PathBuf,
        /// Render the full overview including open problems
        #[arg(long)]
        overview: bool,
    },
    /// Configure this node from an answers file
    Apply {
        /// Answers file (YAML)
        answers: PathBuf,
        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = SettingsOverrides {
        settings_file: cli.settings,
        data_dir: cli.data_dir,
        var_dir: cli.var_dir,
    };

    let result: Result<i32, AppError> = match cli.command {
        Commands::Products => products::run_products().map(|_| 0),
        Commands::Validate { answers } => {
            Settings::load(&overrides).and_then(|s| validate::run_validate(&answers, &s))
        }
        Commands::Describe { answers, overview } => Settings::load(&overrides)
            .and_then(|s| describe::run_describe(&answers, &s, overview))
            .map(|_| 0),
        Commands::Apply { answers, yes } => {
            Settings::load(&overrides).and_then(|s| apply::run_apply(&answers, &s, yes))
        }
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr; `RUST_LOG` directives are kept and the crate level is raised with `-v`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    match format!("hana_ha={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(err) => eprintln!("Invalid log directive: {}", err),
    }
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
