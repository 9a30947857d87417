// SPDX-License-Identifier: GPL-3.0-only

use bookscan::app::{AppModel, AppServices};
use bookscan::config::{self, Config};
use bookscan::i18n;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;

mod cli;

#[derive(Parser)]
#[command(name = "bookscan")]
#[command(about = "Scan book barcodes into a local ISBN list")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Configuration file (default: ~/.config/bookscan/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage file holding the list (overrides the configuration)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the saved ISBNs, one per line
    List,

    /// Remove an ISBN from the list
    Remove {
        /// The code to remove
        code: String,
    },

    /// Export the list to a file
    Export {
        /// Output format: txt or csv
        #[arg(short, long, default_value = "txt")]
        format: bookscan::ExportFormat,

        /// Output directory (default: configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available cameras
    Cameras,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The terminal UI owns the screen, so it logs to a file instead
    init_logging(cli.command.is_none());

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    if let Some(storage) = cli.storage {
        config.storage_path = Some(storage);
    }

    match cli.command {
        Some(Commands::List) => cli::list_codes(&config)?,
        Some(Commands::Remove { code }) => cli::remove_code(&config, &code)?,
        Some(Commands::Export { format, output }) => cli::export_list(&config, format, output)?,
        Some(Commands::Cameras) => cli::list_cameras(&config)?,
        None => run_terminal(config)?,
    }
    Ok(())
}

fn run_terminal(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    let services = AppServices::from_config(&config);
    let app = AppModel::new(config, services);
    bookscan::terminal::run(app)
}

/// Initialize logging
///
/// Set RUST_LOG environment variable to control log level
/// Examples: RUST_LOG=debug, RUST_LOG=bookscan=debug, RUST_LOG=info
fn init_logging(to_file: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    if to_file {
        let dir = config::log_directory();
        let file = std::fs::create_dir_all(&dir)
            .and_then(|_| std::fs::File::create(dir.join("bookscan.log")));

        // Without a log file stay silent rather than draw over the UI
        if let Ok(file) = file {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}
