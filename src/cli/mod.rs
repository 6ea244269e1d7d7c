mod status_spinner;
mod preferences;
mod site;

use thiserror::Error;
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use log::{LevelFilter, error};
use indicatif_log_bridge::LogWrapper;
use indicatif::MultiProgress;
use std::{io::stdout, process::ExitCode};
use crate::{credentials::CredentialError, preferences::{self as prefs_store, DataStore, PreferencesError}};

/// Kinsta commands for trellis-cli
#[derive(Parser, Debug)]
#[command(version, about, long_about = "Kinsta commands for trellis-cli: list and inspect the sites hosted on Kinsta for a company.", name = "trellis-kinsta")]
struct Args {
    /// Maximum logging level
    #[arg(short, long)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Command
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage your Kinsta sites
    Site {
        #[command(subcommand)]
        command: site::Command
    },
    /// Manage CLI preferences
    Preferences {
        #[command(subcommand)]
        command: Option<preferences::Command>
    },
    /// Generate shell completion files
    Completion {
        shell: Shell
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Preferences store error: {0}")]
    PreferencesError(#[from] PreferencesError),
    #[error("{0}")]
    CredentialError(#[from] CredentialError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Input error: {0}")]
    InputError(#[from] dialoguer::Error),
    #[error("Logger error: {0}")]
    LoggerError(#[from] log::SetLoggerError)
}

type Result<T = ()> = std::result::Result<T, CliError>;

fn setup_logging(log_level: Option<LevelFilter>) -> Result<MultiProgress> {
    let mut logger = env_logger::Builder::from_default_env();
    if let Some(level) = log_level {
        logger.filter_level(level);
    }

    let multi = MultiProgress::new();
    let logger = logger.build();
    let log_filter = logger.filter();
    LogWrapper::new(multi.clone(), logger).try_init()?;
    log::set_max_level(log_filter);

    Ok(multi)
}

async fn run_internal(multi: MultiProgress, args: Args) -> Result<u8> {
    match args.command {
        Command::Completion { shell } => {
            let mut command = Args::command();
            let name = command.get_name().to_string();
            generate(shell, &mut command, name, &mut stdout());
        },
        Command::Site { command } => {
            // listing never writes the preferences file
            let prefs = prefs_store::load().await?;
            return site::handle(command, &prefs, multi).await;
        },
        Command::Preferences { command } => {
            let prefs = DataStore::new().await?;
            preferences::handle(command, &prefs, multi).await?;
        }
    }

    Ok(0)
}

/// help and version requests succeed, every other parse error fails
fn parse_error_status(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1
    }
}

pub async fn run() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(parse_error_status(&err));
        }
    };
    let multi = match setup_logging(args.log_level) {
        Ok(multi) => multi,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match run_internal(multi, args).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
