// userlink CLI - group CSV records that share an email or phone number

mod commands;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use userlink_cluster::config::DEFAULT_ID_COLUMN;
use userlink_cluster::ClusterError;
use userlink_io::IoError;

use exit_codes::{
    cluster_exit_code, io_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_OUTPUT, EXIT_SUCCESS,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "userlink")]
#[command(about = "Assign a shared user id to CSV rows linked by email or phone")]
#[command(version, long_version = long_version())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group the rows of one CSV file
    #[command(after_help = "\
Examples:
  userlink match email people.csv
  userlink match phone people.csv -o grouped.csv
  userlink match email_or_phone people.csv --json
  userlink match email_or_phone people.csv --dry-run --json")]
    Match {
        /// Match mode: email, phone or email_or_phone
        mode: String,

        /// Input CSV file
        input: PathBuf,

        /// Output CSV file (default: <input>_with_user_ids.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Name of the id column added to the output
        #[arg(long, default_value = DEFAULT_ID_COLUMN)]
        id_column: String,

        /// Print the run result as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Cluster and report without writing the output file
        #[arg(long)]
        dry_run: bool,

        /// Suppress the stderr summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Run a match described by a TOML config file
    #[command(after_help = "\
Examples:
  userlink run contacts.match.toml
  userlink run contacts.match.toml --json")]
    Run {
        /// Path to the .match.toml config file
        config: PathBuf,

        /// Print the run result as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Cluster and report without writing the output file
        #[arg(long)]
        dry_run: bool,

        /// Suppress the stderr summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a match config without reading the input
    Validate {
        /// Path to the .match.toml config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("USERLINK_COMMIT"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("USERLINK_TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("USERLINK_COMMIT"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("USERLINK_TARGET"),
        )
    }
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Match {
            mode,
            input,
            output,
            id_column,
            json,
            dry_run,
            quiet,
        } => commands::cmd_match(
            &mode,
            input,
            output,
            id_column,
            commands::ReportOptions { json, dry_run, quiet },
        ),
        Commands::Run {
            config,
            json,
            dry_run,
            quiet,
        } => commands::cmd_run(config, commands::ReportOptions { json, dry_run, quiet }),
        Commands::Validate { config } => commands::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr so `--json` stdout stays a single document.
/// Level comes from RUST_LOG, default `warn`.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ClusterError> for CliError {
    fn from(err: ClusterError) -> Self {
        let hint = match err {
            ClusterError::UnsupportedMatchMode(_) => {
                Some("use one of: email, phone, email_or_phone".to_string())
            }
            _ => None,
        };
        Self { code: cluster_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let hint = match err {
            IoError::DuplicateIdColumn(_) => {
                Some("pick another name with --id-column (or id_column in the config)".to_string())
            }
            IoError::MissingColumn(_) => {
                Some("column overrides accept raw or normalized header names".to_string())
            }
            _ => None,
        };
        Self { code: io_exit_code(&err), message: err.to_string(), hint }
    }
}
