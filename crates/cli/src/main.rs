// rollcall - reconcile a meeting attendance export against a course roster

mod attendance;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use exit_codes::{recon_exit_code, EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};
use rollcall_recon::{Accumulation, ReconError, ScorerKind};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Reconcile meeting attendance against a roster")]
#[command(version)]
struct Cli {
    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Match attendees, classify the roster, and write the outputs
    #[command(after_help = "\
Examples:
  rollcall run rollcall.toml
  rollcall run rollcall.toml --json
  rollcall run --session zoom.csv --roster roster.csv --match-threshold 70
  rollcall run rollcall.toml --progress --fail-on-unmatched")]
    Run {
        /// Path to the TOML config (defaults apply when omitted)
        config: Option<PathBuf>,

        /// Meeting attendance CSV (overrides [session].file)
        #[arg(long)]
        session: Option<PathBuf>,

        /// Roster CSV (overrides [roster].file)
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Updated roster CSV to write (overrides [output].roster)
        #[arg(long)]
        out_roster: Option<PathBuf>,

        /// Unmatched report to write (overrides [output].unmatched)
        #[arg(long)]
        unmatched: Option<PathBuf>,

        /// Minimum name similarity, 0-100
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        match_threshold: Option<u8>,

        /// Minimum attended minutes for Successful
        #[arg(long)]
        duration_threshold: Option<f64>,

        /// How repeated matches combine: last, max or sum
        #[arg(long)]
        accumulation: Option<Accumulation>,

        /// Name similarity: token_sort_ratio or ratio
        #[arg(long)]
        scorer: Option<ScorerKind>,

        /// Print the JSON result to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON result to a file (overrides [output].json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print one line per attendee to stderr
        #[arg(long)]
        progress: bool,

        /// Exit 1 when any attendee is left unmatched
        #[arg(long)]
        fail_on_unmatched: bool,
    },

    /// Validate a config without running
    #[command(after_help = "\
Examples:
  rollcall validate rollcall.toml")]
    Validate {
        /// Path to the TOML config
        config: PathBuf,
    },

    /// Score one display name against every roster entry
    #[command(after_help = "\
Examples:
  rollcall match 'Lopez Ana' --roster roster.csv
  rollcall match 'ana l.' --config rollcall.toml --limit 3
  rollcall match 'Lopez Ana' --roster roster.csv --scorer ratio")]
    Match {
        /// Display name as it appears in the meeting export
        name: String,

        /// Path to the TOML config (for roster columns and threshold)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Roster CSV (overrides [roster].file)
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Minimum name similarity, 0-100
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        match_threshold: Option<u8>,

        /// Name similarity: token_sort_ratio or ratio
        #[arg(long)]
        scorer: Option<ScorerKind>,

        /// Number of candidates to show
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run {
            config,
            session,
            roster,
            out_roster,
            unmatched,
            match_threshold,
            duration_threshold,
            accumulation,
            scorer,
            json,
            output,
            progress,
            fail_on_unmatched,
        } => attendance::cmd_run(attendance::RunArgs {
            config,
            session,
            roster,
            out_roster,
            unmatched,
            match_threshold,
            duration_threshold,
            accumulation,
            scorer,
            json,
            output,
            progress,
            fail_on_unmatched,
        }),
        Commands::Validate { config } => attendance::cmd_validate(config),
        Commands::Match { name, config, roster, match_threshold, scorer, limit } => {
            attendance::cmd_match(name, config, roster, match_threshold, scorer, limit)
        }
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

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_RUNTIME, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::MissingColumn { input, .. } if input == "session" => {
                Some("check [session].skip_rows and the column names in the config".to_string())
            }
            ReconError::MissingColumn { .. } => {
                Some("column names are configured under [roster] in the config".to_string())
            }
            ReconError::MissingField { .. } => {
                Some("every roster row needs both a first and a last name".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}
