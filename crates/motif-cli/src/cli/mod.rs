mod commands;
mod discovery;
mod dispatch;
mod helpers;

use clap::{ArgAction, Parser};
use motif_core::domain::MotifError;
use std::path::PathBuf;

pub fn run_from_env() -> i32 {
    match run(std::env::args().skip(1)) {
        Ok(code) => code,
        Err(error) => {
            let motif_error = error.as_motif_error();
            eprintln!("{}", motif_error.diagnostic_line());
            eprintln!("{}", motif_error.fatal_exit_line());
            motif_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("motifcount".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    match Cli::try_parse_from(&full_args) {
        Ok(cli) => {
            helpers::init_logging(cli.verbose);
            let config = helpers::load_config(cli.config.as_deref())?;
            dispatch_parsed(cli.command, &config)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "motifcount",
    version,
    about = "Run external network motif counters and parse their reports"
)]
struct Cli {
    /// JSON configuration file (binaries, search directories, parameters, run settings)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Count motifs of a graph with one of the supported programs
    Count(commands::CountArgs),
    /// Describe the parameters a counter accepts
    Params(commands::ParamsArgs),
    /// Parse an existing program report into a table
    Parse(commands::ParseArgs),
    /// Write a graph in a counter's input format
    Render(commands::RenderArgs),
    /// Print the adjacency matrix of a motif id
    Motif(commands::MotifArgs),
}

fn dispatch_parsed(command: CliCommand, config: &helpers::CliConfig) -> Result<i32, CliError> {
    match command {
        CliCommand::Count(args) => commands::run_count_command(args, config),
        CliCommand::Params(args) => commands::run_params_command(args),
        CliCommand::Parse(args) => commands::run_parse_command(args),
        CliCommand::Render(args) => commands::run_render_command(args),
        CliCommand::Motif(args) => commands::run_motif_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(MotifError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<MotifError> for CliError {
    fn from(error: MotifError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_motif_error(&self) -> MotifError {
        match self {
            Self::Usage(message) => MotifError::parameter("PARAM.CLI_USAGE", message.clone()),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => MotifError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
