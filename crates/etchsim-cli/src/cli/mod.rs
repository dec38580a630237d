mod commands;
mod helpers;

use clap::Parser;
use etchsim_core::domain::EtchError;

pub fn run_from_env() -> i32 {
    helpers::init_logging();
    let args: Vec<String> = std::env::args().collect();

    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            let etch_error = error.as_etch_error();
            eprintln!("{}", etch_error.diagnostic_line());
            eprintln!("{}", etch_error.fatal_exit_line());
            etch_error.exit_code()
        }
    }
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
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
    name = "etchsim",
    version,
    about = "Etch-profile prediction by frequency-domain curve morphing"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Predict a profile and depth from explicit process parameters
    Predict(commands::PredictArgs),
    /// Derive process parameters from a measured flux series, optionally predicting
    Flux(commands::FluxArgs),
    /// Transform, reconstruct and smooth a single curve
    Reconstruct(commands::ReconstructArgs),
    /// Morph two curves at a given weight and render the result
    Blend(commands::BlendArgs),
    /// List the parameter combinations stored in a lookup table
    Keys(commands::KeysArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Predict(args) => commands::run_predict_command(args),
        CliCommand::Flux(args) => commands::run_flux_command(args),
        CliCommand::Reconstruct(args) => commands::run_reconstruct_command(args),
        CliCommand::Blend(args) => commands::run_blend_command(args),
        CliCommand::Keys(args) => commands::run_keys_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(EtchError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<EtchError> for CliError {
    fn from(error: EtchError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_etch_error(&self) -> EtchError {
        match self {
            Self::Usage(message) => EtchError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => EtchError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
