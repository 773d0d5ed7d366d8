use std::process::ExitCode;

use clap::Parser;

use period_forecast::commands::base_commands::{CliArgs, Commands};
use period_forecast::commands::completions_cmd::completions_command;
use period_forecast::commands::forecast_cmd::forecast_command;
use period_forecast::commands::window_cmd::window_command;
use period_forecast::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    match args.command {
        cmd @ Commands::Forecast { .. } => forecast_command(cmd).await,
        cmd @ Commands::Window { .. } => window_command(cmd),
        Commands::Completions { shell } => {
            completions_command(shell);
            ExitCode::SUCCESS
        }
    }
}
