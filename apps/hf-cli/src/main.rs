use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

#[derive(Parser)]
#[command(name = "hf-cli")]
#[command(about = "Hemoflow CLI - lumped-parameter hemodynamic network solver", long_about = None)]
struct Cli {
    /// Path to the JSON simulation configuration
    input_file: PathBuf,
    /// Path for the result CSV
    output_file: PathBuf,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match hf_app::run_from_file(&cli.input_file, &cli.output_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
