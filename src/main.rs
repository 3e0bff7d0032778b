use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use graph_demo::cli::{Cli, render_summary, run_cli};
use graph_demo::logging::{self, LoggingError};

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let summary = run_cli(cli)?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        error!(error = %err, "command failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

// Tracing is not available yet.
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
