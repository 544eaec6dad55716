mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use reportsheet_batch::{
    BatchRunner, EnumRunEvent, EnumRunState, HtmlTableSource, SpecRunRequest, spawn_batch_run,
};
use reportsheet_log::{derive_log_level, init_logging};
use tracing::debug;

use crate::cli::{Cli, derive_failure_message};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(Some(derive_log_level(cli.verbose)));

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let request =
        SpecRunRequest::from_directory(&cli.dir_input, &cli.output, &cli.derive_list_options())
            .with_context(|| {
                format!("Please select a valid directory: {}", cli.dir_input.display())
            })?;
    println!(
        "Number of report files in {} is {}",
        cli.dir_input.display(),
        request.files.len()
    );

    let source = HtmlTableSource::new().context("Failed to build the HTML table reader")?;
    let handle = spawn_batch_run(BatchRunner::new(source), request);

    let mut state = EnumRunState::Idle;
    for event in handle.events().iter() {
        state = state.advance(&event);
        match &event {
            EnumRunEvent::Started { total_count } => debug!(total_count, "run started"),
            EnumRunEvent::Status(text) => println!("{text}"),
            EnumRunEvent::Progress(progress) => {
                println!("[{:>3}%] {}", progress.percent(), progress.status_text)
            }
            EnumRunEvent::Completed(report) => println!("{report}"),
            EnumRunEvent::Failed(failure) => eprintln!("{}", derive_failure_message(failure)),
        }
    }

    let res = handle.wait();
    debug!(?state, "run finished");
    Ok(match (state, res) {
        (EnumRunState::Completed, Ok(_)) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
