// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod report;
pub mod types;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{Config, RawConfigFile, load_from_path};
use crate::engine::{Executor, RESULT_CHANNEL_CAPACITY};
use crate::report::{RunStatus, final_results, print_result};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config (run file + CLI flags)
/// - the executor and its result / error streams
/// - printing results as they arrive
/// - Ctrl-C handling
///
/// Returns the process exit code derived from the final results.
pub async fn run(args: CliArgs) -> Result<i32> {
    let config = config_from_args(&args)?;
    let executor = Executor::new(config);
    let token = CancellationToken::new();

    // Ctrl-C → terminate running commands; they are reported with -1.
    {
        let token = token.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("interrupt received; cancelling run");
            token.cancel();
        });
    }

    let (result_tx, mut result_rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);
    let (error_tx, mut error_rx) = mpsc::channel(1);

    let consume = async {
        let mut results = Vec::new();
        while let Some(result) = result_rx.recv().await {
            print_result(&mut std::io::stdout().lock(), &result)?;
            results.push(result);
        }
        Ok::<_, std::io::Error>(results)
    };

    let ((), results) = tokio::join!(executor.run(&token, result_tx, error_tx), consume);
    let results = results?;

    if let Some(err) = error_rx.recv().await {
        return Err(err.into());
    }

    let status = RunStatus::from_final_results(final_results(&results));
    info!(?status, attempts = results.len(), "all commands finished");
    Ok(status.process_exit_code())
}

/// Merge the optional run file with CLI flags into a validated [`Config`].
///
/// CLI flags win over file values; `--command` entries are appended after
/// the file's commands.
pub fn config_from_args(args: &CliArgs) -> errors::Result<Config> {
    let mut raw = match args.config {
        Some(ref path) => load_from_path(path)?,
        None => RawConfigFile::default(),
    };

    raw.commands.extend(args.commands.iter().cloned());
    if let Some(ref shell) = args.shell {
        raw.shell = Some(shell.clone());
    }
    if args.fail_fast {
        raw.fail_fast = Some(true);
    }
    if let Some(n) = args.max_retries {
        raw.max_retries_per_command = Some(n);
    }
    if let Some(n) = args.max_parallel {
        raw.max_parallel = Some(n);
    }

    Config::try_from(raw)
}
