pub mod fake_backend;

use std::sync::{Arc, Once};

use concrun::config::Config;
use concrun::engine::{ExecResult, RESULT_CHANNEL_CAPACITY, RunReport, orchestrate};
use concrun::exec::AttemptBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

pub use fake_backend::{FakeBackend, FakeStep};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Run `config` against a custom backend and gather the whole stream.
pub async fn run_with_backend(
    config: &Config,
    backend: Arc<dyn AttemptBackend>,
    token: &CancellationToken,
) -> RunReport {
    let (result_tx, mut result_rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);
    let (error_tx, mut error_rx) = mpsc::channel(1);

    let gather = async {
        let mut results = Vec::new();
        while let Some(r) = result_rx.recv().await {
            results.push(r);
        }
        results
    };

    let ((), results) = tokio::join!(
        orchestrate(config, backend, token, result_tx, error_tx),
        gather
    );
    let error = error_rx.recv().await;

    RunReport { results, error }
}

/// Attempts of one command, in the order they were emitted.
pub fn results_for<'a>(results: &'a [ExecResult], command: &str) -> Vec<&'a ExecResult> {
    results.iter().filter(|r| r.command == command).collect()
}
