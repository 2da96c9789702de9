#![allow(dead_code)]

pub use concrun_test_utils::{init_tracing, results_for, run_with_backend, with_timeout};

use concrun::engine::ExecResult;

/// Sort results by command text so assertions don't depend on completion order.
pub fn sorted_by_command(mut results: Vec<ExecResult>) -> Vec<ExecResult> {
    results.sort_by(|a, b| a.command.cmp(&b.command).then(a.retries.cmp(&b.retries)));
    results
}

/// Every result must have a non-inverted time window.
pub fn assert_times_are_sane(results: &[ExecResult]) {
    for r in results {
        assert!(
            r.end_time >= r.start_time,
            "command {:?} ends before it starts",
            r.command
        );
    }
}
