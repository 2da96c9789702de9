use proptest::prelude::*;

use concrun::engine::{CommandState, Terminal, Transition};
use concrun::types::Outcome;

#[test]
fn success_on_first_attempt_stops() {
    let mut state = CommandState::new(0, "echo hi", 3);

    assert_eq!(state.retries(), 0);
    assert_eq!(
        state.step(Outcome::Completed(0), false),
        Transition::Stop(Terminal::Success)
    );
    assert_eq!(state.retries(), 0);
    assert!(state.is_finished());
    assert!(!state.failed());
}

#[test]
fn failure_without_budget_is_exhausted_immediately() {
    let mut state = CommandState::new(0, "false", 0);

    assert_eq!(
        state.step(Outcome::Completed(1), false),
        Transition::Stop(Terminal::RetryExhausted)
    );
    assert!(state.failed());
    assert_eq!(state.last_outcome(), Some(Outcome::Completed(1)));
}

#[test]
fn failure_with_budget_retries_and_counts() {
    let mut state = CommandState::new(2, "false", 2);

    assert_eq!(state.step(Outcome::Completed(1), false), Transition::Retry);
    assert_eq!(state.retries(), 1);
    assert_eq!(state.step(Outcome::Completed(1), false), Transition::Retry);
    assert_eq!(state.retries(), 2);
    assert_eq!(
        state.step(Outcome::Completed(1), false),
        Transition::Stop(Terminal::RetryExhausted)
    );
    assert_eq!(state.retries(), 2);
    assert_eq!(state.index(), 2);
}

#[test]
fn non_zero_exit_after_cancellation_stops_with_observed_code() {
    let mut state = CommandState::new(0, "false", 5);

    assert_eq!(
        state.step(Outcome::Completed(3), true),
        Transition::Stop(Terminal::Cancelled)
    );
    assert_eq!(state.last_outcome(), Some(Outcome::Completed(3)));
    assert_eq!(state.terminal(), Some(Terminal::Cancelled));
}

#[test]
fn success_wins_even_when_cancelled() {
    let mut state = CommandState::new(0, "true", 5);

    assert_eq!(
        state.step(Outcome::Completed(0), true),
        Transition::Stop(Terminal::Success)
    );
}

#[test]
fn terminated_attempt_in_cancelled_run_stops() {
    let mut state = CommandState::new(0, "sleep 10", 5);

    assert_eq!(
        state.step(Outcome::Terminated, true),
        Transition::Stop(Terminal::Cancelled)
    );
    assert!(state.failed());
}

#[test]
fn externally_killed_attempt_is_retried_like_a_failure() {
    let mut state = CommandState::new(0, "crashy", 1);

    assert_eq!(state.step(Outcome::Terminated, false), Transition::Retry);
    assert_eq!(
        state.step(Outcome::Terminated, false),
        Transition::Stop(Terminal::RetryExhausted)
    );
}

#[test]
fn cancel_before_attempt_records_termination() {
    let mut state = CommandState::new(0, "never", 1);

    assert_eq!(state.cancel_before_attempt(), Terminal::Cancelled);
    assert_eq!(state.last_outcome(), Some(Outcome::Terminated));
    assert!(state.is_finished());
    assert!(state.failed());
}

#[test]
fn cancel_after_a_failed_attempt_keeps_the_observed_outcome() {
    let mut state = CommandState::new(0, "false", 3);

    assert_eq!(state.step(Outcome::Completed(2), false), Transition::Retry);
    assert_eq!(state.cancel_before_attempt(), Terminal::Cancelled);
    assert_eq!(state.last_outcome(), Some(Outcome::Completed(2)));
    assert!(state.failed());
}

proptest! {
    /// A command that always fails runs exactly `max + 1` times with retry
    /// counts 0..=max.
    #[test]
    fn always_failing_command_uses_whole_budget(max in 0u32..20, code in 1i32..=255) {
        let mut state = CommandState::new(0, "false", max);
        let mut stamped = Vec::new();

        loop {
            stamped.push(state.retries());
            match state.step(Outcome::Completed(code), false) {
                Transition::Retry => continue,
                Transition::Stop(terminal) => {
                    prop_assert_eq!(terminal, Terminal::RetryExhausted);
                    break;
                }
            }
        }

        let expected: Vec<u32> = (0..=max).collect();
        prop_assert_eq!(stamped, expected);
    }

    /// Retry counts never decrease and the loop always terminates within
    /// the budget, whatever the sequence of exit codes.
    #[test]
    fn retries_are_monotonic_and_bounded(
        max in 0u32..10,
        codes in proptest::collection::vec(0i32..4, 1..30),
    ) {
        let mut state = CommandState::new(0, "cmd", max);
        let mut last = None;
        let mut attempts = 0u32;

        for code in codes {
            let before = state.retries();
            if let Some(prev) = last {
                prop_assert!(before > prev);
            }
            last = Some(before);
            attempts += 1;

            match state.step(Outcome::Completed(code), false) {
                Transition::Retry => prop_assert!(code != 0),
                Transition::Stop(Terminal::Success) => {
                    prop_assert_eq!(code, 0);
                    break;
                }
                Transition::Stop(Terminal::RetryExhausted) => {
                    prop_assert_eq!(before, max);
                    break;
                }
                Transition::Stop(Terminal::Cancelled) => {
                    prop_assert!(false, "never cancelled in this test");
                }
            }
        }

        prop_assert!(attempts <= max + 1);
    }
}
