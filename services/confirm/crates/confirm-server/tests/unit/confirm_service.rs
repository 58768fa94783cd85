//! Workflow scenario tests for the confirmation service.

#![allow(clippy::expect_used)]

use std::time::Duration;

use scalegate_common::config::ProbeConfig;
use scalegate_common::lifecycle::{ConfirmOutcome, LifecycleAction};
use scalegate_confirm::application::services::confirm::confirm_launch;

use crate::mocks::{
    CompleterSpy, CompleterUnexpected, FULL_PAYLOAD, ProbeInvisibleThenTerminal,
    ProbeNeverTerminal, ProbeQueryFails, ProbeTerminalAfter, ProbeUnexpected, TestClock,
    foreign_source_notification, sns_notification,
};

fn config(poll_attempts: u32) -> ProbeConfig {
    ProbeConfig {
        poll_attempts,
        poll_interval: Duration::ZERO,
    }
}

#[tokio::test]
async fn no_matching_record_returns_the_error_string_without_dispatch() {
    // Neither remote service may be touched: the stubs fail the workflow
    // if they are reached.
    let outcome = confirm_launch(
        &ProbeUnexpected,
        &CompleterUnexpected,
        &TestClock::default(),
        &config(20),
        &foreign_source_notification(),
    )
    .await
    .expect("rejection is a result, not an error");
    assert_eq!(outcome, ConfirmOutcome::rejected());
    assert_eq!(outcome.to_string(), "Error processing notification.");
}

#[tokio::test]
async fn missing_instance_id_returns_the_error_string_without_dispatch() {
    let notification = sns_notification(r#"{"LifecycleHookName":"h"}"#);
    let outcome = confirm_launch(
        &ProbeUnexpected,
        &CompleterUnexpected,
        &TestClock::default(),
        &config(20),
        &notification,
    )
    .await
    .expect("rejection is a result, not an error");
    assert_eq!(outcome, ConfirmOutcome::rejected());
}

#[tokio::test]
async fn verdict_true_when_terminal_on_the_twentieth_query() {
    let executor = ProbeTerminalAfter::new(19, "True");
    let completer = CompleterSpy::default();
    let clock = TestClock::default();

    let outcome = confirm_launch(
        &executor,
        &completer,
        &clock,
        &config(20),
        &sns_notification(FULL_PAYLOAD),
    )
    .await
    .expect("workflow");

    assert_eq!(outcome, ConfirmOutcome::Probed { ready: true });
    assert_eq!(executor.queries.get(), 20, "one query per attempt");
    assert_eq!(clock.sleeps.get(), 20, "one sleep before every query");
    assert_eq!(completer.decisions.borrow().len(), 1);
}

#[tokio::test]
async fn continue_is_reported_even_when_probe_is_not_ready() {
    // Deliberately reproduced behavior: the completion result is CONTINUE
    // no matter what the probe printed or whether it ever finished. The
    // verdict only shapes the invocation's return value.
    let executor = ProbeNeverTerminal::default();
    let completer = CompleterSpy::default();
    let clock = TestClock::default();

    let outcome = confirm_launch(
        &executor,
        &completer,
        &clock,
        &config(20),
        &sns_notification(FULL_PAYLOAD),
    )
    .await
    .expect("exhaustion is not an error");

    assert_eq!(outcome, ConfirmOutcome::Probed { ready: false });
    assert_eq!(executor.queries.get(), 20);
    assert_eq!(clock.sleeps.get(), 20);

    let decisions = completer.decisions.borrow();
    assert_eq!(decisions.len(), 1, "completion still reported");
    assert_eq!(decisions[0].action, LifecycleAction::Continue);
}

#[tokio::test]
async fn not_ready_output_still_reports_continue() {
    let executor = ProbeTerminalAfter::new(0, "False");
    let completer = CompleterSpy::default();

    let outcome = confirm_launch(
        &executor,
        &completer,
        &TestClock::default(),
        &config(20),
        &sns_notification(FULL_PAYLOAD),
    )
    .await
    .expect("workflow");

    assert_eq!(outcome, ConfirmOutcome::Probed { ready: false });
    assert_eq!(completer.decisions.borrow()[0].action, LifecycleAction::Continue);
}

#[tokio::test]
async fn not_yet_visible_race_is_absorbed_into_the_budget() {
    let executor = ProbeInvisibleThenTerminal::new(3, "False");
    let completer = CompleterSpy::default();
    let clock = TestClock::default();

    let outcome = confirm_launch(
        &executor,
        &completer,
        &clock,
        &config(20),
        &sns_notification(FULL_PAYLOAD),
    )
    .await
    .expect("workflow");

    assert_eq!(outcome, ConfirmOutcome::Probed { ready: false });
    assert_eq!(executor.queries.get(), 4, "three invisible, one terminal");
    assert_eq!(clock.sleeps.get(), 4);
}

#[tokio::test]
async fn correlation_identifiers_forward_unchanged_with_continue() {
    let executor = ProbeTerminalAfter::new(0, "True");
    let completer = CompleterSpy::default();

    confirm_launch(
        &executor,
        &completer,
        &TestClock::default(),
        &config(20),
        &sns_notification(FULL_PAYLOAD),
    )
    .await
    .expect("workflow");

    let decisions = completer.decisions.borrow();
    assert_eq!(decisions[0].action, LifecycleAction::Continue);
    assert_eq!(decisions[0].lifecycle_hook_name.as_deref(), Some("h"));
    assert_eq!(decisions[0].lifecycle_action_token.as_deref(), Some("t"));
    assert_eq!(decisions[0].auto_scaling_group_name.as_deref(), Some("g"));
    assert_eq!(decisions[0].instance_id, "i-123");
}

#[tokio::test]
async fn each_invocation_submits_one_probe_with_a_fresh_stamp() {
    // No dedup state: a second identical notification runs a second,
    // fully independent probe and completion report.
    let executor = ProbeTerminalAfter::new(0, "True");
    let completer = CompleterSpy::default();
    let clock = TestClock::default();
    let notification = sns_notification(FULL_PAYLOAD);

    for _ in 0..2 {
        confirm_launch(&executor, &completer, &clock, &config(20), &notification)
            .await
            .expect("workflow");
    }

    let submitted = executor.submitted.borrow();
    assert_eq!(submitted.len(), 2, "one submission per invocation");
    assert_ne!(
        submitted[0][0], submitted[1][0],
        "marker filenames must not repeat across invocations"
    );
    assert_eq!(completer.decisions.borrow().len(), 2);
}

#[tokio::test]
async fn unclassified_query_failure_propagates() {
    let err = confirm_launch(
        &ProbeQueryFails,
        &CompleterUnexpected,
        &TestClock::default(),
        &config(20),
        &sns_notification(FULL_PAYLOAD),
    )
    .await
    .expect_err("hard query failure ends the invocation");
    assert!(err.to_string().contains("querying readiness probe status"));
}
