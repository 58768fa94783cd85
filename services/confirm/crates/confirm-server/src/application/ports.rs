//! Port trait definitions for the application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `scalegate_common` — never from
//! `crate::infra` or `crate::http`.

use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use scalegate_common::lifecycle::LifecycleDecision;
use scalegate_common::probe::InvocationQuery;

// ── Value types ───────────────────────────────────────────────────────────────

/// Handle for one submitted probe command, issued by the Command Execution
/// Service and owned by the workflow for the duration of polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHandle(String);

impl CommandHandle {
    #[must_use]
    pub fn new(command_id: impl Into<String>) -> Self {
        Self(command_id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ── Remote service ports ──────────────────────────────────────────────────────

/// Command Execution Service: runs shell commands through an instance's
/// management agent and reports their status.
#[allow(async_fn_in_trait)]
pub trait ProbeExecutor {
    /// Submit `commands` for execution on `instance_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission fails outright; there is no retry.
    async fn submit(&self, instance_id: &str, commands: &[String]) -> Result<CommandHandle>;

    /// Query the current status of a submitted command.
    ///
    /// The transient "record not yet visible" race must be reported as
    /// [`InvocationQuery::NotYetVisible`], never as an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures the implementation cannot classify
    /// as transient; such a failure ends the invocation.
    async fn query(&self, handle: &CommandHandle, instance_id: &str) -> Result<InvocationQuery>;
}

/// Fleet Lifecycle Service: accepts the completion decision for a paused
/// lifecycle transition.
#[allow(async_fn_in_trait)]
pub trait LifecycleCompleter {
    /// Report `decision` to the fleet manager. Fire-and-forget: not retried.
    ///
    /// # Errors
    ///
    /// Returns an error if the report fails; the failure ends the invocation.
    async fn complete(&self, decision: &LifecycleDecision) -> Result<()>;
}

// ── Clock port ────────────────────────────────────────────────────────────────

/// Time source for probe stamps and poll-loop pacing, injectable so tests
/// run without real sleeps.
#[allow(async_fn_in_trait)]
pub trait Clock {
    /// A nanosecond stamp strictly greater than any stamp previously issued
    /// within this process.
    fn stamp_nanos(&self) -> i64;

    /// Sleep for `period`.
    async fn sleep(&self, period: Duration);
}

// ── Command runner port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output, using the implementation's
    /// default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or times out.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds
    /// `timeout`. On timeout, the child process must be killed (not left
    /// orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}
