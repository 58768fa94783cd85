//! Probe results and the bounded poll-loop state machine.
//!
//! This module is intentionally free of I/O and async. The confirm service
//! owns the sleeps and remote calls; everything that can be decided from
//! data alone is decided here.

/// Output a ready instance's probe prints.
pub const READY_OUTPUT: &str = "True";

/// Output assumed when no terminal status was ever observed.
pub const NOT_READY_OUTPUT: &str = "False";

/// Outcome of a single status query against the Command Execution Service.
///
/// The transient "command record not yet visible" race is a value here, not
/// an error: the poll loop treats it exactly like [`InvocationQuery::Pending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationQuery {
    /// The command record has not propagated to the query backend yet.
    NotYetVisible,
    /// The command is still running.
    Pending,
    /// The command reached a terminal status; `output` is its captured stdout.
    Terminal { output: String },
}

/// Tri-state result of one probe cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// Still running. Never the final state of a driven poll loop.
    Pending,
    /// A terminal status was observed; carries the captured stdout.
    Succeeded(String),
    /// The retry budget ran out without a terminal status.
    Failed,
}

impl ProbeResult {
    /// Captured probe output, defaulting to `"False"` when nothing terminal
    /// was observed.
    #[must_use]
    pub fn output(&self) -> &str {
        match self {
            Self::Succeeded(output) => output,
            Self::Pending | Self::Failed => NOT_READY_OUTPUT,
        }
    }

    /// Readiness verdict: the probe printed exactly `"True"`.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.output() == READY_OUTPUT
    }
}

/// Poll-loop state: still querying with a remaining attempt budget, or done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Polling { attempts_left: u32 },
    Done(ProbeResult),
}

impl PollState {
    /// Start a poll loop with the given attempt budget. A zero budget is
    /// already exhausted.
    #[must_use]
    pub fn new(attempts: u32) -> Self {
        if attempts == 0 {
            Self::Done(ProbeResult::Failed)
        } else {
            Self::Polling {
                attempts_left: attempts,
            }
        }
    }

    /// Advance the machine with one query outcome.
    ///
    /// A terminal status short-circuits regardless of remaining budget.
    /// `Pending` and `NotYetVisible` each consume one attempt; an exhausted
    /// budget resolves to [`ProbeResult::Failed`].
    #[must_use]
    pub fn step(self, query: InvocationQuery) -> Self {
        match self {
            Self::Done(_) => self,
            Self::Polling { attempts_left } => match query {
                InvocationQuery::Terminal { output } => Self::Done(ProbeResult::Succeeded(output)),
                InvocationQuery::Pending | InvocationQuery::NotYetVisible => {
                    match attempts_left.saturating_sub(1) {
                        0 => Self::Done(ProbeResult::Failed),
                        left => Self::Polling { attempts_left: left },
                    }
                }
            },
        }
    }
}

/// Build the two-command readiness probe for an instance.
///
/// The first command writes a marker file named after `stamp_nanos`; the
/// second prints `True` when the marker exists and `False` otherwise. The
/// stamp must be unique per invocation so concurrent probes against the same
/// instance never share a marker.
#[must_use]
pub fn marker_script(instance_id: &str, stamp_nanos: i64) -> Vec<String> {
    let marker = format!("/tmp/launch-probe-{stamp_nanos}.txt");
    vec![
        format!("echo 'Launch probe marker for instance {instance_id}.' > {marker}"),
        format!("if [ -e {marker} ]; then echo -n True; else echo -n False; fi"),
    ]
}
