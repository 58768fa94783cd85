//! Application service — the instance readiness confirmation workflow.
//!
//! One invocation per lifecycle notification: decode, dispatch the probe,
//! poll to a terminal status or exhaustion, report completion. Strictly
//! sequential, no branching back. All I/O is routed through injected port
//! traits.

use anyhow::{Context, Result};
use scalegate_common::config::ProbeConfig;
use scalegate_common::lifecycle::{ConfirmOutcome, LifecycleDecision};
use scalegate_common::notification::{self, LifecycleNotification};
use scalegate_common::probe::{self, PollState, ProbeResult};

use crate::application::ports::{Clock, LifecycleCompleter, ProbeExecutor};

/// Run one confirmation invocation end to end.
///
/// Returns the invocation's externally observable result: the readiness
/// verdict once a probe cycle has run, or the fixed rejection when the
/// notification carries no usable instance identifier (in which case no
/// probe is dispatched and no completion is reported).
///
/// # Errors
///
/// Propagates unrecoverable remote-call failures: probe submission, a
/// status query the executor cannot classify as transient, or the
/// completion report.
pub async fn confirm_launch(
    executor: &impl ProbeExecutor,
    lifecycle: &impl LifecycleCompleter,
    clock: &impl Clock,
    cfg: &ProbeConfig,
    notification: &LifecycleNotification,
) -> Result<ConfirmOutcome> {
    let Some(payload) = notification::decode(notification) else {
        tracing::warn!("notification carried no decodable payload");
        return Ok(ConfirmOutcome::rejected());
    };
    let Some(instance_id) = payload.instance_id.as_deref().filter(|id| !id.is_empty()) else {
        tracing::warn!("notification payload carried no instance identifier");
        return Ok(ConfirmOutcome::rejected());
    };

    let result = run_probe(executor, clock, cfg, instance_id).await?;
    let ready = result.is_ready();

    // The launch continues regardless of the verdict; the verdict is only
    // the invocation's return value.
    let decision = LifecycleDecision::continue_launch(&payload, instance_id);
    lifecycle
        .complete(&decision)
        .await
        .context("reporting lifecycle completion")?;

    tracing::info!(instance_id, ready, "lifecycle completion reported");
    Ok(ConfirmOutcome::Probed { ready })
}

/// Dispatch the readiness probe and poll it to a result.
///
/// Sleeps one fixed interval before every status query, including the
/// first. A terminal status short-circuits; an exhausted budget resolves
/// to not-ready.
async fn run_probe(
    executor: &impl ProbeExecutor,
    clock: &impl Clock,
    cfg: &ProbeConfig,
    instance_id: &str,
) -> Result<ProbeResult> {
    let script = probe::marker_script(instance_id, clock.stamp_nanos());
    let handle = executor
        .submit(instance_id, &script)
        .await
        .context("submitting readiness probe")?;
    tracing::debug!(instance_id, handle = handle.as_str(), "readiness probe submitted");

    let mut state = PollState::new(cfg.poll_attempts);
    let result = loop {
        if let PollState::Done(result) = state {
            break result;
        }
        clock.sleep(cfg.poll_interval).await;
        let query = executor
            .query(&handle, instance_id)
            .await
            .context("querying readiness probe status")?;
        state = state.step(query);
    };
    Ok(result)
}
