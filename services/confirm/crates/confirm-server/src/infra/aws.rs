//! AWS CLI adapters for the remote service ports.
//!
//! `AwsCli<R>` routes every remote call through a [`CommandRunner`], so
//! tests can inject a recorder instead of spawning processes. Region and
//! credentials come from the ambient CLI configuration, the same way the
//! rest of the fleet tooling is configured.

use anyhow::{Context, Result};
use serde_json::Value;

use scalegate_common::lifecycle::LifecycleDecision;
use scalegate_common::probe::InvocationQuery;

use crate::application::ports::{CommandHandle, CommandRunner, LifecycleCompleter, ProbeExecutor};
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// Managed document that runs shell commands through the instance agent.
pub const RUN_SHELL_SCRIPT_DOCUMENT: &str = "AWS-RunShellScript";

/// Error name reported while a command record has not propagated yet.
const INVOCATION_DOES_NOT_EXIST: &str = "InvocationDoesNotExist";

/// Statuses meaning the command has not finished; everything else is
/// terminal and carries the captured output.
const IN_FLIGHT_STATUSES: [&str; 3] = ["Pending", "InProgress", "Delayed"];

/// Adapter implementing both remote service ports against the `aws` CLI.
pub struct AwsCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> AwsCli<R> {
    /// Create an adapter with an explicit runner instance.
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl AwsCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT))
    }
}

impl<R: CommandRunner> ProbeExecutor for AwsCli<R> {
    async fn submit(&self, instance_id: &str, commands: &[String]) -> Result<CommandHandle> {
        let parameters = serde_json::json!({ "commands": commands }).to_string();
        let output = self
            .runner
            .run(
                "aws",
                &[
                    "ssm",
                    "send-command",
                    "--instance-ids",
                    instance_id,
                    "--document-name",
                    RUN_SHELL_SCRIPT_DOCUMENT,
                    "--parameters",
                    &parameters,
                    "--output",
                    "json",
                ],
            )
            .await
            .context("aws ssm send-command")?;
        anyhow::ensure!(
            output.status.success(),
            "send-command failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );

        let body: Value =
            serde_json::from_slice(&output.stdout).context("parsing send-command output")?;
        let command_id = body
            .get("Command")
            .and_then(|command| command.get("CommandId"))
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("send-command output missing Command.CommandId"))?;
        Ok(CommandHandle::new(command_id))
    }

    async fn query(&self, handle: &CommandHandle, instance_id: &str) -> Result<InvocationQuery> {
        let output = self
            .runner
            .run(
                "aws",
                &[
                    "ssm",
                    "get-command-invocation",
                    "--command-id",
                    handle.as_str(),
                    "--instance-id",
                    instance_id,
                    "--output",
                    "json",
                ],
            )
            .await
            .context("aws ssm get-command-invocation")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains(INVOCATION_DOES_NOT_EXIST) {
                return Ok(InvocationQuery::NotYetVisible);
            }
            anyhow::bail!("get-command-invocation failed: {}", stderr.trim());
        }

        let body: Value = serde_json::from_slice(&output.stdout)
            .context("parsing get-command-invocation output")?;
        let status = body.get("Status").and_then(Value::as_str).unwrap_or_default();
        if IN_FLIGHT_STATUSES.contains(&status) {
            return Ok(InvocationQuery::Pending);
        }
        let probe_output = body
            .get("StandardOutputContent")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        Ok(InvocationQuery::Terminal {
            output: probe_output,
        })
    }
}

impl<R: CommandRunner> LifecycleCompleter for AwsCli<R> {
    async fn complete(&self, decision: &LifecycleDecision) -> Result<()> {
        // Absent correlation fields are forwarded empty; the remote call
        // rejects them and the failure propagates to the invocation.
        let output = self
            .runner
            .run(
                "aws",
                &[
                    "autoscaling",
                    "complete-lifecycle-action",
                    "--lifecycle-hook-name",
                    decision.lifecycle_hook_name.as_deref().unwrap_or_default(),
                    "--lifecycle-action-token",
                    decision.lifecycle_action_token.as_deref().unwrap_or_default(),
                    "--auto-scaling-group-name",
                    decision
                        .auto_scaling_group_name
                        .as_deref()
                        .unwrap_or_default(),
                    "--lifecycle-action-result",
                    decision.action.as_str(),
                    "--instance-id",
                    &decision.instance_id,
                ],
            )
            .await
            .context("aws autoscaling complete-lifecycle-action")?;
        anyhow::ensure!(
            output.status.success(),
            "complete-lifecycle-action failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
        Ok(())
    }
}
