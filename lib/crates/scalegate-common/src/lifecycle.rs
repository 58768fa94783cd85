//! Lifecycle payload, completion decision, and workflow outcome types.
//!
//! All entities here live for a single invocation: constructed from one
//! notification, read afterwards, discarded at the end.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Correlation fields extracted from one lifecycle notification.
///
/// Every field is optional — the decoder records whatever the message body
/// carries, and the workflow decides what is fatal (only a missing or empty
/// instance identifier is).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecyclePayload {
    /// Identifier of the launching instance.
    pub instance_id: Option<String>,
    /// Name of the lifecycle hook pausing the launch.
    pub lifecycle_hook_name: Option<String>,
    /// Token tying a completion report to this specific transition.
    pub lifecycle_action_token: Option<String>,
    /// Name of the scaling group the instance belongs to.
    pub auto_scaling_group_name: Option<String>,
}

impl LifecyclePayload {
    /// Read the known keys out of a decoded message body.
    ///
    /// Non-string values are treated as absent.
    #[must_use]
    pub fn from_message(fields: &Map<String, Value>) -> Self {
        let field = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_owned);
        Self {
            instance_id: field("EC2InstanceId"),
            lifecycle_hook_name: field("LifecycleHookName"),
            lifecycle_action_token: field("LifecycleActionToken"),
            auto_scaling_group_name: field("AutoScalingGroupName"),
        }
    }
}

/// Completion result reported to the Fleet Lifecycle Service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Continue,
    Abandon,
}

impl LifecycleAction {
    /// Wire value expected by the fleet manager.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Continue => "CONTINUE",
            Self::Abandon => "ABANDON",
        }
    }
}

/// One completion report, keyed by the correlation identifiers of the paused
/// lifecycle transition. Sent exactly once per probed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleDecision {
    pub action: LifecycleAction,
    pub lifecycle_hook_name: Option<String>,
    pub lifecycle_action_token: Option<String>,
    pub auto_scaling_group_name: Option<String>,
    pub instance_id: String,
}

impl LifecycleDecision {
    /// Build the continue decision for a probed instance, copying the
    /// correlation identifiers from the payload unchanged.
    #[must_use]
    pub fn continue_launch(payload: &LifecyclePayload, instance_id: &str) -> Self {
        Self {
            action: LifecycleAction::Continue,
            lifecycle_hook_name: payload.lifecycle_hook_name.clone(),
            lifecycle_action_token: payload.lifecycle_action_token.clone(),
            auto_scaling_group_name: payload.auto_scaling_group_name.clone(),
            instance_id: instance_id.to_owned(),
        }
    }
}

/// The fixed early-exit result for notifications that carry no usable
/// instance identifier. Its message is the workflow's only externally
/// visible error string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Error processing notification.")]
pub struct NotificationError;

/// Result of one confirmation invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// A probe cycle ran to a terminal status or exhaustion; `ready` is the
    /// readiness verdict.
    Probed { ready: bool },
    /// The notification was rejected before any probe was dispatched.
    Rejected(NotificationError),
}

impl ConfirmOutcome {
    #[must_use]
    pub const fn rejected() -> Self {
        Self::Rejected(NotificationError)
    }

    /// JSON body returned to the delivery surface: the bare verdict, or the
    /// fixed error string.
    #[must_use]
    pub fn body(&self) -> Value {
        match self {
            Self::Probed { ready } => Value::Bool(*ready),
            Self::Rejected(err) => Value::String(err.to_string()),
        }
    }
}

impl fmt::Display for ConfirmOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probed { ready } => write!(f, "{ready}"),
            Self::Rejected(err) => write!(f, "{err}"),
        }
    }
}
