//! Shared lifecycle-confirmation types for scalegate services.
//!
//! Everything in this crate is pure data and decision logic: no I/O, no
//! async, no clocks. The confirm service injects those through its ports.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod lifecycle;
pub mod notification;
pub mod probe;

pub use config::ProbeConfig;
pub use lifecycle::{
    ConfirmOutcome, LifecycleAction, LifecycleDecision, LifecyclePayload, NotificationError,
};
pub use notification::{LifecycleNotification, NotificationRecord, SnsEnvelope, decode};
pub use probe::{InvocationQuery, PollState, ProbeResult};
