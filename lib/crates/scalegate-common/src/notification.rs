//! Inbound lifecycle notification envelope and best-effort decoding.

use serde::Deserialize;

use crate::lifecycle::LifecyclePayload;

/// Origin tag of records produced by the fleet manager's notification topic.
pub const EXPECTED_EVENT_SOURCE: &str = "aws:sns";

/// Opaque inbound envelope: zero or more sub-records, each optionally
/// carrying a JSON-encoded payload. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LifecycleNotification {
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

/// One sub-record of the envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationRecord {
    #[serde(rename = "EventSource", default)]
    pub event_source: Option<String>,
    #[serde(rename = "Sns", default)]
    pub sns: Option<SnsEnvelope>,
}

/// The part of a sub-record carrying the JSON-encoded message body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnsEnvelope {
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

/// Extract the first usable payload from the envelope.
///
/// Records from other sources are skipped. A body that is not a JSON object
/// is logged and skipped — parse errors never abort the scan. The first
/// record whose body is a non-empty JSON object ends the scan, whether or
/// not it carries the expected keys.
#[must_use]
pub fn decode(notification: &LifecycleNotification) -> Option<LifecyclePayload> {
    for record in &notification.records {
        if record.event_source.as_deref() != Some(EXPECTED_EVENT_SOURCE) {
            continue;
        }
        let message = record
            .sns
            .as_ref()
            .and_then(|sns| sns.message.as_deref())
            .unwrap_or("{}");
        match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(message) {
            Ok(fields) if !fields.is_empty() => {
                return Some(LifecyclePayload::from_message(&fields));
            }
            Ok(_) => {}
            Err(err) => {
                tracing::error!(%err, message, "cannot parse notification message, skipping record");
            }
        }
    }
    None
}
