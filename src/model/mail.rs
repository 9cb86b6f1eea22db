//! Remote message record as returned by the mail service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only copy of one message held for the duration of a request.
///
/// Only the fields the exporters depend on are typed. Every other property
/// the service returned is kept in `extra` so the viewer can show the whole
/// record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    /// Provider-internal record key. Not the Internet Message ID.
    pub id: String,

    /// Subject line. The service sends `null` for messages without one.
    #[serde(default)]
    pub subject: Option<String>,

    /// When the message arrived in the mailbox.
    pub received_date_time: DateTime<Utc>,

    /// Whether the service reports file or item attachments.
    #[serde(default)]
    pub has_attachments: bool,

    /// Remaining properties, verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MessageRecord {
    /// Subject text, empty when the message has none.
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or("")
    }
}
