//! Render a full message record for the operator.

use chrono::SecondsFormat;
use serde_json::{Map, Value};

use crate::graph::{scopes, MailApi};
use crate::model::mail::MessageRecord;
use crate::report::Reporter;

/// How a record is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewStyle {
    /// Aligned `key : value` lines.
    #[default]
    List,
    /// Pretty-printed JSON object.
    Json,
}

/// Look up one message and echo every property to the console.
///
/// A failed lookup is reported as a warning naming the required scopes and
/// returns `None`; nothing is written to disk either way.
pub fn view_message(
    api: &dyn MailApi,
    reporter: &dyn Reporter,
    owner: &str,
    internet_message_id: &str,
    style: ViewStyle,
) -> Option<MessageRecord> {
    let record = match api.find_message(owner, internet_message_id) {
        Ok(record) => record,
        Err(e) => {
            reporter.warn(&format!(
                "Unable to query the mailbox ({e}). Connect with the following permission scopes and retry: {}",
                scopes::MESSAGE_VIEW.join(", ")
            ));
            return None;
        }
    };

    let rendered = match style {
        ViewStyle::List => render_list(&record),
        ViewStyle::Json => format!("{:#}", Value::Object(record_fields(&record))),
    };
    reporter.echo(&rendered);
    Some(record)
}

/// All properties of the record, keyed by their service names.
pub fn record_fields(record: &MessageRecord) -> Map<String, Value> {
    let mut fields = record.extra.clone();
    fields.insert("id".to_string(), Value::String(record.id.clone()));
    fields.insert(
        "subject".to_string(),
        record
            .subject
            .as_ref()
            .map_or(Value::Null, |s| Value::String(s.clone())),
    );
    fields.insert(
        "receivedDateTime".to_string(),
        Value::String(
            record
                .received_date_time
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
    );
    fields.insert(
        "hasAttachments".to_string(),
        Value::Bool(record.has_attachments),
    );
    fields
}

/// One `key : value` line per property, keys padded to a common width.
/// Nested values are shown as compact JSON.
pub fn render_list(record: &MessageRecord) -> String {
    let fields = record_fields(record);
    let width = fields.keys().map(|k| k.chars().count()).max().unwrap_or(0);

    fields
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{key:<width$} : {text}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MessageRecord {
        serde_json::from_value(serde_json::json!({
            "id": "AAMk",
            "subject": "Hello",
            "receivedDateTime": "2024-03-05T10:20:30Z",
            "hasAttachments": true,
            "importance": "normal",
            "from": {"emailAddress": {"address": "a@example.com"}},
            "bccRecipients": [],
        }))
        .unwrap()
    }

    #[test]
    fn test_render_list() {
        let text = render_list(&record());
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.contains(&"subject          : Hello"));
        assert!(lines.contains(&"hasAttachments   : true"));
        assert!(lines.contains(&"receivedDateTime : 2024-03-05T10:20:30Z"));
        assert!(lines.contains(&"bccRecipients    : []"));
        assert!(lines
            .iter()
            .any(|l| l.starts_with("from") && l.ends_with(r#"{"emailAddress":{"address":"a@example.com"}}"#)));
    }

    #[test]
    fn test_record_fields_keeps_extra() {
        let fields = record_fields(&record());
        assert_eq!(fields.len(), 7);
        assert_eq!(fields["importance"], "normal");
        assert_eq!(fields["id"], "AAMk");
    }
}
