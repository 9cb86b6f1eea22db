//! In-memory mailbox standing in for the remote mail service.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use mailcollect::graph::{ApiError, MailApi};
use mailcollect::model::attachment::AttachmentRecord;
use mailcollect::model::mail::MessageRecord;

pub const OWNER: &str = "investigator-target@contoso.com";

#[derive(Default)]
pub struct FakeMailbox {
    /// Internet Message ID → record.
    messages: HashMap<String, MessageRecord>,
    /// Record key → raw content.
    contents: HashMap<String, Vec<u8>>,
    /// Record key → attachments.
    attachments: HashMap<String, Vec<AttachmentRecord>>,
    /// Record keys whose content fetch fails.
    broken_content: HashSet<String>,
    /// Record keys whose attachment listing fails.
    broken_attachments: HashSet<String>,
    /// Every call fails as if no session existed.
    offline: bool,
    calls: Cell<usize>,
    owners_seen: RefCell<Vec<String>>,
}

impl FakeMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Add a message received at `received` (RFC 3339) with raw `content`.
    pub fn with_message(
        mut self,
        internet_id: &str,
        key: &str,
        subject: Option<&str>,
        received: &str,
        content: &[u8],
    ) -> Self {
        let record: MessageRecord = serde_json::from_value(serde_json::json!({
            "id": key,
            "subject": subject,
            "receivedDateTime": received,
            "hasAttachments": false,
            "internetMessageId": internet_id,
        }))
        .expect("valid record");
        self.messages.insert(internet_id.to_string(), record);
        self.contents.insert(key.to_string(), content.to_vec());
        self
    }

    /// Attach files (name, bytes) to the message with record key `key`.
    pub fn with_attachments(mut self, key: &str, files: &[(&str, &[u8])]) -> Self {
        let list = files
            .iter()
            .map(|(name, data)| AttachmentRecord {
                name: name.to_string(),
                size: data.len() as u64,
                content_type: Some("application/octet-stream".to_string()),
                content_bytes: Some(STANDARD.encode(data)),
            })
            .collect();
        self.attachments.insert(key.to_string(), list);
        for record in self.messages.values_mut() {
            if record.id == key {
                record.has_attachments = true;
            }
        }
        self
    }

    /// Append a raw attachment record to the message with record key `key`.
    pub fn with_attachment_record(mut self, key: &str, record: AttachmentRecord) -> Self {
        self.attachments.entry(key.to_string()).or_default().push(record);
        for message in self.messages.values_mut() {
            if message.id == key {
                message.has_attachments = true;
            }
        }
        self
    }

    pub fn with_broken_content(mut self, key: &str) -> Self {
        self.broken_content.insert(key.to_string());
        self
    }

    /// Make the attachment listing of `key` fail. The message reports
    /// attachments so exporters try to list them.
    pub fn with_broken_attachments(mut self, key: &str) -> Self {
        self.broken_attachments.insert(key.to_string());
        for message in self.messages.values_mut() {
            if message.id == key {
                message.has_attachments = true;
            }
        }
        self
    }

    /// Number of remote calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn owners_seen(&self) -> Vec<String> {
        self.owners_seen.borrow().clone()
    }

    fn record_call(&self, owner: &str) -> Result<(), ApiError> {
        self.calls.set(self.calls.get() + 1);
        self.owners_seen.borrow_mut().push(owner.to_string());
        if self.offline {
            Err(ApiError::NotConnected)
        } else {
            Ok(())
        }
    }
}

impl MailApi for FakeMailbox {
    fn find_message(
        &self,
        owner: &str,
        internet_message_id: &str,
    ) -> Result<MessageRecord, ApiError> {
        self.record_call(owner)?;
        self.messages
            .get(internet_message_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    fn message_content(&self, owner: &str, record_key: &str) -> Result<Vec<u8>, ApiError> {
        self.record_call(owner)?;
        if self.broken_content.contains(record_key) {
            return Err(ApiError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: format!("content of {record_key} unavailable"),
            });
        }
        self.contents
            .get(record_key)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    fn attachments(
        &self,
        owner: &str,
        record_key: &str,
    ) -> Result<Vec<AttachmentRecord>, ApiError> {
        self.record_call(owner)?;
        if self.broken_attachments.contains(record_key) {
            return Err(ApiError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: format!("attachments of {record_key} unavailable"),
            });
        }
        Ok(self
            .attachments
            .get(record_key)
            .cloned()
            .unwrap_or_default())
    }
}
