//! Remote mail collaborator.
//!
//! The exporters only see the [`MailApi`] trait. [`client::GraphClient`] is
//! the production implementation backed by Microsoft Graph; tests substitute
//! an in-memory fake.

pub mod client;

use thiserror::Error;

use crate::model::attachment::AttachmentRecord;
use crate::model::mail::MessageRecord;

pub use client::GraphClient;

/// Permission scopes an operator must grant before collecting.
pub mod scopes {
    /// Required to export message bodies.
    pub const MESSAGE_EXPORT: &[&str] = &["Mail.ReadBasic.All", "Mail.Read"];

    /// Required to export attachments.
    pub const ATTACHMENT_EXPORT: &[&str] = &["Mail.Read", "Mail.ReadBasic", "Mail.ReadBasic.All"];

    /// Required to view a full message record.
    pub const MESSAGE_VIEW: &[&str] = &[
        "Mail.Read",
        "Mail.ReadBasic",
        "Mail.ReadBasic.All",
        "Mail.ReadWrite",
    ];
}

/// Errors raised by a [`MailApi`] implementation.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Underlying HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request URL could not be built from the configured base.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The lookup succeeded but matched no message.
    #[error("no message matches the given identifier")]
    NotFound,

    /// No session is available (no access token was supplied).
    #[error("not connected: no access token available")]
    NotConnected,
}

/// Operations the exporters need from the mail service.
///
/// Authentication is established before the implementation is handed to an
/// exporter; a missing or expired session only shows up as a failed call.
pub trait MailApi {
    /// Look up the message whose Internet Message ID is exactly
    /// `internet_message_id` in `owner`'s mailbox.
    fn find_message(
        &self,
        owner: &str,
        internet_message_id: &str,
    ) -> Result<MessageRecord, ApiError>;

    /// Fetch the raw RFC 5322 content of the message with record key `record_key`.
    fn message_content(&self, owner: &str, record_key: &str) -> Result<Vec<u8>, ApiError>;

    /// List the attachments of the message with record key `record_key`,
    /// payloads included.
    fn attachments(&self, owner: &str, record_key: &str)
        -> Result<Vec<AttachmentRecord>, ApiError>;
}
