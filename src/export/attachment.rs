//! Save the attachments of a single message.

use std::path::{Path, PathBuf};

use humansize::{format_size, BINARY};

use crate::error::Result;
use crate::graph::{scopes, MailApi};
use crate::model::attachment::AttachmentRecord;
use crate::model::mail::MessageRecord;
use crate::report::Reporter;

use super::naming::attachment_filename;
use super::ExportOptions;

/// What an attachment export did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentOutcome {
    /// Files written, in listing order.
    Saved(Vec<PathBuf>),
    /// The message reports no attachments; nothing was written.
    NoAttachments,
    /// The probe lookup failed. A warning naming the scopes was reported.
    NotAuthorized,
    /// The attachment listing could not be fetched. A warning was reported.
    ListingFailed,
}

/// Export every attachment of the message identified by `internet_message_id`.
///
/// A failed probe lookup or attachment listing ends this call only and is
/// reported as [`AttachmentOutcome::NotAuthorized`] or
/// [`AttachmentOutcome::ListingFailed`]. An invalid output directory is an
/// error raised before any remote call.
pub fn export_attachments(
    api: &dyn MailApi,
    reporter: &dyn Reporter,
    owner: &str,
    internet_message_id: &str,
    options: &ExportOptions,
) -> Result<AttachmentOutcome> {
    let output_dir = options.resolve_output_dir()?;

    let record = match api.find_message(owner, internet_message_id) {
        Ok(record) => record,
        Err(e) => {
            reporter.warn(&format!(
                "Unable to query the mailbox ({e}). Connect with the following permission scopes and retry: {}",
                scopes::ATTACHMENT_EXPORT.join(", ")
            ));
            return Ok(AttachmentOutcome::NotAuthorized);
        }
    };

    if !record.has_attachments {
        reporter.warn(&format!(
            "Message '{}' has no attachments",
            record.subject()
        ));
        return Ok(AttachmentOutcome::NoAttachments);
    }

    let attachments = match api.attachments(owner, &record.id) {
        Ok(attachments) => attachments,
        Err(e) => {
            reporter.warn(&format!(
                "Could not list attachments of message '{}': {e}",
                internet_message_id
            ));
            return Ok(AttachmentOutcome::ListingFailed);
        }
    };

    let mut paths = Vec::with_capacity(attachments.len());
    for attachment in &attachments {
        if let Some(path) = save_attachment(reporter, &record, attachment, &output_dir) {
            paths.push(path);
        }
    }

    Ok(AttachmentOutcome::Saved(paths))
}

/// Decode and write one attachment. Failures are reported and skipped.
fn save_attachment(
    reporter: &dyn Reporter,
    record: &MessageRecord,
    attachment: &AttachmentRecord,
    output_dir: &Path,
) -> Option<PathBuf> {
    let data = match attachment.decode() {
        Ok(Some(data)) => data,
        Ok(None) => {
            reporter.warn(&format!(
                "Attachment '{}' has no downloadable content, skipped",
                attachment.name
            ));
            return None;
        }
        Err(e) => {
            reporter.warn(&format!(
                "Attachment '{}' could not be decoded: {e}",
                attachment.name
            ));
            return None;
        }
    };

    reporter.echo(&format!(
        "  {} ({}, {} bytes)",
        attachment.name,
        format_size(attachment.size, BINARY),
        attachment.size
    ));

    let path = output_dir.join(attachment_filename(record, &attachment.name));
    match std::fs::write(&path, &data) {
        Ok(()) => {
            reporter.info(&format!("Saved attachment to {}", path.display()));
            Some(path)
        }
        Err(e) => {
            reporter.warn(&format!(
                "Failed to write attachment '{}' to {}: {e}",
                attachment.name,
                path.display()
            ));
            None
        }
    }
}
