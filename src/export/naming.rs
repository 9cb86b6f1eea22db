//! File names for collected items.
//!
//! Names are derived only from the received timestamp, the subject and (for
//! attachments) the attachment name, so re-collecting the same message
//! overwrites the earlier file.

use crate::model::mail::MessageRecord;

use super::OutputFormat;

/// Characters that are not allowed in file names on common filesystems.
const UNSAFE_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Replace every path-unsafe character with `_`.
pub fn sanitize_filename_part(s: &str) -> String {
    s.chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Received timestamp as `yyyyMMdd_HHmmss`.
pub fn received_stamp(record: &MessageRecord) -> String {
    record
        .received_date_time
        .format("%Y%m%d_%H%M%S")
        .to_string()
}

/// `{timestamp}-{subject}.{eml|txt}`
pub fn message_filename(record: &MessageRecord, format: OutputFormat) -> String {
    format!(
        "{}-{}.{}",
        received_stamp(record),
        sanitize_filename_part(record.subject()),
        format.extension()
    )
}

/// `{timestamp}-{subject}-{attachment name}`
pub fn attachment_filename(record: &MessageRecord, attachment_name: &str) -> String {
    format!(
        "{}-{}-{}",
        received_stamp(record),
        sanitize_filename_part(record.subject()),
        sanitize_filename_part(attachment_name)
    )
}
