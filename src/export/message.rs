//! Collect messages by Internet Message ID, one at a time or from a list.

use std::path::{Path, PathBuf};

use crate::error::{CollectError, Result};
use crate::graph::{scopes, MailApi};
use crate::model::mail::MessageRecord;
use crate::report::Reporter;

use super::attachment::export_attachments;
use super::naming::message_filename;
use super::ExportOptions;

/// Where the identifiers of an invocation come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSource {
    /// One identifier. Failures abort the invocation.
    Single(String),
    /// A text file with one identifier per line. Failures are recorded per item.
    List(PathBuf),
}

impl MessageSource {
    /// Build the source from the two mutually exclusive inputs.
    pub fn from_args(id: Option<String>, input: Option<PathBuf>) -> Result<Self> {
        match (id, input) {
            (Some(id), None) if !id.trim().is_empty() => Ok(Self::Single(id)),
            (None, Some(path)) => Ok(Self::List(path)),
            (Some(_), Some(_)) => Err(CollectError::config(
                "give either a message identifier or an input file, not both",
            )),
            _ => Err(CollectError::config(
                "no message identifier or input file given",
            )),
        }
    }
}

/// Result of a completed invocation.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Directory the files were written to.
    pub output_dir: PathBuf,
    /// Message files written, in processing order.
    pub written: Vec<PathBuf>,
    /// Identifiers that could not be collected, in input order.
    pub not_collected: Vec<String>,
}

/// Read an identifier list: one per line, trimmed, blank lines ignored.
pub fn read_identifiers(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CollectError::config(format!("cannot read input file '{}': {e}", path.display()))
    })?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Export every message named by `source` from `owner`'s mailbox.
///
/// Configuration problems (output directory, input file) abort before any
/// remote call. In single mode a failed lookup is returned as
/// [`CollectError::Auth`]; in list mode failures are reported, recorded in
/// [`ExportSummary::not_collected`] and the remaining identifiers processed.
///
/// The progress callback receives `(current, total)` in list mode.
pub fn export_messages(
    api: &dyn MailApi,
    reporter: &dyn Reporter,
    owner: &str,
    source: &MessageSource,
    options: &ExportOptions,
    progress: &dyn Fn(usize, usize),
) -> Result<ExportSummary> {
    let output_dir = options.resolve_output_dir()?;
    let mut summary = ExportSummary {
        output_dir: output_dir.clone(),
        ..ExportSummary::default()
    };

    match source {
        MessageSource::Single(id) => {
            let record = api
                .find_message(owner, id)
                .map_err(|source| CollectError::Auth {
                    scopes: scopes::MESSAGE_EXPORT,
                    source,
                })?;
            let path = collect(api, reporter, owner, id, &record, &output_dir, options)?;
            summary.written.push(path);
        }
        MessageSource::List(list) => {
            let ids = read_identifiers(list)?;
            let total = ids.len();
            reporter.info(&format!(
                "Collecting {total} message(s) from {}",
                list.display()
            ));

            for (i, id) in ids.iter().enumerate() {
                progress(i, total);
                let result = api
                    .find_message(owner, id)
                    .map_err(|e| CollectError::lookup(id.as_str(), e))
                    .and_then(|record| {
                        collect(api, reporter, owner, id, &record, &output_dir, options)
                    });
                match result {
                    Ok(path) => summary.written.push(path),
                    Err(e) => {
                        reporter.warn(&format!("Message {id} not collected: {e}"));
                        summary.not_collected.push(id.clone());
                    }
                }
            }
            progress(total, total);

            if summary.not_collected.is_empty() {
                reporter.info(&format!("All {total} message(s) collected"));
            } else {
                reporter.warn(&format!(
                    "{} message(s) not collected: {}",
                    summary.not_collected.len(),
                    summary.not_collected.join(", ")
                ));
            }
        }
    }

    Ok(summary)
}

/// Fetch, write and optionally export attachments for one resolved message.
fn collect(
    api: &dyn MailApi,
    reporter: &dyn Reporter,
    owner: &str,
    id: &str,
    record: &MessageRecord,
    output_dir: &Path,
    options: &ExportOptions,
) -> Result<PathBuf> {
    let content = api
        .message_content(owner, &record.id)
        .map_err(|e| CollectError::lookup(id, e))?;

    let path = output_dir.join(message_filename(record, options.format));
    std::fs::write(&path, &content).map_err(|e| CollectError::io(&path, e))?;
    reporter.info(&format!("Saved message {id} to {}", path.display()));

    // The body is on disk: attachment problems end the attachment call only
    if options.include_attachments {
        if let Err(e) = export_attachments(api, reporter, owner, id, options) {
            reporter.warn(&format!("Attachments of message {id} not collected: {e}"));
        }
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_single() {
        let src = MessageSource::from_args(Some("<a@x>".into()), None).unwrap();
        assert_eq!(src, MessageSource::Single("<a@x>".into()));
    }

    #[test]
    fn test_source_list() {
        let src = MessageSource::from_args(None, Some(PathBuf::from("ids.txt"))).unwrap();
        assert_eq!(src, MessageSource::List(PathBuf::from("ids.txt")));
    }

    #[test]
    fn test_source_missing() {
        assert!(matches!(
            MessageSource::from_args(None, None),
            Err(CollectError::Config(_))
        ));
        assert!(matches!(
            MessageSource::from_args(Some("   ".into()), None),
            Err(CollectError::Config(_))
        ));
    }

    #[test]
    fn test_source_both() {
        assert!(matches!(
            MessageSource::from_args(Some("<a@x>".into()), Some(PathBuf::from("ids.txt"))),
            Err(CollectError::Config(_))
        ));
    }

    #[test]
    fn test_read_identifiers_trims_and_skips_blank() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "  <a@x>  \r\n\n\t<b@x>\n   \n<c@x>").unwrap();
        assert_eq!(
            read_identifiers(tmp.path()).unwrap(),
            vec!["<a@x>", "<b@x>", "<c@x>"]
        );
    }

    #[test]
    fn test_read_identifiers_missing_file() {
        let err = read_identifiers(Path::new("/nonexistent/ids.txt")).unwrap_err();
        assert!(matches!(err, CollectError::Config(_)));
    }
}
