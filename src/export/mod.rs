//! Export functionality: messages as `.eml`/`.txt`, attachments as raw bytes.

pub mod attachment;
pub mod message;
pub mod naming;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CollectError, Result};

/// Directory used when the caller does not name one.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// File format for exported message bodies.
///
/// Both formats hold the raw message content; only the extension differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Eml,
    Txt,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Eml => "eml",
            Self::Txt => "txt",
        }
    }
}

/// Options for one invocation, built once and shared across a batch.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Message body format. Defaults to `eml`.
    pub format: OutputFormat,

    /// Directory named by the caller. It must already exist.
    pub output_dir: Option<PathBuf>,

    /// Directory used when `output_dir` is `None`; created if missing.
    /// Defaults to [`DEFAULT_OUTPUT_DIR`].
    pub default_output_dir: PathBuf,

    /// Also export attachments of each collected message. Defaults to `false`.
    pub include_attachments: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            output_dir: None,
            default_output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            include_attachments: false,
        }
    }
}

impl ExportOptions {
    /// Resolve the directory files are written to.
    ///
    /// A caller-supplied directory must exist; the default one is created.
    pub fn resolve_output_dir(&self) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => {
                if dir.is_dir() {
                    Ok(dir.clone())
                } else {
                    Err(CollectError::config(format!(
                        "output directory '{}' does not exist",
                        dir.display()
                    )))
                }
            }
            None => create_default_dir(&self.default_output_dir),
        }
    }
}

fn create_default_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| CollectError::io(dir, e))?;
    Ok(dir.to_path_buf())
}
