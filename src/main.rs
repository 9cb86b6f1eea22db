//! CLI entry point for `mailcollect`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use mailcollect::config::Config;
use mailcollect::export::attachment::{export_attachments, AttachmentOutcome};
use mailcollect::export::message::{export_messages, MessageSource};
use mailcollect::export::{ExportOptions, OutputFormat};
use mailcollect::graph::GraphClient;
use mailcollect::report::TracingReporter;
use mailcollect::view::{view_message, ViewStyle};

#[derive(Parser)]
#[command(
    name = "mailcollect",
    version,
    about = "Collect messages and attachments from a Microsoft 365 mailbox by Internet Message ID"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bearer token for the mail service, obtained out of band
    #[arg(long, global = true, env = "MAILCOLLECT_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Save messages as .eml or .txt files
    Export {
        /// Mailbox owner (user principal name)
        #[arg(long)]
        owner: String,
        /// Internet Message ID of a single message
        #[arg(long, conflicts_with = "input", required_unless_present = "input")]
        id: Option<String>,
        /// File with one Internet Message ID per line
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Output format [default: from config, else eml]
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Existing directory to write to
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Also save the attachments of every collected message
        #[arg(short, long)]
        attachments: bool,
    },
    /// Save the attachments of one message
    Attachments {
        /// Mailbox owner (user principal name)
        #[arg(long)]
        owner: String,
        /// Internet Message ID of the message
        #[arg(long)]
        id: String,
        /// Existing directory to write to
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Print every property of one message
    Show {
        /// Mailbox owner (user principal name)
        #[arg(long)]
        owner: String,
        /// Internet Message ID of the message
        #[arg(long)]
        id: String,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = mailcollect::config::load_config();

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);
    tracing::debug!(
        path = %mailcollect::config::log_file_path(&config).display(),
        "Collection log"
    );

    let token = cli.token.or_else(|| config.graph.access_token.clone());

    match cli.command {
        Commands::Export {
            owner,
            id,
            input,
            format,
            output,
            attachments,
        } => {
            let options = ExportOptions {
                format: format.unwrap_or(config.export.default_format),
                output_dir: output,
                default_output_dir: config.export.default_output_dir.clone(),
                include_attachments: attachments,
            };
            cmd_export(&config, token, &owner, id, input, &options)
        }
        Commands::Attachments { owner, id, output } => {
            let options = ExportOptions {
                output_dir: output,
                default_output_dir: config.export.default_output_dir.clone(),
                ..ExportOptions::default()
            };
            cmd_attachments(&config, token, &owner, &id, &options)
        }
        Commands::Show { owner, id, json } => {
            let style = if json { ViewStyle::Json } else { ViewStyle::List };
            cmd_show(&config, token, &owner, &id, style)
        }
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Route tracing to stderr and, when the cache directory is usable, to the
/// collection log as plain text.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_dir = mailcollect::config::cache_dir(config);
    let log_layer = match std::fs::create_dir_all(&log_dir) {
        Ok(()) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(tracing_appender::rolling::never(
                    &log_dir,
                    mailcollect::config::LOG_FILE_NAME,
                )),
        ),
        Err(e) => {
            eprintln!("warning: collection log disabled ({}): {e}", log_dir.display());
            None
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_layer)
        .init();
}

fn graph_client(config: &Config, token: Option<String>) -> anyhow::Result<GraphClient> {
    Ok(GraphClient::new(
        &config.graph.base_url,
        token,
        Duration::from_secs(config.graph.timeout_secs),
    )?)
}

/// Collect one message or every message listed in a file.
fn cmd_export(
    config: &Config,
    token: Option<String>,
    owner: &str,
    id: Option<String>,
    input: Option<PathBuf>,
    options: &ExportOptions,
) -> anyhow::Result<()> {
    let source = MessageSource::from_args(id, input)?;
    let client = graph_client(config, token)?;

    let pb = match source {
        MessageSource::List(_) => ProgressBar::new(0),
        MessageSource::Single(_) => ProgressBar::hidden(),
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Collecting [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let summary = export_messages(
        &client,
        &TracingReporter,
        owner,
        &source,
        options,
        &|current, total| {
            pb.set_length(total as u64);
            pb.set_position(current as u64);
        },
    )?;
    pb.finish_and_clear();

    println!(
        "  Collected {} message(s) to {}",
        summary.written.len(),
        summary.output_dir.display()
    );
    if !summary.not_collected.is_empty() {
        println!("  Not collected ({}):", summary.not_collected.len());
        for id in &summary.not_collected {
            println!("    {id}");
        }
    }
    Ok(())
}

/// Save the attachments of one message.
fn cmd_attachments(
    config: &Config,
    token: Option<String>,
    owner: &str,
    id: &str,
    options: &ExportOptions,
) -> anyhow::Result<()> {
    let client = graph_client(config, token)?;
    match export_attachments(&client, &TracingReporter, owner, id, options)? {
        AttachmentOutcome::Saved(paths) => {
            println!("  Saved {} attachment(s)", paths.len());
        }
        AttachmentOutcome::NoAttachments
        | AttachmentOutcome::NotAuthorized
        | AttachmentOutcome::ListingFailed => {}
    }
    Ok(())
}

/// Print one message record.
fn cmd_show(
    config: &Config,
    token: Option<String>,
    owner: &str,
    id: &str,
    style: ViewStyle,
) -> anyhow::Result<()> {
    let client = graph_client(config, token)?;
    view_message(&client, &TracingReporter, owner, id, style);
    Ok(())
}

/// Write a completion script for `shell` to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin, &mut std::io::stdout());
    Ok(())
}

/// Write the roff man page to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    clap_mangen::Man::new(Cli::command()).render(&mut out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_batch() {
        let cli = Cli::try_parse_from([
            "mailcollect",
            "export",
            "--owner",
            "user@contoso.com",
            "--input",
            "ids.txt",
            "--format",
            "txt",
            "-a",
        ])
        .unwrap();
        match cli.command {
            Commands::Export {
                owner,
                id,
                input,
                format,
                attachments,
                ..
            } => {
                assert_eq!(owner, "user@contoso.com");
                assert!(id.is_none());
                assert_eq!(input, Some(PathBuf::from("ids.txt")));
                assert_eq!(format, Some(OutputFormat::Txt));
                assert!(attachments);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_export_id_and_input_conflict() {
        let result = Cli::try_parse_from([
            "mailcollect",
            "export",
            "--owner",
            "user@contoso.com",
            "--id",
            "<a@contoso.com>",
            "--input",
            "ids.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_requires_id_or_input() {
        let result = Cli::try_parse_from(["mailcollect", "export", "--owner", "user@contoso.com"]);
        assert!(result.is_err());
    }
}
