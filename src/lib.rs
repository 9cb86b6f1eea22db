//! `mailcollect`: collect individual messages and attachments from a
//! Microsoft 365 mailbox for forensic review.
//!
//! Messages are located by Internet Message ID through the [`graph::MailApi`]
//! collaborator and written as `.eml`/`.txt` files; attachments are saved with
//! their original bytes.

pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod model;
pub mod report;
pub mod view;
