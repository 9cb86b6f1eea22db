//! Core data model types for remote messages and attachments.

pub mod attachment;
pub mod mail;
