//! # nid-cli
//!
//! Administration tool for the NameID link store.
//!
//! This crate provides command-line utilities for:
//! - Issuing NameIDs directly or under a format policy
//! - Looking up and matching linked NameIDs
//! - Removing links for a principal or a single NameID
//! - Recording published NameIDs per relying party
//! - Answering NameID mapping and management requests by hand

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::too_many_arguments)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
