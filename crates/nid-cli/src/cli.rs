//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nid_ident::ManageNameIdRequest;
use nid_saml::{NameId, NameIdFormat, NameIdPolicy};

use crate::config::OutputFormat;

/// nid - administration tool for the NameID link store.
#[derive(Debug, Parser)]
#[command(name = "nid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ~/.nameid/nid.toml).
    #[arg(short, long, env = "NID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Issue a fresh NameID of a given format to a local id.
    Issue {
        /// Local principal id.
        local_id: String,

        /// Format (short name such as `persistent`, or a full URI).
        #[arg(short, long, default_value = "persistent")]
        format: String,

        /// SP name qualifier.
        #[arg(long)]
        sp: Option<String>,

        /// Name qualifier (defaults to the configured one).
        #[arg(long)]
        nq: Option<String>,
    },

    /// Issue a NameID with the format resolved from policy.
    Construct {
        /// Local principal id.
        local_id: String,

        /// SP name qualifier.
        #[arg(long)]
        sp: Option<String>,

        /// Name qualifier (defaults to the configured one).
        #[arg(long)]
        nq: Option<String>,

        /// Requester policy.
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Show the local id a NameID is linked to.
    Find(NameIdArgs),

    /// Show the first non-transient NameID of a local id with the given qualifiers.
    Match {
        /// Local principal id.
        local_id: String,

        /// SP name qualifier.
        #[arg(long)]
        sp: Option<String>,

        /// Name qualifier.
        #[arg(long)]
        nq: Option<String>,
    },

    /// List every NameID linked to a local id.
    List {
        /// Local principal id.
        local_id: String,
    },

    /// Unlink everything issued to a local id.
    RemoveLocal {
        /// Local principal id.
        local_id: String,
    },

    /// Unlink a single NameID.
    RemoveRemote(NameIdArgs),

    /// Record the NameID last published to a relying party.
    Publish {
        /// Local principal id.
        local_id: String,

        /// Relying party entity id.
        relying_party: String,

        /// The published NameID.
        #[command(flatten)]
        name_id: NameIdArgs,
    },

    /// Show the NameID last published to a relying party.
    Published {
        /// Local principal id.
        local_id: String,

        /// Relying party entity id.
        relying_party: String,
    },

    /// Answer a NameID mapping request.
    Map {
        /// NameID identifying the principal.
        #[command(flatten)]
        name_id: NameIdArgs,

        /// Requester policy.
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Answer a Manage NameID request.
    Manage {
        /// NameID being managed.
        #[command(flatten)]
        name_id: NameIdArgs,

        /// New SP-provided id.
        #[arg(long, conflicts_with = "terminate")]
        new_id: Option<String>,

        /// Drop the SP-provided id.
        #[arg(long)]
        terminate: bool,
    },

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// A NameID given on the command line.
#[derive(Debug, Clone, Args)]
pub struct NameIdArgs {
    /// Identifier value.
    #[arg(long, default_value = "")]
    pub value: String,

    /// Format (short name or URI).
    #[arg(long)]
    pub format: Option<String>,

    /// Name qualifier.
    #[arg(long)]
    pub nq: Option<String>,

    /// SP name qualifier.
    #[arg(long)]
    pub sp: Option<String>,

    /// SP-provided id.
    #[arg(long)]
    pub sp_provided_id: Option<String>,
}

impl NameIdArgs {
    /// Builds the NameID.
    pub fn to_name_id(&self) -> NameId {
        NameId {
            value: self.value.clone(),
            format: self.format.as_deref().map(format_uri),
            name_qualifier: self.nq.clone(),
            sp_name_qualifier: self.sp.clone(),
            sp_provided_id: self.sp_provided_id.clone(),
        }
    }
}

/// A requester `NameIDPolicy` given on the command line.
#[derive(Debug, Clone, Args)]
pub struct PolicyArgs {
    /// Requested format (short name or URI).
    #[arg(long)]
    pub policy_format: Option<String>,

    /// Requested SP name qualifier.
    #[arg(long)]
    pub policy_sp: Option<String>,

    /// Send `AllowCreate="false"`.
    #[arg(long)]
    pub no_create: bool,
}

impl PolicyArgs {
    /// Returns true if no policy attribute was given.
    pub fn is_empty(&self) -> bool {
        self.policy_format.is_none() && self.policy_sp.is_none() && !self.no_create
    }

    /// Builds the policy.
    pub fn to_policy(&self) -> NameIdPolicy {
        NameIdPolicy {
            format: self.policy_format.as_deref().map(format_uri),
            sp_name_qualifier: self.policy_sp.clone(),
            allow_create: self.no_create.then_some(false),
        }
    }
}

/// Builds a Manage NameID request from the command-line flags.
pub fn manage_request(new_id: Option<String>, terminate: bool) -> ManageNameIdRequest {
    ManageNameIdRequest {
        new_id,
        new_encrypted_id: None,
        terminate,
    }
}

/// Expands a short format name to its URI; anything else is taken verbatim.
pub fn format_uri(name: &str) -> String {
    NameIdFormat::from_name(name)
        .map(|f| f.uri().to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,

    /// Print the configuration file path.
    Path,

    /// Write a configuration file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}
