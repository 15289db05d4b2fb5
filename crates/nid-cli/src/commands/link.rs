//! Issuance, lookup and removal commands.

use nid_core::Config;
use nid_ident::{ConstructRequest, StaticLocalPolicy};

use crate::cli::{format_uri, NameIdArgs, PolicyArgs};
use crate::config::OutputFormat;
use crate::output::{info, output, output_single, success};
use crate::CliError;

use super::Db;

/// Issues a NameID of an explicit format.
pub async fn run_issue(
    db: &Db,
    local_id: &str,
    format: &str,
    sp: Option<&str>,
    nq: Option<&str>,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let nq = nq.or_else(|| db.config().name_qualifier());
    let name_id = db.get_nameid(local_id, &format_uri(format), sp, nq).await?;
    output_single(&name_id, output_format)
}

/// Issues a NameID with the format taken from the requester or local policy.
pub async fn run_construct(
    db: &Db,
    config: &Config,
    local_id: &str,
    sp: Option<&str>,
    nq: Option<&str>,
    policy: &PolicyArgs,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let local_policy = StaticLocalPolicy::from(&config.policy);
    let requested = (!policy.is_empty()).then(|| policy.to_policy());

    let request = ConstructRequest {
        local_policy: Some(&local_policy),
        sp_name_qualifier: sp,
        name_id_policy: requested.as_ref(),
        name_qualifier: nq,
    };
    let name_id = db.construct_nameid(local_id, &request).await?;
    output_single(&name_id, output_format)
}

/// Prints the local id a NameID is linked to.
pub async fn run_find(db: &Db, name_id: &NameIdArgs) -> crate::CliResult<()> {
    let name_id = name_id.to_name_id();
    match db.find_local_id(&name_id).await? {
        Some(local_id) => {
            println!("{local_id}");
            Ok(())
        }
        None => Err(CliError::NotFound {
            resource_type: "NameID".to_string(),
            id: nid_ident::token::encode(&name_id),
        }),
    }
}

/// Prints the first non-transient NameID of a local id with matching qualifiers.
pub async fn run_match(
    db: &Db,
    local_id: &str,
    sp: Option<&str>,
    nq: Option<&str>,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    match db.match_local_id(local_id, sp, nq).await? {
        Some(name_id) => output_single(&name_id, output_format),
        None => Err(CliError::NotFound {
            resource_type: "matching NameID".to_string(),
            id: local_id.to_string(),
        }),
    }
}

/// Lists every NameID linked to a local id.
pub async fn run_list(db: &Db, local_id: &str, output_format: OutputFormat) -> crate::CliResult<()> {
    let name_ids = db.links().name_ids(local_id).await?;
    output(&name_ids, output_format)
}

/// Unlinks everything issued to a local id.
pub async fn run_remove_local(db: &Db, local_id: &str) -> crate::CliResult<()> {
    let count = db.links().tokens(local_id).await?.len();
    db.remove_local(local_id).await?;
    if count == 0 {
        info(&format!("Nothing linked to {local_id}"));
    } else {
        success(&format!("Removed {count} NameID(s) linked to {local_id}"));
    }
    Ok(())
}

/// Unlinks one NameID.
pub async fn run_remove_remote(db: &Db, name_id: &NameIdArgs) -> crate::CliResult<()> {
    match db.links().remove_remote(&name_id.to_name_id()).await? {
        Some(owner) => success(&format!("Unlinked NameID from {owner}")),
        None => info("NameID was not linked"),
    }
    Ok(())
}
