//! NameID mapping and management requests.

use crate::cli::{manage_request, NameIdArgs, PolicyArgs};
use crate::config::OutputFormat;
use crate::output::output_single;

use super::Db;

/// Answers a NameID mapping request.
pub async fn run_map(
    db: &Db,
    name_id: &NameIdArgs,
    policy: &PolicyArgs,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let mapped = db
        .handle_name_id_mapping_request(&name_id.to_name_id(), &policy.to_policy())
        .await?;
    output_single(&mapped, output_format)
}

/// Answers a Manage NameID request.
pub async fn run_manage(
    db: &Db,
    name_id: &NameIdArgs,
    new_id: Option<String>,
    terminate: bool,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let request = manage_request(new_id, terminate);
    let updated = db
        .handle_manage_name_id_request(&name_id.to_name_id(), &request)
        .await?;
    output_single(&updated, output_format)
}
