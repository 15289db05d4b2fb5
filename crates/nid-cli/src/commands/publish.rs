//! Published-NameID commands.

use crate::cli::NameIdArgs;
use crate::config::OutputFormat;
use crate::output::{output_single, success};
use crate::CliError;

use super::Db;

/// Records the NameID last published to a relying party.
pub async fn run_publish(
    db: &Db,
    local_id: &str,
    relying_party: &str,
    name_id: &NameIdArgs,
) -> crate::CliResult<()> {
    db.publish(local_id, relying_party, &name_id.to_name_id())
        .await?;
    success(&format!("Recorded NameID published to {relying_party}"));
    Ok(())
}

/// Prints the NameID last published to a relying party.
pub async fn run_published(
    db: &Db,
    local_id: &str,
    relying_party: &str,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let name_id = db
        .published(local_id, relying_party)
        .await?
        .ok_or_else(|| CliError::NotFound {
            resource_type: "published NameID".to_string(),
            id: format!("{local_id}:{relying_party}"),
        })?;
    output_single(&name_id, output_format)
}
