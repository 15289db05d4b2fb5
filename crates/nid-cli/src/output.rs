//! Output formatting utilities.

use colored::Colorize;
use nid_saml::NameId;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// NameID representation for display.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct NameIdDisplay {
    /// Identifier value.
    pub value: String,
    /// Format URI.
    pub format: String,
    /// Name qualifier.
    #[tabled(rename = "NameQualifier")]
    pub name_qualifier: String,
    /// SP name qualifier.
    #[tabled(rename = "SPNameQualifier")]
    pub sp_name_qualifier: String,
    /// SP-provided id.
    #[tabled(rename = "SPProvidedID")]
    pub sp_provided_id: String,
}

impl From<&NameId> for NameIdDisplay {
    fn from(name_id: &NameId) -> Self {
        Self {
            value: or_dash(Some(&name_id.value)),
            format: or_dash(name_id.format.as_ref()),
            name_qualifier: or_dash(name_id.name_qualifier.as_ref()),
            sp_name_qualifier: or_dash(name_id.sp_name_qualifier.as_ref()),
            sp_provided_id: or_dash(name_id.sp_provided_id.as_ref()),
        }
    }
}

fn or_dash(value: Option<&String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| "-".to_string())
}

/// Outputs NameIDs in the specified format.
pub fn output(data: &[NameId], format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                info("No results found.");
            } else {
                let rows: Vec<NameIdDisplay> = data.iter().map(NameIdDisplay::from).collect();
                let table = Table::new(rows).with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Outputs a single NameID.
pub fn output_single(item: &NameId, format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => output(std::slice::from_ref(item), format),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item)?;
            println!("{json}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use nid_saml::NameIdFormat;

    use super::*;

    #[test]
    fn display_row_uses_dashes_for_missing_attributes() {
        let display = NameIdDisplay::from(&NameId::new("").with_format(NameIdFormat::Transient));
        assert_eq!(display.value, "-");
        assert_eq!(display.format, NameIdFormat::Transient.uri());
        assert_eq!(display.sp_provided_id, "-");

        let table = Table::new([display]).to_string();
        assert!(table.contains("SPNameQualifier"));
    }
}
