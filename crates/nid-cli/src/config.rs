//! CLI configuration.

use std::path::{Path, PathBuf};

use nid_core::Config;

/// Configuration for the `nid` tool: the service configuration plus the file
/// it was read from.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Where the configuration lives.
    pub path: PathBuf,
    /// Service configuration.
    pub config: Config,
}

impl CliConfig {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: Option<&Path>) -> crate::CliResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let config = if path.exists() {
            Config::load(&path)?
        } else {
            Config::default()
        };
        Ok(Self { path, config })
    }

    /// Saves configuration to its file.
    pub fn save(&self) -> crate::CliResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, self.config.to_toml_string()?)?;
        Ok(())
    }

    /// Gets the default configuration file path.
    pub fn default_path() -> crate::CliResult<PathBuf> {
        let home = dirs_next::home_dir().ok_or_else(|| {
            crate::CliError::Config("could not determine home directory".to_string())
        })?;
        Ok(home.join(".nameid").join("nid.toml"))
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}
