//! Engine configuration file support.
//!
//! Reads engine configuration from a TOML file (`engine.toml`): which
//! repository backend to use plus the tunables for derived views.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Engine configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub engine: EngineSettings,
}

/// Repository backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Tunables for derived schedule views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Weeks covered by the utilization grid.
    #[serde(default = "default_horizon_weeks")]
    pub horizon_weeks: usize,
    /// Padding on each side of the Gantt window, in days.
    #[serde(default = "default_layout_margin_days")]
    pub layout_margin_days: i64,
}

fn default_horizon_weeks() -> usize {
    crate::services::capacity::DEFAULT_HORIZON_WEEKS
}

fn default_layout_margin_days() -> i64 {
    crate::services::layout::DEFAULT_WINDOW_MARGIN_DAYS
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            horizon_weeks: default_horizon_weeks(),
            layout_margin_days: default_layout_margin_days(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` if successful
    /// * `Err(RepositoryError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// Searches for `engine.toml` in the current directory, then the parent
    /// directory.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = vec![
            PathBuf::from("engine.toml"),
            PathBuf::from("../engine.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::ConfigurationError(
            "No engine.toml found in standard locations".to_string(),
        ))
    }

    /// The configured repository backend.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_local_config_with_engine_settings() {
        let toml = r#"
[repository]
type = "local"

[engine]
horizon_weeks = 8
layout_margin_days = 14
"#;

        let config: EngineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.engine.horizon_weeks, 8);
        assert_eq!(config.engine.layout_margin_days, 14);
    }

    #[test]
    fn engine_section_defaults_when_omitted() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config: EngineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.engine.horizon_weeks, 12);
        assert_eq!(config.engine.layout_margin_days, 30);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let toml = r#"
[repository]
type = "oracle"
"#;

        let config: EngineConfig = toml::from_str(toml).unwrap();
        assert!(config.repository_type().is_err());
    }

    #[test]
    fn from_file_reads_a_real_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[repository]\ntype = \"local\"\n\n[engine]\nhorizon_weeks = 6\n"
        )
        .unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.engine.horizon_weeks, 6);
        assert_eq!(config.engine.layout_margin_days, 30);
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let result = EngineConfig::from_file("/nonexistent/engine.toml");
        assert!(matches!(
            result,
            Err(RepositoryError::ConfigurationError(_))
        ));
    }
}
