//! Configuration file loading for adprochk.
//!
//! Discovers and loads `adprochk.toml` from the working directory, or reads the
//! file named by `--config`. Values land in [`CheckSettings`].

use adprochk_core::settings::CheckSettings;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "adprochk.toml";

/// Top-level configuration from adprochk.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdprochkConfig {
    /// Archive layout.
    pub project: ProjectConfig,

    /// Repair behaviour.
    pub repair: RepairConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Name of the manifest entry.
    pub manifest_entry: String,

    /// Substring marking top-level program document entries.
    pub task_marker: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            manifest_entry: "program.prj".to_string(),
            task_marker: "task".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepairConfig {
    /// `<path>` of synthesized scheduler entries.
    pub default_node_path: String,

    /// Preferred container key for synthesized scheduler entries.
    pub container_key: String,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            default_node_path: "Run Every Scan".to_string(),
            container_key: "0".to_string(),
        }
    }
}

impl AdprochkConfig {
    /// Copy configured values into `settings`.
    pub fn apply_to(&self, settings: &mut CheckSettings) {
        settings.load.manifest_entry = self.project.manifest_entry.clone();
        settings.load.task_marker = self.project.task_marker.clone();
        settings.repair.default_node_path = self.repair.default_node_path.clone();
        settings.repair.container_key = self.repair.container_key.clone();
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.project.manifest_entry.trim().is_empty() {
            anyhow::bail!("project.manifest_entry must not be empty");
        }
        if self.project.task_marker.is_empty() {
            anyhow::bail!("project.task_marker must not be empty");
        }
        if self.repair.container_key.is_empty() {
            anyhow::bail!("repair.container_key must not be empty");
        }
        Ok(())
    }
}

/// Discover `adprochk.toml` in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<AdprochkConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<AdprochkConfig> {
    let config: AdprochkConfig = toml::from_str(contents).context("invalid TOML")?;
    config.validate()?;
    Ok(config)
}

/// Load the explicit config file, else the one discovered in `dir`, else defaults.
pub fn load_or_default(
    explicit: Option<&Utf8Path>,
    dir: &Utf8Path,
) -> anyhow::Result<AdprochkConfig> {
    match explicit.map(Utf8Path::to_path_buf).or_else(|| discover_config(dir)) {
        Some(path) => load_config(&path),
        None => Ok(AdprochkConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[project]
manifest_entry = "project.prj"
task_marker = "rll"

[repair]
default_node_path = "Run When Called"
container_key = "2"
"#;
        let config = parse_config(contents).unwrap();
        assert_eq!(config.project.manifest_entry, "project.prj");
        assert_eq!(config.project.task_marker, "rll");
        assert_eq!(config.repair.default_node_path, "Run When Called");
        assert_eq!(config.repair.container_key, "2");
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config = parse_config("[repair]\ncontainer_key = \"1\"\n").unwrap();
        assert_eq!(config.project.manifest_entry, "program.prj");
        assert_eq!(config.project.task_marker, "task");
        assert_eq!(config.repair.default_node_path, "Run Every Scan");
        assert_eq!(config.repair.container_key, "1");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(parse_config("[project]\nmanifest = \"x\"\n").is_err());
        assert!(parse_config("[policy]\nallow = []\n").is_err());
    }

    #[test]
    fn test_empty_marker_is_rejected() {
        let err = parse_config("[project]\ntask_marker = \"\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("task_marker"));
    }

    #[test]
    fn test_apply_to_settings() {
        let config = parse_config("[project]\nmanifest_entry = \"a.prj\"\n").unwrap();
        let mut settings = CheckSettings::new("in.adpro");
        config.apply_to(&mut settings);
        assert_eq!(settings.load.manifest_entry, "a.prj");
        assert_eq!(settings.repair.container_key, "0");
    }

    #[test]
    fn test_discover_and_explicit() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        assert!(discover_config(&dir).is_none());
        assert_eq!(
            load_or_default(None, &dir).unwrap().project.manifest_entry,
            "program.prj"
        );

        std::fs::write(dir.join(CONFIG_FILE_NAME), "[project]\ntask_marker = \"rll\"\n").unwrap();
        assert_eq!(load_or_default(None, &dir).unwrap().project.task_marker, "rll");

        let other = dir.join("other.toml");
        std::fs::write(&other, "[project]\ntask_marker = \"prog\"\n").unwrap();
        assert_eq!(
            load_or_default(Some(&other), &dir).unwrap().project.task_marker,
            "prog"
        );
        assert!(load_or_default(Some(&dir.join("missing.toml")), &dir).is_err());
    }
}
