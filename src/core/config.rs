//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::Project;

/// bomvault configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format
    pub default_format: Option<String>,

    /// Ask before deleting hierarchy nodes
    pub confirm_delete: Option<bool>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/bomvault/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Project config (.bomvault/config.yaml)
        if let Some(project) = project {
            let project_config_path = project.vault_dir().join("config.yaml");
            if project_config_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&project_config_path) {
                    if let Ok(project_config) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(project_config);
                    }
                }
            }
        }

        // 4. Environment variables
        if let Ok(format) = std::env::var("BOMVAULT_FORMAT") {
            config.default_format = Some(format);
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "bomvault")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.confirm_delete.is_some() {
            self.confirm_delete = other.confirm_delete;
        }
    }

    /// Whether destructive commands should prompt for confirmation
    pub fn confirm_delete(&self) -> bool {
        self.confirm_delete.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            default_format: Some("auto".into()),
            confirm_delete: Some(true),
        };
        base.merge(Config {
            default_format: Some("json".into()),
            confirm_delete: None,
        });
        assert_eq!(base.default_format.as_deref(), Some("json"));
        assert_eq!(base.confirm_delete, Some(true));
    }

    #[test]
    fn test_confirm_delete_defaults_on() {
        assert!(Config::default().confirm_delete());
    }
}
