//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/querytree/querytree.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `QUERYTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::DEFAULT_ROOT_LABEL;
use crate::util::path::expand_path;

/// Unified configuration for querytree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Seed file with the starting hierarchy (default: built-in tree)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<PathBuf>,
    /// Label of the root of the built-in tree
    pub root_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed_path: None,
            root_label: DEFAULT_ROOT_LABEL.to_string(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub seed_path: Option<PathBuf>,
    pub root_label: Option<String>,
}

/// Get the XDG config directory for querytree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "querytree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("querytree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(seed) = &self.seed_path {
            self.seed_path = Some(expand_path(seed));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            seed_path: overlay
                .seed_path
                .clone()
                .or_else(|| self.seed_path.clone()),
            root_label: overlay
                .root_label
                .clone()
                .unwrap_or_else(|| self.root_label.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional config file that overrides the global one
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(local_path) = local {
            if !local_path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local_path.display()),
                });
            }
            debug!(path = %local_path.display(), "loading local config");
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        current = Self::apply_env_overrides(current)?;

        // Expand ~ and $VAR in path-like fields
        current.expand_paths();

        Ok(current)
    }

    /// Apply QUERYTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("QUERYTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("seed_path") {
            settings.seed_path = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("root_label") {
            settings.root_label = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# querytree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/querytree/querytree.toml
#   Local:  file passed with --config
#   Env:    QUERYTREE_* environment variables

# Seed file with the starting hierarchy ([[nodes]] records or an [outline] table).
# Without it the built-in tree is used.
# seed_path = "~/queries.toml"

# Root label of the built-in tree
# root_label = "My Queries"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
