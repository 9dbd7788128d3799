//! Configuration management for bulmaform.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use bulmaform_rows::contract::{DESTROY_MARKER, DESTROY_VALUE, HIDDEN_CLASS, SENTINEL};
use bulmaform_rows::{InsertPosition, RowSettings};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "bulmaform";

/// Environment variable prefix. Nested keys are separated by a double underscore.
const ENV_PREFIX: &str = "BULMAFORM_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `BULMAFORM_`, e.g. `BULMAFORM_NESTED__SENTINEL`)
/// 2. TOML config file at `~/.config/bulmaform/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server-side nested-fields configuration.
    pub nested: NestedConfig,
    /// Client-side row behavior configuration.
    pub rows: RowsConfig,
    /// Optional features of the rendering environment.
    pub capabilities: Capabilities,
}

/// Nested-fields template configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestedConfig {
    /// Placeholder used as the record index inside row templates.
    pub sentinel: String,
    /// Name of the hidden destruction flag field.
    pub destroy_field: String,
    /// Suffix of template element ids (`{object}_{association}_{suffix}`).
    pub template_suffix: String,
}

/// Row behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowsConfig {
    /// Class added to rows marked for destruction.
    pub hidden_class: String,
    /// Value written into the destruction flag field.
    pub destroy_value: String,
    /// Insertion position used when an add button does not name one.
    pub default_position: String,
}

/// Capabilities of the page the markup is rendered into.
///
/// These are declared rather than detected: the renderer never probes for icon fonts or
/// event listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Render icon spans (an icon font is loaded).
    pub icons: bool,
    /// Announce row events after deletes.
    pub row_events: bool,
}

impl Default for NestedConfig {
    fn default() -> Self {
        Self {
            sentinel: SENTINEL.to_string(),
            destroy_field: DESTROY_MARKER.to_string(),
            template_suffix: "fields_template".to_string(),
        }
    }
}

impl Default for RowsConfig {
    fn default() -> Self {
        Self {
            hidden_class: HIDDEN_CLASS.to_string(),
            destroy_value: DESTROY_VALUE.to_string(),
            default_position: InsertPosition::default().to_string(),
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            icons: true,
            row_events: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `BULMAFORM_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let sentinel = Regex::new(r"^[A-Z][A-Z0-9_]{3,}$")
            .map_err(|e| Error::internal(format!("sentinel pattern: {e}")))?;
        if !sentinel.is_match(&self.nested.sentinel) {
            return Err(Error::config_validation(format!(
                "sentinel '{}' must be at least 4 uppercase letters, digits or underscores, starting with a letter",
                self.nested.sentinel
            )));
        }

        let identifier = Regex::new(r"^[a-z_][a-z0-9_-]*$")
            .map_err(|e| Error::internal(format!("identifier pattern: {e}")))?;
        for (key, value) in [
            ("nested.destroy_field", &self.nested.destroy_field),
            ("nested.template_suffix", &self.nested.template_suffix),
            ("rows.hidden_class", &self.rows.hidden_class),
        ] {
            if !identifier.is_match(value) {
                return Err(Error::config_validation(format!(
                    "{key} '{value}' must be a lowercase identifier"
                )));
            }
        }

        if self.rows.destroy_value.is_empty() {
            return Err(Error::config_validation(
                "rows.destroy_value must not be empty",
            ));
        }

        self.default_position()?;
        Ok(())
    }

    /// The configured default insertion position.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is not one of the four insertion positions.
    pub fn default_position(&self) -> Result<InsertPosition> {
        self.rows.default_position.parse().map_err(|_| {
            Error::config_validation(format!(
                "rows.default_position '{}' must be one of beforebegin, afterbegin, beforeend, afterend",
                self.rows.default_position
            ))
        })
    }

    /// Settings for the client-side row behaviors.
    #[must_use]
    pub fn row_settings(&self) -> RowSettings {
        RowSettings {
            sentinel: self.nested.sentinel.clone(),
            destroy_marker: self.nested.destroy_field.clone(),
            hidden_class: self.rows.hidden_class.clone(),
            destroy_value: self.rows.destroy_value.clone(),
            announce: self.capabilities.row_events,
        }
    }
}
