//! Persisted embed settings (mll.toml)
//!
//! Typed view over the stored options plus the save flow: every field is
//! sanitized before it is stored, and an invalid widget configuration
//! override is rejected with the previous value kept.

mod fields;

pub use fields::{sanitize_base_path, sanitize_data_src, sanitize_timezone};

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use mll_sanitize::{sanitize_custom_css, sanitize_text_field};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{validate_and_normalize_config, ConfigResolver, ResolverOptions};
use crate::error::ValidationError;

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "mll.toml";

/// Error types for settings persistence
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Unknown setting '{0}'")]
    UnknownField(String),
}

/// Administrator-editable settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    DataSrc,
    GoogleKey,
    BasePath,
    Timezone,
    TsmlConfig,
    CustomCss,
}

impl SettingField {
    pub const ALL: [SettingField; 6] = [
        SettingField::DataSrc,
        SettingField::GoogleKey,
        SettingField::BasePath,
        SettingField::Timezone,
        SettingField::TsmlConfig,
        SettingField::CustomCss,
    ];

    /// Persisted key name
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingField::DataSrc => "data_src",
            SettingField::GoogleKey => "google_key",
            SettingField::BasePath => "base_path",
            SettingField::Timezone => "timezone",
            SettingField::TsmlConfig => "tsml_config",
            SettingField::CustomCss => "custom_css",
        }
    }
}

impl FromStr for SettingField {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownField(s.to_string()))
    }
}

impl std::fmt::Display for SettingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored embed settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Meeting data URL, or several separated by commas
    pub data_src: String,

    /// Maps API key passed to the widget
    pub google_key: String,

    /// Path segment the widget uses for pretty meeting URLs
    pub base_path: String,

    /// IANA timezone of the listed meetings
    pub timezone: String,

    /// Widget configuration override (canonical JSON or empty)
    pub tsml_config: String,

    /// Custom CSS emitted next to the widget
    pub custom_css: String,

    pub resolver: ResolverOptions,
}

impl Settings {
    /// Load and parse settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!(path = %path.display(), "settings file missing, using defaults");
            Ok(Self::default())
        }
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Stored value of `field`
    pub fn get(&self, field: SettingField) -> &str {
        match field {
            SettingField::DataSrc => &self.data_src,
            SettingField::GoogleKey => &self.google_key,
            SettingField::BasePath => &self.base_path,
            SettingField::Timezone => &self.timezone,
            SettingField::TsmlConfig => &self.tsml_config,
            SettingField::CustomCss => &self.custom_css,
        }
    }

    /// Sanitize `raw` for `field` and store it.
    ///
    /// Only the widget configuration override can be rejected; on rejection
    /// the stored value is left as it was.
    pub fn update(&mut self, field: SettingField, raw: &str) -> Result<(), ValidationError> {
        let value = match field {
            SettingField::DataSrc => sanitize_data_src(raw),
            SettingField::GoogleKey => sanitize_text_field(raw),
            SettingField::BasePath => sanitize_base_path(raw),
            SettingField::Timezone => sanitize_timezone(raw),
            SettingField::CustomCss => sanitize_custom_css(raw),
            SettingField::TsmlConfig => match validate_and_normalize_config(raw) {
                Ok(normalized) => normalized,
                Err(e) => {
                    warn!(field = %field, code = %e.code(), "rejected setting, keeping stored value");
                    return Err(e);
                }
            },
        };

        let slot = match field {
            SettingField::DataSrc => &mut self.data_src,
            SettingField::GoogleKey => &mut self.google_key,
            SettingField::BasePath => &mut self.base_path,
            SettingField::Timezone => &mut self.timezone,
            SettingField::TsmlConfig => &mut self.tsml_config,
            SettingField::CustomCss => &mut self.custom_css,
        };
        if *slot != value {
            info!(field = %field, "setting updated");
        }
        *slot = value;
        Ok(())
    }

    /// Resolver configured from the `[resolver]` table
    pub fn resolver(&self) -> ConfigResolver {
        ConfigResolver::new(self.resolver.clone())
    }
}

impl FromStr for Settings {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
