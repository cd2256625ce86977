//! Meeting List Lite - TSML UI embed
//!
//! This crate renders the embed snippet for the hosted TSML UI meeting-list
//! widget and resolves the configuration object the widget reads: a default
//! picked by data source with the administrator's JSON override merged on top.

pub mod config;
pub mod error;
pub mod render;
pub mod settings;

pub use config::{
    resolve_config, validate_and_normalize_config, ConfigResolver, DefaultProfile,
    EffectiveConfig, ResolverOptions,
};
pub use error::{ValidationCode, ValidationError, ValidationFailure};
pub use render::{Embed, ShortcodeAttrs};
pub use settings::{SettingField, Settings, SettingsError};

pub use mll_sanitize::sanitize_custom_css;
