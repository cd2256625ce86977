//! Embed snippet rendering
//!
//! Produces the markup the external TSML UI script expects: an optional
//! custom style block, the `#tsml-ui` container, the effective configuration
//! under a fixed global, and finally the widget script itself.

use mll_sanitize::{esc_attr, json_for_script, sanitize_custom_css, sanitize_text_field};
use serde_json::Value;
use tracing::debug;

use crate::config::ConfigResolver;
use crate::settings::{sanitize_data_src, sanitize_timezone, Settings};

/// External widget script
pub const WIDGET_SCRIPT_URL: &str = "https://cdn.aws.bmlt.app/tsml.js";

/// Global the widget reads its configuration from
pub const CONFIG_GLOBAL: &str = "tsml_react_config";

/// Id of the container element the widget mounts into
pub const CONTAINER_ID: &str = "tsml-ui";

/// Id of the custom CSS style element
pub const CUSTOM_CSS_ID: &str = "tsml-ui-custom-css";

/// Render errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to serialize widget configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-embed attributes that take precedence over stored settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcodeAttrs {
    pub data_src: Option<String>,
    pub timezone: Option<String>,
}

impl ShortcodeAttrs {
    /// Data source for this embed: the attribute when it survives
    /// sanitization, the stored setting otherwise.
    pub fn effective_data_src(&self, settings: &Settings) -> String {
        self.data_src
            .as_deref()
            .map(sanitize_data_src)
            .filter(|src| !src.is_empty())
            .unwrap_or_else(|| settings.data_src.clone())
    }

    /// Timezone for this embed, same precedence as the data source
    pub fn effective_timezone(&self, settings: &Settings) -> String {
        self.timezone
            .as_deref()
            .map(sanitize_timezone)
            .filter(|tz| !tz.is_empty())
            .unwrap_or_else(|| settings.timezone.clone())
    }
}

/// Render the widget container.
///
/// `data-src` is always present; timezone, API key and base path only when set.
pub fn render_container(settings: &Settings, attrs: &ShortcodeAttrs) -> String {
    let mut html = format!(
        r#"<div id="{}" data-src="{}""#,
        CONTAINER_ID,
        esc_attr(&attrs.effective_data_src(settings))
    );

    let timezone = attrs.effective_timezone(settings);
    let google_key = sanitize_text_field(&settings.google_key);
    let optional = [
        ("data-timezone", timezone.as_str()),
        ("data-google", google_key.as_str()),
        ("data-path", settings.base_path.as_str()),
    ];
    for (name, value) in optional {
        if !value.is_empty() {
            html.push_str(&format!(r#" {}="{}""#, name, esc_attr(value)));
        }
    }

    html.push_str("></div>");
    html
}

/// Render the inline script that publishes `config` to the widget
pub fn render_config_script(config: &Value) -> Result<String, RenderError> {
    Ok(format!(
        "<script>window.{} = {};</script>",
        CONFIG_GLOBAL,
        json_for_script(config)?
    ))
}

/// Render the custom CSS block, re-sanitizing the stored CSS.
///
/// Returns an empty string when no CSS survives.
pub fn render_custom_css(css: &str) -> String {
    let css = sanitize_custom_css(css);
    if css.trim().is_empty() {
        return String::new();
    }
    format!(r#"<style id="{}">{}</style>"#, CUSTOM_CSS_ID, css)
}

/// Render the external widget script tag
pub fn render_widget_script() -> String {
    format!(r#"<script src="{}" async></script>"#, esc_attr(WIDGET_SCRIPT_URL))
}

/// Full embed for one page render
#[derive(Debug, Clone)]
pub struct Embed<'a> {
    settings: &'a Settings,
    resolver: ConfigResolver,
}

impl<'a> Embed<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            resolver: settings.resolver(),
        }
    }

    /// Effective widget configuration for `attrs`
    pub fn config(&self, attrs: &ShortcodeAttrs) -> Value {
        let data_src = attrs.effective_data_src(self.settings);
        self.resolver
            .resolve_config(Some(self.settings.tsml_config.as_str()), &data_src)
    }

    /// Render style, container, configuration and widget script, in that
    /// order, so the configuration exists before the widget runs.
    pub fn render(&self, attrs: &ShortcodeAttrs) -> Result<String, RenderError> {
        let config = self.config(attrs);
        let parts = [
            render_custom_css(&self.settings.custom_css),
            render_container(self.settings, attrs),
            render_config_script(&config)?,
            render_widget_script(),
        ];
        let html = parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        debug!(bytes = html.len(), "rendered embed");
        Ok(html)
    }
}
