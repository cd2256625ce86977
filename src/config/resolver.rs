//! Configuration resolver
//!
//! Render time fails open: a malformed stored override is ignored and the
//! default profile is used. Save time fails closed: the override must parse
//! before it is persisted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::defaults::{DefaultProfile, DEFAULT_EXTENDED_MARKER};
use super::effective::{override_digest, EffectiveConfig, OverrideStatus};
use super::merge::deep_merge;
use crate::error::ValidationError;

/// Resolver settings (`[resolver]` table of the settings file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    /// Substring of the data source that selects the extended profile
    #[serde(default = "default_extended_marker")]
    pub extended_marker: String,
}

fn default_extended_marker() -> String {
    DEFAULT_EXTENDED_MARKER.to_string()
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            extended_marker: default_extended_marker(),
        }
    }
}

/// Computes the effective widget configuration for a render
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    options: ResolverOptions,
}

impl ConfigResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    /// Default profile for `data_source`
    pub fn profile_for(&self, data_source: &str) -> DefaultProfile {
        DefaultProfile::select(data_source, &self.options.extended_marker)
    }

    /// Resolve the configuration object handed to the widget.
    ///
    /// Never fails: an absent, empty or malformed override yields the
    /// selected default unchanged.
    pub fn resolve_config(&self, raw_override: Option<&str>, data_source: &str) -> Value {
        self.explain(raw_override, data_source).into_value()
    }

    /// Resolve and report provenance
    pub fn explain(&self, raw_override: Option<&str>, data_source: &str) -> EffectiveConfig {
        let profile = self.profile_for(data_source);
        debug!(profile = profile.as_str(), "selected default widget configuration");
        let defaults = profile.to_value();

        let raw = match raw_override {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                return EffectiveConfig {
                    profile,
                    override_status: OverrideStatus::Absent,
                    override_digest: None,
                    config: defaults,
                };
            }
        };

        let digest = override_digest(raw);
        match parse_override(raw) {
            Ok(overlay) => EffectiveConfig {
                profile,
                override_status: OverrideStatus::Applied,
                override_digest: Some(digest),
                config: deep_merge(defaults, Value::Object(overlay)),
            },
            Err(e) => {
                warn!(error = %e, digest = %digest, "ignoring stored widget configuration override");
                EffectiveConfig {
                    profile,
                    override_status: OverrideStatus::Discarded,
                    override_digest: Some(digest),
                    config: defaults,
                }
            }
        }
    }
}

/// Resolve with the default marker. See [`ConfigResolver::resolve_config`].
pub fn resolve_config(raw_override: Option<&str>, data_source: &str) -> Value {
    ConfigResolver::default().resolve_config(raw_override, data_source)
}

/// Validate an override before it is saved and return its canonical form.
///
/// Whitespace-only input means "no override" and normalizes to `""`.
/// Anything else must be a JSON object; it is re-serialized with sorted keys,
/// four-space indentation and unescaped forward slashes.
pub fn validate_and_normalize_config(input: &str) -> Result<String, ValidationError> {
    if input.trim().is_empty() {
        return Ok(String::new());
    }
    let parsed = parse_override(input)?;
    to_canonical_json(&Value::Object(parsed))
}

fn parse_override(raw: &str) -> Result<Map<String, Value>, ValidationError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ValidationError::InvalidJson(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn to_canonical_json(value: &Value) -> Result<String, ValidationError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| ValidationError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BMLT_SRC: &str = "https://x/client_interface/json/?switcher=GetSearchResults";
    const SHEET_SRC: &str = "https://sheets.example.com/a.json";

    #[test]
    fn test_empty_override_returns_default() {
        for src in [BMLT_SRC, SHEET_SRC, ""] {
            let expected = DefaultProfile::select(src, DEFAULT_EXTENDED_MARKER).to_value();
            assert_eq!(resolve_config(Some(""), src), expected);
            assert_eq!(resolve_config(Some("  \n"), src), expected);
            assert_eq!(resolve_config(None, src), expected);
        }
    }

    #[test]
    fn test_malformed_override_returns_default() {
        assert_eq!(
            resolve_config(Some("{not json"), BMLT_SRC),
            DefaultProfile::Extended.to_value()
        );
        assert_eq!(
            resolve_config(Some("{\"a\":1,}"), SHEET_SRC),
            DefaultProfile::Minimal.to_value()
        );
    }

    #[test]
    fn test_non_object_override_returns_default() {
        assert_eq!(resolve_config(Some("[1,2]"), SHEET_SRC), DefaultProfile::Minimal.to_value());
        assert_eq!(resolve_config(Some("42"), SHEET_SRC), DefaultProfile::Minimal.to_value());
    }

    #[test]
    fn test_profile_selection() {
        let extended = resolve_config(None, BMLT_SRC);
        assert_eq!(extended["strings"]["en"]["types"]["BT"], "Basic Text");

        let minimal = resolve_config(None, SHEET_SRC);
        assert!(minimal["strings"]["en"].get("types").is_none());
        assert!(minimal["strings"]["en"]["type_descriptions"]["O"].is_null());
    }

    #[test]
    fn test_override_merges_onto_default() {
        let raw = r#"{"strings":{"en":{"types":{"BT":"Basic Text Study"},"type_descriptions":{"O":"Everyone welcome"}}},"show":{"listControls":false}}"#;
        let result = resolve_config(Some(raw), BMLT_SRC);

        assert_eq!(result["strings"]["en"]["types"]["BT"], "Basic Text Study");
        assert_eq!(result["strings"]["en"]["types"]["JFT"], "Just For Today");
        assert_eq!(result["strings"]["en"]["type_descriptions"]["O"], "Everyone welcome");
        assert!(result["strings"]["en"]["type_descriptions"]["C"]
            .as_str()
            .unwrap()
            .starts_with("Closed"));
        assert_eq!(result["show"]["listControls"], false);
    }

    #[test]
    fn test_override_replaces_nested_with_scalar() {
        let result = resolve_config(Some(r#"{"strings":{"en":null}}"#), BMLT_SRC);
        assert!(result["strings"]["en"].is_null());
    }

    #[test]
    fn test_custom_marker() {
        let resolver = ConfigResolver::new(ResolverOptions {
            extended_marker: "sheets.example.com".to_string(),
        });
        assert_eq!(resolver.profile_for(SHEET_SRC), DefaultProfile::Extended);
        assert_eq!(resolver.profile_for(BMLT_SRC), DefaultProfile::Minimal);
    }

    #[test]
    fn test_explain_statuses() {
        let resolver = ConfigResolver::default();

        let absent = resolver.explain(None, SHEET_SRC);
        assert_eq!(absent.override_status, OverrideStatus::Absent);
        assert!(absent.override_digest.is_none());

        let applied = resolver.explain(Some(r#"{"a":1}"#), SHEET_SRC);
        assert_eq!(applied.override_status, OverrideStatus::Applied);
        assert!(applied.override_digest.is_some());
        assert_eq!(applied.config["a"], 1);

        let discarded = resolver.explain(Some("{oops"), BMLT_SRC);
        assert_eq!(discarded.override_status, OverrideStatus::Discarded);
        assert_eq!(discarded.profile, DefaultProfile::Extended);
        assert_eq!(discarded.config, DefaultProfile::Extended.to_value());
    }

    #[test]
    fn test_validate_empty() {
        assert_eq!(validate_and_normalize_config("").unwrap(), "");
        assert_eq!(validate_and_normalize_config(" \t\n").unwrap(), "");
    }

    #[test]
    fn test_validate_trailing_comma() {
        let err = validate_and_normalize_config("{\"a\":1,}").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidJson(_)));
        assert_eq!(err.field(), "tsml_config");
    }

    #[test]
    fn test_validate_rejects_non_object() {
        let err = validate_and_normalize_config("[1]").unwrap_err();
        assert!(err.to_string().contains("an array"));
        assert!(validate_and_normalize_config("null").is_err());
    }

    #[test]
    fn test_normalized_form() {
        let out = validate_and_normalize_config(r#"{"b":{"url":"https://x/y"},"a":1}"#).unwrap();
        assert_eq!(
            out,
            "{\n    \"a\": 1,\n    \"b\": {\n        \"url\": \"https://x/y\"\n    }\n}"
        );
    }

    #[test]
    fn test_normalize_round_trip() {
        let once = validate_and_normalize_config(
            r#"{"strings":{"en":{"types":{"BT":"Basic Text"}}},"zoom":1.5,"list":[1,true,null]}"#,
        )
        .unwrap();
        let twice = validate_and_normalize_config(&once).unwrap();
        assert_eq!(once, twice);

        let a: Value = serde_json::from_str(&once).unwrap();
        assert_eq!(a["strings"]["en"]["types"]["BT"], json!("Basic Text"));
    }
}
