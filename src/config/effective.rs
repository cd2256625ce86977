//! Effective configuration with provenance
//!
//! Besides the merged object handed to the widget, records which default
//! profile was used and what happened to the stored override.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::defaults::DefaultProfile;

/// What happened to the stored override during resolution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverrideStatus {
    /// No override stored (empty or whitespace)
    Absent,
    /// Override parsed and merged onto the default
    Applied,
    /// Override failed to parse and was ignored
    Discarded,
}

/// Effective widget configuration with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Default profile the override was laid onto
    pub profile: DefaultProfile,

    pub override_status: OverrideStatus,

    /// SHA-256 of the raw override text (None when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_digest: Option<String>,

    /// The merged configuration object
    pub config: Value,
}

impl EffectiveConfig {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.config;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Drop provenance, keeping only the object handed to the widget
    pub fn into_value(self) -> Value {
        self.config
    }
}

/// Hex SHA-256 of raw override bytes
pub(crate) fn override_digest(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
