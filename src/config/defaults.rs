//! Built-in default widget configurations
//!
//! Two profiles exist. Data sources served by a BMLT root server get the
//! extended profile, which supplies NA meeting-format labels and open/closed
//! descriptions. Every other source gets the minimal profile, which leaves
//! those texts to the widget.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Marker substring identifying the BMLT root-server JSON endpoint family
pub const DEFAULT_EXTENDED_MARKER: &str = "client_interface/json";

/// Meeting format codes and their labels for the extended profile
const MEETING_TYPES: &[(&str, &str)] = &[
    ("B", "Beginners"),
    ("BL", "Bi-Lingual"),
    ("BT", "Basic Text"),
    ("CAN", "Candlelight"),
    ("CW", "Children Welcome"),
    ("D", "Discussion/Participation"),
    ("GL", "Gay/Lesbian/Transgender"),
    ("GP", "Guiding Principles"),
    ("IP", "Informational Pamphlet"),
    ("IW", "It Works -How and Why"),
    ("JFT", "Just For Today"),
    ("LC", "Living Clean"),
    ("LIT", "Literature"),
    ("M", "Men"),
    ("NC", "No Children"),
    ("QA", "Question and Answer"),
    ("SD", "Speaker/Discussion"),
    ("SG", "Step Working Guide"),
    ("SPAD", "A Spiritual Principle a Day"),
    ("St", "Step"),
    ("TC", "Temporarily Closed"),
    ("To", "Topic"),
    ("Tr", "Tradition"),
    ("VM", "Virtual Meeting"),
    ("W", "Women"),
    ("WC", "Wheelchair Accessible"),
    ("YP", "Young People"),
];

const OPEN_DESCRIPTION: &str =
    "This meeting is open to addicts and non-addicts alike. All are welcome.";

const CLOSED_DESCRIPTION: &str =
    "Closed NA meetings are for addicts only, or those who think they may have a problem with drugs.";

/// Which built-in default configuration applies to a data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultProfile {
    /// Widget built-in texts
    Minimal,
    /// NA meeting-format labels and open/closed descriptions
    Extended,
}

impl DefaultProfile {
    /// Select the profile for `data_source`.
    ///
    /// The data source is never parsed; it only has to contain `marker`.
    /// An empty marker disables the extended profile.
    pub fn select(data_source: &str, marker: &str) -> Self {
        if !marker.is_empty() && data_source.contains(marker) {
            DefaultProfile::Extended
        } else {
            DefaultProfile::Minimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultProfile::Minimal => "minimal",
            DefaultProfile::Extended => "extended",
        }
    }

    /// Materialize the default configuration object
    pub fn to_value(&self) -> Value {
        match self {
            DefaultProfile::Minimal => json!({
                "strings": {
                    "en": {
                        "type_descriptions": {
                            "O": null,
                            "C": null
                        }
                    }
                }
            }),
            DefaultProfile::Extended => {
                let types: Map<String, Value> = MEETING_TYPES
                    .iter()
                    .map(|(code, label)| (code.to_string(), Value::String(label.to_string())))
                    .collect();
                json!({
                    "strings": {
                        "en": {
                            "types": types,
                            "type_descriptions": {
                                "O": OPEN_DESCRIPTION,
                                "C": CLOSED_DESCRIPTION
                            }
                        }
                    }
                })
            }
        }
    }
}

impl std::fmt::Display for DefaultProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
