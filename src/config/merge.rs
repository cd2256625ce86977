//! Configuration overlay
//!
//! Merge rules for laying an override onto a default configuration:
//! - Objects: deep-merge by key
//! - Arrays: REPLACE (override wins)
//! - Scalars and null: override wins

use serde_json::Value;

/// Deep merge `overlay` onto `base`.
///
/// Merge semantics:
/// - Both objects: deep-merge by key (recursive)
/// - Keys present on one side only pass through unchanged
/// - Anything else: the overlay value replaces the base value entirely,
///   including null, arrays, and object/scalar mismatches in either direction
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }

        (_, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_override() {
        let base = json!({"show": {"listControls": true}});
        let overlay = json!({"show": {"listControls": false}});
        let result = deep_merge(base, overlay);
        assert_eq!(result["show"]["listControls"], false);
    }

    #[test]
    fn test_nested_strings_merge() {
        let base = json!({
            "strings": {
                "en": {
                    "types": {"BT": "Basic Text", "JFT": "Just For Today"},
                    "type_descriptions": {"O": null, "C": null}
                }
            }
        });
        let overlay = json!({
            "strings": {
                "en": {
                    "types": {"BT": "Basic Text Study"}
                }
            }
        });
        let result = deep_merge(base, overlay);

        assert_eq!(result["strings"]["en"]["types"]["BT"], "Basic Text Study");
        assert_eq!(result["strings"]["en"]["types"]["JFT"], "Just For Today");
        assert!(result["strings"]["en"]["type_descriptions"]["O"].is_null());
    }

    #[test]
    fn test_override_replaces_null() {
        let base = json!({"type_descriptions": {"O": null}});
        let overlay = json!({"type_descriptions": {"O": "Open to all"}});
        let result = deep_merge(base, overlay);
        assert_eq!(result["type_descriptions"]["O"], "Open to all");
    }

    #[test]
    fn test_null_override() {
        let base = json!({"title": "Meetings"});
        let overlay = json!({"title": null});
        let result = deep_merge(base, overlay);
        assert!(result["title"].is_null());
    }

    #[test]
    fn test_scalar_replaces_object() {
        let base = json!({"map": {"tiles": {"url": "https://tiles.example"}}});
        let overlay = json!({"map": false});
        let result = deep_merge(base, overlay);
        assert_eq!(result["map"], false);
    }

    #[test]
    fn test_object_replaces_scalar() {
        let base = json!({"map": false});
        let overlay = json!({"map": {"zoom": 12}});
        let result = deep_merge(base, overlay);
        assert_eq!(result["map"], json!({"zoom": 12}));
    }

    #[test]
    fn test_array_replace() {
        let base = json!({"weekdays": ["Sunday", "Monday", "Tuesday"]});
        let overlay = json!({"weekdays": ["Domingo"]});
        let result = deep_merge(base, overlay);
        assert_eq!(result["weekdays"], json!(["Domingo"]));
    }

    #[test]
    fn test_add_new_key() {
        let base = json!({"a": 1});
        let overlay = json!({"b": {"c": 2}});
        let result = deep_merge(base, overlay);

        assert_eq!(result["a"], 1);
        assert_eq!(result["b"]["c"], 2);
    }

    #[test]
    fn test_empty_overlay_is_identity() {
        let base = json!({"strings": {"en": {"types": {"BT": "Basic Text"}}}});
        assert_eq!(deep_merge(base.clone(), json!({})), base);
    }
}
