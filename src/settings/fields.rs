//! Per-field save-time sanitizers

use std::sync::OnceLock;

use mll_sanitize::sanitize_text_field;
use regex_lite::Regex;

fn source_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:(?i:https?)://[^\s/?#]+[^\s]*|/[^\s/][^\s]*|/)$")
            .unwrap_or_else(|e| panic!("data source pattern is invalid: {e}"))
    })
}

fn timezone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_+\-]*(?:/[A-Za-z0-9_+\-]+)*$")
            .unwrap_or_else(|e| panic!("timezone pattern is invalid: {e}"))
    })
}

/// Data source: one URL or a comma-separated list.
///
/// Entries that are neither `http(s)://` URLs nor root-relative paths are
/// dropped.
pub fn sanitize_data_src(input: &str) -> String {
    sanitize_text_field(input)
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty() && source_pattern().is_match(entry))
        .collect::<Vec<_>>()
        .join(",")
}

/// Base path: a URL path segment such as `meetings` or `find/meetings`.
pub fn sanitize_base_path(input: &str) -> String {
    let filtered: String = sanitize_text_field(input)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/'))
        .collect();
    filtered
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Timezone: an IANA name (`America/New_York`, `UTC`), otherwise empty.
pub fn sanitize_timezone(input: &str) -> String {
    let tz = sanitize_text_field(input);
    if timezone_pattern().is_match(&tz) {
        tz
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_src_single() {
        let src = "https://bmlt.example.org/main_server/client_interface/json/?switcher=GetSearchResults&services=1";
        assert_eq!(sanitize_data_src(src), src);
    }

    #[test]
    fn test_data_src_list() {
        assert_eq!(
            sanitize_data_src(" https://a.example/x.json , ,HTTP://b.example/y.json"),
            "https://a.example/x.json,HTTP://b.example/y.json"
        );
    }

    #[test]
    fn test_data_src_relative() {
        assert_eq!(
            sanitize_data_src("/wp-admin/admin-ajax.php?action=meetings"),
            "/wp-admin/admin-ajax.php?action=meetings"
        );
    }

    #[test]
    fn test_data_src_rejects_schemes() {
        assert_eq!(sanitize_data_src("javascript:alert(1)"), "");
        assert_eq!(sanitize_data_src("//evil.example/x.json"), "");
        assert_eq!(
            sanitize_data_src("data:text/html,x,https://ok.example/m.json"),
            "https://ok.example/m.json"
        );
    }

    #[test]
    fn test_data_src_strips_markup() {
        assert_eq!(
            sanitize_data_src("<b>https://a.example/x.json</b>"),
            "https://a.example/x.json"
        );
    }

    #[test]
    fn test_base_path() {
        assert_eq!(sanitize_base_path("/meetings/"), "meetings");
        assert_eq!(sanitize_base_path("find//meetings"), "find/meetings");
        assert_eq!(sanitize_base_path("meetings?x=1"), "meetingsx1");
        assert_eq!(sanitize_base_path("<b>meetings</b>"), "meetings");
        assert_eq!(sanitize_base_path("  "), "");
    }

    #[test]
    fn test_timezone() {
        assert_eq!(sanitize_timezone(" America/New_York "), "America/New_York");
        assert_eq!(sanitize_timezone("America/Argentina/Buenos_Aires"), "America/Argentina/Buenos_Aires");
        assert_eq!(sanitize_timezone("Etc/GMT+5"), "Etc/GMT+5");
        assert_eq!(sanitize_timezone("UTC"), "UTC");
        assert_eq!(sanitize_timezone("America/New York\"><x"), "");
        assert_eq!(sanitize_timezone(""), "");
    }
}
