//! Output escaping for HTML attributes, text and inline scripts.

use serde_json::Value;

/// Escape a value for use inside a double- or single-quoted HTML attribute.
pub fn esc_attr(s: &str) -> String {
    esc_html(s)
}

/// Escape a value for use as HTML text content.
pub fn esc_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Serialize `value` as JSON that is safe to place inside a `<script>` element.
///
/// `<`, `>` and `&` only occur inside JSON strings, so replacing them with
/// `\u` escapes keeps the document equivalent while making `</script>` and
/// `<!--` impossible. U+2028/U+2029 are escaped for pre-ES2019 parsers.
pub fn json_for_script(value: &Value) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    Ok(out)
}
