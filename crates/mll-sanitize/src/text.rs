//! Plain-text field filters (data source, API key, timezone, ...).

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::{builtin, until_stable};

struct TagPatterns {
    script: Regex,
    style: Regex,
    tag: Regex,
}

fn tag_patterns() -> &'static TagPatterns {
    static PATTERNS: OnceLock<TagPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| TagPatterns {
        script: builtin(r"(?is)<script\b[^>]*>.*?</script\s*>"),
        style: builtin(r"(?is)<style\b[^>]*>.*?</style\s*>"),
        tag: builtin(r"<[^>]*>"),
    })
}

/// Single tag-stripping pass: `<script>`/`<style>` elements go with their
/// content, every other tag loses only its markup.
pub(crate) fn strip_tags_once(input: &str) -> String {
    let p = tag_patterns();
    let out = p.script.replace_all(input, "");
    let out = p.style.replace_all(&out, "");
    p.tag.replace_all(&out, "").into_owned()
}

/// Remove all markup from `input`.
///
/// Tags that only appear once a `<script>` element is removed
/// (`<sc<script>x</script>ript>`) are removed as well.
pub fn strip_tags(input: &str) -> String {
    until_stable(input, strip_tags_once)
}

/// Sanitize a single-line text setting.
///
/// Strips markup, turns line breaks, tabs and other control characters into
/// spaces, collapses whitespace runs and trims the result.
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = strip_tags(input);
    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;
    for ch in stripped.chars() {
        if ch.is_whitespace() || ch.is_control() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }
    out
}
