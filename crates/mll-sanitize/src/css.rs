//! Best-effort filter for administrator-supplied custom CSS.
//!
//! The filter removes the well-known CSS injection vectors rather than
//! parsing CSS. All patterns are case-insensitive, and the rule set is
//! re-applied until nothing changes, so removing one pattern can never leave
//! another one behind (`expressexpression(ion(`).

use std::sync::OnceLock;

use regex_lite::Regex;
use tracing::debug;

use crate::text::strip_tags_once;
use crate::{builtin, until_stable};

/// A single removal rule of the CSS filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssRule {
    /// Markup tags (and `<script>`/`<style>` element bodies)
    Markup,
    /// `url(javascript:…)`, `url(data:…)`, `url(vbscript:…)`
    DangerousUrl,
    /// Legacy IE `expression(`
    Expression,
    /// `-moz-binding:` and `behavior:`/`behaviour:` declarations
    Binding,
    /// `@import` directives
    Import,
}

impl CssRule {
    /// Stable name used in logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            CssRule::Markup => "markup",
            CssRule::DangerousUrl => "dangerous_url",
            CssRule::Expression => "expression",
            CssRule::Binding => "binding",
            CssRule::Import => "import",
        }
    }
}

impl std::fmt::Display for CssRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

struct PatternRule {
    rule: CssRule,
    pattern: Regex,
    replacement: &'static str,
}

fn pattern_rules() -> &'static [PatternRule] {
    static RULES: OnceLock<Vec<PatternRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            PatternRule {
                rule: CssRule::DangerousUrl,
                // The replacement is shorter than any match, which keeps the
                // fixed-point loop finite.
                pattern: builtin(r#"(?i)url\(\s*["']?\s*(?:javascript|data|vbscript)\s*:[^)]*"#),
                replacement: "url(",
            },
            PatternRule {
                rule: CssRule::Expression,
                pattern: builtin(r"(?i)expression\s*\("),
                replacement: "",
            },
            PatternRule {
                rule: CssRule::Binding,
                // Property name must start the declaration, so
                // `scroll-behavior` and `overscroll-behavior` are kept.
                pattern: builtin(r"(?i)(^|[{;\s])(?:-moz-binding|behaviou?r)\s*:[^;}]*;?"),
                replacement: "$1",
            },
            PatternRule {
                rule: CssRule::Import,
                pattern: builtin(r"(?i)@import[^;{\n]*;?"),
                replacement: "",
            },
        ]
    })
}

fn apply_once(input: &str, hits: &mut Vec<CssRule>) -> String {
    let mut out = strip_tags_once(input);
    if out != input {
        note(hits, CssRule::Markup);
    }
    for rule in pattern_rules() {
        if rule.pattern.is_match(&out) {
            note(hits, rule.rule);
            out = rule.pattern.replace_all(&out, rule.replacement).into_owned();
        }
    }
    out
}

fn note(hits: &mut Vec<CssRule>, rule: CssRule) {
    if !hits.contains(&rule) {
        hits.push(rule);
    }
}

/// Sanitize custom CSS, returning the filtered text and the rules that fired.
pub fn audit_custom_css(input: &str) -> (String, Vec<CssRule>) {
    let mut hits = Vec::new();
    let output = until_stable(input, |s| apply_once(s, &mut hits));
    if !hits.is_empty() {
        debug!(
            rules = ?hits.iter().map(CssRule::as_str).collect::<Vec<_>>(),
            removed_bytes = input.len().saturating_sub(output.len()),
            "custom CSS filtered"
        );
    }
    (output, hits)
}

/// Sanitize custom CSS.
///
/// Idempotent: `sanitize_custom_css(&sanitize_custom_css(x)) == sanitize_custom_css(x)`.
pub fn sanitize_custom_css(input: &str) -> String {
    audit_custom_css(input).0
}
