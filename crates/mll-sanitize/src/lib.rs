//! Sanitizers for administrator-supplied embed settings.
//!
//! Everything here is a pure string filter. The CSS filter is applied at save
//! time and again right before rendering, so every filter in this crate is
//! idempotent.

mod css;
mod escape;
mod text;

pub use css::{audit_custom_css, sanitize_custom_css, CssRule};
pub use escape::{esc_attr, esc_html, json_for_script};
pub use text::{sanitize_text_field, strip_tags};

use regex_lite::Regex;

/// Apply `pass` until the text stops changing.
///
/// Every pass used by this crate only ever removes characters when it
/// changes something, so the loop terminates and the result is a fixed point.
pub(crate) fn until_stable(input: &str, mut pass: impl FnMut(&str) -> String) -> String {
    let mut current = input.to_string();
    loop {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Compile one of the crate's built-in patterns.
pub(crate) fn builtin(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("built-in pattern {pattern:?} is invalid: {e}"))
}
