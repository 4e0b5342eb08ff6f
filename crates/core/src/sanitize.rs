//! Free-text sanitization for user-supplied names.
//!
//! The catalog stores plain text only. Sanitization strips the markup-shaped
//! substrings an attacker could use if the text ever reached an HTML context:
//! angle brackets, `javascript:` URL schemes, and inline event-handler
//! patterns (`onload=`, `onclick=`, ...).

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a sanitized name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

static JAVASCRIPT_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("valid pattern"));

static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bon\w+\s*=").expect("valid pattern"));

/// Sanitize a free-text name.
///
/// Trims surrounding whitespace, removes angle brackets, `javascript:`
/// schemes and `on<event>=` handler patterns, and caps the result at
/// [`MAX_NAME_LENGTH`] characters. Stripping repeats until a fixpoint is
/// reached, so split-and-rejoin tricks (`javasjavascript:cript:`) are removed
/// and the function is idempotent: `sanitize_name(&sanitize_name(x)) ==
/// sanitize_name(x)`.
///
/// The input is never mutated; a sanitized copy is returned.
#[must_use]
pub fn sanitize_name(input: &str) -> String {
    let mut current = input.trim().to_owned();
    loop {
        let stripped = strip_hostile(&current);
        let capped: String = stripped.chars().take(MAX_NAME_LENGTH).collect();
        let next = capped.trim().to_owned();
        if next == current {
            return current;
        }
        // Every pass only removes characters, so this terminates.
        current = next;
    }
}

/// One removal pass over the hostile substring patterns.
fn strip_hostile(s: &str) -> String {
    let without_brackets: String = s.chars().filter(|c| *c != '<' && *c != '>').collect();
    let without_scheme = JAVASCRIPT_SCHEME.replace_all(&without_brackets, "");
    EVENT_HANDLER.replace_all(&without_scheme, "").into_owned()
}
