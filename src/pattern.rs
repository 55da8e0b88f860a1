//! Pattern compilation
//!
//! The user's regex is compiled exactly once, before any file is opened.
//! It is a byte regex, so files need not be valid UTF-8.
//! Compilation failures are turned into a message with a short hint when
//! the failure is one users commonly hit.

use anyhow::Result;
use regex::bytes::Regex;

/// Compile the search pattern.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|err| {
        let mut message = format!("failed to compile regex '{}': {}", pattern, err);
        if let Some(hint) = hint_for(&err, pattern) {
            message.push_str("\n\nHint: ");
            message.push_str(hint);
        }
        anyhow::anyhow!(message)
    })
}

/// Pick a hint for a regex error based on its message and the pattern text.
fn hint_for(err: &regex::Error, pattern: &str) -> Option<&'static str> {
    let lower_msg = err.to_string().to_lowercase();

    if lower_msg.contains("look-around") || lower_msg.contains("look-behind") || lower_msg.contains("look-ahead") {
        return Some("look-around assertions like (?=...) and (?<=...) are not supported; match the context and keep it with $1 instead");
    }

    if lower_msg.contains("backreference") {
        return Some("backreferences like \\1 are not supported in the pattern; use $1 in the replacement instead");
    }

    if lower_msg.contains("unclosed group") {
        return Some("add the missing ')' or escape a literal parenthesis as \\(");
    }

    if lower_msg.contains("unclosed character class") {
        return Some("add the missing ']' or escape a literal bracket as \\[");
    }

    if lower_msg.contains("repetition operator missing expression") {
        return Some("a quantifier (*, +, ?) needs something before it; escape it to match it literally, e.g. \\*");
    }

    if lower_msg.contains("unopened group") || (pattern.contains(')') && !pattern.contains('(')) {
        return Some("remove the stray ')' or escape it as \\)");
    }

    None
}
