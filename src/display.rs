use crate::processor::RunSummary;
use crate::transformer::expand_replacement;
use colored::*;
use regex::bytes::Regex;
use std::borrow::Cow;

/// Line bytes as displayable text; invalid UTF-8 shows as U+FFFD.
fn text(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Renders matched lines for the console.
///
/// A match is shown as `old/new`; with color the old text is struck through
/// and the new text is bold.
#[derive(Debug, Clone, Copy)]
pub struct MatchFormatter {
    color: bool,
}

impl MatchFormatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Formatter that never emits escape codes
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// `<file> +<line>: <rendered>`
    pub fn format_location(&self, file_name: &str, line_number: usize, rendered: &str) -> String {
        if self.color {
            format!("{} +{}: {}", file_name.cyan(), line_number, rendered)
        } else {
            format!("{} +{}: {}", file_name, line_number, rendered)
        }
    }

    /// Render `line` with every match of `pattern` shown as `old/new`.
    pub fn format_all_matches(&self, line: &[u8], pattern: &Regex, replacement: &str) -> String {
        let mut rendered = String::with_capacity(line.len() * 2);
        let mut last_end = 0;

        for caps in pattern.captures_iter(line) {
            let Some(m) = caps.get(0) else { continue };
            rendered.push_str(&text(&line[last_end..m.start()]));
            rendered.push_str(&self.format_change(m.as_bytes(), &expand_replacement(&caps, replacement)));
            last_end = m.end();
        }

        rendered.push_str(&text(&line[last_end..]));
        rendered
    }

    /// Render one match as `old/new` between the text around it.
    pub fn format_single_match(&self, before: &[u8], old: &[u8], new: &[u8], after: &[u8]) -> String {
        format!("{}{}{}", text(before), self.format_change(old, new), text(after))
    }

    fn format_change(&self, old: &[u8], new: &[u8]) -> String {
        if self.color {
            format!("{}/{}", text(old).strikethrough(), text(new).bold())
        } else {
            format!("{}/{}", text(old), text(new))
        }
    }

    pub fn format_dry_run_header(&self) -> String {
        "Dry run mode enabled. No changes will be made.".to_string()
    }

    /// Header printed before processing the files of a directory.
    pub fn format_directory_header(&self, file_count: usize) -> String {
        let rule = "=".repeat(40);
        format!("Found {} files\nReplacing...\n{}", file_count, rule)
    }

    /// One-line summary of a finished run.
    pub fn format_summary(&self, summary: &RunSummary, dry_run: bool) -> String {
        let (count, noun, touched) = if dry_run {
            (summary.matched_lines, "matching line", summary.files_matched)
        } else {
            (summary.replacements, "replacement", summary.files_written)
        };
        let plural = if count == 1 { "" } else { "s" };
        let count_str = if self.color {
            count.to_string().bold().to_string()
        } else {
            count.to_string()
        };

        format!(
            "{} {}{} in {} of {} file(s)",
            count_str, noun, plural, touched, summary.files
        )
    }
}
