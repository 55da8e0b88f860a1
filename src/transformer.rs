//! Line transformation
//!
//! Every line of a file goes through the same steps:
//!
//! 1. Lines without a match are left untouched.
//! 2. In verbose and dry-run mode the line is displayed with each match
//!    rendered as `old/new`.
//! 3. In interactive mode (without force) each match is shown on its own and
//!    only replaced when the user says yes.
//! 4. Otherwise every match is replaced.
//!
//! With interactive and force together the whole file is displayed and a
//! single question at the end decides whether the file is written.

use crate::display::MatchFormatter;
use crate::options::Options;
use crate::prompt::Prompt;
use anyhow::Result;
use regex::bytes::{Captures, Regex};
use std::io::Write;

const MATCH_QUESTION: &str = "Do you want to replace this match?";
const FILE_QUESTION: &str = "Do you want to replace all these lines?";

/// Result of transforming the lines of one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOutcome {
    /// Lines containing at least one match
    pub matched_lines: usize,
    /// Matches that were replaced
    pub replacements: usize,
    /// Whether any line now differs from the original
    pub changed: bool,
    /// `false` when the end-of-file confirmation was declined
    pub confirmed: bool,
}

/// Expand `$1` / `${name}` references in `replacement` for one match.
pub fn expand_replacement(caps: &Captures<'_>, replacement: &str) -> Vec<u8> {
    let mut expanded = Vec::new();
    caps.expand(replacement.as_bytes(), &mut expanded);
    expanded
}

/// Replace every match in `line`, returning the new line and the match count.
pub fn replace_all(pattern: &Regex, line: &[u8], replacement: &str) -> (Vec<u8>, usize) {
    let count = pattern.find_iter(line).count();
    if count == 0 {
        return (line.to_vec(), 0);
    }
    (pattern.replace_all(line, replacement.as_bytes()).into_owned(), count)
}

pub struct LineTransformer<'a> {
    pattern: &'a Regex,
    replacement: &'a str,
    options: &'a Options,
    formatter: &'a MatchFormatter,
}

impl<'a> LineTransformer<'a> {
    pub fn new(
        pattern: &'a Regex,
        replacement: &'a str,
        options: &'a Options,
        formatter: &'a MatchFormatter,
    ) -> Self {
        Self {
            pattern,
            replacement,
            options,
            formatter,
        }
    }

    /// Transform `lines` in place.
    ///
    /// `file_name` and the 1-based line number prefix every displayed line.
    /// Displays go to `out`; confirmations go through `prompt`.
    pub fn transform(
        &self,
        file_name: &str,
        lines: &mut [Vec<u8>],
        prompt: &mut dyn Prompt,
        out: &mut dyn Write,
    ) -> Result<TransformOutcome> {
        let mut outcome = TransformOutcome {
            confirmed: true,
            ..TransformOutcome::default()
        };

        for (idx, line) in lines.iter_mut().enumerate() {
            if !self.pattern.is_match(line) {
                continue;
            }
            let line_number = idx + 1;
            outcome.matched_lines += 1;
            tracing::debug!("{}:{} matches", file_name, line_number);

            if self.options.displays_matches() {
                let rendered = self.formatter.format_all_matches(line, self.pattern, self.replacement);
                writeln!(out, "{}", self.formatter.format_location(file_name, line_number, &rendered))?;
            }

            let (new_line, applied) = if self.options.confirm_per_match() {
                self.replace_interactively(file_name, line_number, line, prompt, out)?
            } else {
                replace_all(self.pattern, line, self.replacement)
            };

            outcome.replacements += applied;
            if new_line != *line {
                outcome.changed = true;
                *line = new_line;
            }
        }

        if self.options.confirm_per_file() && outcome.replacements > 0 {
            out.flush()?;
            outcome.confirmed = prompt.confirm(FILE_QUESTION)?;
        }

        Ok(outcome)
    }

    /// Walk the matches of `line` in order, asking before each replacement.
    ///
    /// The displayed line reflects the answers given so far.
    fn replace_interactively(
        &self,
        file_name: &str,
        line_number: usize,
        line: &[u8],
        prompt: &mut dyn Prompt,
        out: &mut dyn Write,
    ) -> Result<(Vec<u8>, usize)> {
        let mut result = Vec::with_capacity(line.len());
        let mut last_end = 0;
        let mut applied = 0;

        for caps in self.pattern.captures_iter(line) {
            let Some(m) = caps.get(0) else { continue };
            let new_text = expand_replacement(&caps, self.replacement);

            result.extend_from_slice(&line[last_end..m.start()]);
            let rendered = self.formatter.format_single_match(&result, m.as_bytes(), &new_text, &line[m.end()..]);
            writeln!(out, "{}", self.formatter.format_location(file_name, line_number, &rendered))?;
            out.flush()?;

            if prompt.confirm(MATCH_QUESTION)? {
                result.extend_from_slice(&new_text);
                applied += 1;
            } else {
                result.extend_from_slice(m.as_bytes());
            }
            last_end = m.end();
        }

        result.extend_from_slice(&line[last_end..]);
        Ok((result, applied))
    }
}
