use crate::display::MatchFormatter;
use crate::error_helpers::open_error;
use crate::options::Options;
use crate::pattern::compile_pattern;
use crate::prompt::Prompt;
use crate::resolver::resolve_targets;
use crate::transformer::LineTransformer;
use crate::writer::{self, FileContent};
use anyhow::{Context, Result};
use regex::bytes::Regex;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub matched_lines: usize,
    pub replacements: usize,
    pub written: bool,
}

/// Totals over every file of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files visited
    pub files: usize,
    /// Files with at least one matching line
    pub files_matched: usize,
    /// Files rewritten on disk
    pub files_written: usize,
    pub matched_lines: usize,
    /// Replacements persisted to disk
    pub replacements: usize,
}

impl RunSummary {
    fn record(&mut self, report: &FileReport) {
        self.files += 1;
        self.matched_lines += report.matched_lines;
        if report.matched_lines > 0 {
            self.files_matched += 1;
        }
        if report.written {
            self.files_written += 1;
            self.replacements += report.replacements;
        }
    }
}

/// Applies one compiled pattern and replacement to files, one at a time.
pub struct FileProcessor {
    pattern: Regex,
    replacement: String,
    options: Options,
    formatter: MatchFormatter,
}

impl FileProcessor {
    pub fn new(pattern: Regex, replacement: impl Into<String>, options: Options, formatter: MatchFormatter) -> Self {
        Self {
            pattern,
            replacement: replacement.into(),
            options,
            formatter,
        }
    }

    /// Read, transform and (unless dry-run or declined) rewrite one file.
    ///
    /// The file is opened once (read-only in dry-run mode) and the handle is
    /// kept for the whole cycle. Unchanged files are never rewritten.
    pub fn process_file(&self, path: &Path, prompt: &mut dyn Prompt, out: &mut dyn Write) -> Result<FileReport> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(!self.options.dry_run)
            .open(path)
            .map_err(|e| anyhow::anyhow!(open_error(path, &e)))?;

        let mut raw = Vec::new();
        file.read_to_end(&mut raw)
            .with_context(|| format!("failed to scan file: {}", path.display()))?;
        let mut content = FileContent::parse(&raw);

        let transformer = LineTransformer::new(&self.pattern, &self.replacement, &self.options, &self.formatter);
        let file_name = path.display().to_string();
        let outcome = transformer.transform(&file_name, &mut content.lines, prompt, out)?;

        let written = !self.options.dry_run && outcome.confirmed && outcome.changed;
        if written {
            writer::overwrite(&mut file, &content.join())
                .with_context(|| format!("failed to overwrite file: {}", path.display()))?;
            tracing::info!(
                "Wrote {} ({} replacement(s) on {} line(s))",
                path.display(),
                outcome.replacements,
                outcome.matched_lines
            );
        } else {
            tracing::debug!("Left {} unchanged", path.display());
        }

        Ok(FileReport {
            path: path.to_path_buf(),
            matched_lines: outcome.matched_lines,
            replacements: outcome.replacements,
            written,
        })
    }
}

/// Run a full search-and-replace over `path`.
///
/// The pattern is compiled before the filesystem is touched. Files are
/// processed in resolver order; the first error stops the run and files
/// already written stay written.
pub fn run(
    regex: &str,
    replacement: &str,
    path: &Path,
    options: &Options,
    formatter: MatchFormatter,
    prompt: &mut dyn Prompt,
    out: &mut dyn Write,
) -> Result<RunSummary> {
    options.validate()?;
    let pattern = compile_pattern(regex)?;
    let targets = resolve_targets(path, options.recursive)?;

    if options.dry_run {
        writeln!(out, "{}", formatter.format_dry_run_header())?;
    }
    if path.is_dir() {
        writeln!(out, "{}", formatter.format_directory_header(targets.len()))?;
    }

    tracing::info!("Replacing '{}' with '{}' in {} file(s)", regex, replacement, targets.len());

    let processor = FileProcessor::new(pattern, replacement, *options, formatter);
    let mut summary = RunSummary::default();
    for target in &targets {
        let report = processor
            .process_file(target, prompt, out)
            .with_context(|| format!("failed to revar file: {}", target.display()))?;
        summary.record(&report);
    }

    writeln!(out, "{}", formatter.format_summary(&summary, options.dry_run))?;
    writeln!(out, "Done!")?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompt;
    use std::fs;
    use tempfile::TempDir;

    fn run_plain(regex: &str, replacement: &str, path: &Path, options: Options) -> (RunSummary, String) {
        let mut prompt = ScriptedPrompt::default();
        let mut out = Vec::new();
        let summary = run(regex, replacement, path, &options, MatchFormatter::plain(), &mut prompt, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_plain_mode_rewrites_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "foo bar foo").unwrap();

        let (summary, output) = run_plain("foo", "baz", &path, Options::default());

        assert_eq!(fs::read_to_string(&path).unwrap(), "baz bar baz");
        assert_eq!(summary.files_written, 1);
        assert_eq!(summary.replacements, 2);
        assert!(output.ends_with("Done!\n"));
    }

    #[test]
    fn test_dry_run_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "foo bar foo\n").unwrap();

        let options = Options { dry_run: true, ..Options::default() };
        let (summary, output) = run_plain("foo", "baz", &path, options);

        assert_eq!(fs::read_to_string(&path).unwrap(), "foo bar foo\n");
        assert_eq!(summary.files_written, 0);
        assert!(output.starts_with("Dry run mode enabled."));
        assert!(output.contains("+1: foo/baz bar foo/baz"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dry_run_works_on_read_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "foo").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();

        let options = Options { dry_run: true, ..Options::default() };
        let (summary, _) = run_plain("foo", "baz", &path, options);

        assert_eq!(summary.matched_lines, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "foo");
    }

    #[test]
    fn test_trailing_newline_is_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "one\nfoo\nthree\n").unwrap();

        run_plain("foo", "two", &path, Options::default());

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\nthree\n");
    }

    #[test]
    fn test_directory_shallow_skips_nested() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "foo").unwrap();
        fs::write(dir.path().join("b.txt"), "foo").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.txt"), "foo").unwrap();

        let (summary, output) = run_plain("foo", "bar", dir.path(), Options::default());

        assert_eq!(summary.files, 2);
        assert!(output.contains("Found 2 files"));
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "bar");
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "bar");
        assert_eq!(fs::read_to_string(dir.path().join("sub").join("c.txt")).unwrap(), "foo");
    }

    #[test]
    fn test_directory_recursive_reaches_nested() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "foo").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.txt"), "foo").unwrap();

        let options = Options { recursive: true, ..Options::default() };
        let (summary, _) = run_plain("foo", "bar", dir.path(), options);

        assert_eq!(summary.files, 2);
        assert_eq!(fs::read_to_string(dir.path().join("sub").join("c.txt")).unwrap(), "bar");
    }

    #[test]
    fn test_recursive_on_file_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "foo").unwrap();

        let options = Options { recursive: true, ..Options::default() };
        let mut out = Vec::new();
        let err = run("foo", "bar", &path, &options, MatchFormatter::plain(), &mut ScriptedPrompt::default(), &mut out)
            .unwrap_err();

        assert!(err.to_string().contains("recursive mode is only available for directories"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "foo");
    }

    #[test]
    fn test_invalid_pattern_fails_before_io() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let mut out = Vec::new();
        let err = run("(", "x", &missing, &Options::default(), MatchFormatter::plain(), &mut ScriptedPrompt::default(), &mut out)
            .unwrap_err();

        assert!(err.to_string().contains("failed to compile regex"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_interactive_declined_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "foo bar foo").unwrap();

        let options = Options { interactive: true, ..Options::default() };
        let mut prompt = ScriptedPrompt::new([false, false]);
        let mut out = Vec::new();
        let summary = run("foo", "baz", &path, &options, MatchFormatter::plain(), &mut prompt, &mut out).unwrap();

        assert_eq!(prompt.questions().len(), 2);
        assert_eq!(summary.files_written, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "foo bar foo");
    }

    #[test]
    fn test_interactive_force_gates_each_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "foo").unwrap();
        fs::write(dir.path().join("b.txt"), "foo").unwrap();

        let options = Options { interactive: true, force: true, ..Options::default() };
        let mut prompt = ScriptedPrompt::new([false, true]);
        let mut out = Vec::new();
        let summary = run("foo", "baz", dir.path(), &options, MatchFormatter::plain(), &mut prompt, &mut out).unwrap();

        assert_eq!(summary.files_written, 1);
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "foo");
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "baz");
    }

    #[test]
    fn test_latin1_file_is_edited_in_place() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"caf\xe9 foo\n").unwrap();
        fs::write(dir.path().join("b.txt"), "foo\n").unwrap();

        let (summary, _) = run_plain("foo", "bar", dir.path(), Options::default());

        assert_eq!(summary.files_written, 2);
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"caf\xe9 bar\n");
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "bar\n");
    }

    #[test]
    fn test_mixed_line_endings_are_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "foo\nkeep\r\n").unwrap();

        run_plain("foo", "bar", &path, Options::default());

        assert_eq!(fs::read_to_string(&path).unwrap(), "bar\nkeep\r\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_mid_directory_stops_run() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "foo").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("b.txt")).unwrap();
        fs::write(dir.path().join("c.txt"), "foo").unwrap();

        let mut out = Vec::new();
        let err = run("foo", "bar", dir.path(), &Options::default(), MatchFormatter::plain(), &mut ScriptedPrompt::default(), &mut out)
            .unwrap_err();

        let msg = format!("{:#}", err);
        assert!(msg.contains("b.txt"));
        assert!(msg.contains("Possible fixes:"));
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "bar");
        assert_eq!(fs::read_to_string(dir.path().join("c.txt")).unwrap(), "foo");
        assert!(!String::from_utf8(out).unwrap().contains("Done!"));
    }
}
