//! Run options shared by every stage of a revar invocation

use anyhow::Result;

/// Flat, immutable set of switches for one run.
///
/// Built once from the command line and passed by reference to the
/// resolver, the transformer and the processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Emit debug logs
    pub debug: bool,
    /// Walk directories recursively
    pub recursive: bool,
    /// Compute and display matches without writing
    pub dry_run: bool,
    /// Display every matched line
    pub verbose: bool,
    /// Ask before each replacement
    pub interactive: bool,
    /// With `interactive`, ask once per file instead of once per match
    pub force: bool,
}

impl Options {
    /// Reject flag combinations that cannot be honored together.
    pub fn validate(&self) -> Result<()> {
        if self.dry_run && self.interactive {
            anyhow::bail!("--dry-run cannot be combined with --interactive");
        }
        if self.dry_run && self.force {
            anyhow::bail!("--dry-run cannot be combined with --force");
        }
        Ok(())
    }

    /// Interactive confirmation collapsed into a single question per file.
    pub fn confirm_per_file(&self) -> bool {
        self.interactive && self.force
    }

    /// Interactive confirmation for every single match.
    pub fn confirm_per_match(&self) -> bool {
        self.interactive && !self.force
    }

    /// Whether matched lines are displayed before they are replaced.
    pub fn displays_matches(&self) -> bool {
        self.verbose || self.dry_run || self.confirm_per_file()
    }
}
