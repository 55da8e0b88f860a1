//! revar: regex search-and-replace across files
//!
//! This library exposes revar's core functionality for the binary and for tests.
//! The main binary is at src/main.rs.

pub mod cli;
pub mod config;
pub mod display;
pub mod error_helpers;
pub mod logger;
pub mod options;
pub mod pattern;
pub mod processor;
pub mod prompt;
pub mod resolver;
pub mod transformer;
pub mod writer;

// Re-export commonly used types for convenience
pub use display::MatchFormatter;
pub use options::Options;
pub use pattern::compile_pattern;
pub use processor::{FileProcessor, FileReport, RunSummary, run};
pub use prompt::{Prompt, ScriptedPrompt, StdinPrompt};
pub use resolver::resolve_targets;
pub use transformer::{LineTransformer, TransformOutcome};
