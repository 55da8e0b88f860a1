//! Yes/no confirmation prompts
//!
//! Interactive modes talk to the user through [`Prompt`], so the terminal can
//! be swapped for a scripted answer source.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// A blocking yes/no question.
pub trait Prompt {
    /// Ask `question` and wait for the answer. `true` means "yes".
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Whether a raw answer line counts as "yes".
pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

/// Prompt backed by the process's stdin and stdout.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl StdinPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for StdinPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let mut stdout = io::stdout();
        write!(stdout, "{} [y/n]: ", question)?;
        stdout.flush()?;

        // EOF reads as an empty answer, which is "no"
        let mut input = String::new();
        io::stdin()
            .lock()
            .read_line(&mut input)
            .context("failed to read answer from stdin")?;

        let answer = is_yes(&input);
        tracing::debug!("Prompt '{}' answered {}", question, if answer { "yes" } else { "no" });
        Ok(answer)
    }
}

/// Prompt that replays a fixed list of answers and records every question.
///
/// Once the script runs out every further question is answered "no".
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<bool>,
    questions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I: IntoIterator<Item = bool>>(answers: I) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            questions: Vec::new(),
        }
    }

    /// Questions asked so far, in order.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}
