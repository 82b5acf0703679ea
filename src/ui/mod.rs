//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling
//!
//! Release steps ask questions through the [Prompt] trait so they can run
//! against scripted answers in tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use regex::Regex;

use crate::error::{ReleaseError, Result};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_project_table, display_selected_projects,
    display_status, display_success,
};

/// Asks the user questions.
pub trait Prompt {
    /// Asks a yes/no question until the answer is `y` or `n` (case-insensitive).
    fn confirm(&mut self, message: &str) -> Result<bool>;

    /// Asks for a value, offering `default`.
    ///
    /// An empty answer yields `default`. Otherwise the trimmed answer is
    /// returned once it matches `valid` (every answer is valid when `valid` is None).
    fn prompt_with_default(
        &mut self,
        message: &str,
        default: &str,
        valid: Option<&Regex>,
    ) -> Result<String>;
}

/// Confirms only when prompting is enabled; returns true otherwise.
///
/// Used by unattended (`--auto`) runs that must not block on input.
pub fn maybe_confirm(prompt: &mut dyn Prompt, message: &str, enabled: bool) -> Result<bool> {
    if !enabled {
        return Ok(true);
    }
    prompt.confirm(message)
}

/// Asks for a value only when prompting is enabled; returns `default` otherwise.
pub fn maybe_prompt_with_default(
    prompt: &mut dyn Prompt,
    message: &str,
    default: &str,
    valid: Option<&Regex>,
    enabled: bool,
) -> Result<String> {
    if !enabled {
        return Ok(default.to_string());
    }
    prompt.prompt_with_default(message, default, valid)
}

/// Prompt reading answers from `input` and writing questions to `output`.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt reading stdin; questions go to stderr so stdout carries only results
    pub fn stdio() -> Self {
        TerminalPrompt::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalPrompt { input, output }
    }

    /// Consumes the prompt and returns the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ReleaseError::prompt("input closed before an answer was given"));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        loop {
            let answer = self.ask(&format!("{} [y|n]\n", message))?.to_lowercase();
            match answer.as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => continue,
            }
        }
    }

    fn prompt_with_default(
        &mut self,
        message: &str,
        default: &str,
        valid: Option<&Regex>,
    ) -> Result<String> {
        loop {
            let answer = self.ask(&format!("{} ({}): ", message, default))?;
            if answer.is_empty() {
                return Ok(default.to_string());
            }

            match valid {
                Some(pattern) if !pattern.is_match(&answer) => {
                    writeln!(
                        self.output,
                        "Invalid answer.  Validating regex: {}",
                        pattern.as_str()
                    )?;
                }
                _ => return Ok(answer),
            }
        }
    }
}

/// Prompt for tests: replays canned answers and records the questions asked.
///
/// Answers go through the same rules as [TerminalPrompt], so an invalid
/// canned answer makes it move on to the next one.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    fn next_answer(&mut self, message: &str) -> Result<String> {
        self.asked.push(message.to_string());
        self.answers
            .pop_front()
            .map(|a| a.trim().to_string())
            .ok_or_else(|| ReleaseError::prompt(format!("no scripted answer for '{}'", message)))
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        loop {
            match self.next_answer(message)?.to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => continue,
            }
        }
    }

    fn prompt_with_default(
        &mut self,
        message: &str,
        default: &str,
        valid: Option<&Regex>,
    ) -> Result<String> {
        loop {
            let answer = self.next_answer(message)?;
            if answer.is_empty() {
                return Ok(default.to_string());
            }
            if valid.map_or(true, |pattern| pattern.is_match(&answer)) {
                return Ok(answer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn terminal(input: &str) -> TerminalPrompt<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_confirm_repeats_until_y_or_n() {
        let mut prompt = terminal("maybe\nYES\nY\n");
        assert!(prompt.confirm("Continue?").unwrap());

        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert_eq!(output.matches("Continue? [y|n]").count(), 3);
    }

    #[test]
    fn test_confirm_no() {
        let mut prompt = terminal("n\n");
        assert!(!prompt.confirm("Delete?").unwrap());
    }

    #[test]
    fn test_confirm_closed_input() {
        let mut prompt = terminal("");
        assert!(matches!(
            prompt.confirm("Continue?"),
            Err(ReleaseError::Prompt(_))
        ));
    }

    #[test]
    fn test_prompt_with_default_empty_answer() {
        let mut prompt = terminal("\n");
        let answer = prompt
            .prompt_with_default("Release version", "1.0.4", None)
            .unwrap();
        assert_eq!(answer, "1.0.4");
    }

    #[test]
    fn test_prompt_with_default_validates() {
        let pattern = Regex::new(r"^\d+\.\d+\.\d+$").unwrap();
        let mut prompt = terminal("soon\n  1.1.0  \n");
        let answer = prompt
            .prompt_with_default("Release version", "1.0.4", Some(&pattern))
            .unwrap();
        assert_eq!(answer, "1.1.0");

        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert!(output.contains("Release version (1.0.4): "));
        assert!(output.contains("Invalid answer.  Validating regex: ^\\d+\\.\\d+\\.\\d+$"));
    }

    #[test]
    fn test_prompt_with_default_without_pattern_keeps_answer() {
        let mut prompt = terminal("custom\n");
        let answer = prompt.prompt_with_default("Editor", "vi", None).unwrap();
        assert_eq!(answer, "custom");
    }

    #[test]
    fn test_maybe_confirm_disabled_does_not_ask() {
        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
        assert!(maybe_confirm(&mut prompt, "Clean repos?", false).unwrap());
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_maybe_confirm_enabled_asks() {
        let mut prompt = ScriptedPrompt::new(["n"]);
        assert!(!maybe_confirm(&mut prompt, "Clean repos?", true).unwrap());
        assert_eq!(prompt.asked, vec!["Clean repos?"]);
    }

    #[test]
    fn test_maybe_prompt_with_default_disabled_returns_default() {
        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
        let answer =
            maybe_prompt_with_default(&mut prompt, "Release version", "1.0.4", None, false)
                .unwrap();
        assert_eq!(answer, "1.0.4");
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_maybe_prompt_with_default_enabled_asks() {
        let pattern = Regex::new(r"^[0-9]+\.[0-9]+$").unwrap();
        let mut prompt = ScriptedPrompt::new(["later", "2.0"]);
        let answer =
            maybe_prompt_with_default(&mut prompt, "Release version", "1.1", Some(&pattern), true)
                .unwrap();
        assert_eq!(answer, "2.0");
        assert_eq!(prompt.asked.len(), 2);
    }

    #[test]
    fn test_scripted_prompt_runs_out() {
        let mut prompt = ScriptedPrompt::new(["x"]);
        assert!(prompt.confirm("Continue?").is_err());
    }
}
