//! Command runner abstraction
//!
//! Release steps shell out to external tools (version control, build tools).
//! They depend on the [CommandRunner] trait so they can be exercised without
//! spawning real processes.
//!
//! - [SystemRunner]: runs commands with `std::process::Command`
//! - [MockRunner]: records invocations and replays scripted results

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{ReleaseError, Result};

/// Outcome of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    /// Captured standard output; empty unless output was captured
    pub stdout: String,
    /// Captured standard error; empty unless output was captured
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external commands.
pub trait CommandRunner {
    /// Run `argv` (program followed by arguments) to completion.
    ///
    /// When `capture_output` is false the child inherits the terminal and the
    /// returned output strings are empty.
    ///
    /// # Errors
    /// * `ReleaseError::Command` - `argv` is empty
    /// * `ReleaseError::Io` - the program could not be started
    fn run(
        &self,
        argv: &[&str],
        capture_output: bool,
        working_dir: Option<&Path>,
    ) -> Result<CommandOutput>;
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        argv: &[&str],
        capture_output: bool,
        working_dir: Option<&Path>,
    ) -> Result<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ReleaseError::command("Empty command line"))?;

        info!(command = %argv.join(" "), "Executing");

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let output = if capture_output {
            let output = cmd.stdin(Stdio::inherit()).output()?;
            CommandOutput {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        } else {
            let status = cmd.status()?;
            CommandOutput {
                exit_code: status.code().unwrap_or(-1),
                ..CommandOutput::default()
            }
        };

        debug!(exit_code = output.exit_code, "command finished");
        Ok(output)
    }
}

/// Runs a command and fails if it exits non-zero.
pub fn execute(
    runner: &dyn CommandRunner,
    argv: &[&str],
    working_dir: Option<&Path>,
) -> Result<CommandOutput> {
    let output = runner.run(argv, false, working_dir)?;
    if !output.success() {
        return Err(ReleaseError::command(format!(
            "Error {} while executing {}",
            output.exit_code,
            argv.join(" ")
        )));
    }
    Ok(output)
}

/// Runs a command and returns its exit code whatever it is.
pub fn execute_permissive(
    runner: &dyn CommandRunner,
    argv: &[&str],
    working_dir: Option<&Path>,
) -> Result<i32> {
    Ok(runner.run(argv, false, working_dir)?.exit_code)
}

/// Runs a command with output captured and returns its stdout.
pub fn capture(
    runner: &dyn CommandRunner,
    argv: &[&str],
    working_dir: Option<&Path>,
) -> Result<String> {
    Ok(runner.run(argv, true, working_dir)?.stdout)
}

/// Fails unless `tool` is found on the search path.
pub fn check_command(runner: &dyn CommandRunner, tool: &str) -> Result<()> {
    let output = runner.run(&["which", tool], true, None)?;
    if !output.success() {
        return Err(ReleaseError::command(format!("command not found: {}", tool)));
    }
    Ok(())
}

/// Checks every tool, stopping at the first one that is missing.
pub fn check_tools(runner: &dyn CommandRunner, tools: &[&str]) -> Result<()> {
    info!(tools = %tools.join(", "), "checking required programs");
    tools.iter().try_for_each(|tool| check_command(runner, tool))
}

/// One recorded call to [MockRunner::run].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<String>,
    pub capture_output: bool,
    pub working_dir: Option<PathBuf>,
}

/// Runner for tests: returns queued outputs in order, then successes.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: RefCell<VecDeque<CommandOutput>>,
    invocations: RefCell<Vec<Invocation>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next unanswered invocation
    pub fn push_response(&self, output: CommandOutput) {
        self.responses.borrow_mut().push_back(output);
    }

    /// Queue a result with just an exit code
    pub fn push_exit_code(&self, exit_code: i32) {
        self.push_response(CommandOutput {
            exit_code,
            ..CommandOutput::default()
        });
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }
}

impl CommandRunner for MockRunner {
    fn run(
        &self,
        argv: &[&str],
        capture_output: bool,
        working_dir: Option<&Path>,
    ) -> Result<CommandOutput> {
        if argv.is_empty() {
            return Err(ReleaseError::command("Empty command line"));
        }

        self.invocations.borrow_mut().push(Invocation {
            argv: argv.iter().map(|a| a.to_string()).collect(),
            capture_output,
            working_dir: working_dir.map(Path::to_path_buf),
        });

        Ok(self.responses.borrow_mut().pop_front().unwrap_or_default())
    }
}
